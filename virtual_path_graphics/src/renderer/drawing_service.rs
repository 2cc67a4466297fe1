/// Contract between the renderer and the code that draws a scene

use std::any::Any;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::renderer::GraphicsHost;
use crate::engine_raise;

/// Scene drawn into the renderer's offscreen frame
///
/// Call order per context: `load`, `resize`, then once per tick `update`
/// followed by `render`, and finally `unload` at context teardown. All
/// calls happen on the render thread with the frame bound.
pub trait DrawingService {
    /// Build GPU resources. `args[0]` is the [`GraphicsHost`].
    fn load(&mut self, args: &LoadArgs) -> Result<()>;

    /// Release GPU resources before the context goes away
    fn unload(&mut self) {}

    /// Presentation surface changed size
    fn resize(&mut self, _width: u32, _height: u32) {}

    /// Advance the scene; `elapsed` is seconds since context init
    fn update(&mut self, elapsed: f64) -> Result<()>;

    /// Draw the scene; `elapsed` is seconds since context init
    fn render(&mut self, elapsed: f64) -> Result<()>;
}

/// Ordered, dynamically typed arguments passed to [`DrawingService::load`]
#[derive(Clone, Default)]
pub struct LoadArgs {
    args: Vec<Rc<dyn Any>>,
}

impl LoadArgs {
    pub fn new(args: Vec<Rc<dyn Any>>) -> Self {
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Fail unless at least `count` arguments are present
    pub fn require(&self, count: usize) -> Result<()> {
        if self.args.len() < count {
            return Err(engine_raise!("vpgfx::LoadArgs", Error::InvalidArgument(format!(
                "expected at least {} load arguments, got {}", count, self.args.len()
            ))));
        }
        Ok(())
    }

    /// Argument `index` as a `T`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the index is out of range or the argument is
    /// not a `T`.
    pub fn get<T: Any>(&self, index: usize) -> Result<Rc<T>> {
        let arg = self.args.get(index).cloned().ok_or_else(|| {
            engine_raise!("vpgfx::LoadArgs", Error::InvalidArgument(format!("missing load argument {}", index)))
        })?;

        arg.downcast::<T>().map_err(|_| {
            engine_raise!("vpgfx::LoadArgs", Error::InvalidArgument(format!(
                "load argument {} is not a {}", index, std::any::type_name::<T>()
            )))
        })
    }

    /// The graphics host (argument 0)
    pub fn host(&self) -> Result<GraphicsHost> {
        Ok(self.get::<GraphicsHost>(0)?.as_ref().clone())
    }
}

impl std::fmt::Debug for LoadArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadArgs").field("len", &self.args.len()).finish()
    }
}

#[cfg(test)]
#[path = "drawing_service_tests.rs"]
mod tests;
