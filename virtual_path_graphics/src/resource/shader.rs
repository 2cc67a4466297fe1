/// Single compiled shader stage

use crate::error::{Error, Result};
use crate::graphics_device::{ContextRef, Handle, ObjectKind, ShaderStage};
use crate::resource::{GraphicsResource, OwnedHandle};
use crate::{engine_debug, engine_raise};

pub struct Shader {
    object: OwnedHandle,
    stage: ShaderStage,
}

impl Shader {
    /// Compile `source` for `stage`
    ///
    /// # Errors
    ///
    /// `ShaderCompileFailed` carrying the compiler log. The shader object is
    /// deleted before the error is returned.
    pub fn new(context: &ContextRef, stage: ShaderStage, source: &str) -> Result<Self> {
        let mut object = OwnedHandle::create(context, ObjectKind::Shader(stage))?;
        let handle = object.require()?;

        let log = context.borrow_mut().device().compile_shader(handle, source);
        if !log.is_empty() {
            object.release();
            return Err(engine_raise!("vpgfx::Shader", Error::ShaderCompileFailed { stage, log }));
        }

        engine_debug!("vpgfx::Shader", "compiled {:?} shader {}", stage, handle);
        Ok(Self { object, stage })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl GraphicsResource for Shader {
    fn handle(&self) -> Option<Handle> {
        self.object.get()
    }

    fn release(&mut self) {
        self.object.release();
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
