/// Non-owning view of a renderer for drawing services

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::rc::Rc;
use winit::dpi::PhysicalSize;

use crate::error::{Error, Result};
use crate::graphics_device::ContextRef;

/// State a [`Renderer`](crate::renderer::Renderer) shares with its hosts
#[derive(Default)]
pub(crate) struct HostShared {
    pub(crate) context: RefCell<Option<ContextRef>>,
    pub(crate) surface: Cell<PhysicalSize<u32>>,
}

/// Handle given to drawing services (first load argument)
///
/// Cheap to clone. Valid for the renderer's whole life, but the context
/// it exposes only exists between context init and deinit.
#[derive(Clone)]
pub struct GraphicsHost {
    shared: Rc<HostShared>,
}

impl GraphicsHost {
    pub(crate) fn new(shared: Rc<HostShared>) -> Self {
        Self { shared }
    }

    /// Current graphics context
    ///
    /// # Errors
    ///
    /// `InvalidState` when no context is active.
    pub fn context(&self) -> Result<ContextRef> {
        self.shared
            .context
            .borrow()
            .clone()
            .ok_or_else(|| Error::InvalidState("no graphics context is active".to_string()))
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.context.borrow().is_some()
    }

    /// Size of the presentation surface in physical pixels
    pub fn surface_size(&self) -> PhysicalSize<u32> {
        self.shared.surface.get()
    }

    /// Resolve a GL entry point through the active context's loader
    pub fn proc_address(&self, name: &str) -> Result<*const c_void> {
        let context = self.context()?;
        let ctx = context.borrow();
        Ok(ctx.proc_address(name))
    }
}
