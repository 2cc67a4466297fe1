/// Ownership contract for GPU-backed objects
///
/// Every resource owns its driver objects through [`OwnedHandle`], which
/// deletes the object exactly once: on an explicit `release()` or when the
/// owner is dropped, whichever happens first.

use crate::error::{Error, Result};
use crate::graphics_device::{ContextRef, Handle, ObjectKind};
use crate::{engine_debug, engine_error};

/// Common lifecycle of every GPU resource
pub trait GraphicsResource {
    /// Primary driver object, `None` once released
    fn handle(&self) -> Option<Handle>;

    /// Delete the driver objects now. A second call is a no-op.
    fn release(&mut self);

    fn is_released(&self) -> bool {
        self.handle().is_none()
    }
}

/// A driver object deleted exactly once
pub struct OwnedHandle {
    context: ContextRef,
    kind: ObjectKind,
    raw: Option<Handle>,
}

impl OwnedHandle {
    /// Create a new driver object of `kind`
    pub fn create(context: &ContextRef, kind: ObjectKind) -> Result<Self> {
        let raw = context.borrow_mut().create_object(kind)?;
        Ok(Self {
            context: context.clone(),
            kind,
            raw: Some(raw),
        })
    }

    pub fn get(&self) -> Option<Handle> {
        self.raw
    }

    /// Handle for an operation, `InvalidState` after release
    pub fn require(&self) -> Result<Handle> {
        self.raw.ok_or_else(|| {
            Error::InvalidState(format!("{:?} used after release", self.kind))
        })
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn context(&self) -> &ContextRef {
        &self.context
    }

    pub fn is_released(&self) -> bool {
        self.raw.is_none()
    }

    pub fn release(&mut self) {
        let Some(handle) = self.raw.take() else {
            return;
        };

        match self.context.try_borrow_mut() {
            Ok(mut ctx) => {
                ctx.delete_object(self.kind, handle);
                engine_debug!("vpgfx::Resource", "released {:?} {}", self.kind, handle);
            }
            Err(_) => {
                // the context is mid-operation on this thread; deleting now would re-enter it
                engine_error!(
                    "vpgfx::Resource",
                    "leaked {:?} {}: context busy during release", self.kind, handle
                );
            }
        }
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for OwnedHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedHandle")
            .field("kind", &self.kind)
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(test)]
#[path = "graphics_resource_tests.rs"]
mod tests;
