/*!
# VirtualPath Graphics

Backend-agnostic core of the VirtualPath real-time renderer.

A host windowing layer owns the GL context and forwards its lifecycle to a
[`Renderer`](renderer::Renderer). The renderer draws one
[`DrawingService`](renderer::DrawingService) into a multisampled offscreen
frame every tick, resolves it, and composites the result onto the
presentation target.

## Architecture

- **GraphicsDevice**: trait over the GL-shaped driver calls (implemented by
  the `virtual_path_graphics_opengl` backend)
- **GraphicsContext**: binding-state shadow with scoped, restoring binds
- **Resources**: Buffer, Shader, RenderPipeline, Texture, Frame, Mesh
- **Renderer**: per-frame loop and drawing-service host
- **Camera**: perspective fly camera for drawing services
*/

// Internal modules
mod error;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod camera;
pub mod renderer;
pub mod services;

pub use error::{Error, Result};

// Main virtual_path namespace module
pub mod virtual_path {
    pub use crate::error::{Error, Result};

    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, macros stay at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Device seam, binding state and the renderer host
    pub mod render {
        pub use crate::graphics_device::*;
        pub use crate::renderer::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod services {
        pub use crate::services::*;
    }
}

// Re-export math library at crate root
pub use glam;
