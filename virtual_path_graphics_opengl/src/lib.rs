/*!
# VirtualPath Graphics - OpenGL Backend

OpenGL / OpenGL ES 3 implementation of the `virtual_path_graphics`
[`GraphicsDevice`](virtual_path_graphics::virtual_path::render::GraphicsDevice)
trait, built on the `glow` bindings.

The windowing layer creates and owns the GL context. It hands this crate a
proc-address loader and passes the resulting device to
`Renderer::context_init`.

```no_run
use virtual_path_graphics::virtual_path::Renderer;
use virtual_path_graphics_opengl::GlowGraphicsDevice;

# fn loader(_name: &str) -> *const std::ffi::c_void { std::ptr::null() }
let mut renderer = Renderer::default();
// SAFETY: a GL context is current on this thread
let device = unsafe { GlowGraphicsDevice::from_loader(loader) };
renderer.context_init(Box::new(device))?;
# Ok::<(), virtual_path_graphics::Error>(())
```
*/

mod glow_device;

pub use glow_device::GlowGraphicsDevice;
