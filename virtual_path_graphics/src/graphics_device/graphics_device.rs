/// GraphicsDevice trait - the backend seam
///
/// The core never talks to a driver directly. Every GPU operation goes
/// through a `GraphicsDevice`, which a backend crate implements over a real
/// API (OpenGL ES 3 via glow) and tests implement with a mock.

use std::ffi::c_void;
use std::num::NonZeroU32;
use std::fmt;

use crate::error::Result;
use crate::graphics_device::{
    BufferTarget, BufferUsage, ShaderStage, Uniform, UniformLocation,
    PixelFormat, TextureFilter, TextureWrap, RenderbufferFormat,
    FramebufferTarget, Attachment, ClearMask, Rect2D,
};

// ============================================================================
// Handles
// ============================================================================

/// Opaque driver object name
///
/// Zero is never a valid object in GL, so a handle is a `NonZeroU32` and
/// "no object" (the default framebuffer, an unbound target) is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(NonZeroU32);

impl Handle {
    /// Wrap a raw driver name, `None` for 0
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Handle)
    }

    /// Raw driver name
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for Handle {
    fn from(value: NonZeroU32) -> Self {
        Handle(value)
    }
}

impl From<Handle> for NonZeroU32 {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of driver object behind a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    Shader(ShaderStage),
    Program,
    Texture,
    Renderbuffer,
    Framebuffer,
    VertexArray,
}

// ============================================================================
// Draw state enums
// ============================================================================

/// Primitive assembly mode for indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
}

/// Element type of an index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U32,
}

impl IndexType {
    pub fn size_bytes(&self) -> usize {
        match self {
            IndexType::U32 => 4,
        }
    }
}

/// Fixed-function capability toggled with `enable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GL-shaped primitive operations
///
/// Operations that act on "the bound object" (buffer uploads, texture
/// storage, framebuffer attachments) follow GL semantics: they apply to
/// whatever the caller bound last on that target. [`GraphicsContext`]
/// shadows those bindings so resources can bind and restore safely.
///
/// Not `Send`: a GL context is current on exactly one thread.
///
/// [`GraphicsContext`]: crate::graphics_device::GraphicsContext
pub trait GraphicsDevice {
    // ===== OBJECTS =====

    /// Create a driver object of the given kind
    ///
    /// # Errors
    ///
    /// `BackendError` if the driver refuses to allocate a name.
    fn create_object(&mut self, kind: ObjectKind) -> Result<Handle>;

    /// Delete a driver object
    fn delete_object(&mut self, kind: ObjectKind, handle: Handle);

    // ===== BUFFERS =====

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>);

    /// Reallocate the bound buffer's storage with `data`
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Overwrite part of the bound buffer starting at `offset` bytes
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);

    /// Map `len` bytes of the bound buffer read-only, copy them out and unmap
    fn read_buffer(&mut self, target: BufferTarget, offset: usize, len: usize) -> Result<Vec<u8>>;

    // ===== SHADERS AND PROGRAMS =====

    /// Compile `source` into `shader` and return the info log (empty on success)
    fn compile_shader(&mut self, shader: Handle, source: &str) -> String;

    /// Attach `shaders`, link `program` and return the info log (empty on success)
    fn link_program(&mut self, program: Handle, shaders: &[Handle]) -> String;

    fn use_program(&mut self, program: Option<Handle>);

    /// Location of a vertex input, `None` if the program has no such input
    fn attribute_location(&mut self, program: Handle, name: &str) -> Option<u32>;

    /// Location of a uniform, `None` if the program has no such uniform
    fn uniform_location(&mut self, program: Handle, name: &str) -> Option<UniformLocation>;

    /// Set a uniform of the currently used program
    fn set_uniform(&mut self, location: UniformLocation, value: &Uniform);

    // ===== TEXTURES =====

    /// Select the texture unit later texture binds apply to
    fn active_texture(&mut self, unit: u32);

    fn bind_texture(&mut self, texture: Option<Handle>);

    /// Set filtering and wrapping on the bound texture
    fn set_texture_sampling(&mut self, filter: TextureFilter, wrap: TextureWrap);

    /// Reallocate the bound texture, uploading `pixels` when given
    fn tex_image_2d(&mut self, width: u32, height: u32, format: PixelFormat, pixels: Option<&[u8]>);

    // ===== RENDERBUFFERS =====

    fn bind_renderbuffer(&mut self, renderbuffer: Option<Handle>);

    /// Reallocate the bound renderbuffer as multisampled storage
    fn renderbuffer_storage_multisample(
        &mut self,
        samples: u32,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    );

    // ===== FRAMEBUFFERS =====

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>);

    /// Attach a 2D texture to the framebuffer bound on `target`
    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture: Option<Handle>,
    );

    /// Attach a renderbuffer to the framebuffer bound on `target`
    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<Handle>,
    );

    /// Copy `src` of the read framebuffer into `dst` of the draw framebuffer
    fn blit_framebuffer(&mut self, src: Rect2D, dst: Rect2D, mask: ClearMask, filter: TextureFilter);

    // ===== VERTEX ARRAYS =====

    fn bind_vertex_array(&mut self, vertex_array: Option<Handle>);

    /// Source float attribute `index` from the bound array buffer
    fn vertex_attrib_pointer(&mut self, index: u32, components: u32, stride: usize, offset: usize);

    fn enable_vertex_attrib_array(&mut self, index: u32);

    // ===== STATE AND DRAWING =====

    fn viewport(&mut self, rect: Rect2D);

    fn clear_color(&mut self, color: [f32; 4]);

    fn clear(&mut self, mask: ClearMask);

    fn enable(&mut self, capability: Capability);

    /// Indexed draw from the bound vertex array
    fn draw_elements(&mut self, topology: PrimitiveTopology, count: u32, index_type: IndexType, offset: usize);

    // ===== LOADER =====

    /// Resolve a GL entry point by name (null if unknown)
    fn proc_address(&self, name: &str) -> *const c_void;
}
