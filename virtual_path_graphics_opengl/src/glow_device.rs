/// GlowGraphicsDevice - OpenGL ES 3 implementation of GraphicsDevice
///
/// Every call forwards to `glow` on the context that was current when the
/// device was created. Handles are GL object names, so they convert to and
/// from glow's native wrappers without a lookup table.

use std::ffi::c_void;
use std::rc::Rc;
use glow::HasContext;

use virtual_path_graphics::virtual_path::Result;
use virtual_path_graphics::virtual_path::render::{
    Attachment, BufferTarget, BufferUsage, Capability, ClearMask, FramebufferTarget,
    GraphicsDevice, Handle, IndexType, ObjectKind, PixelFormat, PrimitiveTopology, Rect2D,
    RenderbufferFormat, ShaderStage, TextureFilter, TextureWrap, Uniform, UniformLocation,
};
use virtual_path_graphics::{engine_err, engine_info, engine_trace, engine_warn};

type Loader = Rc<dyn Fn(&str) -> *const c_void>;

/// OpenGL device
///
/// Not `Send`: it must only be used on the thread its context is current on.
pub struct GlowGraphicsDevice {
    gl: glow::Context,
    loader: Loader,
}

impl GlowGraphicsDevice {
    /// Load GL entry points through `loader`
    ///
    /// # Safety
    ///
    /// A GL (ES) 3.0+ context must be current on the calling thread, and it
    /// must stay current on this thread for the whole life of the device.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: Fn(&str) -> *const c_void + 'static,
    {
        let loader: Loader = Rc::new(loader);
        let resolve = loader.clone();
        let gl = glow::Context::from_loader_function(move |name| resolve(name));

        let version = gl.get_parameter_string(glow::VERSION);
        let renderer = gl.get_parameter_string(glow::RENDERER);
        engine_info!("vpgfx::opengl", "GL context: {} ({})", version, renderer);

        // Tightly packed RGB rows are not 4-byte aligned
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);

        Self { gl, loader }
    }

    /// Underlying glow context, for drawing services that issue raw GL
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

// ============================================================================
// Enum mapping
// ============================================================================

pub(crate) fn buffer_target_to_gl(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        BufferTarget::Uniform => glow::UNIFORM_BUFFER,
    }
}

pub(crate) fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
    }
}

pub(crate) fn shader_stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// (internal format, pixel format)
pub(crate) fn pixel_format_to_gl(format: PixelFormat) -> (u32, u32) {
    match format {
        PixelFormat::Rgb => (glow::RGB8, glow::RGB),
        PixelFormat::Rgba => (glow::RGBA8, glow::RGBA),
    }
}

pub(crate) fn filter_to_gl(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST,
    }
}

pub(crate) fn wrap_to_gl(wrap: TextureWrap) -> u32 {
    match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
    }
}

pub(crate) fn renderbuffer_format_to_gl(format: RenderbufferFormat) -> u32 {
    match format {
        RenderbufferFormat::Rgb8 => glow::RGB8,
        RenderbufferFormat::Depth32FStencil8 => glow::DEPTH32F_STENCIL8,
    }
}

pub(crate) fn framebuffer_target_to_gl(target: FramebufferTarget) -> u32 {
    match target {
        FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
        FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
    }
}

pub(crate) fn attachment_to_gl(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color0 => glow::COLOR_ATTACHMENT0,
        Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    if mask.contains(ClearMask::STENCIL) {
        bits |= glow::STENCIL_BUFFER_BIT;
    }
    bits
}

pub(crate) fn topology_to_gl(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
    }
}

pub(crate) fn index_type_to_gl(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

pub(crate) fn capability_to_gl(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
    }
}

/// GL sizes are `GLsizei`/`GLint`; saturate instead of wrapping
pub(crate) fn gl_int<T: TryInto<i32>>(value: T) -> i32 {
    value.try_into().unwrap_or(i32::MAX)
}

// ============================================================================
// Handle conversion
// ============================================================================

fn buffer(handle: Handle) -> glow::NativeBuffer {
    glow::NativeBuffer(handle.into())
}

fn shader(handle: Handle) -> glow::NativeShader {
    glow::NativeShader(handle.into())
}

fn program(handle: Handle) -> glow::NativeProgram {
    glow::NativeProgram(handle.into())
}

fn texture(handle: Handle) -> glow::NativeTexture {
    glow::NativeTexture(handle.into())
}

fn renderbuffer(handle: Handle) -> glow::NativeRenderbuffer {
    glow::NativeRenderbuffer(handle.into())
}

fn framebuffer(handle: Handle) -> glow::NativeFramebuffer {
    glow::NativeFramebuffer(handle.into())
}

fn vertex_array(handle: Handle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(handle.into())
}

/// Turn glow's `Result<name, String>` into a handle
fn created<N>(kind: ObjectKind, result: std::result::Result<N, String>, name: fn(N) -> Handle) -> Result<Handle> {
    match result {
        Ok(native) => {
            let handle = name(native);
            engine_trace!("vpgfx::opengl", "created {:?} {}", kind, handle);
            Ok(handle)
        }
        Err(reason) => Err(engine_err!("vpgfx::opengl", "failed to create {:?}: {}", kind, reason)),
    }
}

// ============================================================================
// GraphicsDevice
// ============================================================================

impl GraphicsDevice for GlowGraphicsDevice {
    fn create_object(&mut self, kind: ObjectKind) -> Result<Handle> {
        let gl = &self.gl;
        unsafe {
            match kind {
                ObjectKind::Buffer => created(kind, gl.create_buffer(), |n| Handle::from(n.0)),
                ObjectKind::Shader(stage) => {
                    created(kind, gl.create_shader(shader_stage_to_gl(stage)), |n| Handle::from(n.0))
                }
                ObjectKind::Program => created(kind, gl.create_program(), |n| Handle::from(n.0)),
                ObjectKind::Texture => created(kind, gl.create_texture(), |n| Handle::from(n.0)),
                ObjectKind::Renderbuffer => created(kind, gl.create_renderbuffer(), |n| Handle::from(n.0)),
                ObjectKind::Framebuffer => created(kind, gl.create_framebuffer(), |n| Handle::from(n.0)),
                ObjectKind::VertexArray => created(kind, gl.create_vertex_array(), |n| Handle::from(n.0)),
            }
        }
    }

    fn delete_object(&mut self, kind: ObjectKind, handle: Handle) {
        let gl = &self.gl;
        unsafe {
            match kind {
                ObjectKind::Buffer => gl.delete_buffer(buffer(handle)),
                ObjectKind::Shader(_) => gl.delete_shader(shader(handle)),
                ObjectKind::Program => gl.delete_program(program(handle)),
                ObjectKind::Texture => gl.delete_texture(texture(handle)),
                ObjectKind::Renderbuffer => gl.delete_renderbuffer(renderbuffer(handle)),
                ObjectKind::Framebuffer => gl.delete_framebuffer(framebuffer(handle)),
                ObjectKind::VertexArray => gl.delete_vertex_array(vertex_array(handle)),
            }
        }
        engine_trace!("vpgfx::opengl", "deleted {:?} {}", kind, handle);
    }

    // ===== BUFFERS =====

    fn bind_buffer(&mut self, target: BufferTarget, handle: Option<Handle>) {
        unsafe { self.gl.bind_buffer(buffer_target_to_gl(target), handle.map(buffer)) }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target_to_gl(target), data, buffer_usage_to_gl(usage))
        }
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_sub_data_u8_slice(buffer_target_to_gl(target), gl_int(offset), data)
        }
    }

    fn read_buffer(&mut self, target: BufferTarget, offset: usize, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let target = buffer_target_to_gl(target);
        unsafe {
            let mapped = self
                .gl
                .map_buffer_range(target, gl_int(offset), gl_int(len), glow::MAP_READ_BIT);
            if mapped.is_null() {
                return Err(engine_err!(
                    "vpgfx::opengl",
                    "glMapBufferRange failed for {} bytes at {}", len, offset
                ));
            }
            let bytes = std::slice::from_raw_parts(mapped, len).to_vec();
            self.gl.unmap_buffer(target);
            Ok(bytes)
        }
    }

    // ===== SHADERS AND PROGRAMS =====

    fn compile_shader(&mut self, handle: Handle, source: &str) -> String {
        let gl = &self.gl;
        unsafe {
            gl.shader_source(shader(handle), source);
            gl.compile_shader(shader(handle));
            if gl.get_shader_compile_status(shader(handle)) {
                return String::new();
            }
            let log = gl.get_shader_info_log(shader(handle));
            if log.is_empty() {
                "shader compilation failed without a log".to_string()
            } else {
                log
            }
        }
    }

    fn link_program(&mut self, handle: Handle, shaders: &[Handle]) -> String {
        let gl = &self.gl;
        unsafe {
            for stage in shaders {
                gl.attach_shader(program(handle), shader(*stage));
            }
            gl.link_program(program(handle));
            for stage in shaders {
                gl.detach_shader(program(handle), shader(*stage));
            }

            if gl.get_program_link_status(program(handle)) {
                return String::new();
            }
            let log = gl.get_program_info_log(program(handle));
            if log.is_empty() {
                "program link failed without a log".to_string()
            } else {
                log
            }
        }
    }

    fn use_program(&mut self, handle: Option<Handle>) {
        unsafe { self.gl.use_program(handle.map(program)) }
    }

    fn attribute_location(&mut self, handle: Handle, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program(handle), name) }
    }

    fn uniform_location(&mut self, handle: Handle, name: &str) -> Option<UniformLocation> {
        unsafe {
            self.gl
                .get_uniform_location(program(handle), name)
                .map(|location| UniformLocation(location.0))
        }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &Uniform) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        let gl = &self.gl;
        unsafe {
            match *value {
                Uniform::I32(v) => gl.uniform_1_i32(location, v),
                Uniform::F32(v) => gl.uniform_1_f32(location, v),
                Uniform::Vec2(v) => gl.uniform_2_f32(location, v.x, v.y),
                Uniform::Vec3(v) => gl.uniform_3_f32(location, v.x, v.y, v.z),
                Uniform::Vec4(v) => gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                Uniform::Mat2(m) => gl.uniform_matrix_2_f32_slice(location, false, &m.to_cols_array()),
                Uniform::Mat3(m) => gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array()),
                Uniform::Mat4(m) => gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array()),
            }
        }
    }

    // ===== TEXTURES =====

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&mut self, handle: Option<Handle>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, handle.map(texture)) }
    }

    fn set_texture_sampling(&mut self, filter: TextureFilter, wrap: TextureWrap) {
        let filter = filter_to_gl(filter) as i32;
        let wrap = wrap_to_gl(wrap) as i32;
        let gl = &self.gl;
        unsafe {
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
        }
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, format: PixelFormat, pixels: Option<&[u8]>) {
        let (internal, layout) = pixel_format_to_gl(format);
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal as i32,
                gl_int(width),
                gl_int(height),
                0,
                layout,
                glow::UNSIGNED_BYTE,
                pixels,
            )
        }
    }

    // ===== RENDERBUFFERS =====

    fn bind_renderbuffer(&mut self, handle: Option<Handle>) {
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, handle.map(renderbuffer)) }
    }

    fn renderbuffer_storage_multisample(
        &mut self,
        samples: u32,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) {
        let max_samples = unsafe { self.gl.get_parameter_i32(glow::MAX_SAMPLES) };
        let requested = gl_int(samples);
        if requested > max_samples {
            engine_warn!(
                "vpgfx::opengl",
                "{} samples requested, driver maximum is {}", requested, max_samples
            );
        }

        unsafe {
            self.gl.renderbuffer_storage_multisample(
                glow::RENDERBUFFER,
                requested.min(max_samples.max(1)),
                renderbuffer_format_to_gl(format),
                gl_int(width),
                gl_int(height),
            )
        }
    }

    // ===== FRAMEBUFFERS =====

    fn bind_framebuffer(&mut self, target: FramebufferTarget, handle: Option<Handle>) {
        unsafe {
            self.gl
                .bind_framebuffer(framebuffer_target_to_gl(target), handle.map(framebuffer))
        }
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        handle: Option<Handle>,
    ) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                framebuffer_target_to_gl(target),
                attachment_to_gl(attachment),
                glow::TEXTURE_2D,
                handle.map(texture),
                0,
            )
        }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        handle: Option<Handle>,
    ) {
        unsafe {
            self.gl.framebuffer_renderbuffer(
                framebuffer_target_to_gl(target),
                attachment_to_gl(attachment),
                glow::RENDERBUFFER,
                handle.map(renderbuffer),
            )
        }
    }

    fn blit_framebuffer(&mut self, src: Rect2D, dst: Rect2D, mask: ClearMask, filter: TextureFilter) {
        unsafe {
            self.gl.blit_framebuffer(
                src.x,
                src.y,
                src.x + gl_int(src.width),
                src.y + gl_int(src.height),
                dst.x,
                dst.y,
                dst.x + gl_int(dst.width),
                dst.y + gl_int(dst.height),
                clear_mask_to_gl(mask),
                filter_to_gl(filter),
            )
        }
    }

    // ===== VERTEX ARRAYS =====

    fn bind_vertex_array(&mut self, handle: Option<Handle>) {
        unsafe { self.gl.bind_vertex_array(handle.map(vertex_array)) }
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: u32, stride: usize, offset: usize) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                gl_int(components),
                glow::FLOAT,
                false,
                gl_int(stride),
                gl_int(offset),
            )
        }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    // ===== STATE AND DRAWING =====

    fn viewport(&mut self, rect: Rect2D) {
        unsafe {
            self.gl
                .viewport(rect.x, rect.y, gl_int(rect.width), gl_int(rect.height))
        }
    }

    fn clear_color(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) }
    }

    fn enable(&mut self, capability: Capability) {
        unsafe { self.gl.enable(capability_to_gl(capability)) }
    }

    fn draw_elements(&mut self, topology: PrimitiveTopology, count: u32, index_type: IndexType, offset: usize) {
        unsafe {
            self.gl.draw_elements(
                topology_to_gl(topology),
                gl_int(count),
                index_type_to_gl(index_type),
                gl_int(offset),
            )
        }
    }

    // ===== LOADER =====

    fn proc_address(&self, name: &str) -> *const c_void {
        (self.loader)(name)
    }
}

#[cfg(test)]
#[path = "glow_format_tests.rs"]
mod tests;
