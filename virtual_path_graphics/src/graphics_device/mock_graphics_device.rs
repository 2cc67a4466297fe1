/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Emulates enough GL semantics to exercise the resources and the renderer:
/// object tables, per-target bindings, buffer bytes, texture and
/// renderbuffer storage, framebuffer attachments and uniform lookup. Every
/// call is appended to a textual call log, and draws/clears/blits are
/// recorded together with the framebuffer they landed in.
///
/// Shader "compilation" fails when the source has no `void main`; linking
/// fails unless exactly one vertex and one fragment stage are attached.
/// A uniform or attribute name resolves only if each of its `.`-separated
/// segments appears as an identifier in the attached sources.

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::Rc;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, GraphicsContext, ContextRef, Handle, ObjectKind,
    BufferTarget, BufferUsage, ShaderStage, Uniform, UniformLocation,
    PixelFormat, TextureFilter, TextureWrap, RenderbufferFormat,
    FramebufferTarget, Attachment, ClearMask, Rect2D,
    PrimitiveTopology, IndexType, Capability,
};

// ============================================================================
// Recorded state
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockTexture {
    pub width: u32,
    pub height: u32,
    pub format: Option<PixelFormat>,
    pub pixels: Option<Vec<u8>>,
    pub sampling: Option<(TextureFilter, TextureWrap)>,
    /// Number of storage (re)allocations
    pub allocations: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockRenderbuffer {
    pub samples: u32,
    pub format: Option<RenderbufferFormat>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAttached {
    Texture(Handle),
    Renderbuffer(Handle),
}

#[derive(Debug, Clone, Default)]
pub struct MockProgram {
    pub sources: Vec<String>,
    pub linked: bool,
    pub attributes: FxHashMap<String, u32>,
    pub uniforms: FxHashMap<String, UniformLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockDraw {
    pub count: u32,
    pub framebuffer: Option<Handle>,
    pub program: Option<Handle>,
    pub vertex_array: Option<Handle>,
    pub element_buffer: Option<Handle>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockClear {
    pub framebuffer: Option<Handle>,
    pub mask: ClearMask,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockBlit {
    pub read: Option<Handle>,
    pub draw: Option<Handle>,
    pub src: Rect2D,
    pub dst: Rect2D,
    pub mask: ClearMask,
}

/// Everything the mock has observed, shared with the test through `Rc`
#[derive(Debug, Default)]
pub struct MockState {
    next_name: u32,
    /// Refuse every `create_object` with a backend error
    pub refuse_objects: bool,

    pub live: FxHashMap<Handle, ObjectKind>,
    pub created: u32,
    pub deleted: u32,

    pub buffers: FxHashMap<Handle, Vec<u8>>,
    pub buffer_usage: FxHashMap<Handle, BufferUsage>,
    pub shader_sources: FxHashMap<Handle, (ShaderStage, String)>,
    pub programs: FxHashMap<Handle, MockProgram>,
    pub textures: FxHashMap<Handle, MockTexture>,
    pub renderbuffers: FxHashMap<Handle, MockRenderbuffer>,
    pub framebuffers: FxHashMap<Handle, FxHashMap<Attachment, MockAttached>>,
    /// Element buffer captured by each vertex array
    pub vertex_array_elements: FxHashMap<Handle, Handle>,

    pub bound_buffers: FxHashMap<BufferTarget, Handle>,
    pub bound_textures: FxHashMap<u32, Handle>,
    pub active_unit: u32,
    pub bound_renderbuffer: Option<Handle>,
    pub draw_framebuffer: Option<Handle>,
    pub read_framebuffer: Option<Handle>,
    pub vertex_array: Option<Handle>,
    pub program: Option<Handle>,

    pub enabled: FxHashSet<Capability>,
    pub enabled_attributes: FxHashSet<u32>,
    /// (index, components, stride, offset)
    pub attribute_pointers: Vec<(u32, u32, usize, usize)>,
    pub uniform_lookups: Vec<String>,
    /// (program, uniform name, value)
    pub uniforms_set: Vec<(Handle, String, Uniform)>,
    pub viewport: Rect2D,
    pub clear_color: [f32; 4],
    pub clears: Vec<MockClear>,
    pub blits: Vec<MockBlit>,
    pub draws: Vec<MockDraw>,
    pub calls: Vec<String>,
}

impl MockState {
    /// Number of objects created and not deleted
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live objects of one kind
    pub fn live_of(&self, kind: ObjectKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    /// Call-log entries starting with `prefix`
    pub fn calls_named(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Position of the first call-log entry starting with `prefix`
    pub fn call_index(&self, prefix: &str) -> Option<usize> {
        self.calls.iter().position(|c| c.starts_with(prefix))
    }

    fn bound_buffer(&self, target: BufferTarget) -> Option<Handle> {
        match target {
            BufferTarget::Index => self
                .vertex_array
                .and_then(|vao| self.vertex_array_elements.get(&vao).copied())
                .or_else(|| self.bound_buffers.get(&target).copied()),
            _ => self.bound_buffers.get(&target).copied(),
        }
    }

    fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<Handle> {
        match target {
            FramebufferTarget::Draw => self.draw_framebuffer,
            FramebufferTarget::Read => self.read_framebuffer,
        }
    }

    fn bound_texture(&self) -> Option<Handle> {
        self.bound_textures.get(&self.active_unit).copied()
    }
}

fn identifiers(source: &str) -> FxHashSet<&str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn resolves(sources: &[String], name: &str) -> bool {
    let tokens: FxHashSet<&str> = sources.iter().flat_map(|s| identifiers(s)).collect();
    name.split('.').all(|segment| tokens.contains(segment))
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    pub state: Rc<RefCell<MockState>>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self { state: Rc::new(RefCell::new(MockState::default())) }
    }

    fn log(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

/// Context over a fresh mock device, plus the mock's state for assertions
pub fn mock_context() -> (ContextRef, Rc<RefCell<MockState>>) {
    let device = MockGraphicsDevice::new();
    let state = device.state.clone();
    (GraphicsContext::shared(Box::new(device)), state)
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_object(&mut self, kind: ObjectKind) -> Result<Handle> {
        let mut state = self.state.borrow_mut();
        if state.refuse_objects {
            return Err(Error::BackendError(format!("mock refused {:?}", kind)));
        }

        state.next_name += 1;
        let handle = Handle::new(state.next_name)
            .ok_or_else(|| Error::BackendError("name overflow".to_string()))?;
        state.live.insert(handle, kind);
        state.created += 1;

        match kind {
            ObjectKind::Buffer => { state.buffers.insert(handle, Vec::new()); }
            ObjectKind::Shader(stage) => { state.shader_sources.insert(handle, (stage, String::new())); }
            ObjectKind::Program => { state.programs.insert(handle, MockProgram::default()); }
            ObjectKind::Texture => { state.textures.insert(handle, MockTexture::default()); }
            ObjectKind::Renderbuffer => { state.renderbuffers.insert(handle, MockRenderbuffer::default()); }
            ObjectKind::Framebuffer => { state.framebuffers.insert(handle, FxHashMap::default()); }
            ObjectKind::VertexArray => {}
        }
        state.calls.push(format!("create_object({:?}) -> {}", kind, handle.get()));
        Ok(handle)
    }

    fn delete_object(&mut self, kind: ObjectKind, handle: Handle) {
        let mut state = self.state.borrow_mut();
        if state.live.remove(&handle).is_some() {
            state.deleted += 1;
        }
        state.calls.push(format!("delete_object({:?}, {})", kind, handle.get()));
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        match (target, state.vertex_array, buffer) {
            (BufferTarget::Index, Some(vao), Some(b)) => { state.vertex_array_elements.insert(vao, b); }
            (BufferTarget::Index, Some(vao), None) => { state.vertex_array_elements.remove(&vao); }
            (_, _, Some(b)) => { state.bound_buffers.insert(target, b); }
            (_, _, None) => { state.bound_buffers.remove(&target); }
        }
        state.calls.push(format!("bind_buffer({:?}, {:?})", target, buffer.map(Handle::get)));
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        let mut state = self.state.borrow_mut();
        if let Some(buffer) = state.bound_buffer(target) {
            state.buffers.insert(buffer, data.to_vec());
            state.buffer_usage.insert(buffer, usage);
        }
        state.calls.push(format!("buffer_data({:?}, {})", target, data.len()));
    }

    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        if let Some(buffer) = state.bound_buffer(target) {
            if let Some(bytes) = state.buffers.get_mut(&buffer) {
                let end = (offset + data.len()).min(bytes.len());
                if offset < end {
                    bytes[offset..end].copy_from_slice(&data[..end - offset]);
                }
            }
        }
        state.calls.push(format!("buffer_sub_data({:?}, {}, {})", target, offset, data.len()));
    }

    fn read_buffer(&mut self, target: BufferTarget, offset: usize, len: usize) -> Result<Vec<u8>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("read_buffer({:?}, {}, {})", target, offset, len));
        let buffer = state
            .bound_buffer(target)
            .ok_or_else(|| Error::BackendError(format!("no buffer bound on {:?}", target)))?;
        let bytes = state
            .buffers
            .get(&buffer)
            .ok_or_else(|| Error::BackendError(format!("unknown buffer {}", buffer)))?;
        bytes
            .get(offset..offset + len)
            .map(|slice| slice.to_vec())
            .ok_or_else(|| Error::BackendError("map range out of bounds".to_string()))
    }

    fn compile_shader(&mut self, shader: Handle, source: &str) -> String {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.shader_sources.get_mut(&shader) {
            entry.1 = source.to_string();
        }
        state.calls.push(format!("compile_shader({})", shader.get()));
        if source.contains("void main") {
            String::new()
        } else {
            "ERROR: 0:1: 'main' : missing entry point".to_string()
        }
    }

    fn link_program(&mut self, program: Handle, shaders: &[Handle]) -> String {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("link_program({})", program.get()));

        let stages: Vec<(ShaderStage, String)> = shaders
            .iter()
            .filter_map(|s| state.shader_sources.get(s).cloned())
            .collect();
        let vertex = stages.iter().filter(|(s, _)| *s == ShaderStage::Vertex).count();
        let fragment = stages.iter().filter(|(s, _)| *s == ShaderStage::Fragment).count();

        let log = if vertex == 1 && fragment == 1 && stages.len() == 2 {
            String::new()
        } else {
            "ERROR: program needs one vertex and one fragment stage".to_string()
        };

        if let Some(entry) = state.programs.get_mut(&program) {
            entry.sources = stages.into_iter().map(|(_, src)| src).collect();
            entry.linked = log.is_empty();
        }
        log
    }

    fn use_program(&mut self, program: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        state.program = program;
        state.calls.push(format!("use_program({:?})", program.map(Handle::get)));
    }

    fn attribute_location(&mut self, program: Handle, name: &str) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("attribute_location({})", name));
        let entry = state.programs.get_mut(&program)?;
        if !entry.linked || !resolves(&entry.sources, name) {
            return None;
        }
        let next = entry.attributes.len() as u32;
        Some(*entry.attributes.entry(name.to_string()).or_insert(next))
    }

    fn uniform_location(&mut self, program: Handle, name: &str) -> Option<UniformLocation> {
        let mut state = self.state.borrow_mut();
        state.uniform_lookups.push(name.to_string());
        state.calls.push(format!("uniform_location({})", name));
        let entry = state.programs.get_mut(&program)?;
        if !entry.linked || !resolves(&entry.sources, name) {
            return None;
        }
        let next = UniformLocation(entry.uniforms.len() as u32);
        Some(*entry.uniforms.entry(name.to_string()).or_insert(next))
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &Uniform) {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("set_uniform({}, {})", location.0, value.glsl_type()));
        let Some(program) = state.program else { return };
        let name = state
            .programs
            .get(&program)
            .and_then(|p| p.uniforms.iter().find(|(_, loc)| **loc == location))
            .map(|(name, _)| name.clone());
        if let Some(name) = name {
            state.uniforms_set.push((program, name, *value));
        }
    }

    fn active_texture(&mut self, unit: u32) {
        let mut state = self.state.borrow_mut();
        state.active_unit = unit;
        state.calls.push(format!("active_texture({})", unit));
    }

    fn bind_texture(&mut self, texture: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        let unit = state.active_unit;
        match texture {
            Some(t) => { state.bound_textures.insert(unit, t); }
            None => { state.bound_textures.remove(&unit); }
        }
        state.calls.push(format!("bind_texture({:?})", texture.map(Handle::get)));
    }

    fn set_texture_sampling(&mut self, filter: TextureFilter, wrap: TextureWrap) {
        let mut state = self.state.borrow_mut();
        if let Some(texture) = state.bound_texture() {
            if let Some(entry) = state.textures.get_mut(&texture) {
                entry.sampling = Some((filter, wrap));
            }
        }
        state.calls.push(format!("set_texture_sampling({:?}, {:?})", filter, wrap));
    }

    fn tex_image_2d(&mut self, width: u32, height: u32, format: PixelFormat, pixels: Option<&[u8]>) {
        let mut state = self.state.borrow_mut();
        if let Some(texture) = state.bound_texture() {
            if let Some(entry) = state.textures.get_mut(&texture) {
                entry.width = width;
                entry.height = height;
                entry.format = Some(format);
                entry.pixels = pixels.map(|p| p.to_vec());
                entry.allocations += 1;
            }
        }
        state.calls.push(format!("tex_image_2d({}x{}, {:?}, {})", width, height, format, pixels.is_some()));
    }

    fn bind_renderbuffer(&mut self, renderbuffer: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        state.bound_renderbuffer = renderbuffer;
        state.calls.push(format!("bind_renderbuffer({:?})", renderbuffer.map(Handle::get)));
    }

    fn renderbuffer_storage_multisample(
        &mut self,
        samples: u32,
        format: RenderbufferFormat,
        width: u32,
        height: u32,
    ) {
        let mut state = self.state.borrow_mut();
        if let Some(rb) = state.bound_renderbuffer {
            state.renderbuffers.insert(rb, MockRenderbuffer {
                samples,
                format: Some(format),
                width,
                height,
            });
        }
        state.calls.push(format!(
            "renderbuffer_storage_multisample({}, {:?}, {}x{})",
            samples, format, width, height
        ));
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        match target {
            FramebufferTarget::Draw => state.draw_framebuffer = framebuffer,
            FramebufferTarget::Read => state.read_framebuffer = framebuffer,
        }
        state.calls.push(format!("bind_framebuffer({:?}, {:?})", target, framebuffer.map(Handle::get)));
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture: Option<Handle>,
    ) {
        let mut state = self.state.borrow_mut();
        if let Some(fb) = state.bound_framebuffer(target) {
            if let Some(attachments) = state.framebuffers.get_mut(&fb) {
                match texture {
                    Some(t) => { attachments.insert(attachment, MockAttached::Texture(t)); }
                    None => { attachments.remove(&attachment); }
                }
            }
        }
        state.calls.push(format!("framebuffer_texture_2d({:?}, {:?})", target, attachment));
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<Handle>,
    ) {
        let mut state = self.state.borrow_mut();
        if let Some(fb) = state.bound_framebuffer(target) {
            if let Some(attachments) = state.framebuffers.get_mut(&fb) {
                match renderbuffer {
                    Some(rb) => { attachments.insert(attachment, MockAttached::Renderbuffer(rb)); }
                    None => { attachments.remove(&attachment); }
                }
            }
        }
        state.calls.push(format!("framebuffer_renderbuffer({:?}, {:?})", target, attachment));
    }

    fn blit_framebuffer(&mut self, src: Rect2D, dst: Rect2D, mask: ClearMask, filter: TextureFilter) {
        let mut state = self.state.borrow_mut();
        let blit = MockBlit {
            read: state.read_framebuffer,
            draw: state.draw_framebuffer,
            src,
            dst,
            mask,
        };
        state.blits.push(blit);
        state.calls.push(format!("blit_framebuffer({:?})", filter));
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<Handle>) {
        let mut state = self.state.borrow_mut();
        state.vertex_array = vertex_array;
        state.calls.push(format!("bind_vertex_array({:?})", vertex_array.map(Handle::get)));
    }

    fn vertex_attrib_pointer(&mut self, index: u32, components: u32, stride: usize, offset: usize) {
        let mut state = self.state.borrow_mut();
        state.attribute_pointers.push((index, components, stride, offset));
        state.calls.push(format!("vertex_attrib_pointer({}, {}, {}, {})", index, components, stride, offset));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        let mut state = self.state.borrow_mut();
        state.enabled_attributes.insert(index);
        state.calls.push(format!("enable_vertex_attrib_array({})", index));
    }

    fn viewport(&mut self, rect: Rect2D) {
        let mut state = self.state.borrow_mut();
        state.viewport = rect;
        state.calls.push(format!("viewport({}x{})", rect.width, rect.height));
    }

    fn clear_color(&mut self, color: [f32; 4]) {
        let mut state = self.state.borrow_mut();
        state.clear_color = color;
        state.calls.push("clear_color".to_string());
    }

    fn clear(&mut self, mask: ClearMask) {
        let mut state = self.state.borrow_mut();
        let clear = MockClear {
            framebuffer: state.draw_framebuffer,
            mask,
            color: state.clear_color,
        };
        state.clears.push(clear);
        state.calls.push(format!("clear({:?})", mask));
    }

    fn enable(&mut self, capability: Capability) {
        let mut state = self.state.borrow_mut();
        state.enabled.insert(capability);
        state.calls.push(format!("enable({:?})", capability));
    }

    fn draw_elements(&mut self, topology: PrimitiveTopology, count: u32, index_type: IndexType, _offset: usize) {
        let mut state = self.state.borrow_mut();
        let draw = MockDraw {
            count,
            framebuffer: state.draw_framebuffer,
            program: state.program,
            vertex_array: state.vertex_array,
            element_buffer: state.bound_buffer(BufferTarget::Index),
        };
        state.draws.push(draw);
        state.calls.push(format!("draw_elements({:?}, {}, {:?})", topology, count, index_type));
    }

    fn proc_address(&self, name: &str) -> *const c_void {
        self.log(format!("proc_address({})", name));
        std::ptr::null()
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
