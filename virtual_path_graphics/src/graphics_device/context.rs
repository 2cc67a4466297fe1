/// GraphicsContext - binding-state wrapper around a GraphicsDevice
///
/// GL keeps one "current object" per binding point. Resources here follow a
/// bind / operate / restore discipline: `bind` hands back a [`BindScope`]
/// that puts the previous binding back when it goes out of scope, so one
/// resource never leaks its binding into another's draw.

use std::cell::RefCell;
use std::ffi::c_void;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, Handle, ObjectKind, BufferTarget, FramebufferTarget,
    PrimitiveTopology, IndexType,
};
use crate::engine_trace;

/// Shared, single-thread reference to a context
pub type ContextRef = Rc<RefCell<GraphicsContext>>;

/// A GL binding point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingPoint {
    Buffer(BufferTarget),
    /// 2D texture on a texture unit
    Texture2D(u32),
    Renderbuffer,
    Framebuffer(FramebufferTarget),
    VertexArray,
    Program,
}

impl BindingPoint {
    /// Whether objects of `kind` are bound at this point
    pub fn holds(&self, kind: ObjectKind) -> bool {
        matches!(
            (self, kind),
            (BindingPoint::Buffer(_), ObjectKind::Buffer)
                | (BindingPoint::Texture2D(_), ObjectKind::Texture)
                | (BindingPoint::Renderbuffer, ObjectKind::Renderbuffer)
                | (BindingPoint::Framebuffer(_), ObjectKind::Framebuffer)
                | (BindingPoint::VertexArray, ObjectKind::VertexArray)
                | (BindingPoint::Program, ObjectKind::Program)
        )
    }
}

/// Object and draw counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextStats {
    pub objects_created: u64,
    pub objects_deleted: u64,
    pub draw_calls: u64,
}

impl ContextStats {
    /// Objects created and not yet deleted
    pub fn live_objects(&self) -> u64 {
        self.objects_created.saturating_sub(self.objects_deleted)
    }
}

pub struct GraphicsContext {
    device: Box<dyn GraphicsDevice>,
    bindings: FxHashMap<BindingPoint, Handle>,
    active_unit: u32,
    stats: ContextStats,
}

impl GraphicsContext {
    pub fn new(device: Box<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            bindings: FxHashMap::default(),
            active_unit: 0,
            stats: ContextStats::default(),
        }
    }

    /// Wrap a device into a shareable [`ContextRef`]
    pub fn shared(device: Box<dyn GraphicsDevice>) -> ContextRef {
        Rc::new(RefCell::new(Self::new(device)))
    }

    /// Direct access to the device for non-binding operations
    pub fn device(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    pub fn stats(&self) -> ContextStats {
        self.stats
    }

    pub fn active_texture_unit(&self) -> u32 {
        self.active_unit
    }

    /// Resolve a GL entry point through the device's loader
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.device.proc_address(name)
    }

    // ===== OBJECTS =====

    pub fn create_object(&mut self, kind: ObjectKind) -> Result<Handle> {
        let handle = self.device.create_object(kind)?;
        self.stats.objects_created += 1;
        engine_trace!("vpgfx::Context", "created {:?} {}", kind, handle);
        Ok(handle)
    }

    /// Delete an object, clearing any binding shadow that still names it
    pub fn delete_object(&mut self, kind: ObjectKind, handle: Handle) {
        self.device.delete_object(kind, handle);
        if kind == ObjectKind::VertexArray && self.current(BindingPoint::VertexArray) == Some(handle) {
            self.bindings.remove(&BindingPoint::Buffer(BufferTarget::Index));
        }
        // names are per kind, so only shadows of the same kind can match
        self.bindings.retain(|point, bound| !(point.holds(kind) && *bound == handle));
        self.stats.objects_deleted += 1;
        engine_trace!("vpgfx::Context", "deleted {:?} {}", kind, handle);
    }

    // ===== BINDINGS =====

    /// Object currently bound at `point`, as far as this context knows
    pub fn current(&self, point: BindingPoint) -> Option<Handle> {
        self.bindings.get(&point).copied()
    }

    /// Bind `handle` at `point` until the returned scope is dropped
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut ctx = context.borrow_mut();
    /// let mut bound = ctx.bind(BindingPoint::Buffer(BufferTarget::Vertex), Some(handle));
    /// bound.device().buffer_sub_data(BufferTarget::Vertex, 0, bytes);
    /// // previous array buffer is restored here
    /// ```
    pub fn bind(&mut self, point: BindingPoint, handle: Option<Handle>) -> BindScope<'_> {
        let previous = self.current(point);
        self.apply(point, handle);
        BindScope { context: self, point, previous }
    }

    /// Bind `handle` at `point` and leave it bound
    pub fn set_binding(&mut self, point: BindingPoint, handle: Option<Handle>) {
        self.apply(point, handle);
    }

    fn apply(&mut self, point: BindingPoint, handle: Option<Handle>) {
        if let BindingPoint::Texture2D(unit) = point {
            if unit != self.active_unit {
                self.device.active_texture(unit);
                self.active_unit = unit;
            }
        }

        if self.current(point) == handle && self.is_shadowed(point, handle) {
            return;
        }

        match point {
            BindingPoint::Buffer(target) => self.device.bind_buffer(target, handle),
            BindingPoint::Texture2D(_) => self.device.bind_texture(handle),
            BindingPoint::Renderbuffer => self.device.bind_renderbuffer(handle),
            BindingPoint::Framebuffer(target) => self.device.bind_framebuffer(target, handle),
            BindingPoint::VertexArray => {
                self.device.bind_vertex_array(handle);
                // the element buffer belongs to the vertex array just bound
                self.bindings.remove(&BindingPoint::Buffer(BufferTarget::Index));
            }
            BindingPoint::Program => self.device.use_program(handle),
        }

        match handle {
            Some(h) => { self.bindings.insert(point, h); }
            None => { self.bindings.remove(&point); }
        }
    }

    /// Whether the shadow for `point` can be trusted to skip a redundant bind
    ///
    /// An absent element-buffer shadow means "unknown" (the vertex array
    /// owns it), so unbinding it is always issued.
    fn is_shadowed(&self, point: BindingPoint, handle: Option<Handle>) -> bool {
        handle.is_some() || point != BindingPoint::Buffer(BufferTarget::Index)
    }

    // ===== DRAWING =====

    /// Indexed draw from the bound vertex array, counted in [`ContextStats`]
    pub fn draw_elements(&mut self, topology: PrimitiveTopology, count: u32, index_type: IndexType) {
        self.device.draw_elements(topology, count, index_type, 0);
        self.stats.draw_calls += 1;
    }
}

/// Binding that is undone when dropped
///
/// Dereferences to the [`GraphicsContext`] so further (nested) binds and
/// device calls can be issued through it.
pub struct BindScope<'a> {
    context: &'a mut GraphicsContext,
    point: BindingPoint,
    previous: Option<Handle>,
}

impl BindScope<'_> {
    pub fn point(&self) -> BindingPoint {
        self.point
    }

    /// Binding that will be restored on drop
    pub fn previous(&self) -> Option<Handle> {
        self.previous
    }
}

impl Deref for BindScope<'_> {
    type Target = GraphicsContext;

    fn deref(&self) -> &GraphicsContext {
        self.context
    }
}

impl DerefMut for BindScope<'_> {
    fn deref_mut(&mut self) -> &mut GraphicsContext {
        self.context
    }
}

impl Drop for BindScope<'_> {
    fn drop(&mut self) {
        self.context.apply(self.point, self.previous);
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
