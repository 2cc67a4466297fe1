/// Indexed triangle mesh: vertex array + vertex buffer + index buffer

use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingPoint, BufferTarget, BufferUsage, ContextRef, Handle, IndexType,
    ObjectKind, PrimitiveTopology,
};
use crate::resource::{Buffer, GraphicsResource, OwnedHandle, Vertex, VertexLayout};
use crate::{engine_debug, engine_raise};

pub struct Mesh<V: VertexLayout = Vertex> {
    vertex_array: OwnedHandle,
    vertices: Buffer<V>,
    indices: Buffer<u32>,
}

impl<V: VertexLayout> Mesh<V> {
    /// Upload `vertices` and `indices` and capture the index buffer in a
    /// new vertex array
    pub fn new(context: &ContextRef, vertices: &[V], indices: &[u32]) -> Result<Self> {
        let vertices = Buffer::from_slice(context, BufferTarget::Vertex, BufferUsage::Static, vertices)?;
        let indices = Buffer::from_slice(context, BufferTarget::Index, BufferUsage::Static, indices)?;
        let vertex_array = OwnedHandle::create(context, ObjectKind::VertexArray)?;

        {
            let mut ctx = context.borrow_mut();
            let mut bound = ctx.bind(BindingPoint::VertexArray, Some(vertex_array.require()?));
            bound.set_binding(BindingPoint::Buffer(BufferTarget::Index), indices.handle());
        }

        engine_debug!(
            "vpgfx::Mesh",
            "created mesh: {} vertices, {} indices", vertices.len(), indices.len()
        );
        Ok(Self { vertex_array, vertices, indices })
    }

    /// Source float attribute `index` from `field` of the vertex record
    ///
    /// # Arguments
    ///
    /// * `index` - Shader attribute location
    /// * `components` - Number of floats read per vertex (1 to 4)
    /// * `field` - Field name in the vertex record (e.g. "position")
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the vertex record has no such field.
    pub fn vertex_attribute_pointer(&self, index: u32, components: u32, field: &str) -> Result<()> {
        let offset = V::field_offset(field).ok_or_else(|| {
            engine_raise!("vpgfx::Mesh", Error::InvalidArgument(format!(
                "vertex record has no field '{}'", field
            )))
        })?;

        let vertex_array = self.vertex_array.require()?;
        let vertices = self.vertices.handle();

        let mut ctx = self.vertex_array.context().borrow_mut();
        let mut array = ctx.bind(BindingPoint::VertexArray, Some(vertex_array));
        let mut bound = array.bind(BindingPoint::Buffer(BufferTarget::Vertex), vertices);
        let device = bound.device();
        device.vertex_attrib_pointer(index, components, V::stride(), offset);
        device.enable_vertex_attrib_array(index);
        Ok(())
    }

    /// Indexed triangle-list draw of every index
    pub fn draw(&self) -> Result<()> {
        let vertex_array = self.vertex_array.require()?;
        let count = self.index_count();

        let mut ctx = self.vertex_array.context().borrow_mut();
        let mut bound = ctx.bind(BindingPoint::VertexArray, Some(vertex_array));
        bound.draw_elements(PrimitiveTopology::TriangleList, count, IndexType::U32);
        Ok(())
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_buffer(&self) -> &Buffer<V> {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &Buffer<u32> {
        &self.indices
    }
}

impl<V: VertexLayout> GraphicsResource for Mesh<V> {
    fn handle(&self) -> Option<Handle> {
        self.vertex_array.get()
    }

    fn release(&mut self) {
        self.vertex_array.release();
        self.vertices.release();
        self.indices.release();
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
