/// Vertex record and field layout lookup

use std::mem::{offset_of, size_of};
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Byte layout of a vertex record, by field name
///
/// Used by [`Mesh::vertex_attribute_pointer`](crate::resource::Mesh::vertex_attribute_pointer)
/// to source a shader input from one field.
pub trait VertexLayout: Pod {
    /// Byte offset of `field`, `None` if the record has no such field
    fn field_offset(field: &str) -> Option<usize>;

    /// Distance in bytes between consecutive records
    fn stride() -> usize {
        size_of::<Self>()
    }
}

/// Standard vertex: position, tangent frame, color and one UV set
///
/// Stored as plain float arrays so the record is tightly packed (72 bytes)
/// with no SIMD padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub color: [f32; 4],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Vertex with position, normal and UV; tangent frame and color zeroed
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color.to_array();
        self
    }

    pub fn with_tangent_frame(mut self, tangent: Vec3, bitangent: Vec3) -> Self {
        self.tangent = tangent.to_array();
        self.bitangent = bitangent.to_array();
        self
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }

    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from_array(self.tex_coord)
    }
}

impl VertexLayout for Vertex {
    fn field_offset(field: &str) -> Option<usize> {
        match field {
            "position" => Some(offset_of!(Vertex, position)),
            "normal" => Some(offset_of!(Vertex, normal)),
            "tangent" => Some(offset_of!(Vertex, tangent)),
            "bitangent" => Some(offset_of!(Vertex, bitangent)),
            "color" => Some(offset_of!(Vertex, color)),
            "tex_coord" => Some(offset_of!(Vertex, tex_coord)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
