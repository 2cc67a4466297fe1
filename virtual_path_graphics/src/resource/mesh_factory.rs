/// Built-in geometry

use glam::{Vec2, Vec3};
use crate::resource::Vertex;

pub struct MeshFactory;

impl MeshFactory {
    /// Full-screen quad in clip space, two triangles with UVs covering [0,1]
    pub fn canvas() -> (Vec<Vertex>, Vec<u32>) {
        let corner = |x: f32, y: f32| {
            Vertex::new(Vec3::new(x, y, 0.0), Vec3::ZERO, Vec2::new((x + 1.0) / 2.0, (y + 1.0) / 2.0))
        };

        let vertices = vec![
            corner(-1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ];
        let indices = (0..vertices.len() as u32).collect();
        (vertices, indices)
    }

    /// Axis-aligned cube of half-extent `size`, 6 faces x 2 triangles,
    /// flat normals and per-face UVs
    pub fn cube(size: f32) -> (Vec<Vertex>, Vec<u32>) {
        // (normal, corner positions in unit-cube coordinates, UVs), two triangles per face
        const FACES: [([f32; 3], [[f32; 3]; 6], [[f32; 2]; 6]); 6] = [
            // front
            (
                [0.0, 0.0, 1.0],
                [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0]],
                [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
            ),
            // back
            (
                [0.0, 0.0, -1.0],
                [[-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]],
                [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            ),
            // top
            (
                [0.0, 1.0, 0.0],
                [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
                [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            ),
            // bottom
            (
                [0.0, -1.0, 0.0],
                [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0]],
                [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
            ),
            // right
            (
                [1.0, 0.0, 0.0],
                [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0]],
                [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            ),
            // left
            (
                [-1.0, 0.0, 0.0],
                [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]],
                [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]],
            ),
        ];

        let vertices: Vec<Vertex> = FACES
            .iter()
            .flat_map(|(normal, corners, uvs)| {
                corners.iter().zip(uvs.iter()).map(move |(corner, uv)| {
                    Vertex::new(
                        Vec3::from_array(*corner) * size,
                        Vec3::from_array(*normal),
                        Vec2::from_array(*uv),
                    )
                })
            })
            .collect();
        let indices = (0..vertices.len() as u32).collect();
        (vertices, indices)
    }
}

#[cfg(test)]
#[path = "mesh_factory_tests.rs"]
mod tests;
