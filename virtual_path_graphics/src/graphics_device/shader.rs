/// Shader stages and uniform values

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Driver-assigned uniform location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Value that can be written to a single uniform
///
/// This is the closed set of uniform kinds the core knows how to encode.
/// Anything else has to be broken down into these by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    I32(i32),
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl Uniform {
    /// GLSL type name, for logs
    pub fn glsl_type(&self) -> &'static str {
        match self {
            Uniform::I32(_) => "int",
            Uniform::F32(_) => "float",
            Uniform::Vec2(_) => "vec2",
            Uniform::Vec3(_) => "vec3",
            Uniform::Vec4(_) => "vec4",
            Uniform::Mat2(_) => "mat2",
            Uniform::Mat3(_) => "mat3",
            Uniform::Mat4(_) => "mat4",
        }
    }
}

macro_rules! impl_uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Uniform {
                fn from(value: $ty) -> Self {
                    Uniform::$variant(value)
                }
            }
        )*
    };
}

impl_uniform_from! {
    i32 => I32,
    f32 => F32,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
