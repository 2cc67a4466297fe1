//! Whole-struct uniform blocks
//!
//! A type implementing [`UniformBlock`] lists its fields by name. Each field
//! is classified by [`FieldValue::reflect`] against the closed set of
//! [`Uniform`] kinds; nested blocks recurse. Types outside that set are
//! reported as unsupported, so a block is validated in full before any
//! uniform is written.
//!
//! ```ignore
//! struct Transforms { model: Mat4, view: Mat4, light: Light }
//! uniform_block!(Transforms { model, view, light: block });
//! pipeline.set_uniform_block("transforms", &transforms)?;
//! ```

use std::any::Any;
use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::error::{Error, Result};
use crate::graphics_device::Uniform;

/// Value of one field of a uniform block
pub enum FieldValue<'a> {
    Uniform(Uniform),
    Block(&'a dyn UniformBlock),
    /// Field type with no uniform encoding (carries the type name)
    Unsupported(&'static str),
}

impl<'a> FieldValue<'a> {
    /// Classify a field by its concrete type
    pub fn reflect<T: Any>(value: &'a T) -> Self {
        let any = value as &dyn Any;

        macro_rules! classify {
            ($($ty:ty),*) => {
                $(
                    if let Some(v) = any.downcast_ref::<$ty>() {
                        return FieldValue::Uniform(Uniform::from(*v));
                    }
                )*
            };
        }

        classify!(i32, f32, Vec2, Vec3, Vec4, Mat2, Mat3, Mat4);
        FieldValue::Unsupported(std::any::type_name::<T>())
    }
}

/// One named field of a uniform block
pub struct UniformField<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
}

/// A struct whose fields map onto uniforms
///
/// Usually implemented through [`uniform_block!`](crate::uniform_block).
pub trait UniformBlock {
    fn uniform_fields(&self) -> Vec<UniformField<'_>>;
}

/// Flatten `block` into `(name, value)` pairs
///
/// Names are `prefix.field`, or bare `field` when `prefix` is empty.
pub fn flatten_block(prefix: &str, block: &dyn UniformBlock) -> Result<Vec<(String, Uniform)>> {
    let mut out = Vec::new();
    flatten_into(prefix, block, &mut out)?;
    Ok(out)
}

fn flatten_into(prefix: &str, block: &dyn UniformBlock, out: &mut Vec<(String, Uniform)>) -> Result<()> {
    for field in block.uniform_fields() {
        let name = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };

        match field.value {
            FieldValue::Uniform(value) => out.push((name, value)),
            FieldValue::Block(nested) => flatten_into(&name, nested, out)?,
            FieldValue::Unsupported(type_name) => {
                return Err(Error::UnsupportedUniformType { name, type_name });
            }
        }
    }
    Ok(())
}

/// Implement [`UniformBlock`] by listing fields
///
/// Nested blocks are marked with `: block`.
///
/// ```ignore
/// uniform_block!(Parameters { color, intensity });
/// uniform_block!(Scene { transforms: block, time });
/// ```
#[macro_export]
macro_rules! uniform_block {
    (@value $value:expr) => {
        $crate::resource::FieldValue::reflect($value)
    };
    (@value $value:expr, block) => {
        $crate::resource::FieldValue::Block($value)
    };
    ($ty:ty { $($field:ident $(: $kind:ident)?),* $(,)? }) => {
        impl $crate::resource::UniformBlock for $ty {
            fn uniform_fields(&self) -> Vec<$crate::resource::UniformField<'_>> {
                vec![
                    $(
                        $crate::resource::UniformField {
                            name: stringify!($field),
                            value: $crate::uniform_block!(@value &self.$field $(, $kind)?),
                        }
                    ),*
                ]
            }
        }
    };
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
