//! GPU resources
//!
//! Every resource owns its driver objects and deletes them exactly once,
//! on `release()` or on drop.

pub mod graphics_resource;
pub mod buffer;
pub mod shader;
pub mod uniform;
pub mod pipeline;
pub mod texture;
pub mod frame;
pub mod vertex;
pub mod mesh;
pub mod mesh_factory;

pub use graphics_resource::{GraphicsResource, OwnedHandle};
pub use buffer::Buffer;
pub use shader::Shader;
pub use uniform::{flatten_block, FieldValue, UniformBlock, UniformField};
pub use pipeline::RenderPipeline;
pub use texture::Texture;
pub use frame::Frame;
pub use vertex::{Vertex, VertexLayout};
pub use mesh::Mesh;
pub use mesh_factory::MeshFactory;
