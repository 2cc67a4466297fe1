/// Graphics device module - the backend seam and its value types

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod shader;
pub mod texture;
pub mod frame_buffer;
pub mod context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use shader::*;
pub use texture::*;
pub use frame_buffer::*;
pub use context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
