//! Camera module - perspective fly camera.
//!
//! Cameras are tools provided by the crate, owned and driven by the
//! caller. The renderer never stores one.

mod camera;

pub use camera::{Camera, NEAR_PLANE, FAR_PLANE};
