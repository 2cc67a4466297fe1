//! Drawing services shipped with the crate

mod simple_drawing_service;

pub use simple_drawing_service::{SceneTransform, SimpleDrawingService};
