//! Renderer host
//!
//! [`Renderer`] sequences the per-frame loop against the windowing layer
//! and hands a [`GraphicsHost`] to the single registered
//! [`DrawingService`].

mod clock;
mod config;
mod drawing_service;
mod host;
mod renderer;

pub use clock::ElapsedClock;
pub use config::{RendererConfig, ShaderSources};
pub use drawing_service::{DrawingService, LoadArgs};
pub use host::GraphicsHost;
pub(crate) use host::HostShared;
pub use renderer::Renderer;
