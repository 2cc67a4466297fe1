/// Renderer configuration

use std::borrow::Cow;

/// Vertex + fragment source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Full-screen composite pass sampling uniform `tex`
    pub fn canvas() -> Self {
        Self::new(
            include_str!("../../shaders/canvas.vert"),
            include_str!("../../shaders/canvas.frag"),
        )
    }

    /// Lit solid color pass (uniforms: transform matrices and `color`)
    pub fn solid_color() -> Self {
        Self::new(
            include_str!("../../shaders/solid_color.vert"),
            include_str!("../../shaders/solid_color.frag"),
        )
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Multisample count of the offscreen frame (>= 1)
    pub samples: u32,
    /// Clear color of the presentation target before compositing
    pub clear_color: [f32; 4],
    /// Shaders of the composite pass
    pub composite_shaders: ShaderSources,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            samples: 4,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            composite_shaders: ShaderSources::canvas(),
        }
    }
}
