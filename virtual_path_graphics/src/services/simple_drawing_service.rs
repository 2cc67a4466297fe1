/// Reference drawing service: a lit cube driven by an externally owned
/// [`SceneTransform`]
///
/// Load arguments: `[GraphicsHost, Rc<RefCell<SceneTransform>>]`.

use std::cell::RefCell;
use std::rc::Rc;
use glam::{Mat4, Quat, Vec3, Vec4};

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::graphics_device::{ClearMask, ShaderStage};
use crate::renderer::{DrawingService, GraphicsHost, LoadArgs, ShaderSources};
use crate::resource::{GraphicsResource, Mesh, MeshFactory, RenderPipeline, Shader};
use crate::{engine_debug, engine_raise};

const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);
const CAMERA_FOV_DEGREES: f32 = 45.0;
const BACKGROUND: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const CUBE_SIZE: f32 = 1.0;

/// Color the cube pulses towards
const PULSE_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);

/// Vertex inputs: (attribute, components, vertex field)
const ATTRIBUTES: [(&str, u32, &str); 6] = [
    ("in_position", 3, "position"),
    ("in_normal", 3, "normal"),
    ("in_tangent", 3, "tangent"),
    ("in_bitangent", 3, "bitangent"),
    ("in_color", 4, "color"),
    ("in_tex_coord", 2, "tex_coord"),
];

/// Model placement edited by the application (UI sliders, scripts...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    /// Rotation about +Y, radians
    pub rotation_angle: f32,
    /// Uniform scale
    pub scale: f32,
    pub position: Vec3,
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            rotation_angle: 0.0,
            scale: 1.0,
            position: Vec3::ZERO,
        }
    }
}

impl SceneTransform {
    /// Object-to-world matrix: rotate, then scale, then translate
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_quat(Quat::from_rotation_y(self.rotation_angle))
    }
}

struct Transforms {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    object_to_world: Mat4,
    object_to_clip: Mat4,
    world_to_object: Mat4,
}

struct Parameters {
    color: Vec4,
}

crate::uniform_block!(Transforms {
    model,
    view,
    projection,
    object_to_world,
    object_to_clip,
    world_to_object,
});
crate::uniform_block!(Parameters { color });

/// Resources that only exist between `load` and `unload`
struct Loaded {
    host: GraphicsHost,
    scene: Rc<RefCell<SceneTransform>>,
    pipeline: RenderPipeline,
    cube: Mesh,
}

pub struct SimpleDrawingService {
    loaded: Option<Loaded>,
    camera: Camera,
    model: Mat4,
    color: Vec4,
}

impl SimpleDrawingService {
    pub fn new() -> Self {
        let mut camera = Camera::new(CAMERA_POSITION);
        camera.set_fov(CAMERA_FOV_DEGREES);
        Self {
            loaded: None,
            camera,
            model: Mat4::IDENTITY,
            color: PULSE_COLOR,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Model matrix computed by the last update
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Cube color computed by the last update
    pub fn color(&self) -> Vec4 {
        self.color
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or_else(|| {
            engine_raise!("vpgfx::SimpleDrawingService", Error::InvalidState(
                "drawing service is not loaded".to_string()
            ))
        })
    }
}

impl Default for SimpleDrawingService {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingService for SimpleDrawingService {
    fn load(&mut self, args: &LoadArgs) -> Result<()> {
        args.require(2)?;
        let host = args.host()?;
        let scene = args.get::<RefCell<SceneTransform>>(1)?;
        let context = host.context()?;

        let sources = ShaderSources::solid_color();
        let vertex = Shader::new(&context, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = Shader::new(&context, ShaderStage::Fragment, &sources.fragment)?;
        let pipeline = RenderPipeline::new(&context, &vertex, &fragment)?;

        let (vertices, indices) = MeshFactory::cube(CUBE_SIZE);
        let cube = Mesh::new(&context, &vertices, &indices)?;

        self.loaded = Some(Loaded { host, scene, pipeline, cube });
        engine_debug!("vpgfx::SimpleDrawingService", "loaded");
        Ok(())
    }

    fn unload(&mut self) {
        if let Some(mut loaded) = self.loaded.take() {
            loaded.cube.release();
            loaded.pipeline.release();
            engine_debug!("vpgfx::SimpleDrawingService", "unloaded");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.camera.width = width;
        self.camera.height = height;
    }

    fn update(&mut self, elapsed: f64) -> Result<()> {
        let loaded = self.loaded()?;
        let model = loaded.scene.borrow().model_matrix();
        let size = loaded.host.surface_size();

        self.model = model;
        self.color = Vec4::ONE.lerp(PULSE_COLOR, elapsed.sin() as f32);
        self.camera.width = size.width;
        self.camera.height = size.height;
        Ok(())
    }

    fn render(&mut self, _elapsed: f64) -> Result<()> {
        let loaded = self.loaded()?;

        {
            let context = loaded.host.context()?;
            let mut ctx = context.borrow_mut();
            let device = ctx.device();
            device.clear_color(BACKGROUND);
            device.clear(ClearMask::COLOR | ClearMask::DEPTH | ClearMask::STENCIL);
        }

        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();
        let transforms = Transforms {
            model: self.model,
            view,
            projection,
            object_to_world: self.model,
            object_to_clip: projection * view * self.model,
            world_to_object: self.model.inverse(),
        };
        let parameters = Parameters { color: self.color };

        let pipeline = &loaded.pipeline;
        pipeline.bind()?;
        pipeline.set_uniform_block("", &transforms)?;
        pipeline.set_uniform_block("", &parameters)?;

        for (attribute, components, field) in ATTRIBUTES {
            if let Some(location) = pipeline.attribute_location(attribute) {
                loaded.cube.vertex_attribute_pointer(location, components, field)?;
            }
        }
        loaded.cube.draw()?;
        pipeline.unbind();
        Ok(())
    }
}

#[cfg(test)]
#[path = "simple_drawing_service_tests.rs"]
mod tests;
