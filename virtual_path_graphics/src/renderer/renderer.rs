/// Renderer - drives one drawing service into an offscreen frame and
/// composites it onto the presentation target
///
/// The windowing layer owns the GL context and forwards its lifecycle:
///
/// - `context_init` when a context becomes current (builds the frame, the
///   composite pass, then loads and sizes the drawing service)
/// - `render_frame` once per displayed frame
/// - `resize` when the surface changes size
/// - `context_deinit` before the context is destroyed
///
/// Everything runs on the thread the context is current on.

use std::any::Any;
use std::rc::Rc;
use winit::dpi::PhysicalSize;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingPoint, ClearMask, ContextRef, FramebufferTarget, GraphicsContext,
    GraphicsDevice, Handle, Rect2D, ShaderStage,
};
use crate::renderer::{DrawingService, ElapsedClock, GraphicsHost, HostShared, LoadArgs, RendererConfig};
use crate::resource::{Frame, GraphicsResource, Mesh, MeshFactory, RenderPipeline, Shader};
use crate::{engine_info, engine_raise, engine_warn};

/// Texture unit the composite pass samples the resolved frame from
const COMPOSITE_UNIT: u32 = 0;

/// Shader inputs of the composite pass: (attribute, components, vertex field)
const COMPOSITE_ATTRIBUTES: [(&str, u32, &str); 6] = [
    ("in_position", 3, "position"),
    ("in_normal", 3, "normal"),
    ("in_tangent", 3, "tangent"),
    ("in_bitangent", 3, "bitangent"),
    ("in_color", 4, "color"),
    ("in_tex_coord", 2, "tex_coord"),
];

pub struct Renderer {
    config: RendererConfig,
    shared: Rc<HostShared>,
    clock: ElapsedClock,
    frame: Option<Frame>,
    composite: Option<RenderPipeline>,
    canvas: Option<Mesh>,
    service: Option<Box<dyn DrawingService>>,
    extra_args: Vec<Rc<dyn Any>>,
    frame_request: Option<Box<dyn FnMut()>>,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            shared: Rc::new(HostShared::default()),
            clock: ElapsedClock::new(),
            frame: None,
            composite: None,
            canvas: None,
            service: None,
            extra_args: Vec::new(),
            frame_request: None,
        }
    }

    /// Handle drawing services use to reach the context
    pub fn host(&self) -> GraphicsHost {
        GraphicsHost::new(self.shared.clone())
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    // ===== REGISTRATION =====

    /// Register the drawing service
    ///
    /// It is loaded at the next `context_init` with `[host, extra_args...]`.
    pub fn set_drawing_service(&mut self, service: Box<dyn DrawingService>, extra_args: Vec<Rc<dyn Any>>) {
        self.service = Some(service);
        self.extra_args = extra_args;
    }

    /// Callback asking the windowing layer for another frame, invoked at
    /// the end of every tick
    pub fn set_frame_request(&mut self, request: Box<dyn FnMut()>) {
        self.frame_request = Some(request);
    }

    /// Change the multisample count (applied at the next tick)
    pub fn set_samples(&mut self, samples: u32) -> Result<()> {
        if samples < 1 {
            return Err(engine_raise!("vpgfx::Renderer", Error::InvalidArgument(
                "sample count must be at least 1".to_string()
            )));
        }
        self.config.samples = samples;
        Ok(())
    }

    pub fn samples(&self) -> u32 {
        self.config.samples
    }

    // ===== LIFECYCLE =====

    /// A GL context became current: build host resources and load the service
    ///
    /// Nothing is kept if any step fails: objects built so far are released,
    /// the service is unloaded and the host is left uninitialized.
    ///
    /// # Errors
    ///
    /// `InvalidState` if a context is already live. Shader, link and load
    /// failures are returned as raised.
    pub fn context_init(&mut self, device: Box<dyn GraphicsDevice>) -> Result<()> {
        if self.is_initialized() {
            return Err(engine_raise!("vpgfx::Renderer", Error::InvalidState(
                "context_init called while a context is live".to_string()
            )));
        }

        // services reach the context through the host during load
        let context = GraphicsContext::shared(device);
        *self.shared.context.borrow_mut() = Some(context.clone());

        let (frame, composite, canvas) = match self.build_host_resources(&context) {
            Ok(built) => built,
            Err(err) => {
                self.shared.context.borrow_mut().take();
                return Err(err);
            }
        };

        let size = self.shared.surface.get();
        if let Some(service) = self.service.as_mut() {
            let mut args: Vec<Rc<dyn Any>> = vec![Rc::new(GraphicsHost::new(self.shared.clone()))];
            args.extend(self.extra_args.iter().cloned());
            if let Err(err) = service.load(&LoadArgs::new(args)) {
                service.unload();
                release_host_resources(frame, composite, canvas);
                self.shared.context.borrow_mut().take();
                return Err(err);
            }
            service.resize(size.width, size.height);
        }

        self.frame = Some(frame);
        self.composite = Some(composite);
        self.canvas = Some(canvas);
        self.clock.start();

        engine_info!("vpgfx::Renderer", "context initialized ({}x{})", size.width, size.height);
        Ok(())
    }

    /// Offscreen frame, composite pipeline and canvas quad
    fn build_host_resources(&self, context: &ContextRef) -> Result<(Frame, RenderPipeline, Mesh)> {
        let frame = Frame::new(context)?;

        let sources = &self.config.composite_shaders;
        let vertex = Shader::new(context, ShaderStage::Vertex, &sources.vertex)?;
        let fragment = Shader::new(context, ShaderStage::Fragment, &sources.fragment)?;
        let composite = RenderPipeline::new(context, &vertex, &fragment)?;

        let (vertices, indices) = MeshFactory::canvas();
        let canvas = Mesh::new(context, &vertices, &indices)?;
        Ok((frame, composite, canvas))
    }

    /// The GL context is going away: unload the service and release
    /// everything, meshes first and the context last
    pub fn context_deinit(&mut self) {
        self.clock.stop();

        if let Some(service) = self.service.as_mut() {
            service.unload();
        }

        if let (Some(frame), Some(composite), Some(canvas)) =
            (self.frame.take(), self.composite.take(), self.canvas.take())
        {
            release_host_resources(frame, composite, canvas);
        }
        self.shared.context.borrow_mut().take();

        engine_info!("vpgfx::Renderer", "context released");
    }

    /// Render one frame into `presentation` (`None` = default framebuffer)
    ///
    /// # Errors
    ///
    /// `InvalidState` if called outside `context_init` / `context_deinit`.
    /// Failures of the drawing service abort the tick and are returned.
    pub fn render_frame(&mut self, presentation: Option<Handle>) -> Result<()> {
        let context = self.context()?;
        let (Some(frame), Some(composite), Some(canvas)) =
            (self.frame.as_mut(), self.composite.as_ref(), self.canvas.as_ref())
        else {
            return Err(engine_raise!("vpgfx::Renderer", Error::InvalidState(
                "renderer is not initialized".to_string()
            )));
        };

        let size = self.shared.surface.get();
        frame.update(size.width, size.height, self.config.samples)?;
        frame.bind()?;

        let elapsed = self.clock.elapsed_secs();
        let drawn = match self.service.as_mut() {
            Some(service) => service.update(elapsed).and_then(|()| service.render(elapsed)),
            None => Ok(()),
        };

        frame.unbind()?;
        context
            .borrow_mut()
            .set_binding(BindingPoint::Framebuffer(FramebufferTarget::Draw), presentation);
        if let Err(err) = drawn {
            engine_warn!("vpgfx::Renderer", "drawing service aborted the frame: {}", err);
            return Err(err);
        }

        {
            let mut ctx = context.borrow_mut();
            let device = ctx.device();
            device.viewport(Rect2D::sized(size.width, size.height));
            device.clear_color(self.config.clear_color);
            device.clear(ClearMask::COLOR | ClearMask::DEPTH | ClearMask::STENCIL);
        }

        composite.bind()?;
        composite.set_uniform_texture("tex", COMPOSITE_UNIT, frame.texture())?;
        for (attribute, components, field) in COMPOSITE_ATTRIBUTES {
            if let Some(location) = composite.attribute_location(attribute) {
                canvas.vertex_attribute_pointer(location, components, field)?;
            }
        }
        canvas.draw()?;
        composite.unbind();

        if let Some(request) = self.frame_request.as_mut() {
            request();
        }
        Ok(())
    }

    /// Surface resized; forwarded to the drawing service only while a
    /// context exists
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.shared.surface.set(size);
        if !self.is_initialized() {
            return;
        }
        if let Some(service) = self.service.as_mut() {
            service.resize(size.width, size.height);
        }
    }

    // ===== QUERIES =====

    /// Active context
    ///
    /// # Errors
    ///
    /// `InvalidState` when no context is active.
    pub fn context(&self) -> Result<ContextRef> {
        self.host()
            .context()
            .map_err(|err| engine_raise!("vpgfx::Renderer", err))
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.context.borrow().is_some()
    }

    /// Seconds the clock has run since context init
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    /// Offscreen frame, while a context exists
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}

/// Release in dependency order: meshes, then pipelines, then the frame
fn release_host_resources(mut frame: Frame, mut composite: RenderPipeline, mut canvas: Mesh) {
    canvas.release();
    composite.release();
    frame.release();
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
