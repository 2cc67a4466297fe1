/// Offscreen multisampled render target with a sampleable resolve texture
///
/// Drawing goes into a multisample framebuffer (color + depth/stencil
/// renderbuffers). `unbind` blits the color samples into a single-sample
/// framebuffer whose color attachment is [`Frame::texture`], ready to be
/// composited.
///
/// `update` reallocates only when size or sample count change, so it is
/// safe to call every frame.

use crate::error::{Error, Result};
use crate::graphics_device::{
    Attachment, BindingPoint, ClearMask, ContextRef, FramebufferTarget, Handle,
    ObjectKind, Rect2D, RenderbufferFormat, TextureFilter,
};
use crate::resource::{GraphicsResource, OwnedHandle, Texture};
use crate::{engine_debug, engine_raise};

pub struct Frame {
    /// Single-sample framebuffer the texture is attached to
    resolve: OwnedHandle,
    /// Multisample framebuffer drawn into
    multisample: OwnedHandle,
    color: OwnedHandle,
    depth_stencil: OwnedHandle,
    texture: Texture,
    width: u32,
    height: u32,
    samples: u32,
}

impl Frame {
    pub fn new(context: &ContextRef) -> Result<Self> {
        Ok(Self {
            resolve: OwnedHandle::create(context, ObjectKind::Framebuffer)?,
            multisample: OwnedHandle::create(context, ObjectKind::Framebuffer)?,
            color: OwnedHandle::create(context, ObjectKind::Renderbuffer)?,
            depth_stencil: OwnedHandle::create(context, ObjectKind::Renderbuffer)?,
            texture: Texture::new(context)?,
            width: 0,
            height: 0,
            samples: 0,
        })
    }

    /// Resize to `width` x `height` with `samples` samples per pixel
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `samples` is 0. Nothing is reallocated.
    pub fn update(&mut self, width: u32, height: u32, samples: u32) -> Result<()> {
        if samples < 1 {
            return Err(engine_raise!("vpgfx::Frame", Error::InvalidArgument(
                "sample count must be at least 1".to_string()
            )));
        }

        if self.width == width && self.height == height && self.samples == samples {
            return Ok(());
        }

        let resolve = self.resolve.require()?;
        let multisample = self.multisample.require()?;
        let color = self.color.require()?;
        let depth_stencil = self.depth_stencil.require()?;

        self.width = width;
        self.height = height;
        self.samples = samples;

        self.texture.clear(width, height, false)?;

        let mut ctx = self.resolve.context().borrow_mut();
        {
            let mut bound = ctx.bind(BindingPoint::Framebuffer(FramebufferTarget::Draw), Some(resolve));
            bound.device().framebuffer_texture_2d(FramebufferTarget::Draw, Attachment::Color0, self.texture.handle());
        }

        for (renderbuffer, format) in [
            (color, RenderbufferFormat::Rgb8),
            (depth_stencil, RenderbufferFormat::Depth32FStencil8),
        ] {
            let mut bound = ctx.bind(BindingPoint::Renderbuffer, Some(renderbuffer));
            bound.device().renderbuffer_storage_multisample(samples, format, width, height);
        }

        {
            let mut bound = ctx.bind(BindingPoint::Framebuffer(FramebufferTarget::Draw), Some(multisample));
            let device = bound.device();
            device.framebuffer_renderbuffer(FramebufferTarget::Draw, Attachment::Color0, Some(color));
            device.framebuffer_renderbuffer(FramebufferTarget::Draw, Attachment::DepthStencil, Some(depth_stencil));
        }

        engine_debug!("vpgfx::Frame", "resized to {}x{} ({} samples)", width, height, samples);
        Ok(())
    }

    /// Render into the multisample buffers over the full extent
    ///
    /// Both framebuffer targets are bound, so read-backs during the pass see
    /// the frame being drawn.
    pub fn bind(&self) -> Result<()> {
        let multisample = self.multisample.require()?;
        let mut ctx = self.multisample.context().borrow_mut();
        ctx.set_binding(BindingPoint::Framebuffer(FramebufferTarget::Draw), Some(multisample));
        ctx.set_binding(BindingPoint::Framebuffer(FramebufferTarget::Read), Some(multisample));
        ctx.device().viewport(Rect2D::sized(self.width, self.height));
        Ok(())
    }

    /// Resolve the color samples into [`Frame::texture`] and return to the
    /// default framebuffer
    pub fn unbind(&self) -> Result<()> {
        let resolve = self.resolve.require()?;
        let multisample = self.multisample.require()?;
        let extent = Rect2D::sized(self.width, self.height);

        let mut ctx = self.multisample.context().borrow_mut();
        ctx.set_binding(BindingPoint::Framebuffer(FramebufferTarget::Draw), None);
        ctx.set_binding(BindingPoint::Framebuffer(FramebufferTarget::Read), None);

        let mut read = ctx.bind(BindingPoint::Framebuffer(FramebufferTarget::Read), Some(multisample));
        let mut draw = read.bind(BindingPoint::Framebuffer(FramebufferTarget::Draw), Some(resolve));
        draw.device().blit_framebuffer(extent, extent, ClearMask::COLOR, TextureFilter::Nearest);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Resolved single-sample color
    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

impl GraphicsResource for Frame {
    fn handle(&self) -> Option<Handle> {
        self.resolve.get()
    }

    fn release(&mut self) {
        self.resolve.release();
        self.multisample.release();
        self.color.release();
        self.depth_stencil.release();
        self.texture.release();
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
