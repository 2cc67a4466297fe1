/// 2D texture with a fixed nearest / clamp-to-edge sampling policy

use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingPoint, ContextRef, GraphicsDevice, Handle, ObjectKind,
    PixelFormat, TextureFilter, TextureWrap,
};
use crate::resource::{GraphicsResource, OwnedHandle};
use crate::{engine_raise, engine_trace};

/// Unit used for uploads, so they never disturb samplers bound elsewhere
const STAGING_UNIT: u32 = 0;

pub struct Texture {
    object: OwnedHandle,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl Texture {
    /// Create an empty texture (no storage until `write` or `clear`)
    pub fn new(context: &ContextRef) -> Result<Self> {
        let texture = Self {
            object: OwnedHandle::create(context, ObjectKind::Texture)?,
            width: 0,
            height: 0,
            format: PixelFormat::Rgba,
        };

        texture.with_bound(|device| {
            device.set_texture_sampling(TextureFilter::Nearest, TextureWrap::ClampToEdge);
        })?;
        Ok(texture)
    }

    /// Reallocate to `width` x `height` and upload `pixels`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `pixels` is not exactly `width * height` RGB or
    /// RGBA texels (per `has_alpha`).
    pub fn write(&mut self, width: u32, height: u32, pixels: &[u8], has_alpha: bool) -> Result<()> {
        let format = PixelFormat::from_alpha(has_alpha);
        let expected = width as usize * height as usize * format.channels();
        if pixels.len() != expected {
            return Err(engine_raise!("vpgfx::Texture", Error::InvalidArgument(format!(
                "{}x{} {:?} needs {} bytes, got {}", width, height, format, expected, pixels.len()
            ))));
        }

        self.with_bound(|device| device.tex_image_2d(width, height, format, Some(pixels)))?;
        self.set_extent(width, height, format);
        Ok(())
    }

    /// Reallocate to `width` x `height` without uploading anything
    pub fn clear(&mut self, width: u32, height: u32, has_alpha: bool) -> Result<()> {
        let format = PixelFormat::from_alpha(has_alpha);
        self.with_bound(|device| device.tex_image_2d(width, height, format, None))?;
        self.set_extent(width, height, format);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    fn set_extent(&mut self, width: u32, height: u32, format: PixelFormat) {
        self.width = width;
        self.height = height;
        self.format = format;
        engine_trace!("vpgfx::Texture", "storage {}x{} {:?}", width, height, format);
    }

    fn with_bound<R>(&self, f: impl FnOnce(&mut dyn GraphicsDevice) -> R) -> Result<R> {
        let handle = self.object.require()?;
        let mut ctx = self.object.context().borrow_mut();
        let mut bound = ctx.bind(BindingPoint::Texture2D(STAGING_UNIT), Some(handle));
        Ok(f(bound.device()))
    }
}

impl GraphicsResource for Texture {
    fn handle(&self) -> Option<Handle> {
        self.object.get()
    }

    fn release(&mut self) {
        self.object.release();
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
