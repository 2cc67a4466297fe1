/// Texture and renderbuffer formats, sampling policy

/// Pixel layout of texture uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_alpha(has_alpha: bool) -> Self {
        if has_alpha { PixelFormat::Rgba } else { PixelFormat::Rgb }
    }

    /// Bytes per pixel (8 bits per channel)
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    ClampToEdge,
}

/// Internal format of renderbuffer storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderbufferFormat {
    /// 8-bit RGB color
    Rgb8,
    /// 32-bit float depth + 8-bit stencil
    Depth32FStencil8,
}
