use serde::Serialize;

/// Pixel layouts a source texture may arrive in.
///
/// Only the four 8-bit colour layouts can be blitted into an atlas; the rest
/// exist so callers can describe what they have and get a proper error back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PixelFormat {
    Abgr8,
    Bgr8,
    Rgb8,
    Rgba8,
    Luminance8,
    LuminanceAlpha8,
    Rgb565,
    Rgba16F,
}

impl PixelFormat {
    /// Bytes occupied by one pixel in this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Abgr8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Luminance8 => 1,
            PixelFormat::LuminanceAlpha8 | PixelFormat::Rgb565 => 2,
            PixelFormat::Rgba16F => 8,
        }
    }

    /// Whether pixels of this layout can be converted into the atlas layout.
    pub fn is_convertible(&self) -> bool {
        matches!(
            self,
            PixelFormat::Abgr8 | PixelFormat::Bgr8 | PixelFormat::Rgb8 | PixelFormat::Rgba8
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PixelFormat::Abgr8 => "ABGR8",
            PixelFormat::Bgr8 => "BGR8",
            PixelFormat::Rgb8 => "RGB8",
            PixelFormat::Rgba8 => "RGBA8",
            PixelFormat::Luminance8 => "Luminance8",
            PixelFormat::LuminanceAlpha8 => "LuminanceAlpha8",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Rgba16F => "RGBA16F",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded source texture, identified by its asset name.
#[derive(Debug, Clone)]
pub struct SourceTexture {
    /// Asset name; the key under which the texture's tile is registered.
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Tightly packed rows, `width * height * format.bytes_per_pixel()` bytes.
    pub data: Vec<u8>,
}

impl SourceTexture {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            format,
            data,
        }
    }

    /// Byte length a well-formed buffer for this texture must have.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Whether the texture covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
