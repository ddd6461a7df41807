use std::{path::Path, sync::Arc};

use glam::{UVec2, Vec4};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, Rgba32FImage, RgbaImage};

use crate::utils::Saturate;

/// Storage precision of an encoded output image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureFormat {
    /// 8 bits per channel, PNG.
    #[default]
    Rgba8,
    /// 16 bits per channel, PNG.
    Rgba16,
    /// 32-bit float per channel, OpenEXR. Values are written unclamped.
    Rgba32F,
}

impl TextureFormat {
    pub fn container(self) -> ImageFormat {
        match self {
            TextureFormat::Rgba8 | TextureFormat::Rgba16 => ImageFormat::Png,
            TextureFormat::Rgba32F => ImageFormat::OpenExr,
        }
    }
}

/// A read-only RGBA texture with normalized `f32` channels.
///
/// Cloning is cheap, the pixel storage is shared. No color space conversion
/// is ever applied: an 8-bit image decodes to `value / 255` per channel.
#[derive(Debug, Clone)]
pub struct Texture {
    image: Arc<Rgba32FImage>,
}

impl Texture {
    pub fn new(image: Rgba32FImage) -> Self {
        Texture {
            image: Arc::new(image),
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Vec4) -> Self {
        Texture::new(ImageBuffer::from_fn(width, height, |x, y| {
            Rgba(f(x, y).to_array())
        }))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, image::ImageError> {
        image::open(path).map(Texture::from)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Fetch a single texel without filtering.
    ///
    /// Out of bounds coordinates read as transparent black.
    pub fn load(&self, texel: UVec2) -> Vec4 {
        self.image
            .get_pixel_checked(texel.x, texel.y)
            .map_or(Vec4::ZERO, |pixel| Vec4::from_array(pixel.0))
    }

    pub fn as_image(&self) -> &Rgba32FImage {
        &self.image
    }

    /// Quantize into an encodable image of the given format.
    pub fn to_dynamic(&self, format: TextureFormat) -> DynamicImage {
        let (width, height) = (self.width(), self.height());
        match format {
            TextureFormat::Rgba8 => DynamicImage::ImageRgba8(RgbaImage::from_fn(
                width,
                height,
                |x, y| {
                    let c = (self.load(UVec2::new(x, y)).saturate() * 255.0).round();
                    Rgba([c.x as u8, c.y as u8, c.z as u8, c.w as u8])
                },
            )),
            TextureFormat::Rgba16 => {
                DynamicImage::ImageRgba16(ImageBuffer::from_fn(width, height, |x, y| {
                    let c = (self.load(UVec2::new(x, y)).saturate() * 65535.0).round();
                    Rgba([c.x as u16, c.y as u16, c.z as u16, c.w as u16])
                }))
            }
            TextureFormat::Rgba32F => DynamicImage::ImageRgba32F(self.image.as_ref().clone()),
        }
    }
}

impl From<DynamicImage> for Texture {
    fn from(image: DynamicImage) -> Self {
        Texture::new(image.into_rgba32f())
    }
}

impl From<Rgba32FImage> for Texture {
    fn from(image: Rgba32FImage) -> Self {
        Texture::new(image)
    }
}

impl TryFrom<&str> for Texture {
    type Error = image::ImageError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Texture::open(path)
    }
}
