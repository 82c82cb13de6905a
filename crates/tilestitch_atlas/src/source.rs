//! Decoded source images

use std::borrow::Cow;
use tilestitch_core::{ConfigError, Identifier, ShapeClass};

/// A decoded tile image, RGB or RGBA, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl SourceImage {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    pub fn rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::new(width, height, 4, pixels)
    }

    /// A single-colored RGBA image, mostly useful in tests and placeholders
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = color.repeat(width as usize * height as usize);
        Self::rgba(width, height, pixels)
    }

    /// Keep RGB sources as RGB; everything else becomes RGBA8
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        match image {
            image::DynamicImage::ImageRgb8(rgb) => {
                let (width, height) = rgb.dimensions();
                Self::new(width, height, 3, rgb.into_raw())
            }
            other => {
                let rgba = other.into_rgba8();
                let (width, height) = rgba.dimensions();
                Self::rgba(width, height, rgba.into_raw())
            }
        }
    }

    /// Check the channel count and buffer length
    pub fn validate(&self, tile: &Identifier) -> Result<(), ConfigError> {
        if self.channels != 3 && self.channels != 4 {
            return Err(ConfigError::UnsupportedChannels {
                tile: tile.clone(),
                channels: self.channels,
            });
        }
        let expected = self.width as usize * self.height as usize * self.channels as usize;
        if self.pixels.len() != expected {
            return Err(ConfigError::PixelBufferSize {
                tile: tile.clone(),
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }

    /// Pick the shape for this image: the declared one if its size matches,
    /// otherwise whatever shape the size identifies
    pub fn resolve_shape(
        &self,
        tile: &Identifier,
        declared: Option<ShapeClass>,
    ) -> Result<ShapeClass, ConfigError> {
        match declared {
            Some(shape) => {
                self.check_shape(tile, shape)?;
                Ok(shape)
            }
            None => ShapeClass::from_pixel_size(self.width, self.height).ok_or_else(|| {
                ConfigError::UnrecognizedShape {
                    tile: tile.clone(),
                    width: self.width,
                    height: self.height,
                }
            }),
        }
    }

    pub fn check_shape(&self, tile: &Identifier, shape: ShapeClass) -> Result<(), ConfigError> {
        let (expected_width, expected_height) = shape.pixel_size();
        if (self.width, self.height) != (expected_width, expected_height) {
            return Err(ConfigError::DimensionMismatch {
                tile: tile.clone(),
                shape,
                expected_width,
                expected_height,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// RGBA view of the pixels; RGB gets an opaque alpha channel
    pub fn to_rgba(&self) -> Cow<'_, [u8]> {
        if self.channels == 4 {
            return Cow::Borrowed(&self.pixels);
        }
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.pixels.chunks_exact(3) {
            rgba.extend_from_slice(px);
            rgba.push(255);
        }
        Cow::Owned(rgba)
    }
}
