use std::sync::Arc;

use crate::FxError;

/// A decoded RGBA8 image handed to a renderer.
///
/// The engine never decodes file formats; the caller supplies pixels that
/// are already materialized. Cloning is cheap (the pixel data is shared)
/// and the renderer never mutates a source: the software backend copies
/// the pixels into its own working buffer on bind, the GPU backend uploads
/// them into an immutable source texture.
#[derive(Debug, Clone)]
pub struct Source {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Source {
    /// Wraps a decoded raster. `pixels` must be row-major RGBA8 of exactly
    /// `width * height * 4` bytes, with non-zero dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FxError> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(FxError::InvalidSource {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exact_rgba8_length() {
        let s = Source::from_rgba8(2, 3, vec![0u8; 24]).expect("valid source");
        assert_eq!(s.width(), 2);
        assert_eq!(s.height(), 3);
        assert_eq!(s.pixels().len(), 24);
    }

    #[test]
    fn rejects_zero_dimensions_and_bad_length() {
        assert!(Source::from_rgba8(0, 3, vec![]).is_err());
        assert!(Source::from_rgba8(2, 0, vec![]).is_err());
        assert!(Source::from_rgba8(2, 3, vec![0u8; 23]).is_err());
        assert!(Source::from_rgba8(2, 3, vec![0u8; 25]).is_err());
    }
}
