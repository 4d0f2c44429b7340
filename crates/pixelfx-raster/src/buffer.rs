use pixelfx_core::Source;

/// Dense row-major RGBA8 working buffer, `width * height * 4` bytes.
///
/// Owned exclusively by the software renderer between `set_source` and the
/// next `set_source`; filters mutate it in place.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Copies a source's pixels into a fresh working buffer.
    pub fn from_source(source: &Source) -> Self {
        Self {
            data: source.pixels().to_vec(),
            width: source.width(),
            height: source.height(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Byte offset of pixel (x, y). Callers keep x/y in range.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_row_major() {
        let src = Source::from_rgba8(3, 2, (0..24).collect()).unwrap();
        let buf = PixelBuffer::from_source(&src);
        assert_eq!(buf.offset(0, 0), 0);
        assert_eq!(buf.offset(2, 0), 8);
        assert_eq!(buf.offset(0, 1), 12);
        assert_eq!(buf.data()[buf.offset(1, 1)], 16);
    }
}
