use glam::Vec3;

use crate::buffer::PixelBuffer;

/// Float-normalized view of one RGBA pixel.
///
/// Channels are loaded once as `byte / 255` and written back once as
/// `round(value * 255)`. Several kernels intentionally push channels
/// outside [0, 1] mid-pipeline (brightness, dot screen), so `save` clamps
/// to [0, 255] before narrowing.
///
/// The pixel's coordinates and the image dimensions ride along for the
/// kernels that need them (vignette, noise, halftone, dot screen).
#[derive(Debug, Clone, Copy)]
pub struct PixelAccessor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl PixelAccessor {
    pub fn load(buffer: &PixelBuffer, x: u32, y: u32) -> Self {
        let i = buffer.offset(x, y);
        let d = buffer.data();
        Self {
            r: f32::from(d[i]) / 255.0,
            g: f32::from(d[i + 1]) / 255.0,
            b: f32::from(d[i + 2]) / 255.0,
            a: f32::from(d[i + 3]) / 255.0,
            x,
            y,
            width: buffer.width(),
            height: buffer.height(),
        }
    }

    pub fn save(&self, buffer: &mut PixelBuffer) {
        let i = buffer.offset(self.x, self.y);
        let d = buffer.data_mut();
        d[i] = quantize(self.r);
        d[i + 1] = quantize(self.g);
        d[i + 2] = quantize(self.b);
        d[i + 3] = quantize(self.a);
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 3-vector view of (r, g, b) for linear-algebra style kernels.
    pub fn rgb(&self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn set_rgb(&mut self, v: Vec3) {
        self.r = v.x;
        self.g = v.y;
        self.b = v.z;
    }

    /// GLSL-style `mix` of each color channel toward (r, g, b) by `t`.
    pub fn mix_rgb(&mut self, r: f32, g: f32, b: f32, t: f32) {
        self.r = pixelfx_core::math::mix(self.r, r, t);
        self.g = pixelfx_core::math::mix(self.g, g, t);
        self.b = pixelfx_core::math::mix(self.b, b, t);
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    // NaN maps to 0 through the clamp-then-cast.
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;

    fn buffer_1x1(rgba: [u8; 4]) -> PixelBuffer {
        let src = Source::from_rgba8(1, 1, rgba.to_vec()).unwrap();
        PixelBuffer::from_source(&src)
    }

    #[test]
    fn load_save_round_trips_every_level() {
        for level in [0u8, 1, 127, 128, 254, 255] {
            let mut buf = buffer_1x1([level, level, level, 255]);
            let px = PixelAccessor::load(&buf, 0, 0);
            px.save(&mut buf);
            assert_eq!(buf.data()[0], level);
        }
    }

    #[test]
    fn save_clamps_out_of_range_values() {
        let mut buf = buffer_1x1([0, 0, 0, 255]);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        px.r = 1.7;
        px.g = -0.3;
        px.save(&mut buf);
        assert_eq!(buf.data()[0], 255);
        assert_eq!(buf.data()[1], 0);
    }

    #[test]
    fn mix_rgb_matches_glsl_mix() {
        let mut buf = buffer_1x1([0, 0, 0, 255]);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        px.mix_rgb(1.0, 1.0, 1.0, 0.25);
        assert!((px.r - 0.25).abs() < 1e-6);
    }
}
