use pixelfx_core::spline::build_lut;
use pixelfx_core::{FxError, Uniforms};
use pixelfx_glow::{GlowFilter, GlowRenderer};
use pixelfx_raster::{PixelBuffer, RasterFilter, RasterStage, WholeImageKernel};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform sampler2D uMap;
void main() {
    vec4 color = texture(uTexture, v_uv);
    color.r = texture(uMap, vec2(color.r, 0.5)).r;
    color.g = texture(uMap, vec2(color.g, 0.5)).g;
    color.b = texture(uMap, vec2(color.b, 0.5)).b;
    FragColor = color;
}
"#;

/// Arbitrary tone mapping through spline-interpolated control points.
///
/// Control points are (input, output) pairs in [0, 1]; one set applies to
/// all three channels, or three sets map red, green and blue separately.
/// The fitted curve is baked into 256-entry lookup tables at construction:
/// the software path indexes them per byte, the GPU path samples them from
/// a transient 256x1 map texture.
#[derive(Debug, Clone)]
pub struct Curves {
    red: [u8; 256],
    green: [u8; 256],
    blue: [u8; 256],
}

impl Curves {
    /// One curve applied to all three channels.
    pub fn new(points: &[(f32, f32)]) -> Self {
        let lut = build_lut(points);
        Self {
            red: lut,
            green: lut,
            blue: lut,
        }
    }

    /// Independent curves per channel.
    pub fn rgb(red: &[(f32, f32)], green: &[(f32, f32)], blue: &[(f32, f32)]) -> Self {
        Self {
            red: build_lut(red),
            green: build_lut(green),
            blue: build_lut(blue),
        }
    }

    /// The 256x1 RGBA map texture contents for the shader path.
    fn map_pixels(&self) -> Vec<u8> {
        let mut map = Vec::with_capacity(256 * 4);
        for i in 0..256 {
            map.extend_from_slice(&[self.red[i], self.green[i], self.blue[i], 255]);
        }
        map
    }
}

impl WholeImageKernel for Curves {
    fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError> {
        for px in buffer.data_mut().chunks_exact_mut(4) {
            px[0] = self.red[px[0] as usize];
            px[1] = self.green[px[1] as usize];
            px[2] = self.blue[px[2] as usize];
        }
        Ok(())
    }
}

impl RasterFilter for Curves {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Whole(self)
    }
}

impl GlowFilter for Curves {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn draw(&self, renderer: &mut GlowRenderer) -> Result<(), FxError> {
        if renderer.dimensions().is_none() {
            return Err(FxError::NoSource);
        }
        let map = renderer.create_texture(256, 1, Some(&self.map_pixels()))?;
        let result = renderer.pass(None, FRAG, &Uniforms::new(), &[("uMap", &map)]);
        renderer.destroy_texture(map);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;

    #[test]
    fn identity_curve_moves_levels_at_most_one() {
        let curves = Curves::new(&[(0.0, 0.0), (1.0, 1.0)]);
        let src = Source::from_rgba8(1, 1, vec![10, 128, 250, 255]).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&curves, &mut buf).unwrap();
        for (before, after) in src.pixels().iter().zip(buf.data()) {
            assert!((i32::from(*before) - i32::from(*after)).abs() <= 1);
        }
    }

    #[test]
    fn inversion_flips_channels_but_not_alpha() {
        let curves = Curves::new(&[(0.0, 1.0), (1.0, 0.0)]);
        let src = Source::from_rgba8(1, 1, vec![0, 255, 128, 200]).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&curves, &mut buf).unwrap();
        assert!(buf.data()[0] >= 254);
        assert!(buf.data()[1] <= 1);
        assert_eq!(buf.data()[3], 200);
    }

    #[test]
    fn per_channel_curves_are_independent() {
        let curves = Curves::rgb(
            &[(0.0, 1.0), (1.0, 0.0)],
            &[(0.0, 0.0), (1.0, 1.0)],
            &[(0.0, 0.0), (1.0, 1.0)],
        );
        let src = Source::from_rgba8(1, 1, vec![0, 100, 200, 255]).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&curves, &mut buf).unwrap();
        assert!(buf.data()[0] >= 254); // red inverted
        assert!((i32::from(buf.data()[1]) - 100).abs() <= 1);
        assert!((i32::from(buf.data()[2]) - 200).abs() <= 1);
    }

    #[test]
    fn map_texture_is_256_rgba_texels() {
        let curves = Curves::new(&[(0.0, 0.0), (1.0, 1.0)]);
        let map = curves.map_pixels();
        assert_eq!(map.len(), 256 * 4);
        assert_eq!(map[3], 255);
    }
}
