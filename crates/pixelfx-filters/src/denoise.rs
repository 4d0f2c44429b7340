use pixelfx_core::math::clamp_or;
use pixelfx_core::{FxError, Uniforms};
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{PixelBuffer, RasterFilter, RasterStage, WholeImageKernel};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uExponent;
uniform vec2 uTexSize;
void main() {
    vec4 center = texture(uTexture, v_uv);
    vec4 color = vec4(0.0);
    float total = 0.0;

    for (float x = -4.0; x <= 4.0; x += 1.0) {
        for (float y = -4.0; y <= 4.0; y += 1.0) {
            vec4 smpl = texture(uTexture, v_uv + vec2(x, y) / uTexSize);
            float weight = 1.0 - abs(dot(smpl.rgb - center.rgb, vec3(0.25)));
            weight = pow(weight, uExponent);
            color += smpl * weight;
            total += weight;
        }
    }

    FragColor = color / total;
}
"#;

/// Bilateral-style smoothing: a 9x9 box average weighted by color
/// intensity similarity, so flat regions smooth while edges hold.
/// `exponent` 0 degenerates to a plain box blur; useful values sit around
/// 10 to 20. The software path is O(81) texture reads per pixel and is
/// noticeably slow on large images.
#[derive(Debug, Clone, Copy)]
pub struct Denoise {
    exponent: f32,
}

impl Denoise {
    pub fn new(exponent: f32) -> Self {
        Self {
            exponent: clamp_or(0.0, exponent, 100.0, 10.0),
        }
    }

    pub fn exponent(&self) -> f32 {
        self.exponent
    }
}

impl WholeImageKernel for Denoise {
    fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError> {
        let w = buffer.width() as i64;
        let h = buffer.height() as i64;
        let original = buffer.data().to_vec();
        let data = buffer.data_mut();

        let channel = |off: usize, c: usize| f32::from(original[off + c]) / 255.0;

        for y in 0..h {
            for x in 0..w {
                let dst = ((y * w + x) * 4) as usize;
                let mut acc = [0.0f32; 4];
                let mut total = 0.0f32;

                for cy in -4..=4 {
                    for cx in -4..=4 {
                        let sx = (x + cx).clamp(0, w - 1);
                        let sy = (y + cy).clamp(0, h - 1);
                        let src = ((sy * w + sx) * 4) as usize;

                        let diff = (channel(src, 0) - channel(dst, 0)) * 0.25
                            + (channel(src, 1) - channel(dst, 1)) * 0.25
                            + (channel(src, 2) - channel(dst, 2)) * 0.25;
                        let weight = (1.0 - diff.abs()).powf(self.exponent);

                        for c in 0..4 {
                            acc[c] += channel(src, c) * weight;
                        }
                        total += weight;
                    }
                }

                for c in 0..4 {
                    let v = acc[c] / total * 255.0;
                    data[dst + c] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        Ok(())
    }
}

impl RasterFilter for Denoise {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Whole(self)
    }
}

impl GlowFilter for Denoise {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, width: u32, height: u32) -> Uniforms {
        Uniforms::new()
            .with("uExponent", self.exponent)
            .with("uTexSize", [width as f32, height as f32])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;

    #[test]
    fn exponent_clamps_and_defaults() {
        assert_eq!(Denoise::new(-1.0).exponent(), 0.0);
        assert_eq!(Denoise::new(500.0).exponent(), 100.0);
        assert_eq!(Denoise::new(f32::NAN).exponent(), 10.0);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let pixels: Vec<u8> = std::iter::repeat([90, 90, 90, 255])
            .take(6 * 6)
            .flatten()
            .collect();
        let src = Source::from_rgba8(6, 6, pixels).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&Denoise::new(10.0), &mut buf).unwrap();
        assert_eq!(buf.data(), src.pixels());
    }

    #[test]
    fn isolated_speckle_is_attenuated() {
        let mut pixels: Vec<u8> = std::iter::repeat([40, 40, 40, 255])
            .take(9 * 9)
            .flatten()
            .collect();
        let center = (4 * 9 + 4) * 4;
        pixels[center] = 220;
        pixels[center + 1] = 220;
        pixels[center + 2] = 220;
        let src = Source::from_rgba8(9, 9, pixels).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&Denoise::new(2.0), &mut buf).unwrap();
        // the speckle moves toward its neighborhood
        assert!(buf.data()[center] < 220);
        assert!(buf.data()[center] > 40);
    }
}
