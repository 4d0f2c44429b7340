use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uAmount;
void main() {
    vec4 color = texture(uTexture, v_uv);
    float r = color.r;
    float g = color.g;
    float b = color.b;
    color.r = min(1.0, (r * (1.0 - (0.607 * uAmount))) + (g * (0.769 * uAmount)) + (b * (0.189 * uAmount)));
    color.g = min(1.0, (r * 0.349 * uAmount) + (g * (1.0 - (0.314 * uAmount))) + (b * 0.168 * uAmount));
    color.b = min(1.0, (r * 0.272 * uAmount) + (g * 0.534 * uAmount) + (b * (1.0 - (0.869 * uAmount))));
    FragColor = color;
}
"#;

/// Reddish-brown monochrome tint. 0 is no effect, 1 is full sepia.
///
/// All three output channels are computed from the input channels read
/// once up front (matrix semantics), clamped at 1 per channel.
#[derive(Debug, Clone, Copy)]
pub struct Sepia {
    amount: f32,
}

impl Sepia {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(0.0, amount, 1.0, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Sepia {
    fn apply(&self, px: &mut PixelAccessor) {
        let a = self.amount;
        let (r, g, b) = (px.r, px.g, px.b);
        px.r = (r * (1.0 - 0.607 * a) + g * (0.769 * a) + b * (0.189 * a)).min(1.0);
        px.g = (r * 0.349 * a + g * (1.0 - 0.314 * a) + b * 0.168 * a).min(1.0);
        px.b = (r * 0.272 * a + g * 0.534 * a + b * (1.0 - 0.869 * a)).min(1.0);
    }
}

impl RasterFilter for Sepia {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Sepia {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uAmount", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;
    use pixelfx_raster::{PixelAccessor, PixelBuffer};

    #[test]
    fn zero_amount_is_identity() {
        let src = Source::from_rgba8(1, 1, vec![12, 200, 99, 255]).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        Sepia::new(0.0).apply(&mut px);
        px.save(&mut buf);
        assert_eq!(buf.data(), src.pixels());
    }

    #[test]
    fn full_sepia_on_white_stays_clamped() {
        let src = Source::from_rgba8(1, 1, vec![255, 255, 255, 255]).unwrap();
        let buf = PixelBuffer::from_source(&src);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        Sepia::new(1.0).apply(&mut px);
        // white maps past 1.0 on r and g; the min() holds them at 1.0
        assert_eq!(px.r, 1.0);
        assert_eq!(px.g, 1.0);
        assert!(px.b < 1.0);
    }
}
