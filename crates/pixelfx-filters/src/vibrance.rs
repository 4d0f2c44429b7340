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
    float average = (color.r + color.g + color.b) / 3.0;
    float mx = max(color.r, max(color.g, color.b));
    float amt = (mx - average) * (-uAmount * 3.0);
    color.rgb = mix(color.rgb, vec3(mx), amt);
    FragColor = color;
}
"#;

/// Saturation boost weighted by how desaturated the pixel already is;
/// saturated colors move much less than muted ones. -1 to 1, 0 is no
/// change.
#[derive(Debug, Clone, Copy)]
pub struct Vibrance {
    amount: f32,
}

impl Vibrance {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(-1.0, amount, 1.0, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Vibrance {
    fn apply(&self, px: &mut PixelAccessor) {
        let average = (px.r + px.g + px.b) / 3.0;
        let mx = px.r.max(px.g).max(px.b);
        let amt = (mx - average) * (-self.amount * 3.0);
        px.mix_rgb(mx, mx, mx, amt);
    }
}

impl RasterFilter for Vibrance {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Vibrance {
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
    fn gray_pixels_are_fixed_points() {
        let src = Source::from_rgba8(1, 1, vec![90, 90, 90, 255]).unwrap();
        let buf = PixelBuffer::from_source(&src);
        for amount in [-1.0, 0.5, 1.0] {
            let mut px = PixelAccessor::load(&buf, 0, 0);
            Vibrance::new(amount).apply(&mut px);
            assert!((px.r - 90.0 / 255.0).abs() < 1e-6);
            assert_eq!(px.r, px.g);
        }
    }

    #[test]
    fn positive_amount_pulls_channels_apart() {
        let src = Source::from_rgba8(1, 1, vec![150, 100, 100, 255]).unwrap();
        let buf = PixelBuffer::from_source(&src);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        let before = px.r - px.g;
        Vibrance::new(0.5).apply(&mut px);
        assert!(px.r - px.g > before);
    }
}
