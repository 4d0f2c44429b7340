use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uBrightness;
void main() {
    vec4 color = texture(uTexture, v_uv);
    color.rgb += uBrightness;
    FragColor = color;
}
"#;

/// Additive brightness. -1 is solid black, 0 is no change, 1 is solid
/// white.
#[derive(Debug, Clone, Copy)]
pub struct Brightness {
    amount: f32,
}

impl Brightness {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(-1.0, amount, 1.0, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Brightness {
    fn apply(&self, px: &mut PixelAccessor) {
        px.r += self.amount;
        px.g += self.amount;
        px.b += self.amount;
    }
}

impl RasterFilter for Brightness {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Brightness {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uBrightness", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_clamps_and_defaults() {
        assert_eq!(Brightness::new(2.0).amount(), 1.0);
        assert_eq!(Brightness::new(-2.0).amount(), -1.0);
        assert_eq!(Brightness::new(f32::NAN).amount(), 0.0);
    }
}
