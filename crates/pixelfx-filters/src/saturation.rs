use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uSaturation;
void main() {
    vec4 color = texture(uTexture, v_uv);
    float average = (color.r + color.g + color.b) / 3.0;
    if (uSaturation > 0.0) {
        color.rgb += (average - color.rgb) * (1.0 - 1.0 / (1.001 - uSaturation));
    } else {
        color.rgb += (average - color.rgb) * (-uSaturation);
    }
    FragColor = color;
}
"#;

/// Scales channels toward (negative) or away from (positive) the channel
/// average. The positive branch's `1 / (1.001 - s)` keeps the gain finite
/// at `s = 1`.
pub(crate) fn apply_saturation(px: &mut PixelAccessor, saturation: f32) {
    let average = (px.r + px.g + px.b) / 3.0;
    let t = if saturation > 0.0 {
        1.0 - 1.0 / (1.001 - saturation)
    } else {
        -saturation
    };
    px.r += (average - px.r) * t;
    px.g += (average - px.g) * t;
    px.b += (average - px.b) * t;
}

/// Multiplicative saturation. -1 is solid gray, 0 is no change, 1 is
/// maximum saturation.
#[derive(Debug, Clone, Copy)]
pub struct Saturation {
    amount: f32,
}

impl Saturation {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(-1.0, amount, 1.0, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Saturation {
    fn apply(&self, px: &mut PixelAccessor) {
        apply_saturation(px, self.amount);
    }
}

impl RasterFilter for Saturation {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Saturation {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uSaturation", self.amount)
    }
}
