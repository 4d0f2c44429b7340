use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uContrast;
void main() {
    vec4 color = texture(uTexture, v_uv);
    if (uContrast > 0.0) {
        color.rgb = (color.rgb - 0.5) / (1.0 - uContrast) + 0.5;
    } else {
        color.rgb = (color.rgb - 0.5) * (1.0 + uContrast) + 0.5;
    }
    FragColor = color;
}
"#;

/// Maximum positive contrast. The divide form `1 / (1 - c)` has a pole at
/// `c = 1`; the same 0.001 margin the saturation math uses keeps the gain
/// finite.
pub(crate) const MAX_CONTRAST: f32 = 0.999;

/// Multiplicative contrast about mid-gray. -1 is solid gray, 0 is no
/// change, positive values expand toward the maximum.
#[derive(Debug, Clone, Copy)]
pub struct Contrast {
    amount: f32,
}

impl Contrast {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(-1.0, amount, MAX_CONTRAST, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

pub(crate) fn apply_contrast(px: &mut PixelAccessor, contrast: f32) {
    let gain = if contrast > 0.0 {
        1.0 / (1.0 - contrast)
    } else {
        1.0 + contrast
    };
    px.r = (px.r - 0.5) * gain + 0.5;
    px.g = (px.g - 0.5) * gain + 0.5;
    px.b = (px.b - 0.5) * gain + 0.5;
}

impl IterableKernel for Contrast {
    fn apply(&self, px: &mut PixelAccessor) {
        apply_contrast(px, self.amount);
    }
}

impl RasterFilter for Contrast {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Contrast {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uContrast", self.amount)
    }
}
