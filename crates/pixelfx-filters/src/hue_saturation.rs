use glam::Vec3;

use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

use crate::hue::{apply_hue, hue_weights};
use crate::saturation::apply_saturation;

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uHue;
uniform float uSaturation;
void main() {
    vec4 color = texture(uTexture, v_uv);

    float angle = uHue * 3.14159265;
    float s = sin(angle), c = cos(angle);
    vec3 weights = (vec3(2.0 * c, -sqrt(3.0) * s - c, sqrt(3.0) * s - c) + 1.0) / 3.0;
    color.rgb = vec3(
        dot(color.rgb, weights.xyz),
        dot(color.rgb, weights.zxy),
        dot(color.rgb, weights.yzx)
    );

    float average = (color.r + color.g + color.b) / 3.0;
    if (uSaturation > 0.0) {
        color.rgb += (average - color.rgb) * (1.0 - 1.0 / (1.001 - uSaturation));
    } else {
        color.rgb += (average - color.rgb) * (-uSaturation);
    }
    FragColor = color;
}
"#;

/// Hue rotation followed by saturation scaling in one kernel (and one
/// pass). Equivalent to chaining [`crate::Hue`] then [`crate::Saturation`].
#[derive(Debug, Clone, Copy)]
pub struct HueSaturation {
    hue: f32,
    saturation: f32,
    weights: Vec3,
}

impl HueSaturation {
    pub fn new(hue: f32, saturation: f32) -> Self {
        let hue = clamp_or(-1.0, hue, 1.0, 0.0);
        Self {
            hue,
            saturation: clamp_or(-1.0, saturation, 1.0, 0.0),
            weights: hue_weights(hue),
        }
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }
}

impl IterableKernel for HueSaturation {
    fn apply(&self, px: &mut PixelAccessor) {
        apply_hue(px, self.weights);
        apply_saturation(px, self.saturation);
    }
}

impl RasterFilter for HueSaturation {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for HueSaturation {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new()
            .with("uHue", self.hue)
            .with("uSaturation", self.saturation)
    }
}
