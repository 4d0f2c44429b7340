use glam::Vec3;

use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uHue;
void main() {
    vec4 color = texture(uTexture, v_uv);
    // RotationTransform[angle, {1, 1, 1}] applied to the color cube:
    // rotating about the grayscale axis shifts hue without touching
    // luminance.
    float angle = uHue * 3.14159265;
    float s = sin(angle), c = cos(angle);
    vec3 weights = (vec3(2.0 * c, -sqrt(3.0) * s - c, sqrt(3.0) * s - c) + 1.0) / 3.0;
    color.rgb = vec3(
        dot(color.rgb, weights.xyz),
        dot(color.rgb, weights.zxy),
        dot(color.rgb, weights.yzx)
    );
    FragColor = color;
}
"#;

/// First row of the rotation matrix about the (1, 1, 1) axis for
/// `hue * pi` radians; the other rows are its cyclic permutations.
pub(crate) fn hue_weights(hue: f32) -> Vec3 {
    let angle = hue * std::f32::consts::PI;
    let (s, c) = angle.sin_cos();
    let sqrt3 = 3.0f32.sqrt();
    (Vec3::new(2.0 * c, -sqrt3 * s - c, sqrt3 * s - c) + 1.0) / 3.0
}

pub(crate) fn apply_hue(px: &mut PixelAccessor, w: Vec3) {
    let rgb = px.rgb();
    px.set_rgb(Vec3::new(
        rgb.dot(w),
        rgb.dot(Vec3::new(w.z, w.x, w.y)),
        rgb.dot(Vec3::new(w.y, w.z, w.x)),
    ));
}

/// Rotational hue shift. -1 and 1 are 180-degree rotations in opposite
/// directions; 0 is no change. The weight vector is precomputed per
/// instance so fused sweeps pay no trigonometry per pixel.
#[derive(Debug, Clone, Copy)]
pub struct Hue {
    amount: f32,
    weights: Vec3,
}

impl Hue {
    pub fn new(amount: f32) -> Self {
        let amount = clamp_or(-1.0, amount, 1.0, 0.0);
        Self {
            amount,
            weights: hue_weights(amount),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Hue {
    fn apply(&self, px: &mut PixelAccessor) {
        apply_hue(px, self.weights);
    }
}

impl RasterFilter for Hue {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Hue {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uHue", self.amount)
    }
}
