use pixelfx_core::math::{clamp_or, fract};
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uAmount;
uniform vec2 uTexSize;

float rand(vec2 co) {
    return fract(sin(dot(co, vec2(12.9898, 78.233))) * 43758.5453);
}

void main() {
    vec4 color = texture(uTexture, v_uv);
    float diff = (rand(v_uv * uTexSize) - 0.5) * uAmount;
    color.rgb += diff;
    FragColor = color;
}
"#;

/// The classic shader-toy coordinate hash, evaluated in f64 so the
/// software path is deterministic across platforms.
pub fn hash(x: f64, y: f64) -> f64 {
    fract((x * 12.9898 + y * 78.233).sin() * 43758.5453)
}

/// Additive monochrome noise keyed off pixel coordinates. 0 is no effect;
/// the same pixel always gets the same offset, so the filter is a pure
/// function of the image.
#[derive(Debug, Clone, Copy)]
pub struct Noise {
    amount: f32,
}

impl Noise {
    pub fn new(amount: f32) -> Self {
        Self {
            amount: clamp_or(-1.0, amount, 1.0, 0.0),
        }
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Noise {
    fn apply(&self, px: &mut PixelAccessor) {
        let diff = (hash(f64::from(px.x()), f64::from(px.y())) - 0.5) as f32 * self.amount;
        px.r += diff;
        px.g += diff;
        px.b += diff;
    }
}

impl RasterFilter for Noise {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Noise {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, width: u32, height: u32) -> Uniforms {
        Uniforms::new()
            .with("uAmount", self.amount)
            .with("uTexSize", [width as f32, height as f32])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_in_unit_range() {
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (3.0, 7.0), (1920.0, 1080.0)] {
            let a = hash(x, y);
            let b = hash(x, y);
            assert_eq!(a, b);
            assert!((0.0..1.0).contains(&a));
        }
    }

    #[test]
    fn neighboring_pixels_get_different_offsets() {
        assert_ne!(hash(10.0, 10.0), hash(11.0, 10.0));
        assert_ne!(hash(10.0, 10.0), hash(10.0, 11.0));
    }

    #[test]
    fn zero_amount_leaves_the_pixel_alone() {
        use pixelfx_core::Source;
        use pixelfx_raster::{PixelAccessor, PixelBuffer};

        let src = Source::from_rgba8(1, 1, vec![77, 77, 77, 255]).unwrap();
        let buf = PixelBuffer::from_source(&src);
        let mut px = PixelAccessor::load(&buf, 0, 0);
        Noise::new(0.0).apply(&mut px);
        assert_eq!(px.r, 77.0 / 255.0);
    }
}
