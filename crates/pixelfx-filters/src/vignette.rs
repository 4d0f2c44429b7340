use pixelfx_core::math::{clamp_or, smoothstep};
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uSize;
uniform float uAmount;
void main() {
    vec4 color = texture(uTexture, v_uv);
    float dist = distance(v_uv, vec2(0.5, 0.5));
    color.rgb *= smoothstep(0.8, uSize * 0.799, dist * (uAmount + uSize));
    FragColor = color;
}
"#;

/// Simulated lens edge darkening. `size` 0..1 positions the falloff from
/// the center to the frame edge; `amount` 0..1 is the darkening strength.
#[derive(Debug, Clone, Copy)]
pub struct Vignette {
    size: f32,
    amount: f32,
}

impl Vignette {
    pub fn new(size: f32, amount: f32) -> Self {
        Self {
            size: clamp_or(0.0, size, 1.0, 0.0),
            amount: clamp_or(0.0, amount, 1.0, 0.0),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }
}

impl IterableKernel for Vignette {
    fn apply(&self, px: &mut PixelAccessor) {
        let u = px.x() as f32 / px.width() as f32;
        let v = px.y() as f32 / px.height() as f32;
        let dist = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();
        let factor = smoothstep(0.8, self.size * 0.799, dist * (self.amount + self.size));
        px.r *= factor;
        px.g *= factor;
        px.b *= factor;
    }
}

impl RasterFilter for Vignette {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Vignette {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new()
            .with("uSize", self.size)
            .with("uAmount", self.amount)
    }
}
