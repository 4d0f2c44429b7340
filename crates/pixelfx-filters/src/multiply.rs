use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform vec3 uFactors;
void main() {
    vec4 color = texture(uTexture, v_uv);
    color.rgb *= uFactors;
    FragColor = color;
}
"#;

/// Per-channel multiplication, each factor in [0, 1] (1 is no change).
#[derive(Debug, Clone, Copy)]
pub struct Multiply {
    r: f32,
    g: f32,
    b: f32,
}

impl Multiply {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_or(0.0, r, 1.0, 1.0),
            g: clamp_or(0.0, g, 1.0, 1.0),
            b: clamp_or(0.0, b, 1.0, 1.0),
        }
    }

    pub fn factors(&self) -> (f32, f32, f32) {
        (self.r, self.g, self.b)
    }
}

impl IterableKernel for Multiply {
    fn apply(&self, px: &mut PixelAccessor) {
        px.r *= self.r;
        px.g *= self.g;
        px.b *= self.b;
    }
}

impl RasterFilter for Multiply {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for Multiply {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new().with("uFactors", [self.r, self.g, self.b])
    }
}
