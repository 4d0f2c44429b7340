use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

use crate::halftone::{finite_or_zero, pattern};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform vec2 uCenter;
uniform float uAngle;
uniform float uScale;
uniform vec2 uTexSize;

float pattern() {
    float s = sin(uAngle), c = cos(uAngle);
    vec2 tex = v_uv * uTexSize - uCenter;
    vec2 point = vec2(
        c * tex.x - s * tex.y,
        s * tex.x + c * tex.y
    ) * uScale;
    return (sin(point.x) * sin(point.y)) * 4.0;
}

void main() {
    vec4 color = texture(uTexture, v_uv);
    float average = (color.r + color.g + color.b) / 3.0;
    FragColor = vec4(vec3(average * 10.0 - 5.0 + pattern()), color.a);
}
"#;

/// Monochrome halftone: luminance screened against one rotated sine
/// grid. Same parameters as [`crate::ColorHalftone`].
#[derive(Debug, Clone, Copy)]
pub struct DotScreen {
    center_x: f32,
    center_y: f32,
    angle: f32,
    scale: f32,
}

impl DotScreen {
    pub fn new(center_x: f32, center_y: f32, angle: f32, size: f32) -> Self {
        let size = if size.is_finite() { size.max(1.0) } else { 1.0 };
        Self {
            center_x: finite_or_zero(center_x),
            center_y: finite_or_zero(center_y),
            angle: clamp_or(0.0, angle, std::f32::consts::FRAC_PI_2, 0.0),
            scale: std::f32::consts::PI / size,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl IterableKernel for DotScreen {
    fn apply(&self, px: &mut PixelAccessor) {
        let average = (px.r + px.g + px.b) / 3.0;
        let pat = pattern(
            self.angle,
            px.x() as f32,
            px.y() as f32,
            self.center_x,
            self.center_y,
            self.scale,
        );
        // save() clamps the overdriven value back into [0, 1]
        let value = average * 10.0 - 5.0 + pat;
        px.r = value;
        px.g = value;
        px.b = value;
    }
}

impl RasterFilter for DotScreen {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for DotScreen {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, width: u32, height: u32) -> Uniforms {
        Uniforms::new()
            .with("uCenter", [self.center_x, self.center_y])
            .with("uAngle", self.angle)
            .with("uScale", self.scale)
            .with("uTexSize", [width as f32, height as f32])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;
    use pixelfx_raster::{run_fused, PixelBuffer};

    #[test]
    fn output_is_monochrome() {
        let mut pixels = Vec::new();
        for i in 0..16u8 {
            pixels.extend_from_slice(&[i * 16, 255 - i * 16, i * 7, 255]);
        }
        let src = Source::from_rgba8(4, 4, pixels).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        run_fused(&[&DotScreen::new(0.0, 0.0, 1.1, 4.0)], &mut buf);
        for px in buf.data().chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }
}
