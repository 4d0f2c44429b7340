use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

use crate::contrast::{apply_contrast, MAX_CONTRAST};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform float uBrightness;
uniform float uContrast;
void main() {
    vec4 color = texture(uTexture, v_uv);
    color.rgb += uBrightness;
    if (uContrast > 0.0) {
        color.rgb = (color.rgb - 0.5) / (1.0 - uContrast) + 0.5;
    } else {
        color.rgb = (color.rgb - 0.5) * (1.0 + uContrast) + 0.5;
    }
    FragColor = color;
}
"#;

/// Brightness then contrast in one kernel, both in normalized [0, 1]
/// space so the software and shader paths agree channel for channel.
#[derive(Debug, Clone, Copy)]
pub struct BrightnessContrast {
    brightness: f32,
    contrast: f32,
}

impl BrightnessContrast {
    pub fn new(brightness: f32, contrast: f32) -> Self {
        Self {
            brightness: clamp_or(-1.0, brightness, 1.0, 0.0),
            contrast: clamp_or(-1.0, contrast, MAX_CONTRAST, 0.0),
        }
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn contrast(&self) -> f32 {
        self.contrast
    }
}

impl IterableKernel for BrightnessContrast {
    fn apply(&self, px: &mut PixelAccessor) {
        px.r += self.brightness;
        px.g += self.brightness;
        px.b += self.brightness;
        apply_contrast(px, self.contrast);
    }
}

impl RasterFilter for BrightnessContrast {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for BrightnessContrast {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn uniforms(&self, _width: u32, _height: u32) -> Uniforms {
        Uniforms::new()
            .with("uBrightness", self.brightness)
            .with("uContrast", self.contrast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;
    use pixelfx_raster::{PixelBuffer, RasterRenderer};

    #[test]
    fn brightens_then_stretches_mid_gray() {
        let src = Source::from_rgba8(2, 2, vec![128u8; 16]).unwrap();
        let mut r = RasterRenderer::new();
        r.set_source(src).unwrap();
        r.apply_filter(&BrightnessContrast::new(0.2, 0.0)).unwrap();
        // 128/255 + 0.2 = 0.7019.. -> 179
        assert_eq!(r.surface().unwrap().data()[0], 179);
    }

    #[test]
    fn matches_chained_brightness_and_contrast() {
        let src = Source::from_rgba8(1, 1, vec![60, 120, 200, 255]).unwrap();
        let combined = {
            let mut buf = PixelBuffer::from_source(&src);
            let mut px = pixelfx_raster::PixelAccessor::load(&buf, 0, 0);
            BrightnessContrast::new(0.1, 0.3).apply(&mut px);
            px.save(&mut buf);
            buf.data().to_vec()
        };
        let chained = {
            let mut buf = PixelBuffer::from_source(&src);
            let mut px = pixelfx_raster::PixelAccessor::load(&buf, 0, 0);
            crate::Brightness::new(0.1).apply(&mut px);
            crate::Contrast::new(0.3).apply(&mut px);
            px.save(&mut buf);
            buf.data().to_vec()
        };
        assert_eq!(combined, chained);
    }
}
