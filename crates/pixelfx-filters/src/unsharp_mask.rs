use pixelfx_core::math::clamp_or;
use pixelfx_core::{FxError, Uniforms};
use pixelfx_glow::{GlowFilter, GlowRenderer};
use pixelfx_raster::{PixelBuffer, RasterFilter, RasterStage, WholeImageKernel};

use crate::blur::{Blur, MAX_RADIUS};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform sampler2D uOriginal;
uniform float uStrength;
void main() {
    vec4 blurred = texture(uTexture, v_uv);
    vec4 original = texture(uOriginal, v_uv);
    FragColor = mix(blurred, original, 1.0 + uStrength);
}
"#;

/// Sharpening by scaling pixels away from their blurred neighborhood
/// average. `radius` is the blur radius in pixels; `strength` 0 is no
/// effect and larger values amplify edges harder.
#[derive(Debug, Clone, Copy)]
pub struct UnsharpMask {
    radius: f32,
    strength: f32,
}

impl UnsharpMask {
    pub fn new(radius: f32, strength: f32) -> Self {
        Self {
            radius: clamp_or(0.0, radius, MAX_RADIUS, 0.0),
            strength: clamp_or(0.0, strength, 10.0, 0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }
}

impl WholeImageKernel for UnsharpMask {
    fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError> {
        let original = buffer.data().to_vec();

        WholeImageKernel::draw(&Blur::new(self.radius), buffer)?;

        // mix(blurred, original, 1 + strength), extrapolating past the
        // original to push edges apart; alpha stays the blurred value
        let s = self.strength + 1.0;
        for (px, orig) in buffer
            .data_mut()
            .chunks_exact_mut(4)
            .zip(original.chunks_exact(4))
        {
            for c in 0..3 {
                let blurred = f32::from(px[c]);
                let v = blurred * (1.0 - s) + f32::from(orig[c]) * s;
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        Ok(())
    }
}

impl RasterFilter for UnsharpMask {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Whole(self)
    }
}

impl GlowFilter for UnsharpMask {
    fn fragment_source(&self) -> &str {
        FRAG
    }

    fn draw(&self, renderer: &mut GlowRenderer) -> Result<(), FxError> {
        let (width, height) = renderer.dimensions().ok_or(FxError::NoSource)?;

        // snapshot the unblurred image before the blur passes overwrite it
        let snapshot = renderer.create_texture(width, height, None)?;
        let result = (|| {
            renderer.copy_current_into(&snapshot)?;
            Blur::new(self.radius).draw_passes(renderer)?;
            renderer.pass(
                None,
                FRAG,
                &Uniforms::new().with("uStrength", self.strength),
                &[("uOriginal", &snapshot)],
            )
        })();
        renderer.destroy_texture(snapshot);
        result
    }
}
