use pixelfx_core::math::clamp_or;
use pixelfx_core::{FxError, Uniforms};
use pixelfx_glow::{GlowFilter, GlowRenderer};
use pixelfx_raster::{PixelBuffer, RasterFilter, RasterStage, WholeImageKernel};

pub(crate) const TRIANGLE_BLUR_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform vec2 uDelta;

float random(vec3 scale, float seed) {
    return fract(sin(dot(gl_FragCoord.xyz + seed, scale)) * 43758.5453 + seed);
}

void main() {
    vec4 color = vec4(0.0);
    float total = 0.0;

    // per-fragment jitter trades banding for imperceptible noise
    float offset = random(vec3(12.9898, 78.233, 151.7182), 0.0);

    for (float t = -30.0; t <= 30.0; t += 1.0) {
        float percent = (t + offset - 0.5) / 30.0;
        float weight = 1.0 - abs(percent);
        vec4 smpl = texture(uTexture, v_uv + uDelta * percent);
        smpl.rgb *= smpl.a;
        color += smpl * weight;
        total += weight;
    }

    FragColor = color / total;
    FragColor.rgb /= FragColor.a + 0.00001;
}
"#;

/// Maximum blur radius the integer divisor derivation supports.
pub(crate) const MAX_RADIUS: f32 = 254.0;

/// The multiply/shift pair that replaces division by the triangle-weight
/// total `(radius + 1)^2` in the stack blur inner loop:
/// `(x * mul) >> shg ~= x / (radius + 1)^2`.
///
/// `shg` is the largest shift keeping `mul` within the precision the
/// classical lookup tables used; deriving the pair instead of embedding
/// 255-entry tables keeps any radius up to 254 addressable.
pub fn stack_divisor(radius: u32) -> (u64, u32) {
    let weight_total = u64::from(radius + 1) * u64::from(radius + 1);
    let shg = (512.0 * weight_total as f64).log2().floor() as u32;
    let mul = (1u64 << shg).div_ceil(weight_total);
    (mul, shg)
}

/// Two-pass stack blur over an RGBA8 buffer, alpha-aware: color sums are
/// normalized by the blurred alpha so transparent neighborhoods do not
/// darken edges.
pub(crate) fn stack_blur(data: &mut [u8], width: u32, height: u32, radius: u32) {
    if radius == 0 || width == 0 || height == 0 {
        return;
    }
    let radius = radius.min(MAX_RADIUS as u32) as usize;
    let (mul, shg) = stack_divisor(radius as u32);
    let w = width as usize;
    let h = height as usize;

    // horizontal, one line per row
    for y in 0..h {
        blur_line(data, w, y * w * 4, 4, radius, mul, shg);
    }
    // vertical, one line per column
    for x in 0..w {
        blur_line(data, h, x * 4, w * 4, radius, mul, shg);
    }
}

/// Blurs a single line of `len` pixels starting at byte `start`, with
/// `stride` bytes between successive pixels.
///
/// A ring buffer of `2 * radius + 1` stack entries tracks the
/// triangle-weighted window; per step the running sum moves by
/// `in_sum - out_sum`, which is what makes the cost independent of the
/// radius.
fn blur_line(data: &mut [u8], len: usize, start: usize, stride: usize, radius: usize, mul: u64, shg: u32) {
    let div = 2 * radius + 1;
    let r1 = radius + 1;
    let sum_factor = (r1 * (r1 + 1) / 2) as u64;

    let px_at = |data: &[u8], i: usize| -> [u64; 4] {
        let o = start + i.min(len - 1) * stride;
        [
            u64::from(data[o]),
            u64::from(data[o + 1]),
            u64::from(data[o + 2]),
            u64::from(data[o + 3]),
        ]
    };

    let mut stack: Vec<[u64; 4]> = vec![[0; 4]; div];
    let mut sum = [0u64; 4];
    let mut in_sum = [0u64; 4];
    let mut out_sum = [0u64; 4];

    // seed the window: the left edge pixel fills positions -radius..=0,
    // real pixels fill 1..=radius
    let first = px_at(data, 0);
    for c in 0..4 {
        sum[c] = sum_factor * first[c];
        out_sum[c] = r1 as u64 * first[c];
    }
    for slot in stack.iter_mut().take(r1) {
        *slot = first;
    }
    for i in 1..=radius {
        let p = px_at(data, i);
        let weight = (r1 - i) as u64;
        stack[radius + i] = p;
        for c in 0..4 {
            sum[c] += p[c] * weight;
            in_sum[c] += p[c];
        }
    }

    let mut in_idx = 0usize;
    let mut out_idx = r1 % div;

    for x in 0..len {
        let o = start + x * stride;
        let pa = (sum[3] * mul) >> shg;
        if pa > 0 {
            for c in 0..3 {
                let v = ((sum[c] * mul) >> shg) * 255 / pa;
                data[o + c] = v.min(255) as u8;
            }
            data[o + 3] = pa.min(255) as u8;
        } else {
            data[o] = 0;
            data[o + 1] = 0;
            data[o + 2] = 0;
            data[o + 3] = 0;
        }

        let incoming = px_at(data, x + radius + 1);
        let outgoing = stack[in_idx];
        stack[in_idx] = incoming;
        for c in 0..4 {
            sum[c] -= out_sum[c];
            out_sum[c] -= outgoing[c];
            in_sum[c] += incoming[c];
            sum[c] += in_sum[c];
        }
        in_idx = (in_idx + 1) % div;

        let pivot = stack[out_idx];
        for c in 0..4 {
            out_sum[c] += pivot[c];
            in_sum[c] -= pivot[c];
        }
        out_idx = (out_idx + 1) % div;
    }
}

/// Gaussian-like blur. `radius` 0 to 254 pixels; 0 is a no-op.
///
/// The software path is an exact two-pass stack blur; the shader path is
/// two triangle-weighted line passes (horizontal then vertical). The two
/// backends agree visually, not bit for bit.
#[derive(Debug, Clone, Copy)]
pub struct Blur {
    radius: f32,
}

impl Blur {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: clamp_or(0.0, radius, MAX_RADIUS, 0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The two shader passes, shared with the unsharp mask.
    pub(crate) fn draw_passes(&self, renderer: &mut GlowRenderer) -> Result<(), FxError> {
        let (width, height) = renderer.dimensions().ok_or(FxError::NoSource)?;
        for delta in [
            [self.radius / width as f32, 0.0],
            [0.0, self.radius / height as f32],
        ] {
            renderer.pass(
                None,
                TRIANGLE_BLUR_FRAG,
                &Uniforms::new().with("uDelta", delta),
                &[],
            )?;
        }
        Ok(())
    }
}

impl WholeImageKernel for Blur {
    fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError> {
        let radius = self.radius.round() as u32;
        let (w, h) = (buffer.width(), buffer.height());
        stack_blur(buffer.data_mut(), w, h, radius);
        Ok(())
    }
}

impl RasterFilter for Blur {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Whole(self)
    }
}

impl GlowFilter for Blur {
    fn fragment_source(&self) -> &str {
        TRIANGLE_BLUR_FRAG
    }

    fn draw(&self, renderer: &mut GlowRenderer) -> Result<(), FxError> {
        self.draw_passes(renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelfx_core::Source;

    #[test]
    fn divisors_match_the_classical_tables() {
        // first entries of the canonical mul/shr lookup tables
        assert_eq!(stack_divisor(0), (512, 9));
        assert_eq!(stack_divisor(1), (512, 11));
        assert_eq!(stack_divisor(2), (456, 12));
        assert_eq!(stack_divisor(3), (512, 13));
        assert_eq!(stack_divisor(4), (328, 13));
        assert_eq!(stack_divisor(6), (335, 14));
        assert_eq!(stack_divisor(8), (405, 15));
        assert_eq!(stack_divisor(10), (271, 15));
    }

    #[test]
    fn radius_clamps_into_supported_range() {
        assert_eq!(Blur::new(-5.0).radius(), 0.0);
        assert_eq!(Blur::new(1000.0).radius(), MAX_RADIUS);
        assert_eq!(Blur::new(f32::NAN).radius(), 0.0);
    }

    #[test]
    fn zero_radius_leaves_pixels_untouched() {
        let src = Source::from_rgba8(3, 3, (0..36).collect()).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&Blur::new(0.0), &mut buf).unwrap();
        assert_eq!(buf.data(), src.pixels());
    }

    #[test]
    fn uniform_opaque_image_is_a_fixed_point() {
        let pixels: Vec<u8> = std::iter::repeat([128, 128, 128, 255])
            .take(8 * 8)
            .flatten()
            .collect();
        let src = Source::from_rgba8(8, 8, pixels).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&Blur::new(3.0), &mut buf).unwrap();
        assert_eq!(buf.data(), src.pixels());
    }

    #[test]
    fn an_impulse_spreads_and_keeps_the_peak_centered() {
        let mut pixels = vec![0u8; 9 * 9 * 4];
        // opaque white dot in the middle of a transparent black field
        let center = (4 * 9 + 4) * 4;
        pixels[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
        let src = Source::from_rgba8(9, 9, pixels).unwrap();
        let mut buf = PixelBuffer::from_source(&src);
        WholeImageKernel::draw(&Blur::new(2.0), &mut buf).unwrap();

        let alpha_at = |x: usize, y: usize| buf.data()[(y * 9 + x) * 4 + 3];
        assert!(alpha_at(4, 4) > 0);
        assert!(alpha_at(4, 4) < 255);
        // energy spread to neighbors
        assert!(alpha_at(3, 4) > 0);
        assert!(alpha_at(4, 3) > 0);
        // monotone falloff from the peak
        assert!(alpha_at(4, 4) >= alpha_at(3, 4));
        assert!(alpha_at(3, 4) >= alpha_at(2, 4));
    }
}
