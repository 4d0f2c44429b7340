use pixelfx_core::math::clamp_or;
use pixelfx_core::Uniforms;
use pixelfx_glow::GlowFilter;
use pixelfx_raster::{IterableKernel, PixelAccessor, RasterFilter, RasterStage};

const FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
uniform vec2 uCenter;
uniform float uAngle;
uniform float uScale;
uniform vec2 uTexSize;

float pattern(float angle) {
    float s = sin(angle), c = cos(angle);
    vec2 tex = v_uv * uTexSize - uCenter;
    vec2 point = vec2(
        c * tex.x - s * tex.y,
        s * tex.x + c * tex.y
    ) * uScale;
    return (sin(point.x) * sin(point.y)) * 4.0;
}

void main() {
    vec4 color = texture(uTexture, v_uv);
    vec3 cmy = 1.0 - color.rgb;
    float k = min(cmy.x, min(cmy.y, cmy.z));
    cmy = (cmy - k) / (1.0 - k);
    cmy = clamp(cmy * 10.0 - 3.0 + vec3(pattern(uAngle + 0.26179), pattern(uAngle + 1.30899), pattern(uAngle)), 0.0, 1.0);
    k = clamp(k * 10.0 - 5.0 + pattern(uAngle + 0.78539), 0.0, 1.0);
    FragColor = vec4(1.0 - cmy - k, color.a);
}
"#;

/// The rotated 2D sine grid both halftone filters threshold against.
pub(crate) fn pattern(angle: f32, x: f32, y: f32, cx: f32, cy: f32, scale: f32) -> f32 {
    let (s, c) = angle.sin_cos();
    let tx = x - cx;
    let ty = y - cy;
    ((c * tx - s * ty) * scale).sin() * ((s * tx + c * ty) * scale).sin() * 4.0
}

pub(crate) fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// CMYK halftone: each ink channel is screened against its own rotated
/// sine grid (cyan/magenta/yellow phase offsets plus a black screen).
/// `center` is the pattern origin in pixel coordinates, `angle` in
/// radians, `size` the dot diameter in pixels.
#[derive(Debug, Clone, Copy)]
pub struct ColorHalftone {
    center_x: f32,
    center_y: f32,
    angle: f32,
    scale: f32,
}

impl ColorHalftone {
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

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl IterableKernel for ColorHalftone {
    fn apply(&self, px: &mut PixelAccessor) {
        let x = px.x() as f32;
        let y = px.y() as f32;
        let pat =
            |angle: f32| pattern(angle, x, y, self.center_x, self.center_y, self.scale);

        let mut c = 1.0 - px.r;
        let mut m = 1.0 - px.g;
        let mut ye = 1.0 - px.b;
        let mut k = c.min(m).min(ye);

        // Pure black divides 0/0 here; the hardware path hits the same
        // singularity and both quantize the NaN to 0.
        c = (c - k) / (1.0 - k);
        m = (m - k) / (1.0 - k);
        ye = (ye - k) / (1.0 - k);

        c = (c * 10.0 - 3.0 + pat(self.angle + 0.26179)).clamp(0.0, 1.0);
        m = (m * 10.0 - 3.0 + pat(self.angle + 1.30899)).clamp(0.0, 1.0);
        ye = (ye * 10.0 - 3.0 + pat(self.angle)).clamp(0.0, 1.0);
        k = (k * 10.0 - 5.0 + pat(self.angle + 0.78539)).clamp(0.0, 1.0);

        px.r = 1.0 - c - k;
        px.g = 1.0 - m - k;
        px.b = 1.0 - ye - k;
    }
}

impl RasterFilter for ColorHalftone {
    fn stage(&self) -> RasterStage<'_> {
        RasterStage::Iterable(self)
    }
}

impl GlowFilter for ColorHalftone {
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
