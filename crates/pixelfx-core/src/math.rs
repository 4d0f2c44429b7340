//! Small shared math helpers with GLSL-matching semantics.

/// Clamps `value` to `[low, high]`, collapsing non-finite input to
/// `default`.
///
/// This is the engine-wide parameter policy: out-of-range filter
/// parameters are silently clamped to the nearest boundary, and malformed
/// (NaN/infinite) input becomes the filter's documented default instead of
/// propagating a fault.
pub fn clamp_or(low: f32, value: f32, high: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(low, high)
    } else {
        default
    }
}

/// GLSL `mix(x, y, a) = x * (1 - a) + y * a`.
#[inline]
pub fn mix(x: f32, y: f32, a: f32) -> f32 {
    x * (1.0 - a) + y * a
}

/// GLSL `smoothstep`: clamp `(value - edge0) / (edge1 - edge0)` to [0,1],
/// then apply the Hermite polynomial `t * t * (3 - 2t)`.
pub fn smoothstep(edge0: f32, edge1: f32, value: f32) -> f32 {
    let t = ((value - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `fract(x) = x - floor(x)`, in f64 so CPU kernels that must be
/// deterministic (the noise hash) match across platforms.
#[inline]
pub fn fract(x: f64) -> f64 {
    x - x.floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clamp_or_clamps_to_boundaries() {
        assert_eq!(clamp_or(-1.0, -3.5, 1.0, 0.0), -1.0);
        assert_eq!(clamp_or(-1.0, 2.0, 1.0, 0.0), 1.0);
        assert_eq!(clamp_or(-1.0, 0.25, 1.0, 0.0), 0.25);
    }

    #[test]
    fn clamp_or_collapses_non_finite_to_default() {
        assert_eq!(clamp_or(-1.0, f32::NAN, 1.0, 0.0), 0.0);
        assert_eq!(clamp_or(-1.0, f32::INFINITY, 1.0, 0.5), 0.5);
        assert_eq!(clamp_or(-1.0, f32::NEG_INFINITY, 1.0, 0.5), 0.5);
    }

    #[test]
    fn smoothstep_matches_glsl_shape() {
        assert_relative_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        // Decreasing edges invert the window, like GLSL with swapped edges.
        assert_relative_eq!(smoothstep(1.0, 0.0, 1.5), 0.0);
        assert_relative_eq!(smoothstep(1.0, 0.0, -0.5), 1.0);
    }

    #[test]
    fn fract_is_floor_based_for_negatives() {
        assert_relative_eq!(fract(1.25), 0.25);
        assert_relative_eq!(fract(-0.25), 0.75);
    }
}
