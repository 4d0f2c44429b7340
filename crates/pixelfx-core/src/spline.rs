//! Natural cubic spline interpolation for tone-curve filters.
//!
//! A curve is fitted through caller-supplied (input, output) control
//! points and then baked into a 256-entry lookup table per channel.

/// Natural cubic spline through a set of 2D control points.
///
/// Control points are sorted by x at construction. The boundary condition
/// is the natural one (second derivative zero at both ends); second
/// derivatives are obtained from the tridiagonal system in one forward
/// elimination / back substitution sweep.
#[derive(Debug, Clone)]
pub struct SplineInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each control point.
    y2: Vec<f64>,
}

impl SplineInterpolator {
    pub fn new(points: &[(f32, f32)]) -> Self {
        let mut pts: Vec<(f64, f64)> = points
            .iter()
            .map(|&(x, y)| (f64::from(x), f64::from(y)))
            .collect();
        pts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let n = pts.len();
        let xs: Vec<f64> = pts.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = pts.iter().map(|p| p.1).collect();
        let mut y2 = vec![0.0; n];

        if n > 2 {
            let mut u = vec![0.0; n - 1];
            for i in 1..n - 1 {
                let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
                let p = sig * y2[i - 1] + 2.0;
                y2[i] = (sig - 1.0) / p;
                let d = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
                    - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
                u[i] = (6.0 * d / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
            }
            // y2[n-1] stays 0 (natural boundary); back-substitute.
            for k in (1..n - 1).rev() {
                y2[k] = y2[k] * y2[k + 1] + u[k];
            }
        }

        Self { xs, ys, y2 }
    }

    /// Evaluates the spline at `x`.
    ///
    /// Outside the control-point range this follows the boundary cubic
    /// (no clamping); tone-curve callers quantize and clamp afterwards.
    pub fn interpolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        match n {
            0 => return 0.0,
            1 => return self.ys[0],
            _ => {}
        }

        // Bisect for the bracketing interval.
        let mut klo = 0;
        let mut khi = n - 1;
        while khi - klo > 1 {
            let k = (khi + klo) / 2;
            if self.xs[k] > x {
                khi = k;
            } else {
                klo = k;
            }
        }

        let h = self.xs[khi] - self.xs[klo];
        if h == 0.0 {
            return self.ys[klo];
        }
        let a = (self.xs[khi] - x) / h;
        let b = (x - self.xs[klo]) / h;

        a * self.ys[klo]
            + b * self.ys[khi]
            + ((a * a * a - a) * self.y2[klo] + (b * b * b - b) * self.y2[khi]) * (h * h) / 6.0
    }
}

/// Bakes control points into the 256-entry lookup table used by the
/// curves filter: `clamp(0, floor(spline(i / 255) * 256), 255)` per level.
pub fn build_lut(points: &[(f32, f32)]) -> [u8; 256] {
    let spline = SplineInterpolator::new(points);
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let v = (spline.interpolate(i as f64 / 255.0) * 256.0).floor();
        *slot = v.clamp(0.0, 255.0) as u8;
    }
    lut
}
