#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

//! Backend-agnostic contracts for the pixelfx filter engine.
//!
//! Contract rule: anything both backends (or their tests) must agree on
//! lives here: the source handle, the error type, the parameter clamping
//! policy, the spline interpolator behind tone curves, the pass-planning
//! rules for filter fusion, and the uniform value model.

pub mod error;
pub mod math;
pub mod plan;
pub mod source;
pub mod spline;
pub mod uniform;

pub use error::FxError;
pub use plan::{plan_passes, Pass, PassParity, StageKind};
pub use source::Source;
pub use spline::{build_lut, SplineInterpolator};
pub use uniform::{UniformValue, Uniforms};
