#![deny(rustdoc::broken_intra_doc_links)]

//! Software backend: filters as per-pixel kernels over an owned RGBA8
//! buffer.
//!
//! This crate intentionally contains **only** the pixel machine:
//! - the working pixel buffer and the normalized per-pixel accessor
//! - the capability traits a filter implements for the CPU path
//! - the fusion executor that runs a batch of iterable filters in one
//!   image sweep
//! - the renderer that owns the buffer between `set_source` calls
//!
//! It does NOT decode images, own a window, or know about GL.

pub mod accessor;
pub mod buffer;
pub mod renderer;

pub use accessor::PixelAccessor;
pub use buffer::PixelBuffer;
pub use pixelfx_core::FxError;
pub use renderer::{run_fused, RasterRenderer};

/// CPU capability probe: how this filter executes on the software path.
///
/// The dispatcher checks the returned stage instead of relying on a
/// "must be implemented" failure at call time; a filter that is strictly
/// one-pixel-in/one-pixel-out reports [`RasterStage::Iterable`] and
/// becomes eligible for fusion.
pub trait RasterFilter {
    fn stage(&self) -> RasterStage<'_>;
}

#[derive(Clone, Copy)]
pub enum RasterStage<'a> {
    /// Pure function of a single pixel (plus parameters and, for a few
    /// kernels, that pixel's coordinates). Fusable.
    Iterable(&'a dyn IterableKernel),
    /// Needs whole-image context (spatial neighbors, a saved copy, or
    /// multiple sweeps). Always its own pass.
    Whole(&'a dyn WholeImageKernel),
}

impl std::fmt::Debug for RasterStage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterStage::Iterable(_) => f.write_str("RasterStage::Iterable"),
            RasterStage::Whole(_) => f.write_str("RasterStage::Whole"),
        }
    }
}

/// Per-pixel kernel. Mutates the accessor's normalized channels in place;
/// a later kernel in a fused run sees this kernel's output, not the
/// original pixel.
pub trait IterableKernel {
    fn apply(&self, px: &mut PixelAccessor);
}

/// Whole-buffer kernel (blur, unsharp mask, curves, denoise).
pub trait WholeImageKernel {
    fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError>;
}
