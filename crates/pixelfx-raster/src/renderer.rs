use tracing::debug;

use pixelfx_core::plan::{plan_passes, Pass, StageKind};
use pixelfx_core::{FxError, Source};

use crate::accessor::PixelAccessor;
use crate::buffer::PixelBuffer;
use crate::{IterableKernel, RasterFilter, RasterStage};

/// Runs a batch of iterable kernels over the buffer in exactly one sweep.
///
/// One accessor is constructed and one save performed per pixel regardless
/// of how many kernels are in the batch; kernels run in list order and
/// share the mutated per-pixel state, which is what makes stacked effects
/// cheap and order-sensitive.
pub fn run_fused(kernels: &[&dyn IterableKernel], buffer: &mut PixelBuffer) {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let mut px = PixelAccessor::load(buffer, x, y);
            for kernel in kernels {
                kernel.apply(&mut px);
            }
            px.save(buffer);
        }
    }
}

/// Software renderer: owns the working pixel buffer between sources.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    source: Option<Source>,
    buffer: Option<PixelBuffer>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a source, dropping the previous working buffer first and
    /// copying the source pixels into a fresh one.
    pub fn set_source(&mut self, source: Source) -> Result<&mut Self, FxError> {
        self.buffer = None;
        debug!(
            width = source.width(),
            height = source.height(),
            "raster: bind source"
        );
        self.buffer = Some(PixelBuffer::from_source(&source));
        self.source = Some(source);
        Ok(self)
    }

    pub fn get_source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn apply_filter(&mut self, filter: &dyn RasterFilter) -> Result<&mut Self, FxError> {
        let buffer = self.buffer.as_mut().ok_or(FxError::NoSource)?;
        match filter.stage() {
            RasterStage::Iterable(kernel) => run_fused(&[kernel], buffer),
            RasterStage::Whole(kernel) => kernel.draw(buffer)?,
        }
        Ok(self)
    }

    /// Applies an ordered filter list with the fusion policy: maximal runs
    /// of consecutive iterable filters become one pixel sweep, every
    /// whole-image filter is its own pass, and input order is preserved.
    pub fn apply_filters(&mut self, filters: &[&dyn RasterFilter]) -> Result<&mut Self, FxError> {
        let buffer = self.buffer.as_mut().ok_or(FxError::NoSource)?;

        let kinds: Vec<StageKind> = filters
            .iter()
            .map(|f| match f.stage() {
                RasterStage::Iterable(_) => StageKind::Fusable,
                RasterStage::Whole(_) => StageKind::Standalone,
            })
            .collect();

        for pass in plan_passes(&kinds) {
            match pass {
                Pass::Fused(range) => {
                    debug!(filters = range.len(), "raster: fused pass");
                    let kernels: Vec<&dyn IterableKernel> = filters[range]
                        .iter()
                        .filter_map(|f| match f.stage() {
                            RasterStage::Iterable(kernel) => Some(kernel),
                            RasterStage::Whole(_) => None,
                        })
                        .collect();
                    run_fused(&kernels, buffer);
                }
                Pass::Standalone(i) => {
                    debug!(index = i, "raster: standalone pass");
                    if let RasterStage::Whole(kernel) = filters[i].stage() {
                        kernel.draw(buffer)?;
                    }
                }
            }
        }

        Ok(self)
    }

    /// Finalizes the frame. The software backend's surface is the working
    /// buffer itself, so this only asserts a source is bound; it is
    /// idempotent and repeatable.
    pub fn render(&mut self) -> Result<(), FxError> {
        if self.buffer.is_none() {
            return Err(FxError::NoSource);
        }
        Ok(())
    }

    /// Copies the final pixels into a caller-owned surface of matching
    /// size.
    pub fn render_into(&self, dest: &mut [u8]) -> Result<(), FxError> {
        let buffer = self.buffer.as_ref().ok_or(FxError::NoSource)?;
        if dest.len() != buffer.data().len() {
            return Err(FxError::other(format!(
                "destination surface is {} bytes, buffer is {}",
                dest.len(),
                buffer.data().len()
            )));
        }
        dest.copy_from_slice(buffer.data());
        Ok(())
    }

    /// The presentable surface: the current working buffer.
    pub fn surface(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddHalf;
    impl IterableKernel for AddHalf {
        fn apply(&self, px: &mut PixelAccessor) {
            px.r += 0.5;
        }
    }
    impl RasterFilter for AddHalf {
        fn stage(&self) -> RasterStage<'_> {
            RasterStage::Iterable(self)
        }
    }

    struct Invert;
    impl crate::WholeImageKernel for Invert {
        fn draw(&self, buffer: &mut PixelBuffer) -> Result<(), FxError> {
            for b in buffer.data_mut().iter_mut() {
                *b = 255 - *b;
            }
            Ok(())
        }
    }
    impl RasterFilter for Invert {
        fn stage(&self) -> RasterStage<'_> {
            RasterStage::Whole(self)
        }
    }

    fn gray_2x2() -> Source {
        Source::from_rgba8(2, 2, vec![128u8; 16]).unwrap()
    }

    #[test]
    fn apply_before_set_source_is_an_error() {
        let mut r = RasterRenderer::new();
        assert!(matches!(
            r.apply_filter(&AddHalf).map(|_| ()),
            Err(FxError::NoSource)
        ));
        assert!(matches!(r.render(), Err(FxError::NoSource)));
    }

    #[test]
    fn set_source_rebinds_a_fresh_copy() {
        let mut r = RasterRenderer::new();
        r.set_source(gray_2x2()).unwrap();
        r.apply_filter(&AddHalf).unwrap();
        assert_eq!(r.surface().unwrap().data()[0], 255);

        // Re-binding discards the filtered buffer.
        r.set_source(gray_2x2()).unwrap();
        assert_eq!(r.surface().unwrap().data()[0], 128);
    }

    #[test]
    fn fused_kernels_see_prior_output() {
        struct Double;
        impl IterableKernel for Double {
            fn apply(&self, px: &mut PixelAccessor) {
                px.r *= 2.0;
            }
        }
        impl RasterFilter for Double {
            fn stage(&self) -> RasterStage<'_> {
                RasterStage::Iterable(self)
            }
        }

        let mut r = RasterRenderer::new();
        r.set_source(Source::from_rgba8(1, 1, vec![51, 0, 0, 255]).unwrap())
            .unwrap();
        // 0.2 + 0.5 = 0.7, then * 2 clamps at save: 1.0 -> 255.
        r.apply_filters(&[&AddHalf, &Double]).unwrap();
        assert_eq!(r.surface().unwrap().data()[0], 255);
    }

    #[test]
    fn mixed_list_preserves_order_around_pass_boundaries() {
        let mut r = RasterRenderer::new();
        r.set_source(Source::from_rgba8(1, 1, vec![0, 0, 0, 255]).unwrap())
            .unwrap();
        // AddHalf (0 -> 128 after save-clamp), Invert (128 -> 127),
        // AddHalf (127/255 + 0.5 -> 255).
        r.apply_filters(&[&AddHalf, &Invert, &AddHalf]).unwrap();
        assert_eq!(r.surface().unwrap().data()[0], 255);
    }

    #[test]
    fn render_into_requires_matching_size() {
        let mut r = RasterRenderer::new();
        r.set_source(gray_2x2()).unwrap();
        let mut out = vec![0u8; 16];
        r.render_into(&mut out).unwrap();
        assert_eq!(out, vec![128u8; 16]);
        let mut small = vec![0u8; 4];
        assert!(r.render_into(&mut small).is_err());
    }
}
