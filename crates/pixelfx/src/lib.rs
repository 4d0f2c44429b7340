#![deny(rustdoc::broken_intra_doc_links)]

//! Front door: one renderer type over both backends, one filter trait
//! over both capabilities.
//!
//! ```no_run
//! use pixelfx::{filters::Sepia, Renderer, Source};
//!
//! # fn main() -> Result<(), pixelfx::FxError> {
//! let source = Source::from_rgba8(2, 2, vec![128; 16])?;
//! let mut renderer = Renderer::raster();
//! renderer
//!     .set_source(source)?
//!     .apply_filter(&Sepia::new(0.8))?
//!     .render()?;
//! # Ok(())
//! # }
//! ```

pub use pixelfx_core::{FxError, Source, UniformValue, Uniforms};
pub use pixelfx_filters as filters;
pub use pixelfx_glow::{GlowFilter, GlowRenderer};
pub use pixelfx_raster::{
    IterableKernel, PixelAccessor, PixelBuffer, RasterFilter, RasterRenderer, RasterStage,
    WholeImageKernel,
};

/// A filter both backends can run.
///
/// Blanket-implemented for every type carrying both capability traits;
/// the accessors exist because trait objects cannot upcast between the
/// two supertraits.
pub trait Filter: RasterFilter + GlowFilter {
    fn as_raster(&self) -> &dyn RasterFilter;
    fn as_glow(&self) -> &dyn GlowFilter;
}

impl<T: RasterFilter + GlowFilter> Filter for T {
    fn as_raster(&self) -> &dyn RasterFilter {
        self
    }

    fn as_glow(&self) -> &dyn GlowFilter {
        self
    }
}

/// The final pixels of a frame, however the backend stores them.
#[derive(Debug)]
pub enum Surface<'a> {
    /// The software backend's working buffer, borrowed in place.
    Raster(&'a PixelBuffer),
    /// A GPU readback, owned.
    Pixels { width: u32, height: u32, data: Vec<u8> },
}

/// Backend dispatcher. Construction picks the backend; the filtering
/// contract (`set_source`, `apply_filter(s)`, `render`) is uniform, and
/// mutating calls chain.
#[derive(Debug)]
pub enum Renderer {
    Raster(RasterRenderer),
    Glow(GlowRenderer),
}

impl Renderer {
    /// Software backend.
    pub fn raster() -> Self {
        Renderer::Raster(RasterRenderer::new())
    }

    /// GPU backend over an already-current GL context.
    pub fn glow(gl: glow::Context) -> Result<Self, FxError> {
        Ok(Renderer::Glow(GlowRenderer::new(gl)?))
    }

    pub fn set_source(&mut self, source: Source) -> Result<&mut Self, FxError> {
        match self {
            Renderer::Raster(r) => {
                r.set_source(source)?;
            }
            Renderer::Glow(r) => {
                r.set_source(source)?;
            }
        }
        Ok(self)
    }

    pub fn get_source(&self) -> Option<&Source> {
        match self {
            Renderer::Raster(r) => r.get_source(),
            Renderer::Glow(r) => r.get_source(),
        }
    }

    pub fn apply_filter(&mut self, filter: &dyn Filter) -> Result<&mut Self, FxError> {
        match self {
            Renderer::Raster(r) => {
                r.apply_filter(filter.as_raster())?;
            }
            Renderer::Glow(r) => {
                r.apply_filter(filter.as_glow())?;
            }
        }
        Ok(self)
    }

    pub fn apply_filters(&mut self, filters: &[&dyn Filter]) -> Result<&mut Self, FxError> {
        match self {
            Renderer::Raster(r) => {
                let filters: Vec<&dyn RasterFilter> =
                    filters.iter().map(|f| f.as_raster()).collect();
                r.apply_filters(&filters)?;
            }
            Renderer::Glow(r) => {
                let filters: Vec<&dyn GlowFilter> = filters.iter().map(|f| f.as_glow()).collect();
                r.apply_filters(&filters)?;
            }
        }
        Ok(self)
    }

    /// Finalizes the frame on the backend's presentable surface.
    /// Idempotent on both backends; filtering may continue afterwards.
    pub fn render(&mut self) -> Result<&mut Self, FxError> {
        match self {
            Renderer::Raster(r) => r.render()?,
            Renderer::Glow(r) => r.render()?,
        }
        Ok(self)
    }

    /// The current result pixels. The software backend lends its buffer;
    /// the GPU backend reads the current target back.
    pub fn surface(&mut self) -> Result<Surface<'_>, FxError> {
        match self {
            Renderer::Raster(r) => r.surface().map(Surface::Raster).ok_or(FxError::NoSource),
            Renderer::Glow(r) => {
                let (width, height, data) = r.read_pixels()?;
                Ok(Surface::Pixels {
                    width,
                    height,
                    data,
                })
            }
        }
    }
}
