#![deny(rustdoc::broken_intra_doc_links)]

//! The filter set. Every filter carries both capabilities: a software
//! kernel (`RasterFilter`) and a GLSL fragment program (`GlowFilter`),
//! and both paths compute the same math wherever the hardware allows it.
//!
//! Parameter policy (applied at construction, uniformly): out-of-range
//! values clamp to the nearest boundary, non-finite values collapse to the
//! filter's documented default. Constructors therefore never fail.

pub mod blur;
pub mod brightness;
pub mod brightness_contrast;
pub mod contrast;
pub mod curves;
pub mod denoise;
pub mod dot_screen;
pub mod halftone;
pub mod hue;
pub mod hue_saturation;
pub mod multiply;
pub mod noise;
pub mod saturation;
pub mod sepia;
pub mod unsharp_mask;
pub mod vibrance;
pub mod vignette;

pub use blur::Blur;
pub use brightness::Brightness;
pub use brightness_contrast::BrightnessContrast;
pub use contrast::Contrast;
pub use curves::Curves;
pub use denoise::Denoise;
pub use dot_screen::DotScreen;
pub use halftone::ColorHalftone;
pub use hue::Hue;
pub use hue_saturation::HueSaturation;
pub use multiply::Multiply;
pub use noise::Noise;
pub use saturation::Saturation;
pub use sepia::Sepia;
pub use unsharp_mask::UnsharpMask;
pub use vibrance::Vibrance;
pub use vignette::Vignette;
