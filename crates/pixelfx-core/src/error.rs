use std::fmt;

/// Engine-level errors used across pixelfx crates.
///
/// Contract rule: this type lives in `pixelfx-core` and is re-exported by
/// both backends. Every operation is all-or-nothing per call; there are no
/// partial-failure or retry semantics.
#[derive(Debug)]
pub enum FxError {
    // ---- Source binding ----
    /// The supplied image does not describe a valid RGBA8 raster.
    InvalidSource {
        width: u32,
        height: u32,
        len: usize,
    },

    /// An operation that needs a bound source ran before `set_source`.
    NoSource,

    // ---- GPU backend (fatal for the renderer instance) ----
    VertexCompile(String),
    FragmentCompile(String),
    Link(String),
    GlCreate(String),
    IncompleteFramebuffer(String),

    // ---- Configuration ----
    /// A uniform array whose length maps to no GLSL shape (not 1/2/3/4/9/16).
    UnknownUniformShape { name: String, len: usize },

    // ---- Fallback ----
    Other(String),
}

impl FxError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        FxError::Other(s.into())
    }
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxError::InvalidSource { width, height, len } => write!(
                f,
                "invalid source: {width}x{height} RGBA8 needs {} bytes, got {len}",
                (*width as usize) * (*height as usize) * 4
            ),
            FxError::NoSource => write!(f, "no source bound (call set_source first)"),

            FxError::VertexCompile(msg) => write!(f, "vertex shader compile error: {msg}"),
            FxError::FragmentCompile(msg) => write!(f, "fragment shader compile error: {msg}"),
            FxError::Link(msg) => write!(f, "program link error: {msg}"),
            FxError::GlCreate(msg) => write!(f, "backend object creation failed: {msg}"),
            FxError::IncompleteFramebuffer(msg) => write!(f, "incomplete framebuffer: {msg}"),

            FxError::UnknownUniformShape { name, len } => {
                write!(f, "don't know how to load uniform \"{name}\" of length {len}")
            }

            FxError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FxError {}
