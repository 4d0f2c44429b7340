//! Uniform value model for the shader backend.
//!
//! Filters describe their parameters as an ordered name/value list; the
//! GL backend resolves names against the compiled program and dispatches
//! by value shape. Uniform names that a program does not use are skipped
//! silently (common when a filter shares a fragment template); a float
//! array whose length maps to no GLSL shape is a configuration error.

use crate::FxError;

/// A single uniform value.
///
/// Array lengths 1–4 map to `float`/`vec2`/`vec3`/`vec4`; 9 and 16 map to
/// `mat3`/`mat4` (column-major). Anything else fails with
/// [`FxError::UnknownUniformShape`] at the point of use.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Floats(Vec<f32>),
}

impl UniformValue {
    /// Validates that the value maps to a GLSL shape.
    pub fn check_shape(&self, name: &str) -> Result<(), FxError> {
        match self {
            UniformValue::Float(_) => Ok(()),
            UniformValue::Floats(vs) => match vs.len() {
                1 | 2 | 3 | 4 | 9 | 16 => Ok(()),
                len => Err(FxError::UnknownUniformShape {
                    name: name.to_string(),
                    len,
                }),
            },
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Floats(v.to_vec())
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::Floats(v)
    }
}

/// Ordered uniform bag a filter hands to the GL backend for one pass.
#[derive(Debug, Clone, Default)]
pub struct Uniforms {
    items: Vec<(&'static str, UniformValue)>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<UniformValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<UniformValue>) {
        self.items.push((name, value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &UniformValue)> {
        self.items.iter().map(|(n, v)| (*n, v))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
