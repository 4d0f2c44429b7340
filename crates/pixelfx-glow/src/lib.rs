//! GPU backend (glow/OpenGL 3.3 core).
//
// This crate intentionally contains **only** the shader machine:
// - compile/link fragment programs, cached per renderer by source text
// - two off-screen ping-pong pass targets per bound source
// - fullscreen passes driven by a filter's fragment program + uniforms
//
// It does NOT create windows or GL contexts; the host hands the renderer
// an already-current `glow::Context` and owns the presentation surface
// (the default framebuffer the final flip pass draws into).
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(clippy::missing_safety_doc)]

use glow::HasContext;

pub mod renderer;
pub mod shader;
pub mod texture;

pub use pixelfx_core::{FxError, Uniforms};
pub use renderer::GlowRenderer;
pub use shader::{compile_program, ProgramCache, ProgramKey};
pub use texture::Texture;

/// GPU capability of a filter: a fragment program plus its uniforms.
///
/// The provided `draw` is the standard single pass: sample the current
/// ping-pong target, write the next one, advance parity. Multi-pass
/// filters (blur, unsharp mask, curves) override `draw` and orchestrate
/// their own sequence of passes and transient textures, but must leave the
/// renderer's parity pointing at the last-written target on return and
/// free any transient texture before returning.
pub trait GlowFilter {
    /// Custom vertex program, or `None` for [`FULLSCREEN_VERT`].
    fn vertex_source(&self) -> Option<&str> {
        None
    }

    fn fragment_source(&self) -> &str;

    /// Uniforms for the pass. The bound source's dimensions are supplied
    /// for the kernels that need texel coordinates or neighborhoods.
    fn uniforms(&self, width: u32, height: u32) -> Uniforms {
        let _ = (width, height);
        Uniforms::new()
    }

    fn draw(&self, renderer: &mut GlowRenderer) -> Result<(), FxError> {
        let (width, height) = renderer.dimensions().ok_or(FxError::NoSource)?;
        renderer.pass(
            self.vertex_source(),
            self.fragment_source(),
            &self.uniforms(width, height),
            &[],
        )
    }
}

// --- Fullscreen draw helper (oversized triangle, uv 0..2 clipped) ---
#[derive(Debug)]
pub struct FullscreenTriangle {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl FullscreenTriangle {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, FxError> {
        let verts: [f32; 12] = [
            -1.0, -1.0, 0.0, 0.0, 3.0, -1.0, 2.0, 0.0, -1.0, 3.0, 0.0, 2.0,
        ];

        let vao = gl
            .create_vertex_array()
            .map_err(|e| FxError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = gl
            .create_buffer()
            .map_err(|e| FxError::GlCreate(format!("create_buffer: {e}")))?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&verts),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 4 * 4, 0);

        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, 4 * 4, 2 * 4);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok(Self { vao, vbo })
    }

    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}

pub const FULLSCREEN_VERT: &str = r#"#version 330 core
layout (location = 0) in vec2 a_pos;
layout (location = 1) in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Pass-through program: materializes the bound source into the first
/// pass target and copies into transient textures.
pub const DEFAULT_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
void main() { FragColor = texture(uTexture, v_uv); }
"#;

/// Final present program: the pass targets and the default framebuffer
/// disagree on Y orientation, so the last draw flips v.
pub const FLIP_FRAG: &str = r#"#version 330 core
in vec2 v_uv;
out vec4 FragColor;
uniform sampler2D uTexture;
void main() { FragColor = texture(uTexture, vec2(v_uv.x, 1.0 - v_uv.y)); }
"#;
