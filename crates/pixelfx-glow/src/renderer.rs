use std::fmt;

use glow::HasContext;
use tracing::debug;

use pixelfx_core::plan::PassParity;
use pixelfx_core::{FxError, Source, Uniforms};

use crate::shader::{set_uniforms, ProgramCache};
use crate::texture::Texture;
use crate::{FullscreenTriangle, GlowFilter, DEFAULT_FRAG, FLIP_FRAG, FULLSCREEN_VERT};

/// GPU renderer: one offscreen framebuffer, two ping-pong pass targets and
/// a per-instance program cache over a caller-supplied GL context.
///
/// Every filter pass samples the current target and writes the other one;
/// the parity counter tracks which of the two holds the latest result.
/// [`GlowRenderer::render`] presents the current target to the default
/// framebuffer (Y-flipped) without touching parity, so it can be called
/// repeatedly.
pub struct GlowRenderer {
    gl: glow::Context,
    fbo: glow::NativeFramebuffer,
    tri: FullscreenTriangle,
    programs: ProgramCache,
    source: Option<Source>,
    source_tex: Option<Texture>,
    targets: Option<[Texture; 2]>,
    parity: PassParity,
}

// glow::Context has no Debug impl.
impl fmt::Debug for GlowRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowRenderer")
            .field("programs", &self.programs.len())
            .field("source", &self.source)
            .field("targets", &self.targets.is_some())
            .field("parity", &self.parity)
            .finish_non_exhaustive()
    }
}

impl GlowRenderer {
    /// Wraps an already-current GL context. The two programs every frame
    /// needs (pass-through copy and final flip) are compiled up front so
    /// their failure surfaces here rather than mid-frame.
    pub fn new(gl: glow::Context) -> Result<Self, FxError> {
        unsafe {
            let tri = FullscreenTriangle::new(&gl)?;
            let fbo = gl
                .create_framebuffer()
                .map_err(|e| FxError::GlCreate(format!("create_framebuffer: {e}")))?;

            let mut programs = ProgramCache::new();
            programs.get_or_compile(&gl, FULLSCREEN_VERT, DEFAULT_FRAG)?;
            programs.get_or_compile(&gl, FULLSCREEN_VERT, FLIP_FRAG)?;

            Ok(Self {
                gl,
                fbo,
                tri,
                programs,
                source: None,
                source_tex: None,
                targets: None,
                parity: PassParity::default(),
            })
        }
    }

    /// Binds a source: releases the previous source texture and targets,
    /// uploads the new pixels, allocates a fresh target pair and
    /// materializes the source into the first target. Parity restarts at
    /// zero; the materializing copy is not a filter pass.
    pub fn set_source(&mut self, source: Source) -> Result<&mut Self, FxError> {
        unsafe {
            self.release_source();

            let w = source.width() as i32;
            let h = source.height() as i32;
            debug!(width = w, height = h, "glow: bind source");

            // a failed bind leaves the renderer unbound and leaks no GL
            // objects: later allocation failures free the earlier ones
            let source_tex = Texture::with_pixels(&self.gl, w, h, source.pixels())?;
            let first = match Texture::empty(&self.gl, w, h) {
                Ok(t) => t,
                Err(e) => {
                    source_tex.destroy(&self.gl);
                    return Err(e);
                }
            };
            let second = match Texture::empty(&self.gl, w, h) {
                Ok(t) => t,
                Err(e) => {
                    first.destroy(&self.gl);
                    source_tex.destroy(&self.gl);
                    return Err(e);
                }
            };

            self.source_tex = Some(source_tex);
            self.targets = Some([first, second]);
            self.source = Some(source);
            self.parity.reset();

            if let Err(e) = self.materialize_source() {
                self.release_source();
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Copies the bound source texture into the first pass target; this is
    /// the bind-time materializing copy, not a filter pass.
    unsafe fn materialize_source(&mut self) -> Result<(), FxError> {
        let program = self
            .programs
            .get_or_compile(&self.gl, FULLSCREEN_VERT, DEFAULT_FRAG)?;
        let src = self.source_tex.as_ref().ok_or(FxError::NoSource)?;
        src.bind(&self.gl, 0);
        let target = &self.targets.as_ref().ok_or(FxError::NoSource)?[0];
        let result = self.draw_into(target, program, &Uniforms::new(), &[]);
        Texture::unbind(&self.gl, 0);
        result
    }

    pub fn get_source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|s| (s.width(), s.height()))
    }

    /// Index of the target holding the latest result.
    pub fn current_index(&self) -> usize {
        self.parity.current()
    }

    pub fn passes(&self) -> u64 {
        self.parity.passes()
    }

    /// Resident textures: the source plus both pass targets once bound.
    pub fn texture_count(&self) -> usize {
        let src = usize::from(self.source_tex.is_some());
        let targets = if self.targets.is_some() { 2 } else { 0 };
        src + targets
    }

    pub fn apply_filter(&mut self, filter: &dyn GlowFilter) -> Result<&mut Self, FxError> {
        filter.draw(self)?;
        Ok(self)
    }

    /// Applies filters strictly in order. The GPU backend has no fusion:
    /// every filter is at least one fullscreen pass.
    pub fn apply_filters(&mut self, filters: &[&dyn GlowFilter]) -> Result<&mut Self, FxError> {
        for filter in filters {
            filter.draw(self)?;
        }
        Ok(self)
    }

    /// One standard filter pass: compile (or fetch) the program, sample the
    /// current target at unit 0 plus any extra textures at units 1.., draw
    /// into the other target and advance parity.
    pub fn pass(
        &mut self,
        vertex: Option<&str>,
        fragment: &str,
        uniforms: &Uniforms,
        extra: &[(&'static str, &Texture)],
    ) -> Result<(), FxError> {
        if self.targets.is_none() {
            return Err(FxError::NoSource);
        }
        unsafe {
            let program = self.programs.get_or_compile(
                &self.gl,
                vertex.unwrap_or(FULLSCREEN_VERT),
                fragment,
            )?;

            let targets = self.targets.as_ref().ok_or(FxError::NoSource)?;
            let current = &targets[self.parity.current()];
            let next = &targets[self.parity.next()];

            current.bind(&self.gl, 0);
            for (i, (_, tex)) in extra.iter().enumerate() {
                tex.bind(&self.gl, i as u32 + 1);
            }

            self.draw_into(next, program, uniforms, extra)?;

            for i in 0..extra.len() {
                Texture::unbind(&self.gl, i as u32 + 1);
            }
            Texture::unbind(&self.gl, 0);
        }
        self.parity.advance();
        Ok(())
    }

    /// Copies the current target into `dest` with the pass-through program.
    /// Parity is untouched: this is a snapshot, not a pass.
    pub fn copy_current_into(&mut self, dest: &Texture) -> Result<(), FxError> {
        unsafe {
            let program = self
                .programs
                .get_or_compile(&self.gl, FULLSCREEN_VERT, DEFAULT_FRAG)?;
            let targets = self.targets.as_ref().ok_or(FxError::NoSource)?;
            let current = &targets[self.parity.current()];
            current.bind(&self.gl, 0);
            self.draw_into(dest, program, &Uniforms::new(), &[])?;
            Texture::unbind(&self.gl, 0);
        }
        Ok(())
    }

    /// Presents the current target to the default framebuffer, flipping Y.
    /// Idempotent: parity and the pass targets are untouched, so filtering
    /// may continue after a present.
    pub fn render(&mut self) -> Result<(), FxError> {
        let (w, h) = self.dimensions().ok_or(FxError::NoSource)?;
        unsafe {
            let program = self
                .programs
                .get_or_compile(&self.gl, FULLSCREEN_VERT, FLIP_FRAG)?;
            let targets = self.targets.as_ref().ok_or(FxError::NoSource)?;
            let current = &targets[self.parity.current()];

            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            self.gl.viewport(0, 0, w as i32, h as i32);
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.use_program(Some(program));

            current.bind(&self.gl, 0);
            if let Some(loc) = self.gl.get_uniform_location(program, "uTexture") {
                self.gl.uniform_1_i32(Some(&loc), 0);
            }
            self.tri.draw(&self.gl);
            Texture::unbind(&self.gl, 0);
        }
        Ok(())
    }

    /// Reads back the current target as row-major RGBA8 (same orientation
    /// as the bound source).
    pub fn read_pixels(&mut self) -> Result<(u32, u32, Vec<u8>), FxError> {
        let (w, h) = self.dimensions().ok_or(FxError::NoSource)?;
        let mut pixels = vec![0u8; (w * h * 4) as usize];
        unsafe {
            let targets = self.targets.as_ref().ok_or(FxError::NoSource)?;
            let current = &targets[self.parity.current()];

            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(current.id()),
                0,
            );
            let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                return Err(FxError::IncompleteFramebuffer(format!(
                    "status 0x{status:x}"
                )));
            }
            self.gl.read_pixels(
                0,
                0,
                w as i32,
                h as i32,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(&mut pixels),
            );
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
        Ok((w, h, pixels))
    }

    /// Allocates a transient texture for multi-pass filters. The caller
    /// frees it with [`GlowRenderer::destroy_texture`] before its pass
    /// sequence returns.
    pub fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: Option<&[u8]>,
    ) -> Result<Texture, FxError> {
        unsafe {
            match pixels {
                Some(px) => Texture::with_pixels(&self.gl, width as i32, height as i32, px),
                None => Texture::empty(&self.gl, width as i32, height as i32),
            }
        }
    }

    pub fn destroy_texture(&mut self, texture: Texture) {
        unsafe { texture.destroy(&self.gl) }
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Explicit teardown. The context must still be current; after this
    /// the renderer holds no GL resources and must not be used again.
    pub fn destroy(mut self) {
        unsafe {
            self.release_source();
            self.programs.destroy(&self.gl);
            self.gl.delete_framebuffer(self.fbo);
            self.tri.destroy(&self.gl);
        }
    }

    unsafe fn release_source(&mut self) {
        if let Some(tex) = self.source_tex.take() {
            tex.destroy(&self.gl);
        }
        if let Some([a, b]) = self.targets.take() {
            a.destroy(&self.gl);
            b.destroy(&self.gl);
        }
        self.source = None;
        self.parity.reset();
    }

    /// Attaches `target` to the offscreen framebuffer and draws one
    /// fullscreen triangle with `program`. Texture units must already be
    /// bound; this wires the sampler uniforms (`uTexture` = 0, extras at
    /// 1..) and the filter's float uniforms.
    unsafe fn draw_into(
        &self,
        target: &Texture,
        program: glow::NativeProgram,
        uniforms: &Uniforms,
        extra: &[(&'static str, &Texture)],
    ) -> Result<(), FxError> {
        self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        self.gl.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            Some(target.id()),
            0,
        );
        let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
        if status != glow::FRAMEBUFFER_COMPLETE {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            return Err(FxError::IncompleteFramebuffer(format!(
                "status 0x{status:x}"
            )));
        }

        self.gl.viewport(0, 0, target.width(), target.height());
        self.gl.disable(glow::DEPTH_TEST);
        self.gl.use_program(Some(program));

        if let Some(loc) = self.gl.get_uniform_location(program, "uTexture") {
            self.gl.uniform_1_i32(Some(&loc), 0);
        }
        for (i, (name, _)) in extra.iter().enumerate() {
            if let Some(loc) = self.gl.get_uniform_location(program, name) {
                self.gl.uniform_1_i32(Some(&loc), i as i32 + 1);
            }
        }
        set_uniforms(&self.gl, program, uniforms)?;

        self.tri.draw(&self.gl);

        self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        Ok(())
    }
}
