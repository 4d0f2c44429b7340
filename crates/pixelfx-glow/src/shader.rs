use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use glow::HasContext;
use tracing::debug;

use pixelfx_core::{FxError, UniformValue, Uniforms};

/// Compiles and links a vertex+fragment pair, surfacing the driver's info
/// log per stage. Compile/link failure is fatal for the program and never
/// retried.
pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, FxError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| FxError::GlCreate(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(FxError::VertexCompile(log));
    }

    let fs = gl
        .create_shader(glow::FRAGMENT_SHADER)
        .map_err(|e| FxError::GlCreate(format!("create_shader(FS) failed: {e:?}")))?;
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(FxError::FragmentCompile(log));
    }

    let program = gl
        .create_program()
        .map_err(|e| FxError::GlCreate(format!("create_program failed: {e:?}")))?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(FxError::Link(log));
    }

    Ok(program)
}

/// Resolves and sets each uniform by name against `program`.
///
/// Every supplied value is shape-checked first, even when the program does
/// not use the name, so a malformed uniform fails the pass instead of
/// riding along silently. Resolved names the program dropped are skipped
/// (filters share fragment templates, so not every declared parameter
/// survives compilation).
pub unsafe fn set_uniforms(
    gl: &glow::Context,
    program: glow::NativeProgram,
    uniforms: &Uniforms,
) -> Result<(), FxError> {
    for (name, value) in uniforms.iter() {
        value.check_shape(name)?;
        let Some(loc) = gl.get_uniform_location(program, name) else {
            continue;
        };
        match value {
            UniformValue::Float(v) => gl.uniform_1_f32(Some(&loc), *v),
            UniformValue::Floats(vs) => match vs.len() {
                1 => gl.uniform_1_f32(Some(&loc), vs[0]),
                2 => gl.uniform_2_f32(Some(&loc), vs[0], vs[1]),
                3 => gl.uniform_3_f32(Some(&loc), vs[0], vs[1], vs[2]),
                4 => gl.uniform_4_f32(Some(&loc), vs[0], vs[1], vs[2], vs[3]),
                9 => gl.uniform_matrix_3_f32_slice(Some(&loc), false, vs),
                16 => gl.uniform_matrix_4_f32_slice(Some(&loc), false, vs),
                _ => unreachable!("rejected by check_shape"),
            },
        }
    }
    Ok(())
}

/// Cache key: the full vertex+fragment source texts, hashed per stage.
/// Two filters with identical shader text share one compiled program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    vert_hash: u64,
    frag_hash: u64,
}

impl ProgramKey {
    pub fn new(vert_src: &str, frag_src: &str) -> Self {
        Self {
            vert_hash: hash_str(vert_src),
            frag_hash: hash_str(frag_src),
        }
    }
}

fn hash_str(s: &str) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut h);
    h.finish()
}

/// Per-renderer compiled-program cache.
///
/// Keeping the cache on the renderer instance (rather than process-wide)
/// keeps teardown lifetimes sound: destroying one renderer can never
/// invalidate another renderer's programs.
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: HashMap<ProgramKey, glow::NativeProgram>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub unsafe fn get_or_compile(
        &mut self,
        gl: &glow::Context,
        vert_src: &str,
        frag_src: &str,
    ) -> Result<glow::NativeProgram, FxError> {
        let key = ProgramKey::new(vert_src, frag_src);
        if let Some(p) = self.programs.get(&key) {
            return Ok(*p);
        }
        debug!(?key, "glow: compiling program (cache miss)");
        let p = compile_program(gl, vert_src, frag_src)?;
        self.programs.insert(key, p);
        Ok(p)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        for (_, p) in self.programs.drain() {
            gl.delete_program(p);
        }
    }
}
