use glow::HasContext;

use pixelfx_core::FxError;

/// GPU-resident RGBA8 2D texture (linear filtering, clamp to edge).
///
/// The renderer exclusively owns every texture it creates; there is no
/// implicit collection of GL resources, so callers release textures with
/// [`Texture::destroy`] when the source changes or the renderer is torn
/// down.
#[derive(Debug)]
pub struct Texture {
    id: glow::NativeTexture,
    width: i32,
    height: i32,
}

impl Texture {
    /// Allocates an uninitialized texture of `width * height` texels.
    pub unsafe fn empty(gl: &glow::Context, width: i32, height: i32) -> Result<Self, FxError> {
        let id = gl
            .create_texture()
            .map_err(|e| FxError::GlCreate(format!("create_texture failed: {e:?}")))?;

        gl.bind_texture(glow::TEXTURE_2D, Some(id));
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );

        let w = width.max(1);
        let h = height.max(1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            w,
            h,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );
        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(Self {
            id,
            width: w,
            height: h,
        })
    }

    /// Allocates and fills a texture from row-major RGBA8 bytes.
    pub unsafe fn with_pixels(
        gl: &glow::Context,
        width: i32,
        height: i32,
        pixels: &[u8],
    ) -> Result<Self, FxError> {
        let tex = Self::empty(gl, width, height)?;
        tex.upload(gl, pixels);
        Ok(tex)
    }

    /// Replaces the full texel contents. `pixels` must be
    /// `width * height * 4` bytes.
    pub unsafe fn upload(&self, gl: &glow::Context, pixels: &[u8]) {
        gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        gl.tex_sub_image_2d(
            glow::TEXTURE_2D,
            0,
            0,
            0,
            self.width,
            self.height,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(pixels),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    pub unsafe fn bind(&self, gl: &glow::Context, unit: u32) {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
    }

    pub unsafe fn unbind(gl: &glow::Context, unit: u32) {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    pub unsafe fn destroy(self, gl: &glow::Context) {
        gl.delete_texture(self.id);
    }

    pub fn id(&self) -> glow::NativeTexture {
        self.id
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}
