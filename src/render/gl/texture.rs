// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! GlTexture uploads decoded RGBA8 pixels once and keeps the handle.
//! Filtering is linear, wrap is clamp-to-edge on both axes.
//! The pixels are never touched again after upload.

use crate::asset::ImageData;
use crate::error::RenderError;
use glow::HasContext;

pub struct GlTexture {
    pub texture: glow::Texture,
    pub width: u32,
    pub height: u32,
}

impl GlTexture {
    pub fn new(gl: &glow::Context, image: &ImageData) -> Result<Self, RenderError> {
        let texture = unsafe { gl.create_texture().map_err(RenderError::Allocation)? };

        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                image.width as i32,
                image.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(&image.pixels),
            );

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

            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(Self {
            texture,
            width: image.width,
            height: image.height,
        })
    }

    pub fn bind(&self, gl: &glow::Context, unit: u32) {
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }

    pub fn free(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_texture(self.texture);
        }
    }
}
