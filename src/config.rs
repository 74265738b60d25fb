// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! Renderer configuration: which assets make up the pipeline plus the two
//! constants baked into it (clear color, the fixed x-offset inside the
//! rotation matrix).

use crate::error::RenderError;
use crate::render::gl::color::GlColor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadConfig {
    /// asset name of the GLSL-ES vertex shader text
    pub vertex_shader: String,
    /// asset name of the GLSL-ES fragment shader text
    pub fragment_shader: String,
    /// asset name of the texture image
    pub texture: String,
    /// color the buffer is cleared to each frame
    pub clear_color: GlColor,
    /// constant x-translation baked into the rotation matrix
    pub rotate_offset_x: f32,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self {
            vertex_shader: "shaders/quad.vsh".to_string(),
            fragment_shader: "shaders/quad.fsh".to_string(),
            texture: "for_test.png".to_string(),
            clear_color: GlColor::new(0.5, 1.0, 0.5, 1.0),
            rotate_offset_x: 0.2,
        }
    }
}

impl QuadConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, RenderError> {
        toml::from_str(s).map_err(|e| RenderError::Config(e.to_string()))
    }
}
