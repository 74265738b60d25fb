// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! All errors the pipeline can surface. Setup errors carry the driver's
//! own diagnostic text so a bad shader is debuggable from the log alone.

use crate::render::quad::QuadState;
use std::fmt;
use thiserror::Error;

/// which shader stage failed to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    /// a shader stage failed to compile, log is the driver's info log
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// the program failed to link, or its interface is missing a
    /// required attribute or uniform
    #[error("shader program link failed: {log}")]
    ShaderLink { log: String },

    /// asset bytes could not be decoded into RGBA8 pixels
    #[error("texture decode failed: {reason}")]
    TextureDecode { reason: String },

    /// operation called out of lifecycle order
    #[error("{op} called in {state:?} state")]
    InvalidState { op: &'static str, state: QuadState },

    /// the asset source has nothing under this name
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// the asset exists but could not be read
    #[error("asset read failed: {name}: {reason}")]
    AssetRead { name: String, reason: String },

    /// a glow create_* call failed
    #[error("gl resource allocation failed: {0}")]
    Allocation(String),

    /// configuration text could not be parsed
    #[error("config parse failed: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "fragment shader compilation failed: 0:3: syntax error"
        );

        let e = RenderError::InvalidState {
            op: "draw_frame",
            state: QuadState::Uninitialized,
        };
        assert_eq!(e.to_string(), "draw_frame called in Uninitialized state");
    }
}
