// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! PixelQuad is a minimal immediate-mode renderer that draws one rotating
//! textured quad through glow (OpenGL / OpenGL ES / WebGL bindings).
//!
//! It owns the GPU-side resources of that pipeline: vertex buffer, shader
//! program, texture, framebuffer and renderbuffer. The host owns everything
//! else and hands it in through two small traits:
//! a SurfaceProvider supplying drawable storage and a present call,
//! and an AssetSource supplying shader text and RGBA8 pixels by name.
//!
//! Lifecycle is explicit: initialize, resize, draw_frame, teardown.
//! No callback-driven resource recreation, no hidden current-context global.
//! Every operation takes the glow::Context it works against.

/// error taxonomy for the render pipeline
pub mod error;

/// logging setup, reference https://docs.rs/log4rs
#[cfg(feature = "log4rs")]
pub mod log;

/// renderer configuration: asset names, clear color, rotation offset
pub mod config;

/// shader text and texture pixels by name: filesystem or in-memory
pub mod asset;

/// the drawable surface the host owns: size, backing storage, present
pub mod surface;

/// Render module.
/// gl: thin wrappers over glow objects (shader, texture, color, transform).
/// quad: the quad mesh, its vertex layout and the renderer itself.
pub mod render;

pub use asset::{AssetSource, ImageData, MemAssetSource};
pub use config::QuadConfig;
pub use error::RenderError;
pub use render::quad::{QuadRenderer, QuadState};
pub use surface::{OffscreenSurface, SurfaceProvider};

#[cfg(feature = "image")]
pub use asset::FileAssetSource;
