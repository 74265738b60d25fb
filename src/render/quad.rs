// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! quad holds the fixed mesh (two triangles, interleaved xyz + uv), the
//! vertex layout with named offsets, and QuadRenderer: the owner of every
//! GPU resource in the pipeline.
//!
//! Lifecycle: Uninitialized -> Ready (initialize) -> Drawable (first
//! resize) -> Destroyed (teardown). draw_frame out of Drawable and resize
//! or teardown out of order degrade to logged no-ops, initialize called
//! twice is an error. All resources are created in initialize/resize and
//! freed in teardown; a frame allocates nothing.

use crate::asset::AssetSource;
use crate::config::QuadConfig;
use crate::error::RenderError;
use crate::render::gl::{shader::GlShader, texture::GlTexture, transform::GlTransform};
use crate::surface::SurfaceProvider;
use glow::HasContext;
use log::{info, warn};
use std::mem::size_of;

/// one interleaved vertex: xyz position, uv texture coordinate in [0,1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

pub const VERTEX_FLOATS: usize = 5;

/// named offsets into the interleaved buffer, computed once
#[derive(Debug, Clone, Copy)]
pub struct VertexLayout {
    pub stride_bytes: i32,
    pub position_offset_bytes: i32,
    pub tex_coord_offset_bytes: i32,
}

impl VertexLayout {
    pub fn new() -> Self {
        let f = size_of::<f32>() as i32;
        Self {
            stride_bytes: f * VERTEX_FLOATS as i32,
            position_offset_bytes: 0,
            tex_coord_offset_bytes: f * 3,
        }
    }
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// the fixed six-vertex quad, immutable after construction
pub struct QuadMesh {
    vertices: [Vertex; 6],
}

impl QuadMesh {
    pub fn new() -> Self {
        let v = |x: f32, y: f32, z: f32, u: f32, w: f32| Vertex {
            position: [x, y, z],
            tex_coord: [u, w],
        };
        Self {
            vertices: [
                v(0.5, -0.5, -1.0, 1.0, 0.0),
                v(-0.5, 0.5, -1.0, 0.0, 1.0),
                v(-0.5, -0.5, -1.0, 0.0, 0.0),
                v(0.5, 0.5, -1.0, 1.0, 1.0),
                v(-0.5, 0.5, -1.0, 0.0, 1.0),
                v(0.5, -0.5, -1.0, 1.0, 0.0),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vertex; 6] {
        &self.vertices
    }

    /// interleaved float stream, 5 floats per vertex
    pub fn as_floats(&self) -> [f32; 6 * VERTEX_FLOATS] {
        let mut out = [0.0f32; 6 * VERTEX_FLOATS];
        for (i, v) in self.vertices.iter().enumerate() {
            out[i * VERTEX_FLOATS..i * VERTEX_FLOATS + 3].copy_from_slice(&v.position);
            out[i * VERTEX_FLOATS + 3..i * VERTEX_FLOATS + 5].copy_from_slice(&v.tex_coord);
        }
        out
    }
}

impl Default for QuadMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadState {
    Uninitialized,
    Ready,
    Drawable,
    Destroyed,
}

impl QuadState {
    pub fn can_resize(self) -> bool {
        matches!(self, QuadState::Ready | QuadState::Drawable)
    }

    pub fn can_draw(self) -> bool {
        self == QuadState::Drawable
    }
}

pub struct QuadRenderer {
    state: QuadState,
    config: QuadConfig,
    mesh: QuadMesh,
    layout: VertexLayout,

    shader: Option<GlShader>,
    vao: Option<glow::VertexArray>,
    vbo: Option<glow::Buffer>,
    texture: Option<GlTexture>,
    framebuffer: Option<glow::Framebuffer>,
    renderbuffer: Option<glow::Renderbuffer>,

    surface_size: (u32, u32),
    frame_count: u64,
}

impl QuadRenderer {
    pub fn new(config: QuadConfig) -> Self {
        Self {
            state: QuadState::Uninitialized,
            config,
            mesh: QuadMesh::new(),
            layout: VertexLayout::new(),
            shader: None,
            vao: None,
            vbo: None,
            texture: None,
            framebuffer: None,
            renderbuffer: None,
            surface_size: (0, 0),
            frame_count: 0,
        }
    }

    pub fn state(&self) -> QuadState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Compile and link the shader pair, upload the mesh and the texture.
    /// On any failure everything created so far is released again and the
    /// renderer stays Uninitialized.
    pub fn initialize(
        &mut self,
        gl: &glow::Context,
        assets: &dyn AssetSource,
    ) -> Result<(), RenderError> {
        if self.state != QuadState::Uninitialized {
            return Err(RenderError::InvalidState {
                op: "initialize",
                state: self.state,
            });
        }

        let vertex_source = assets.load_text(&self.config.vertex_shader)?;
        let fragment_source = assets.load_text(&self.config.fragment_shader)?;
        let shader = GlShader::new(gl, &vertex_source, &fragment_source)?;

        let image = match assets.load_image_rgba8(&self.config.texture) {
            Ok(i) => i,
            Err(e) => {
                shader.free(gl);
                return Err(e);
            }
        };
        let texture = match GlTexture::new(gl, &image) {
            Ok(t) => t,
            Err(e) => {
                shader.free(gl);
                return Err(e);
            }
        };

        let (vao, vbo) = match self.upload_mesh(gl, &shader) {
            Ok(pair) => pair,
            Err(e) => {
                texture.free(gl);
                shader.free(gl);
                return Err(e);
            }
        };

        info!(
            "quad renderer ready, texture {}x{}",
            texture.width, texture.height
        );
        self.shader = Some(shader);
        self.texture = Some(texture);
        self.vao = Some(vao);
        self.vbo = Some(vbo);
        self.state = QuadState::Ready;
        Ok(())
    }

    fn upload_mesh(
        &self,
        gl: &glow::Context,
        shader: &GlShader,
    ) -> Result<(glow::VertexArray, glow::Buffer), RenderError> {
        let floats = self.mesh.as_floats();
        unsafe {
            let vao = gl.create_vertex_array().map_err(RenderError::Allocation)?;
            let vbo = match gl.create_buffer() {
                Ok(b) => b,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(RenderError::Allocation(e));
                }
            };
            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                core::slice::from_raw_parts(
                    floats.as_ptr() as *const u8,
                    floats.len() * size_of::<f32>(),
                ),
                glow::STATIC_DRAW,
            );

            gl.enable_vertex_attrib_array(shader.position_loc);
            gl.vertex_attrib_pointer_f32(
                shader.position_loc,
                3,
                glow::FLOAT,
                false,
                self.layout.stride_bytes,
                self.layout.position_offset_bytes,
            );
            gl.enable_vertex_attrib_array(shader.tex_coord_loc);
            gl.vertex_attrib_pointer_f32(
                shader.tex_coord_loc,
                2,
                glow::FLOAT,
                false,
                self.layout.stride_bytes,
                self.layout.tex_coord_offset_bytes,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok((vao, vbo))
        }
    }

    /// Rebuild the framebuffer/renderbuffer pair against the surface's
    /// backing store. Same dimensions with live handles is a no-op; the old
    /// pair is always released before a new one is created.
    pub fn resize(
        &mut self,
        gl: &glow::Context,
        surface: &mut dyn SurfaceProvider,
        width: u32,
        height: u32,
    ) {
        if !self.state.can_resize() {
            warn!("resize ignored in {:?} state", self.state);
            return;
        }
        if self.surface_size == (width, height) && self.framebuffer.is_some() {
            return;
        }

        self.release_targets(gl);

        unsafe {
            let renderbuffer = match gl.create_renderbuffer() {
                Ok(rb) => rb,
                Err(e) => {
                    warn!("renderbuffer allocation failed: {}", e);
                    return;
                }
            };
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            surface.renderbuffer_storage(gl, width, height);

            let framebuffer = match gl.create_framebuffer() {
                Ok(fb) => fb,
                Err(e) => {
                    warn!("framebuffer allocation failed: {}", e);
                    gl.delete_renderbuffer(renderbuffer);
                    return;
                }
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::RENDERBUFFER,
                Some(renderbuffer),
            );
            if gl.check_framebuffer_status(glow::FRAMEBUFFER) != glow::FRAMEBUFFER_COMPLETE {
                warn!("framebuffer incomplete after resize");
                gl.delete_framebuffer(framebuffer);
                gl.delete_renderbuffer(renderbuffer);
                return;
            }

            self.framebuffer = Some(framebuffer);
            self.renderbuffer = Some(renderbuffer);
        }

        self.surface_size = (width, height);
        self.state = QuadState::Drawable;
        info!("resized to {}x{}", width, height);
    }

    /// Clear, set the rotation matrix, draw the six vertices, present.
    /// Touches no renderer field except the frame counter.
    pub fn draw_frame(
        &mut self,
        gl: &glow::Context,
        surface: &mut dyn SurfaceProvider,
        angle_degrees: f32,
    ) {
        if !self.state.can_draw() {
            warn!("draw_frame ignored in {:?} state", self.state);
            return;
        }
        let (Some(shader), Some(vao), Some(texture), Some(framebuffer)) = (
            self.shader.as_ref(),
            self.vao,
            self.texture.as_ref(),
            self.framebuffer,
        ) else {
            return;
        };

        let (width, height) = surface.size();
        let cc = self.config.clear_color;

        let mut transform = GlTransform::new();
        transform.translate(self.config.rotate_offset_x, 0.0);
        transform.rotate(angle_degrees.to_radians());

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.viewport(0, 0, width as i32, height as i32);
            gl.clear_color(cc.r, cc.g, cc.b, cc.a);
            gl.clear(glow::COLOR_BUFFER_BIT);

            shader.bind(gl);
            gl.uniform_matrix_4_f32_slice(
                Some(&shader.rotate_matrix_loc),
                false,
                &transform.to_mat4(),
            );
            texture.bind(gl, 0);
            if let Some(loc) = &shader.color_map_loc {
                gl.uniform_1_i32(Some(loc), 0);
            }

            gl.bind_vertex_array(Some(vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 6);
            gl.bind_vertex_array(None);
        }

        surface.present(gl);
        self.frame_count += 1;
    }

    /// Release program, vertex buffer, texture, framebuffer, renderbuffer,
    /// in that order, each only if allocated. Safe to call twice.
    pub fn teardown(&mut self, gl: &glow::Context) {
        if self.state == QuadState::Destroyed {
            return;
        }
        if let Some(shader) = self.shader.take() {
            shader.free(gl);
        }
        unsafe {
            if let Some(vbo) = self.vbo.take() {
                gl.delete_buffer(vbo);
            }
            if let Some(vao) = self.vao.take() {
                gl.delete_vertex_array(vao);
            }
        }
        if let Some(texture) = self.texture.take() {
            texture.free(gl);
        }
        self.release_targets(gl);
        self.state = QuadState::Destroyed;
        info!("quad renderer destroyed after {} frames", self.frame_count);
    }

    fn release_targets(&mut self, gl: &glow::Context) {
        unsafe {
            if let Some(fb) = self.framebuffer.take() {
                gl.delete_framebuffer(fb);
            }
            if let Some(rb) = self.renderbuffer.take() {
                gl.delete_renderbuffer(rb);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::OffscreenSurface;
    use std::os::raw::c_void;

    // A context with no GL functions loaded beyond the version queries the
    // loader itself needs. glow replaces every unloaded entry with a stub
    // that panics when called, so any test that gets past a renderer call
    // proves the call touched no GPU state.
    extern "system" fn stub_get_string(name: u32) -> *const u8 {
        match name {
            glow::VERSION => b"2.1\0".as_ptr(),
            _ => b"\0".as_ptr(),
        }
    }

    extern "system" fn stub_get_integer_v(_name: u32, params: *mut i32) {
        unsafe { *params = 0 };
    }

    fn headless_context() -> glow::Context {
        unsafe {
            glow::Context::from_loader_function(|name| match name {
                "glGetString" => stub_get_string as *const c_void,
                "glGetIntegerv" => stub_get_integer_v as *const c_void,
                _ => std::ptr::null(),
            })
        }
    }

    #[test]
    fn test_draw_before_resize_makes_no_gpu_calls() {
        let gl = headless_context();
        let mut surface = OffscreenSurface::new(64, 64);
        let mut r = QuadRenderer::new(QuadConfig::default());

        r.draw_frame(&gl, &mut surface, 45.0);
        assert_eq!(r.state(), QuadState::Uninitialized);
        assert_eq!(r.frame_count(), 0);
    }

    #[test]
    fn test_resize_before_initialize_is_noop() {
        let gl = headless_context();
        let mut surface = OffscreenSurface::new(64, 64);
        let mut r = QuadRenderer::new(QuadConfig::default());

        r.resize(&gl, &mut surface, 64, 64);
        assert_eq!(r.state(), QuadState::Uninitialized);
    }

    #[test]
    fn test_teardown_twice_is_safe() {
        let gl = headless_context();
        let mut surface = OffscreenSurface::new(64, 64);
        let mut r = QuadRenderer::new(QuadConfig::default());

        r.teardown(&gl);
        assert_eq!(r.state(), QuadState::Destroyed);
        r.teardown(&gl);
        assert_eq!(r.state(), QuadState::Destroyed);

        // destroyed renderer ignores further calls too
        r.draw_frame(&gl, &mut surface, 0.0);
        r.resize(&gl, &mut surface, 32, 32);
        assert_eq!(r.state(), QuadState::Destroyed);
        assert_eq!(r.frame_count(), 0);
    }

    #[test]
    fn test_vertex_layout_offsets() {
        let layout = VertexLayout::new();
        assert_eq!(layout.stride_bytes, 20);
        assert_eq!(layout.position_offset_bytes, 0);
        assert_eq!(layout.tex_coord_offset_bytes, 12);
    }

    #[test]
    fn test_mesh_is_two_triangles_of_the_centered_quad() {
        let mesh = QuadMesh::new();
        let floats = mesh.as_floats();
        assert_eq!(floats.len(), 30);

        // first vertex: lower right corner mapped to uv (1, 0)
        assert_eq!(&floats[0..5], &[0.5, -0.5, -1.0, 1.0, 0.0]);
        // both triangles share the top-left corner
        assert_eq!(mesh.vertices()[1], mesh.vertices()[4]);

        for v in mesh.vertices() {
            assert!(v.tex_coord[0] >= 0.0 && v.tex_coord[0] <= 1.0);
            assert!(v.tex_coord[1] >= 0.0 && v.tex_coord[1] <= 1.0);
        }
    }

    #[test]
    fn test_new_renderer_is_uninitialized() {
        let r = QuadRenderer::new(QuadConfig::default());
        assert_eq!(r.state(), QuadState::Uninitialized);
        assert_eq!(r.frame_count(), 0);
    }

    #[test]
    fn test_state_guards() {
        assert!(!QuadState::Uninitialized.can_draw());
        assert!(!QuadState::Uninitialized.can_resize());
        assert!(QuadState::Ready.can_resize());
        assert!(!QuadState::Ready.can_draw());
        assert!(QuadState::Drawable.can_resize());
        assert!(QuadState::Drawable.can_draw());
        assert!(!QuadState::Destroyed.can_resize());
        assert!(!QuadState::Destroyed.can_draw());
    }
}
