// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! GlShader compiles and links the quad's vertex + fragment pair and caches
//! the locations of the fixed shader interface: attributes `position` and
//! `texCoordinate`, uniform `rotateMatrix`, sampler `colorMap`.
//! Compile and link failures come back as values carrying the driver log;
//! a failed stage never leaks the shader objects created before it.

use crate::error::{RenderError, ShaderStage};
use glow::HasContext;
use log::info;

pub struct GlShader {
    pub program: glow::Program,
    pub position_loc: u32,
    pub tex_coord_loc: u32,
    pub rotate_matrix_loc: glow::UniformLocation,
    pub color_map_loc: Option<glow::UniformLocation>,
}

impl GlShader {
    pub fn new(
        gl: &glow::Context,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RenderError> {
        let vertex_shader = compile_stage(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment_shader = match compile_stage(gl, ShaderStage::Fragment, fragment_source) {
            Ok(s) => s,
            Err(e) => {
                unsafe { gl.delete_shader(vertex_shader) };
                return Err(e);
            }
        };

        unsafe {
            let program = match gl.create_program() {
                Ok(p) => p,
                Err(e) => {
                    gl.delete_shader(vertex_shader);
                    gl.delete_shader(fragment_shader);
                    return Err(RenderError::Allocation(e));
                }
            };
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);

            let linked = gl.get_program_link_status(program);
            let link_log = gl.get_program_info_log(program);
            gl.detach_shader(program, vertex_shader);
            gl.detach_shader(program, fragment_shader);
            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);
            if !linked {
                gl.delete_program(program);
                return Err(RenderError::ShaderLink { log: link_log });
            }

            let position_loc = lookup_attrib(gl, program, "position")?;
            let tex_coord_loc = lookup_attrib(gl, program, "texCoordinate")?;
            let rotate_matrix_loc = match gl.get_uniform_location(program, "rotateMatrix") {
                Some(loc) => loc,
                None => {
                    gl.delete_program(program);
                    return Err(RenderError::ShaderLink {
                        log: "uniform rotateMatrix not found".to_string(),
                    });
                }
            };
            // optional: fragment shaders that sample unit 0 work without it
            let color_map_loc = gl.get_uniform_location(program, "colorMap");

            info!("shader program linked");
            Ok(Self {
                program,
                position_loc,
                tex_coord_loc,
                rotate_matrix_loc,
                color_map_loc,
            })
        }
    }

    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    pub fn free(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

fn compile_stage(
    gl: &glow::Context,
    stage: ShaderStage,
    source: &str,
) -> Result<glow::Shader, RenderError> {
    let kind = match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    };
    unsafe {
        let shader = gl.create_shader(kind).map_err(RenderError::Allocation)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RenderError::ShaderCompile { stage, log });
        }
        Ok(shader)
    }
}

fn lookup_attrib(
    gl: &glow::Context,
    program: glow::Program,
    name: &'static str,
) -> Result<u32, RenderError> {
    match unsafe { gl.get_attrib_location(program, name) } {
        Some(loc) => Ok(loc),
        None => {
            unsafe { gl.delete_program(program) };
            Err(RenderError::ShaderLink {
                log: format!("attribute {} not found", name),
            })
        }
    }
}
