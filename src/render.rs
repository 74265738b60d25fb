// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

// opengl codes...
pub mod gl;

// quad mesh, vertex layout and the renderer
pub mod quad;
