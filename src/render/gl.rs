// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

pub mod color;
pub mod shader;
pub mod texture;
pub mod transform;
