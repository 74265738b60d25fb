// PixelQuad
// copyright zipxing@hotmail.com 2022~2024

//! surface provides the SurfaceProvider trait: the drawable the host owns.
//! The renderer binds a renderbuffer and asks the surface to attach its
//! backing storage to it, then asks the surface to present when a frame is
//! done. On EGL-like platforms storage comes from the native drawable; the
//! OffscreenSurface here uses plain renderbuffer storage and works headless.

use glow::HasContext;

pub trait SurfaceProvider {
    /// current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// attach backing storage for the currently bound renderbuffer
    fn renderbuffer_storage(&mut self, gl: &glow::Context, width: u32, height: u32);

    /// show the completed frame
    fn present(&mut self, gl: &glow::Context);
}

/// offscreen drawable backed by ordinary RGBA8 renderbuffer storage
pub struct OffscreenSurface {
    width: u32,
    height: u32,
}

impl OffscreenSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl SurfaceProvider for OffscreenSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn renderbuffer_storage(&mut self, gl: &glow::Context, width: u32, height: u32) {
        unsafe {
            gl.renderbuffer_storage(
                glow::RENDERBUFFER,
                glow::RGBA8,
                width as i32,
                height as i32,
            );
        }
        self.width = width;
        self.height = height;
    }

    fn present(&mut self, gl: &glow::Context) {
        // nowhere to swap to, just make sure the frame is finished
        unsafe {
            gl.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offscreen_size() {
        let s = OffscreenSurface::new(100, 50);
        assert_eq!(s.size(), (100, 50));
    }
}
