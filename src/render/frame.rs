use crate::{
    foundation::core::FrameSize,
    foundation::error::{CovergenError, CovergenResult},
    render::composite::{over_in_place, unpremultiply_in_place},
};

/// The single raster surface every render clears and redraws in place.
pub struct Frame {
    size: FrameSize,
    pixmap: vello_cpu::Pixmap,
    renders: u64,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("size", &self.size)
            .field("renders", &self.renders)
            .finish()
    }
}

impl Frame {
    pub fn new(size: FrameSize) -> Self {
        let (w, h) = size.as_u16();
        Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
            renders: 0,
        }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Number of renders completed on this frame.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Premultiplied RGBA8 pixels.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = pixel_offset(x, y, self.size.width);
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub(crate) fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn composite(&mut self, layer: &[u8]) -> CovergenResult<()> {
        over_in_place(self.pixmap.data_as_u8_slice_mut(), layer)
    }

    pub(crate) fn finish_render(&mut self) {
        self.renders += 1;
    }

    /// Straight-alpha copy of the frame for encoding.
    pub fn to_rgba_image(&self) -> CovergenResult<image::RgbaImage> {
        let mut data = self.data().to_vec();
        unpremultiply_in_place(&mut data);
        image::RgbaImage::from_raw(self.size.width, self.size.height, data)
            .ok_or_else(|| CovergenError::render("frame byte length mismatch"))
    }
}

/// Byte offset of pixel `(x, y)` in a tightly packed RGBA8 buffer `width` pixels wide.
pub(crate) fn pixel_offset(x: u32, y: u32, width: u32) -> usize {
    (y as usize * width as usize + x as usize) * 4
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
