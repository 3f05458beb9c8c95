use crate::foundation::error::{CovergenError, CovergenResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    /// Largest side accepted by the CPU raster backend.
    pub const MAX_SIDE: u32 = u16::MAX as u32;

    pub fn new(width: u32, height: u32) -> CovergenResult<Self> {
        if width == 0 || height == 0 {
            return Err(CovergenError::validation("frame size must be non-zero"));
        }
        if width > Self::MAX_SIDE || height > Self::MAX_SIDE {
            return Err(CovergenError::validation(format!(
                "frame size {width}x{height} exceeds {}",
                Self::MAX_SIDE
            )));
        }
        Ok(Self { width, height })
    }

    pub fn as_u16(self) -> (u16, u16) {
        // Both sides are checked against MAX_SIDE in `new`.
        (self.width as u16, self.height as u16)
    }

    /// Half width and half height, as used by the export downscaler.
    pub fn halved(self) -> Self {
        Self {
            width: (self.width / 2).max(1),
            height: (self.height / 2).max(1),
        }
    }

    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
        }
    }
}

/// Straight (non-premultiplied) sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Premultiplied RGBA8 bytes at the given alpha.
    pub fn premul(self, a: u8) -> [u8; 4] {
        let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), a]
    }
}

/// `rgb(r,g,b)` as understood by CSS-style color consumers.
impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Convert an opacity fraction into an 8-bit alpha, clamping into [0, 1] first.
pub fn alpha_u8(amount: f64) -> u8 {
    if !amount.is_finite() {
        return 0;
    }
    (amount.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
