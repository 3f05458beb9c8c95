pub(crate) mod decode;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::foundation::error::{CovergenError, CovergenResult};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Decoded background bitmap, immutable once loaded.
#[derive(Clone, Debug)]
pub struct ImageResource {
    id: u64,
    width: u32,
    height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    rgba8_premul: Arc<Vec<u8>>,
}

impl ImageResource {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> CovergenResult<Self> {
        if width == 0 || height == 0 {
            return Err(CovergenError::validation("image must be non-empty"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(CovergenError::validation("image byte length mismatch"));
        }
        Ok(Self {
            id: NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Process-unique identity; a new upload always gets a new id.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}
