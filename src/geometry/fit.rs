use crate::{
    foundation::core::{Affine, FrameSize, Rect},
    settings::model::Settings,
};

/// Smallest uniform scale at which an `iw`×`ih` image covers the frame.
///
/// Degenerate image sizes yield 1.0; decoded images are always non-empty.
pub fn cover_scale(frame: FrameSize, iw: u32, ih: u32) -> f64 {
    if iw == 0 || ih == 0 {
        return 1.0;
    }
    let wr = f64::from(frame.width) / f64::from(iw);
    let hr = f64::from(frame.height) / f64::from(ih);
    wr.max(hr)
}

/// Where the background image lands on the frame for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Effective scale: cover base times the user zoom.
    pub scale: f64,
}

impl Placement {
    /// Centre the scaled image, then pan by fractions of the frame size.
    ///
    /// No clamping: zooming or panning the image out of view is allowed.
    pub fn compute(
        frame: FrameSize,
        image_size: (u32, u32),
        base_scale: f64,
        settings: &Settings,
    ) -> Self {
        let (iw, ih) = (f64::from(image_size.0), f64::from(image_size.1));
        let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
        let scale = base_scale * settings.image_scale;
        let width = iw * scale;
        let height = ih * scale;
        Self {
            x: (fw - width) / 2.0 + settings.pos_x * fw,
            y: (fh - height) / 2.0 + settings.pos_y * fh,
            width,
            height,
            scale,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Maps image pixel space onto frame space.
    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.x, self.y)) * Affine::scale(self.scale)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
