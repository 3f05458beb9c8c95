use smallvec::{SmallVec, smallvec};

use crate::{
    color::hsl::parse_hex,
    foundation::core::{FrameSize, Point, Rgb8, alpha_u8},
    settings::model::{OverlayType, Settings},
};

/// One gradient stop: offset along the gradient and the accent alpha there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub alpha: u8,
}

pub type ColorStops = SmallVec<[ColorStop; 3]>;

/// Resolved overlay construction for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayPlan {
    /// Uniform accent layer.
    Fill { color: Rgb8, alpha: u8 },
    /// Linear gradient from `start` to `end`, padded beyond both ends.
    Linear {
        color: Rgb8,
        start: Point,
        end: Point,
        stops: ColorStops,
    },
    /// Circular gradient drawn on an `aux` surface, then stretched onto the frame.
    Radial {
        color: Rgb8,
        aux: FrameSize,
        center: Point,
        radius: f64,
        stops: ColorStops,
    },
}

impl OverlayPlan {
    pub fn color(&self) -> Rgb8 {
        match self {
            Self::Fill { color, .. } | Self::Linear { color, .. } | Self::Radial { color, .. } => {
                *color
            }
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Self::Fill { .. } => &[],
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        }
    }
}

/// Build the overlay for `settings`, or `None` when nothing would be visible.
///
/// `gradientAmount` and `gradientSize` are clamped into [0, 1] first; a zero amount,
/// a zero-length gradient or a zero radius all skip the overlay.
pub fn plan_overlay(settings: &Settings, frame: FrameSize) -> Option<OverlayPlan> {
    let amount = clamp_unit(settings.gradient_amount);
    if amount <= 0.0 {
        return None;
    }
    let size = clamp_unit(settings.gradient_size);
    let color = parse_hex(&settings.section_color);
    let full = alpha_u8(amount);
    let (w, h) = (f64::from(frame.width), f64::from(frame.height));

    let linear = |start: Point, end: Point, stops: ColorStops| {
        if start == end {
            return None;
        }
        Some(OverlayPlan::Linear {
            color,
            start,
            end,
            stops,
        })
    };

    match settings.overlay_type {
        OverlayType::Fill => Some(OverlayPlan::Fill { color, alpha: full }),
        OverlayType::GradientHorizontal => linear(
            Point::new(0.0, h / 2.0),
            Point::new(w, h / 2.0),
            band_stops(size, full),
        ),
        OverlayType::GradientVertical => linear(
            Point::new(0.0, 0.0),
            Point::new(0.0, h),
            band_stops(size, full),
        ),
        OverlayType::GradientBottom => linear(
            Point::new(0.0, h),
            Point::new(0.0, h - size * h),
            edge_stops(full),
        ),
        OverlayType::GradientTop => linear(
            Point::new(0.0, 0.0),
            Point::new(0.0, size * h),
            edge_stops(full),
        ),
        OverlayType::GradientLeft => linear(
            Point::new(0.0, 0.0),
            Point::new(size * w, 0.0),
            edge_stops(full),
        ),
        OverlayType::GradientRight => linear(
            Point::new(w, 0.0),
            Point::new(w - size * w, 0.0),
            edge_stops(full),
        ),
        OverlayType::GradientRadial => {
            let aux = FrameSize::new(frame.width / 2, frame.height).ok()?;
            let radius = size * f64::from(aux.height);
            if radius <= 0.0 {
                return None;
            }
            Some(OverlayPlan::Radial {
                color,
                aux,
                center: Point::new(f64::from(aux.width) / 2.0, f64::from(aux.height) / 2.0),
                radius,
                stops: edge_stops(full),
            })
        }
    }
}

/// Fade, full, fade centred on 0.5 with a half-width of `size / 2`.
fn band_stops(size: f64, full: u8) -> ColorStops {
    let half = size / 2.0;
    smallvec![
        ColorStop {
            offset: clamp_unit(0.5 - half),
            alpha: 0,
        },
        ColorStop {
            offset: 0.5,
            alpha: full,
        },
        ColorStop {
            offset: clamp_unit(0.5 + half),
            alpha: 0,
        },
    ]
}

/// Full at the origin edge, fading out at the far end.
fn edge_stops(full: u8) -> ColorStops {
    smallvec![
        ColorStop {
            offset: 0.0,
            alpha: full,
        },
        ColorStop {
            offset: 1.0,
            alpha: 0,
        },
    ]
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Alpha at offset `t`, interpolated between the surrounding stops and padded
/// with the first/last stop outside their range.
pub fn stop_alpha(stops: &[ColorStop], t: f64) -> f64 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return 0.0;
    };
    if t <= first.offset {
        return f64::from(first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= f64::EPSILON {
                return f64::from(b.alpha);
            }
            let f = (t - a.offset) / span;
            return f64::from(a.alpha) + (f64::from(b.alpha) - f64::from(a.alpha)) * f;
        }
    }
    f64::from(last.alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/plan.rs"]
mod tests;
