//! CPU shading of overlay plans into premultiplied RGBA8 layers.
//!
//! Gradients are evaluated as 8-bit coverage masks first and colorized last: the
//! accent color is constant across every stop, so only alpha varies.

use image::GrayImage;
use rayon::prelude::*;

use crate::{
    foundation::core::{FrameSize, Point, Rgb8},
    foundation::error::{CovergenError, CovergenResult},
    overlay::plan::{ColorStop, OverlayPlan, stop_alpha},
};

/// Rasterize `plan` into a frame-sized premultiplied RGBA8 layer.
pub fn shade_overlay(plan: &OverlayPlan, frame: FrameSize) -> CovergenResult<Vec<u8>> {
    let mask = match plan {
        OverlayPlan::Fill { color, alpha } => {
            return Ok(color
                .premul(*alpha)
                .repeat(frame.width as usize * frame.height as usize));
        }
        OverlayPlan::Linear {
            start, end, stops, ..
        } => linear_mask(frame, *start, *end, stops)?,
        OverlayPlan::Radial {
            aux,
            center,
            radius,
            stops,
            ..
        } => {
            let small = radial_mask(*aux, *center, *radius, stops)?;
            stretch(&small, frame)
        }
    };
    Ok(colorize(&mask, plan.color()))
}

fn linear_mask(
    frame: FrameSize,
    start: Point,
    end: Point,
    stops: &[ColorStop],
) -> CovergenResult<GrayImage> {
    let d = end - start;
    let len2 = d.hypot2();
    if len2 <= 0.0 {
        return Err(CovergenError::render("linear gradient has zero length"));
    }
    mask_with(frame, stops, |p| (p - start).dot(d) / len2)
}

fn radial_mask(
    aux: FrameSize,
    center: Point,
    radius: f64,
    stops: &[ColorStop],
) -> CovergenResult<GrayImage> {
    if radius <= 0.0 {
        return Err(CovergenError::render("radial gradient has zero radius"));
    }
    mask_with(aux, stops, |p| (p - center).hypot() / radius)
}

/// Evaluate `offset_at` at every pixel centre and store the interpolated alpha.
fn mask_with(
    size: FrameSize,
    stops: &[ColorStop],
    offset_at: impl Fn(Point) -> f64 + Sync,
) -> CovergenResult<GrayImage> {
    let width = size.width as usize;
    let mut raw = vec![0u8; width * size.height as usize];
    raw.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let py = y as f64 + 0.5;
        for (x, a) in row.iter_mut().enumerate() {
            let t = offset_at(Point::new(x as f64 + 0.5, py));
            *a = stop_alpha(stops, t).round().clamp(0.0, 255.0) as u8;
        }
    });
    GrayImage::from_raw(size.width, size.height, raw)
        .ok_or_else(|| CovergenError::render("overlay mask size mismatch"))
}

/// Resample an auxiliary mask onto the full frame (2x horizontally for radial glows).
fn stretch(mask: &GrayImage, to: FrameSize) -> GrayImage {
    if mask.dimensions() == (to.width, to.height) {
        return mask.clone();
    }
    image::imageops::resize(
        mask,
        to.width,
        to.height,
        image::imageops::FilterType::Triangle,
    )
}

fn colorize(mask: &GrayImage, color: Rgb8) -> Vec<u8> {
    let mut out = vec![0u8; mask.as_raw().len() * 4];
    out.par_chunks_mut(4)
        .zip(mask.as_raw().par_iter())
        .for_each(|(px, &a)| px.copy_from_slice(&color.premul(a)));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/shade.rs"]
mod tests;
