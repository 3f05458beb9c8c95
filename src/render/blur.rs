use rayon::prelude::*;

use crate::{
    foundation::error::{CovergenError, CovergenResult},
    render::frame::pixel_offset,
};

/// Largest kernel radius the glow pass will build.
pub const MAX_BLUR_RADIUS: u32 = 256;

/// Gaussian parameters for a CSS-style blur amount (the standard deviation is half
/// the amount). Returns `None` when no blur should be applied.
pub fn glow_kernel(amount: f64) -> Option<(u32, f32)> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    let sigma = amount / 2.0;
    let radius = (sigma * 3.0).ceil().clamp(1.0, f64::from(MAX_BLUR_RADIUS)) as u32;
    Some((radius, sigma as f32))
}

pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CovergenResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| CovergenError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(CovergenError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Blur only the region that holds visible pixels, grown by the kernel radius.
///
/// Everything outside that window is transparent before and after the blur.
pub fn blur_visible_region(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CovergenResult<Vec<u8>> {
    if src.len() != width as usize * height as usize * 4 {
        return Err(CovergenError::render(
            "blur_visible_region expects src matching width*height*4",
        ));
    }
    let Some((x0, y0, x1, y1)) = visible_bounds(src, width, height) else {
        return Ok(src.to_vec());
    };
    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = (x1 + radius + 1).min(width);
    let y1 = (y1 + radius + 1).min(height);
    let (rw, rh) = (x1 - x0, y1 - y0);

    let mut region = Vec::with_capacity(rw as usize * rh as usize * 4);
    for y in y0..y1 {
        let start = pixel_offset(x0, y, width);
        region.extend_from_slice(&src[start..start + rw as usize * 4]);
    }
    let blurred = blur_rgba8_premul(&region, rw, rh, radius, sigma)?;

    let mut out = vec![0u8; src.len()];
    for (row, y) in (y0..y1).enumerate() {
        let dst = pixel_offset(x0, y, width);
        let s = row * rw as usize * 4;
        out[dst..dst + rw as usize * 4].copy_from_slice(&blurred[s..s + rw as usize * 4]);
    }
    Ok(out)
}

/// Inclusive pixel bounds of every pixel with non-zero alpha.
fn visible_bounds(src: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        for x in 0..width {
            if src[pixel_offset(x, y, width) + 3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
            });
        }
    }
    bounds
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CovergenResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CovergenError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CovergenError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_bytes = width as usize * 4;
    dst.par_chunks_mut(row_bytes)
        .zip(src.par_chunks(row_bytes))
        .for_each(|(dst_row, src_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = sx as usize * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src_row[idx + c]);
                    }
                }
                let out_idx = x as usize * 4;
                for c in 0..4 {
                    dst_row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    dst.par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1);
                    let idx = (sy as usize * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    dst_row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
