use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{foundation::error::CovergenResult, render::frame::Frame};

/// Download name for a title: whitespace runs become `_`, plus `.png`.
///
/// Path separators are replaced too so the file always lands in the target
/// directory; an empty title is exported as `untitled.png`.
pub fn export_file_name(title: &str) -> String {
    let mut out = String::with_capacity(title.len() + 4);
    let mut in_space = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        out.push(if matches!(c, '/' | '\\') { '_' } else { c });
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out.push_str(".png");
    out
}

/// Straight-alpha copy of the finished frame at half width and height.
pub fn downscale_half(frame: &Frame) -> CovergenResult<image::RgbaImage> {
    let full = frame.to_rgba_image()?;
    let half = frame.size().halved();
    Ok(image::imageops::resize(
        &full,
        half.width,
        half.height,
        image::imageops::FilterType::Triangle,
    ))
}

/// Encode `image` as PNG at `path`, creating parent directories.
pub fn write_png(image: &image::RgbaImage, path: &Path) -> CovergenResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Downscale the frame by half and write it to `<dir>/<title>.png`.
#[tracing::instrument(skip(frame), fields(renders = frame.renders()))]
pub fn export_png(frame: &Frame, title: &str, dir: &Path) -> CovergenResult<PathBuf> {
    let path = dir.join(export_file_name(title));
    let half = downscale_half(frame)?;
    write_png(&half, &path)?;
    tracing::info!(path = %path.display(), width = half.width(), height = half.height(), "exported");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
