use crate::{
    color::hsl::{lighten, parse_hex},
    foundation::core::{Affine, FrameSize, Rgb8},
    foundation::error::CovergenResult,
    render::{
        blur::{blur_visible_region, glow_kernel},
        frame::Frame,
    },
    settings::model::Settings,
    text::layout::ShapedTitle,
};

/// Rasterize the title's glyphs in a flat color onto a transparent layer the size
/// of `size`.
pub fn glyph_layer(title: &ShapedTitle, size: FrameSize, transform: Affine, color: Rgb8) -> Vec<u8> {
    let (w, h) = size.as_u16();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::new(transform.as_coeffs()));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
    for run in &title.runs {
        ctx.glyph_run(&run.font)
            .font_size(run.font_size)
            .fill_glyphs(run.glyphs.iter().copied());
    }
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().to_vec()
}

/// Draw the glow pass (when enabled) and then the fill text over `frame`.
///
/// The glow is a blurred copy of the glyphs in the lightened accent color. It only
/// lives in a scratch layer, so nothing carries over into the next render.
pub fn draw_title(frame: &mut Frame, title: &ShapedTitle, settings: &Settings) -> CovergenResult<()> {
    let size = frame.size();
    let transform = title.transform(size, settings.italic);

    if let Some((radius, sigma)) = glow_kernel(settings.glow_amount) {
        let glow = lighten(&settings.section_color, settings.glow_lightness);
        let layer = glyph_layer(title, size, transform, glow);
        let blurred = blur_visible_region(&layer, size.width, size.height, radius, sigma)?;
        frame.composite(&blurred)?;
    }

    let fill = parse_hex(&settings.text_color);
    let layer = glyph_layer(title, size, transform, fill);
    frame.composite(&layer)
}

#[cfg(test)]
#[path = "../../tests/unit/text/draw.rs"]
mod tests;
