use crate::{
    assets::ImageResource,
    fonts::{registry::FontFace, resolve::font_shorthand, state::FontState},
    foundation::core::{Affine, FrameSize, alpha_u8},
    foundation::error::{CovergenError, CovergenResult},
    geometry::fit::{Placement, cover_scale},
    overlay::{plan::plan_overlay, shade::shade_overlay},
    render::frame::Frame,
    settings::model::Settings,
    text::{draw::draw_title, layout::TextEngine},
};

/// Draws settings snapshots onto a [`Frame`].
///
/// Keeps the raster paint of the current background and the shaped-font state
/// between renders; neither affects the pixels a render produces.
pub struct Renderer {
    image_paint: Option<(u64, vello_cpu::Image)>,
    text: TextEngine,
    last_face: Option<FontFace>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            image_paint: None,
            text: TextEngine::new(),
            last_face: None,
        }
    }

    /// Face the last render drew its title with.
    pub fn last_face(&self) -> Option<&FontFace> {
        self.last_face.as_ref()
    }

    /// Clear `frame` and draw, in order: background image, darkening, overlay, title.
    ///
    /// Missing images and fonts are skipped with a warning; the frame always ends
    /// up holding a complete render.
    #[tracing::instrument(skip_all, fields(overlay = settings.overlay_type.as_str(), render = frame.renders() + 1))]
    pub fn render(
        &mut self,
        settings: &Settings,
        image: Option<&ImageResource>,
        base_scale: f64,
        fonts: &mut FontState,
        frame: &mut Frame,
    ) -> CovergenResult<()> {
        frame.clear();
        self.draw_background(settings, image, base_scale, frame);

        if let Some(plan) = plan_overlay(settings, frame.size()) {
            let layer = shade_overlay(&plan, frame.size())?;
            frame.composite(&layer)?;
        }

        self.last_face = None;
        if !settings.title.trim().is_empty() {
            let family = settings.effective_family();
            tracing::debug!(font = %font_shorthand(settings), "drawing title");
            fonts.load_family(family);
            let candidates = fonts.candidates(family, settings.weight());
            match self
                .text
                .shape(&settings.title, settings.font_size as f32, &candidates)
            {
                Some(title) => {
                    draw_title(frame, &title, settings)?;
                    self.last_face = Some(title.face);
                }
                None => tracing::warn!(family, "no usable font face, title skipped"),
            }
        }

        frame.finish_render();
        Ok(())
    }

    fn draw_background(
        &mut self,
        settings: &Settings,
        image: Option<&ImageResource>,
        base_scale: f64,
        frame: &mut Frame,
    ) {
        let size = frame.size();
        let darkening = alpha_u8(settings.darkening);
        if image.is_none() && darkening == 0 {
            return;
        }

        let (w, h) = size.as_u16();
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        if let Some(image) = image {
            match self.image_paint_for(image) {
                Ok(paint) => {
                    let placement = Placement::compute(size, image.dimensions(), base_scale, settings);
                    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                    ctx.set_transform(affine_to_cpu(placement.to_affine()));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        0.0,
                        0.0,
                        f64::from(image.width()),
                        f64::from(image.height()),
                    ));
                }
                Err(err) => tracing::warn!(error = %err, "background image skipped"),
            }
        }

        if darkening > 0 {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, darkening));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            ));
        }

        ctx.flush();
        ctx.render_to_pixmap(frame.pixmap_mut());
    }

    fn image_paint_for(&mut self, image: &ImageResource) -> CovergenResult<vello_cpu::Image> {
        if let Some((id, paint)) = &self.image_paint
            && *id == image.id()
        {
            return Ok(paint.clone());
        }

        let pixmap = image_premul_bytes_to_pixmap(image.rgba8_premul(), image.width(), image.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_paint = Some((image.id(), paint.clone()));
        Ok(paint)
    }
}

/// Render one snapshot onto a fresh frame of `size`.
///
/// The cover scale is derived from the image here; sessions cache it per upload.
pub fn render_frame(
    settings: &Settings,
    image: Option<&ImageResource>,
    fonts: &mut FontState,
    size: FrameSize,
) -> CovergenResult<Frame> {
    let base_scale = image.map_or(1.0, |img| cover_scale(size, img.width(), img.height()));
    let mut frame = Frame::new(size);
    Renderer::new().render(settings, image, base_scale, fonts, &mut frame)?;
    Ok(frame)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CovergenResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CovergenError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CovergenError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CovergenError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
