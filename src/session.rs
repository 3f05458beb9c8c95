use std::path::{Path, PathBuf};

use crate::{
    assets::{ImageResource, decode::decode_image},
    export::export_png,
    fonts::{
        registry::{FontFace, LoadReport},
        resolve::{BoldControl, resolve_bold},
        state::FontState,
    },
    foundation::core::{FrameSize, Point},
    foundation::error::CovergenResult,
    geometry::fit::cover_scale,
    render::{frame::Frame, pipeline::Renderer},
    settings::model::Settings,
};

#[derive(Clone, Copy, Debug)]
struct DragStart {
    pointer: Point,
    pos_x: f64,
    pos_y: f64,
}

/// One editing session: the frame, the current settings snapshot, the loaded
/// background and fonts.
///
/// Every input operation builds the next snapshot, swaps it in and redraws, so a
/// render never observes a half-applied change.
pub struct Session {
    frame: Frame,
    settings: Settings,
    image: Option<ImageResource>,
    base_scale: f64,
    fonts: FontState,
    renderer: Renderer,
    bold: BoldControl,
    drag: Option<DragStart>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("frame", &self.frame)
            .field("settings", &self.settings)
            .field("image", &self.image.as_ref().map(ImageResource::dimensions))
            .field("base_scale", &self.base_scale)
            .field("bold", &self.bold)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session with default settings on the catalog's initial family.
    pub fn new(size: FrameSize, fonts: FontState) -> Self {
        let settings = Settings {
            font_family: fonts.catalog().initial_family().to_string(),
            ..Settings::default()
        };
        let (settings, bold) = resolve_bold(&settings, &fonts.capability(&settings.font_family));
        Self {
            frame: Frame::new(size),
            settings,
            image: None,
            base_scale: 1.0,
            fonts,
            renderer: Renderer::new(),
            bold,
            drag: None,
        }
    }

    /// Session starting from an existing snapshot.
    pub fn with_settings(size: FrameSize, fonts: FontState, settings: Settings) -> CovergenResult<Self> {
        settings.validate()?;
        let (settings, bold) = resolve_bold(&settings, &fonts.capability(settings.effective_family()));
        Ok(Self {
            frame: Frame::new(size),
            settings,
            image: None,
            base_scale: 1.0,
            fonts,
            renderer: Renderer::new(),
            bold,
            drag: None,
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn image(&self) -> Option<&ImageResource> {
        self.image.as_ref()
    }

    /// Cover-fit scale of the current image, recomputed once per upload.
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    pub fn bold_control(&self) -> BoldControl {
        self.bold
    }

    pub fn fonts(&self) -> &FontState {
        &self.fonts
    }

    /// Face the last render drew its title with.
    pub fn last_face(&self) -> Option<&FontFace> {
        self.renderer.last_face()
    }

    /// Redraw the frame from the current snapshot.
    pub fn render(&mut self) -> CovergenResult<()> {
        self.renderer.render(
            &self.settings,
            self.image.as_ref(),
            self.base_scale,
            &mut self.fonts,
            &mut self.frame,
        )
    }

    /// Replace the background, recompute its cover scale and reset the zoom.
    pub fn upload_image(&mut self, image: ImageResource) -> CovergenResult<()> {
        let (iw, ih) = image.dimensions();
        self.base_scale = cover_scale(self.frame.size(), iw, ih);
        tracing::info!(width = iw, height = ih, base_scale = self.base_scale, "image uploaded");
        self.image = Some(image);
        self.drag = None;
        self.settings = Settings {
            image_scale: 1.0,
            ..self.settings.clone()
        };
        self.render()
    }

    /// Decode encoded image bytes and upload them; on failure nothing changes.
    pub fn upload_bytes(&mut self, bytes: &[u8]) -> CovergenResult<()> {
        let image = decode_image(bytes)?;
        self.upload_image(image)
    }

    /// Start repositioning at `pointer` (frame pixels). Ignored with no image.
    pub fn begin_drag(&mut self, pointer: Point) {
        if self.image.is_none() {
            return;
        }
        self.drag = Some(DragStart {
            pointer,
            pos_x: self.settings.pos_x,
            pos_y: self.settings.pos_y,
        });
    }

    /// Pan by the pointer delta since `begin_drag`, as a fraction of the frame.
    pub fn drag_to(&mut self, pointer: Point) -> CovergenResult<()> {
        let Some(start) = self.drag else {
            return Ok(());
        };
        let size = self.frame.size();
        let delta = pointer - start.pointer;
        self.settings = Settings {
            pos_x: start.pos_x + delta.x / f64::from(size.width),
            pos_y: start.pos_y + delta.y / f64::from(size.height),
            ..self.settings.clone()
        };
        self.render()
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Apply a field change to a copy of the settings, then redraw.
    ///
    /// Invalid results are rejected and leave the current snapshot in place. Bold
    /// stays off while the active family has no bold weight.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) -> CovergenResult<()> {
        let mut next = self.settings.clone();
        change(&mut next);
        next.validate()?;
        let (next, bold) = resolve_bold(&next, &self.fonts.capability(next.effective_family()));
        self.settings = next;
        self.bold = bold;
        self.render()
    }

    /// Load `family`, reconcile bold with its weights, switch to it and redraw.
    pub fn select_font(&mut self, family: &str) -> CovergenResult<LoadReport> {
        let report = self.fonts.select_family(family);
        let next = Settings {
            font_family: family.to_string(),
            ..self.settings.clone()
        };
        let (next, bold) = resolve_bold(&next, &self.fonts.capability(family));
        self.settings = next;
        self.bold = bold;
        self.render()?;
        Ok(report)
    }

    /// Flip bold when the family offers it; a no-op while the control is disabled.
    pub fn toggle_bold(&mut self) -> CovergenResult<()> {
        if !self.bold.enabled {
            tracing::debug!(family = self.settings.effective_family(), "bold unavailable, toggle ignored");
            return Ok(());
        }
        let family = self.settings.effective_family().to_string();
        self.fonts.load_family(&family);
        self.settings = Settings {
            bold: !self.settings.bold,
            ..self.settings.clone()
        };
        self.render()
    }

    pub fn toggle_italic(&mut self) -> CovergenResult<()> {
        self.settings = Settings {
            italic: !self.settings.italic,
            ..self.settings.clone()
        };
        self.render()
    }

    /// Write the half-size PNG of the current frame into `dir`.
    pub fn export(&self, dir: &Path) -> CovergenResult<PathBuf> {
        export_png(&self.frame, &self.settings.title, dir)
    }
}
