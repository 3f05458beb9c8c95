use std::{borrow::Cow, collections::HashMap};

use crate::{
    fonts::registry::FontFace,
    foundation::core::{Affine, FrameSize},
};

/// Horizontal shear applied for synthetic italics.
pub const OBLIQUE_SKEW: f64 = 0.2;

/// One shaped glyph run ready for drawing.
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub font: vello_cpu::peniko::FontData,
    pub font_size: f32,
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// Title shaped against a stack of faces.
#[derive(Clone, Debug)]
pub struct ShapedTitle {
    /// Face that drew the first glyph run, or the first usable candidate when
    /// nothing was drawn.
    pub face: FontFace,
    pub runs: Vec<GlyphRun>,
    pub width: f64,
    pub height: f64,
    /// Baseline of the first line, relative to the top of the layout box.
    pub baseline: f64,
}

impl ShapedTitle {
    /// Placement that centers the layout box in `frame`, sheared around the
    /// baseline when `italic` is set.
    pub fn transform(&self, frame: FrameSize, italic: bool) -> Affine {
        let x = (f64::from(frame.width) - self.width) / 2.0;
        let y = (f64::from(frame.height) - self.height) / 2.0;
        let place = Affine::translate((x, y));
        if !italic {
            return place;
        }
        place * Affine::new([1.0, 0.0, -OBLIQUE_SKEW, 1.0, OBLIQUE_SKEW * self.baseline, 0.0])
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.glyphs.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct RegisteredKey {
    bytes: usize,
    index: u32,
}

impl RegisteredKey {
    fn of(face: &FontFace) -> Self {
        Self {
            bytes: std::sync::Arc::as_ptr(&face.bytes) as usize,
            index: face.index,
        }
    }
}

#[derive(Clone)]
struct Registered {
    /// Parley family name, unique per registered face.
    family_name: String,
    face: FontFace,
    font: vello_cpu::peniko::FontData,
}

/// Shapes titles with Parley against faces handed out by the font registry.
///
/// Each face is registered once under its own family name, so faces split by
/// Unicode range stay separate entries of the font stack and Parley picks one per
/// cluster by coverage. Faces whose bytes do not parse are remembered and skipped.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: HashMap<RegisteredKey, Option<Registered>>,
    by_blob: HashMap<u64, Registered>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
            by_blob: HashMap::new(),
        }
    }

    /// Shape `text` as a single line. Every usable face in `candidates` joins the
    /// font stack in order; each cluster is drawn with the first face covering it.
    ///
    /// Returns `None` when no candidate can be registered.
    pub fn shape(
        &mut self,
        text: &str,
        size_px: f32,
        candidates: &[FontFace],
    ) -> Option<ShapedTitle> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return None;
        }
        let line: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        let mut stack = Vec::with_capacity(candidates.len());
        for face in candidates {
            match self.register(face) {
                Some(reg) => stack.push(reg),
                None => {
                    tracing::warn!(family = %face.family, weight = %face.weight, "font face could not be registered");
                }
            }
        }
        if stack.is_empty() {
            return None;
        }
        Some(self.layout(&line, size_px, &stack))
    }

    fn register(&mut self, face: &FontFace) -> Option<Registered> {
        let key = RegisteredKey::of(face);
        if let Some(known) = self.registered.get(&key) {
            return known.clone();
        }

        let family_name = format!("covergen-face-{}", self.registered.len());
        let blob = parley::fontique::Blob::from(face.bytes.to_vec());
        let blob_id = blob.id();
        let families = self.font_ctx.collection.register_fonts(
            blob,
            Some(parley::fontique::FontInfoOverride {
                family_name: Some(&family_name),
                ..Default::default()
            }),
        );
        let reg = (!families.is_empty()).then(|| Registered {
            family_name,
            face: face.clone(),
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.to_vec()),
                face.index,
            ),
        });
        if let Some(reg) = &reg {
            tracing::debug!(family = %face.family, weight = %face.weight, "font face registered");
            self.by_blob.insert(blob_id, reg.clone());
        }
        self.registered.insert(key, reg.clone());
        reg
    }

    fn layout(&mut self, text: &str, size_px: f32, stack: &[Registered]) -> ShapedTitle {
        let primary = &stack[0];
        let families: Vec<parley::style::FontFamily<'static>> = stack
            .iter()
            .map(|reg| parley::style::FontFamily::Named(Cow::Owned(reg.family_name.clone())))
            .collect();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::List(Cow::Owned(families)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(primary.face.weight.0)),
        ));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        let mut first_face = None;
        let mut baseline = None;
        for line in layout.lines() {
            baseline.get_or_insert(line.metrics().baseline);
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let reg = self
                    .by_blob
                    .get(&run.run().font().data.id())
                    .unwrap_or(primary);
                first_face.get_or_insert_with(|| reg.face.clone());
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();
                runs.push(GlyphRun {
                    font: reg.font.clone(),
                    font_size: run.run().font_size(),
                    glyphs,
                });
            }
        }

        ShapedTitle {
            face: first_face.unwrap_or_else(|| primary.face.clone()),
            runs,
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            baseline: f64::from(baseline.unwrap_or(0.0)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
