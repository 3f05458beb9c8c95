use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{CovergenError, CovergenResult};

/// Which overlay construction tints the frame above the background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayType {
    /// Flat accent-colored rectangle.
    Fill,
    /// Horizontal band peaking at the horizontal center.
    GradientHorizontal,
    /// Vertical band peaking at the vertical center.
    #[default]
    GradientVertical,
    /// Ramp from the top edge downward.
    GradientTop,
    /// Ramp from the bottom edge upward.
    GradientBottom,
    /// Ramp from the left edge rightward.
    GradientLeft,
    /// Ramp from the right edge leftward.
    GradientRight,
    /// Horizontally elongated glow around the frame center.
    GradientRadial,
}

impl OverlayType {
    pub const ALL: [Self; 8] = [
        Self::Fill,
        Self::GradientHorizontal,
        Self::GradientVertical,
        Self::GradientTop,
        Self::GradientBottom,
        Self::GradientLeft,
        Self::GradientRight,
        Self::GradientRadial,
    ];

    /// Whether `gradientSize` has any effect (the size control is hidden otherwise).
    pub fn uses_size(self) -> bool {
        !matches!(self, Self::Fill)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::GradientHorizontal => "gradient-horizontal",
            Self::GradientVertical => "gradient-vertical",
            Self::GradientTop => "gradient-top",
            Self::GradientBottom => "gradient-bottom",
            Self::GradientLeft => "gradient-left",
            Self::GradientRight => "gradient-right",
            Self::GradientRadial => "gradient-radial",
        }
    }
}

impl std::str::FromStr for OverlayType {
    type Err = CovergenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CovergenError::validation(format!("unknown overlay type '{s}'")))
    }
}

/// Snapshot of every user-controlled parameter for one render.
///
/// Snapshots are replaced wholesale; the renderer only ever borrows one immutably.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Multiplier on top of the cover-fit base scale.
    #[serde(alias = "scale")]
    pub image_scale: f64,
    /// Horizontal pan as a fraction of frame width.
    pub pos_x: f64,
    /// Vertical pan as a fraction of frame height.
    pub pos_y: f64,
    /// Opacity of the black layer drawn over the background.
    pub darkening: f64,
    pub title: String,
    pub text_color: String,
    /// Accent color used by overlays and the glow.
    pub section_color: String,
    pub overlay_type: OverlayType,
    /// Peak overlay opacity.
    pub gradient_amount: f64,
    /// Spatial extent of the overlay as a fraction of the frame.
    pub gradient_size: f64,
    /// Glow blur radius in pixels.
    pub glow_amount: f64,
    /// HSL lightness added to the accent to derive the glow tint.
    pub glow_lightness: f64,
    pub font_family: String,
    pub font_size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_scale: 1.0,
            pos_x: 0.0,
            pos_y: 0.0,
            darkening: 0.0,
            title: "Music".to_string(),
            text_color: "#ffffff".to_string(),
            section_color: "#00ff00".to_string(),
            overlay_type: OverlayType::GradientVertical,
            gradient_amount: 0.5,
            gradient_size: 0.5,
            glow_amount: 20.0,
            glow_lightness: 0.3,
            font_family: crate::fonts::catalog::DEFAULT_FAMILY.to_string(),
            font_size: 250,
            bold: false,
            italic: false,
        }
    }
}

impl Settings {
    pub fn from_json_str(s: &str) -> CovergenResult<Self> {
        let settings: Self = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> CovergenResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> CovergenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no producer should ever emit. Range slips on fractions are
    /// tolerated here and clamped at draw time instead.
    pub fn validate(&self) -> CovergenResult<()> {
        if self.font_size == 0 {
            return Err(CovergenError::validation("fontSize must be > 0"));
        }
        let finite = [
            ("imageScale", self.image_scale),
            ("posX", self.pos_x),
            ("posY", self.pos_y),
            ("darkening", self.darkening),
            ("gradientAmount", self.gradient_amount),
            ("gradientSize", self.gradient_size),
            ("glowAmount", self.glow_amount),
            ("glowLightness", self.glow_lightness),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(CovergenError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Face weight requested by the `bold` toggle.
    pub fn weight(&self) -> crate::fonts::catalog::WeightToken {
        if self.bold {
            crate::fonts::catalog::WeightToken::BOLD
        } else {
            crate::fonts::catalog::WeightToken::REGULAR
        }
    }

    /// Family to draw with; an empty field falls back to the default family.
    pub fn effective_family(&self) -> &str {
        let family = self.font_family.trim();
        if family.is_empty() {
            crate::fonts::catalog::DEFAULT_FAMILY
        } else {
            family
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/settings/model.rs"]
mod tests;
