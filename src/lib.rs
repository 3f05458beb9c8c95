//! Covergen composes square cover art on the CPU.
//!
//! A render takes an immutable [`Settings`] snapshot, an optional background
//! [`ImageResource`] and the loaded fonts, and redraws a fixed-size [`Frame`]:
//!
//! - cover-fit, zoomed and panned background image
//! - black darkening layer
//! - accent-colored overlay (flat fill, linear bands and ramps, stretched radial glow)
//! - centered title with a blurred glow in a lightened accent tint
//!
//! [`Session`] wraps the pipeline with the editing operations of an interactive
//! front end, and [`export_png`] writes the finished frame at half resolution.
#![forbid(unsafe_code)]

mod assets;
mod color;
mod export;
mod fonts;
mod foundation;
mod geometry;
mod overlay;
mod render;
mod session;
mod settings;
mod text;

pub use crate::assets::ImageResource;
pub use crate::assets::decode::{decode_image, from_rgba_image, load_image};
pub use crate::color::hsl::{Hsl, hex_with_alpha, hsl_to_rgb, lighten, parse_hex, rgb_to_hsl};
pub use crate::export::{downscale_half, export_file_name, export_png, write_png};
pub use crate::fonts::catalog::{
    DEFAULT_FAMILY, FontCapability, FontCatalog, FontCatalogEntry, WeightToken,
};
pub use crate::fonts::registry::{FaceOrigin, FontFace, FontRegistry, LoadReport};
pub use crate::fonts::resolve::{BoldControl, font_shorthand, resolve_bold};
pub use crate::fonts::source::{DirFontSource, FontSource, NoFontSource, extract_font_urls};
pub use crate::fonts::state::FontState;
pub use crate::foundation::core::{Affine, FrameSize, Point, Rect, Rgb8, Vec2, alpha_u8};
pub use crate::foundation::error::{CovergenError, CovergenResult};
pub use crate::geometry::fit::{Placement, cover_scale};
pub use crate::overlay::plan::{ColorStop, ColorStops, OverlayPlan, plan_overlay, stop_alpha};
pub use crate::overlay::shade::shade_overlay;
pub use crate::render::blur::{MAX_BLUR_RADIUS, glow_kernel};
pub use crate::render::frame::Frame;
pub use crate::render::pipeline::{Renderer, render_frame};
pub use crate::session::Session;
pub use crate::settings::model::{OverlayType, Settings};
