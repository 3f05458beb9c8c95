use crate::{fonts::catalog::FontCapability, settings::model::Settings};

/// State of the bold toggle for the active family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoldControl {
    pub enabled: bool,
}

/// Reconcile `settings.bold` with what `capability` offers.
///
/// Without a 700 weight the toggle is disabled and bold is forced off; otherwise
/// the user's choice is kept.
pub fn resolve_bold(settings: &Settings, capability: &FontCapability) -> (Settings, BoldControl) {
    let enabled = capability.supports_bold();
    let mut next = settings.clone();
    if !enabled {
        next.bold = false;
    }
    (next, BoldControl { enabled })
}

/// `"<style> normal <weight> <size>px \"<family>\""`, the shorthand used to key faces.
pub fn font_shorthand(settings: &Settings) -> String {
    let style = if settings.italic { "italic" } else { "normal" };
    format!(
        "{style} normal {} {}px \"{}\"",
        settings.weight(),
        settings.font_size,
        settings.effective_family()
    )
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/resolve.rs"]
mod tests;
