use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
};

use anyhow::Context;

use crate::foundation::error::{CovergenError, CovergenResult};

/// Family selected when nothing else is requested.
pub const DEFAULT_FAMILY: &str = "Noto Sans";

/// Numeric CSS font weight (`400`, `700`, ...).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WeightToken(pub u16);

impl WeightToken {
    pub const REGULAR: Self = Self(400);
    pub const BOLD: Self = Self(700);

    /// Parse an upright catalog variant: `"regular"` or a bare number such as `"700"`.
    /// Italic variants (`"italic"`, `"700italic"`) yield `None`.
    pub fn from_variant(variant: &str) -> Option<Self> {
        let v = variant.trim();
        if v.eq_ignore_ascii_case("regular") {
            return Some(Self::REGULAR);
        }
        v.parse::<u16>()
            .ok()
            .filter(|w| (1..=1000).contains(w))
            .map(Self)
    }
}

impl std::fmt::Display for WeightToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weights a family can be rendered with. 400 is always assumed present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCapability {
    weights: BTreeSet<WeightToken>,
}

impl Default for FontCapability {
    fn default() -> Self {
        Self {
            weights: BTreeSet::from([WeightToken::REGULAR]),
        }
    }
}

impl FontCapability {
    pub fn from_variants<'a>(variants: impl IntoIterator<Item = &'a str>) -> Self {
        let mut cap = Self::default();
        cap.weights
            .extend(variants.into_iter().filter_map(WeightToken::from_variant));
        cap
    }

    pub fn supports_bold(&self) -> bool {
        self.weights.contains(&WeightToken::BOLD)
    }

    /// Weights fetched when the family is loaded: regular, plus bold when available,
    /// so toggling bold later needs no further fetch.
    pub fn load_set(&self) -> Vec<WeightToken> {
        let mut out = vec![WeightToken::REGULAR];
        if self.supports_bold() {
            out.push(WeightToken::BOLD);
        }
        out
    }

    pub fn weights(&self) -> impl Iterator<Item = WeightToken> + '_ {
        self.weights.iter().copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontCatalogEntry {
    pub family: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

impl FontCatalogEntry {
    /// Display label, e.g. `"Noto Sans (sans-serif)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.family, self.category)
    }
}

#[derive(serde::Deserialize)]
struct CatalogDocument {
    items: Vec<FontCatalogEntry>,
}

/// Available font families with per-family capabilities resolved once at load.
#[derive(Clone, Debug, Default)]
pub struct FontCatalog {
    entries: Vec<FontCatalogEntry>,
    capabilities: HashMap<String, FontCapability>,
}

fn family_order(a: &str, b: &str) -> std::cmp::Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

impl FontCatalog {
    /// Entries are kept sorted by family name, ignoring case first.
    pub fn new(mut entries: Vec<FontCatalogEntry>) -> Self {
        entries.sort_by(|a, b| family_order(&a.family, &b.family));
        let capabilities = entries
            .iter()
            .map(|e| {
                (
                    e.family.clone(),
                    FontCapability::from_variants(e.variants.iter().map(String::as_str)),
                )
            })
            .collect();
        Self {
            entries,
            capabilities,
        }
    }

    /// Parse a `{ "items": [ { family, category, variants } ] }` document.
    pub fn from_json_str(s: &str) -> CovergenResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(s)?;
        if doc.items.iter().any(|e| e.family.trim().is_empty()) {
            return Err(CovergenError::validation(
                "font catalog entries need a family",
            ));
        }
        Ok(Self::new(doc.items))
    }

    pub fn from_path(path: &Path) -> CovergenResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read font catalog '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Entries sorted by family.
    pub fn entries(&self) -> &[FontCatalogEntry] {
        &self.entries
    }

    pub fn find(&self, family: &str) -> Option<&FontCatalogEntry> {
        self.entries.iter().find(|e| e.family == family)
    }

    /// Unknown families only get the implicit regular weight.
    pub fn capability(&self, family: &str) -> FontCapability {
        self.capabilities.get(family).cloned().unwrap_or_default()
    }

    /// The default family when listed, else the first entry alphabetically.
    pub fn initial_family(&self) -> &str {
        if self.find(DEFAULT_FAMILY).is_some() {
            return DEFAULT_FAMILY;
        }
        self.entries
            .first()
            .map(|e| e.family.as_str())
            .unwrap_or(DEFAULT_FAMILY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/catalog.rs"]
mod tests;
