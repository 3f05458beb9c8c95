use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    fonts::catalog::WeightToken,
    foundation::error::{CovergenError, CovergenResult},
};

/// Provider of font stylesheets and the font files they reference.
pub trait FontSource {
    /// Stylesheet text describing `family` at `weight`; it references font files
    /// through `url(https://...)`.
    fn stylesheet(&mut self, family: &str, weight: WeightToken) -> CovergenResult<String>;

    /// Raw font file bytes behind a stylesheet URL.
    fn fetch(&mut self, url: &str) -> CovergenResult<Vec<u8>>;
}

/// Every `url(https://...)` target in `css`, in document order.
pub fn extract_font_urls(css: &str) -> Vec<String> {
    const OPEN: &str = "url(";
    let mut out = Vec::new();
    let mut rest = css;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(')') else {
            break;
        };
        let target = after[..end].trim().trim_matches(|c| c == '"' || c == '\'');
        if target.starts_with("https://") && target.len() > "https://".len() {
            out.push(target.to_string());
        }
        rest = &after[end + 1..];
    }
    out
}

/// Offline mirror of a web font service rooted at one directory.
///
/// The stylesheet for a family and weight lives at
/// `<root>/<Family_Name>-<weight>.css`; font URLs resolve to the file named by their
/// last path segment inside `<root>`.
#[derive(Clone, Debug)]
pub struct DirFontSource {
    root: PathBuf,
}

impl DirFontSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stylesheet_path(&self, family: &str, weight: WeightToken) -> PathBuf {
        let stem: String = family
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        self.root.join(format!("{stem}-{weight}.css"))
    }

    fn asset_path(&self, url: &str) -> CovergenResult<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let name = path.rsplit('/').next().unwrap_or_default();
        if name.is_empty() || name == "." || name == ".." {
            return Err(CovergenError::unavailable(format!(
                "font url '{url}' has no file name"
            )));
        }
        Ok(self.root.join(name))
    }
}

impl FontSource for DirFontSource {
    fn stylesheet(&mut self, family: &str, weight: WeightToken) -> CovergenResult<String> {
        let path = self.stylesheet_path(family, weight);
        let css = std::fs::read_to_string(&path)
            .with_context(|| format!("read font stylesheet '{}'", path.display()))?;
        Ok(css)
    }

    fn fetch(&mut self, url: &str) -> CovergenResult<Vec<u8>> {
        let path = self.asset_path(url)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// Source with nothing to offer; every family falls back to system fonts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFontSource;

impl FontSource for NoFontSource {
    fn stylesheet(&mut self, family: &str, weight: WeightToken) -> CovergenResult<String> {
        Err(CovergenError::unavailable(format!(
            "no font source configured for '{family}' {weight}"
        )))
    }

    fn fetch(&mut self, url: &str) -> CovergenResult<Vec<u8>> {
        Err(CovergenError::unavailable(format!(
            "no font source configured for '{url}'"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/source.rs"]
mod tests;
