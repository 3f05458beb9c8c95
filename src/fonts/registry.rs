use std::{collections::HashMap, sync::Arc};

use crate::{
    fonts::{
        catalog::{FontCapability, WeightToken},
        source::{FontSource, extract_font_urls},
    },
    foundation::error::{CovergenError, CovergenResult},
};

/// Where a face came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceOrigin {
    /// Fetched for the requested family.
    Fetched,
    /// Installed on the host, used when the requested face is missing.
    System,
}

/// Font file bytes registered under a family and weight.
#[derive(Clone)]
pub struct FontFace {
    pub family: String,
    pub weight: WeightToken,
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    pub origin: FaceOrigin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("origin", &self.origin)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: WeightToken,
}

impl FaceKey {
    fn new(family: &str, weight: WeightToken) -> Self {
        Self {
            family: family.to_string(),
            weight,
        }
    }
}

/// Outcome of [`FontRegistry::load_family`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Weights fetched by this call.
    pub fetched: Vec<WeightToken>,
    /// Weights that were already loaded and not fetched again.
    pub cached: Vec<WeightToken>,
    /// Weights whose fetch failed, with the reason.
    pub failed: Vec<(WeightToken, String)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loaded faces keyed by (family, weight), plus a lazily-built system fallback.
///
/// Failed weights are remembered and not fetched again until
/// [`FontRegistry::retry_failed`] clears them for the family.
pub struct FontRegistry {
    faces: HashMap<FaceKey, Vec<FontFace>>,
    failed: HashMap<FaceKey, String>,
    system: Option<SystemFonts>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            failed: HashMap::new(),
            system: Some(SystemFonts::default()),
        }
    }

    /// Registry that never consults host fonts.
    pub fn without_system_fallback() -> Self {
        Self {
            faces: HashMap::new(),
            failed: HashMap::new(),
            system: None,
        }
    }

    pub fn is_loaded(&self, family: &str, weight: WeightToken) -> bool {
        self.faces.contains_key(&FaceKey::new(family, weight))
    }

    /// Fetch every weight in `capability.load_set()` not loaded yet.
    ///
    /// Failures are reported and never abort. A failed weight is logged once and
    /// reported from memory on later calls.
    #[tracing::instrument(skip(self, capability, source))]
    pub fn load_family(
        &mut self,
        family: &str,
        capability: &FontCapability,
        source: &mut dyn FontSource,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for weight in capability.load_set() {
            let key = FaceKey::new(family, weight);
            if self.faces.contains_key(&key) {
                report.cached.push(weight);
                continue;
            }
            if let Some(reason) = self.failed.get(&key) {
                tracing::debug!(family, %weight, "font weight failed earlier, not refetched");
                report.failed.push((weight, reason.clone()));
                continue;
            }
            match fetch_faces(family, weight, source) {
                Ok(faces) => {
                    tracing::debug!(family, %weight, faces = faces.len(), "font weight loaded");
                    self.faces.insert(key, faces);
                    report.fetched.push(weight);
                }
                Err(err) => {
                    tracing::warn!(family, %weight, error = %err, "font weight unavailable");
                    report.failed.push((weight, err.to_string()));
                    self.failed.insert(key, err.to_string());
                }
            }
        }
        report
    }

    /// Forget earlier failures of `family` so the next load fetches them again.
    pub fn retry_failed(&mut self, family: &str) {
        self.failed.retain(|key, _| key.family != family);
    }

    /// Faces to try for `family` at `weight`, best first: the exact face, the same
    /// family at regular weight, then the system sans-serif face.
    pub fn candidates(&mut self, family: &str, weight: WeightToken) -> Vec<FontFace> {
        let mut out = Vec::new();
        let mut keys = vec![FaceKey::new(family, weight)];
        if weight != WeightToken::REGULAR {
            keys.push(FaceKey::new(family, WeightToken::REGULAR));
        }
        for key in keys {
            if let Some(faces) = self.faces.get(&key) {
                out.extend(faces.iter().cloned());
            }
        }
        if let Some(system) = self.system.as_mut()
            && let Some(face) = system.face(weight)
        {
            out.push(face);
        }
        out
    }
}

fn fetch_faces(
    family: &str,
    weight: WeightToken,
    source: &mut dyn FontSource,
) -> CovergenResult<Vec<FontFace>> {
    let css = source.stylesheet(family, weight)?;
    let urls = extract_font_urls(&css);
    if urls.is_empty() {
        return Err(CovergenError::unavailable(format!(
            "stylesheet for '{family}' {weight} references no font files"
        )));
    }
    let mut faces = Vec::with_capacity(urls.len());
    for url in urls {
        let bytes = source.fetch(&url)?;
        if bytes.is_empty() {
            return Err(CovergenError::unavailable(format!("font file '{url}' is empty")));
        }
        faces.push(FontFace {
            family: family.to_string(),
            weight,
            bytes: Arc::new(bytes),
            index: 0,
            origin: FaceOrigin::Fetched,
        });
    }
    Ok(faces)
}

/// Host font database, only scanned the first time a fallback is needed.
#[derive(Default)]
struct SystemFonts {
    db: Option<usvg::fontdb::Database>,
    faces: HashMap<WeightToken, Option<FontFace>>,
}

impl SystemFonts {
    fn face(&mut self, weight: WeightToken) -> Option<FontFace> {
        if let Some(cached) = self.faces.get(&weight) {
            return cached.clone();
        }
        let db = self.db.get_or_insert_with(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "system font database loaded");
            db
        });
        let face = query_sans_serif(db, weight);
        if face.is_none() {
            tracing::warn!(%weight, "no system fallback font found");
        }
        self.faces.insert(weight, face.clone());
        face
    }
}

fn query_sans_serif(db: &usvg::fontdb::Database, weight: WeightToken) -> Option<FontFace> {
    let families = [usvg::fontdb::Family::SansSerif];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight(weight.0),
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "sans-serif".to_string());
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    Some(FontFace {
        family,
        weight,
        bytes: Arc::new(bytes),
        index,
        origin: FaceOrigin::System,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/registry.rs"]
mod tests;
