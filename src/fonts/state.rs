use crate::fonts::{
    catalog::{FontCapability, FontCatalog, WeightToken},
    registry::{FontFace, FontRegistry, LoadReport},
    source::{FontSource, NoFontSource},
};

/// Everything the renderer needs to turn a family name into drawable faces.
pub struct FontState {
    catalog: FontCatalog,
    registry: FontRegistry,
    source: Box<dyn FontSource>,
}

impl std::fmt::Debug for FontState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontState")
            .field("families", &self.catalog.entries().len())
            .finish_non_exhaustive()
    }
}

impl FontState {
    pub fn new(catalog: FontCatalog, registry: FontRegistry, source: Box<dyn FontSource>) -> Self {
        Self {
            catalog,
            registry,
            source,
        }
    }

    /// No font source: every family resolves to the host fallback face.
    pub fn offline(catalog: FontCatalog) -> Self {
        Self::new(catalog, FontRegistry::new(), Box::new(NoFontSource))
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn capability(&self, family: &str) -> FontCapability {
        self.catalog.capability(family)
    }

    /// Make every weight of `family` the catalog lists ready for drawing.
    ///
    /// This is the one point where a render waits on font data.
    pub fn load_family(&mut self, family: &str) -> LoadReport {
        let capability = self.catalog.capability(family);
        self.registry
            .load_family(family, &capability, self.source.as_mut())
    }

    /// Load `family` after the user picked it, retrying weights that failed before.
    pub fn select_family(&mut self, family: &str) -> LoadReport {
        self.registry.retry_failed(family);
        self.load_family(family)
    }

    pub fn candidates(&mut self, family: &str, weight: WeightToken) -> Vec<FontFace> {
        self.registry.candidates(family, weight)
    }
}
