/// Convenience result type used across covergen.
pub type CovergenResult<T> = Result<T, CovergenError>;

/// Top-level error taxonomy used by library APIs.
///
/// The render path itself is best-effort: missing images or fonts are logged and
/// skipped rather than surfaced through this type.
#[derive(thiserror::Error, Debug)]
pub enum CovergenError {
    /// Invalid caller-provided data (settings, sizes, catalog documents).
    #[error("validation error: {0}")]
    Validation(String),

    /// An image or font could not be fetched, decoded or registered.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Raster backend failures while drawing or encoding a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing settings and catalogs.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CovergenError {
    /// Build a [`CovergenError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CovergenError::ResourceUnavailable`] value.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Build a [`CovergenError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CovergenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CovergenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
