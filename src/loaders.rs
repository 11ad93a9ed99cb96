//! Resource loading utilities
//!
//! Reads XSD files from disk and resolves the locations named by their
//! `include`/`import` declarations.

use crate::documents::XsdDocument;
use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::path::{Path, PathBuf};

/// Resource loader for XSD files
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a file as bytes, enforcing the size limit
    pub fn load_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let content = fs::read(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        self.limits.check_source_size(content.len())?;
        Ok(content)
    }

    /// Load and parse an XSD file
    pub fn load_schema(&self, path: &Path) -> Result<XsdDocument> {
        let content = self.load_bytes(path)?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded schema");
        XsdDocument::parse(path.to_string_lossy(), &content)
    }
}

/// Resolve an include location relative to the including document
///
/// Locations that are already absolute are returned unchanged.
pub fn resolve_location(including: &Path, location: &str) -> PathBuf {
    let location = Path::new(location);
    if location.is_absolute() {
        return location.to_path_buf();
    }
    match including.parent() {
        Some(dir) => dir.join(location),
        None => location.to_path_buf(),
    }
}
