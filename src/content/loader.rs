//! Loading content catalogues from JSON files.

use super::ContentCatalog;
use crate::error::ContentError;
use std::fs;
use std::path::Path;
use tracing::info;

impl ContentCatalog {
    /// Parses and validates a catalogue from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let catalog: ContentCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            templates = catalog.spell_templates.len(),
            enchantments = catalog.enchantments.len(),
            floors = catalog.enemies.len(),
            "loaded content"
        );
        Ok(catalog)
    }

    pub fn to_json_pretty(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
