//! Corpus manifest loading
//!
//! The corpus root carries a `metadata_index.json` manifest listing every
//! template's identity and keywords; the tiered artifacts live next to it
//! under `{category}/{id}/{tier}.py`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;

/// Manifest file name expected at the corpus root
pub const MANIFEST_FILE: &str = "metadata_index.json";

/// One template entry in the corpus manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Template identifier, unique within the corpus
    pub id: String,
    /// Category directory the template lives under
    pub category: String,
    /// Human-readable title
    pub title: String,
    /// Keywords used for retrieval
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Decoded corpus manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared templates
    #[serde(default)]
    pub templates: Vec<ManifestEntry>,
}

/// Load the manifest under `corpus_root`
///
/// A missing manifest yields an empty corpus; the retriever then never
/// matches and every request falls through to the backend. A manifest
/// that exists but cannot be read or decoded is a deployment problem and
/// propagates as an error.
pub fn load_manifest(corpus_root: &Path) -> Result<Manifest, GenerationError> {
    let path = corpus_root.join(MANIFEST_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no corpus manifest, starting with empty corpus");
        return Ok(Manifest::default());
    }

    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| GenerationError::Manifest {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_manifest_is_empty_corpus() {
        let dir = TempDir::new().unwrap();
        let manifest = load_manifest(dir.path()).unwrap();
        assert!(manifest.templates.is_empty());
    }

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{
                "templates": [
                    {
                        "id": "react_agent",
                        "category": "agents",
                        "title": "ReAct Agent",
                        "keywords": ["react", "agent", "tools"]
                    }
                ]
            }"#,
        )
        .unwrap();

        let manifest = load_manifest(dir.path()).unwrap();
        assert_eq!(manifest.templates.len(), 1);
        assert_eq!(manifest.templates[0].id, "react_agent");
        assert_eq!(manifest.templates[0].keywords.len(), 3);
    }

    #[test]
    fn test_malformed_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{not json").unwrap();

        let result = load_manifest(dir.path());
        assert!(matches!(result, Err(GenerationError::Manifest { .. })));
    }

    #[test]
    fn test_entry_without_keywords_decodes() {
        let entry: ManifestEntry = serde_json::from_str(
            r#"{"id": "x", "category": "agents", "title": "X"}"#,
        )
        .unwrap();
        assert!(entry.keywords.is_empty());
    }
}
