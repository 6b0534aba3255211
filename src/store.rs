//! JSON persistence for documents and their run state.
//!
//! Documents live as `{name}.json` files under a root directory; the
//! execution collaborator's run state (per-step instance values) lives in a
//! sibling `{name}.values.json` file. Decode failures surface with context,
//! never defaulting away stored content. A missing values file is the one
//! exception: it just means nothing has run yet.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::document::{Document, StepValues};

/// Directory-rooted store for document and run-state files
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    pub fn values_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.values.json"))
    }

    pub fn load_document(&self, name: &str) -> Result<Document> {
        Self::read_document(&self.document_path(name))
    }

    pub fn save_document(&self, name: &str, document: &Document) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create store directory {}", self.root.display()))?;
        let path = self.document_path(name);
        let json = serde_json::to_string_pretty(document)
            .context("Failed to serialize document")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write document {}", path.display()))?;
        tracing::debug!(document = %document.id, path = %path.display(), "saved document");
        Ok(())
    }

    /// Run state for a document; an absent file yields an empty map
    pub fn load_values(&self, name: &str) -> Result<StepValues> {
        Self::read_values(&self.values_path(name))
    }

    pub fn save_values(&self, name: &str, values: &StepValues) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create store directory {}", self.root.display()))?;
        let path = self.values_path(name);
        let json = serde_json::to_string_pretty(values)
            .context("Failed to serialize run state")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write run state {}", path.display()))?;
        Ok(())
    }

    /// Load a document from an explicit path (CLI entry point)
    pub fn read_document(path: &Path) -> Result<Document> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed document {}", path.display()))
    }

    /// Load run state from an explicit path; an absent file yields an empty map
    pub fn read_values(path: &Path) -> Result<StepValues> {
        if !path.exists() {
            return Ok(StepValues::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run state {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Malformed run state {}", path.display()))
    }

    /// Sibling run-state path for a document path: `doc.json` -> `doc.values.json`
    pub fn sibling_values_path(document_path: &Path) -> PathBuf {
        document_path.with_extension("values.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Step, StepInstanceValue, StepType};
    use tempfile::TempDir;

    fn sample_document() -> Document {
        let mut doc = Document::new("Deploy");
        doc.steps.push(Step::with_content(StepType::Markdown, "<h1>Deploy</h1>"));
        doc.steps.push(Step::new(StepType::Script));
        doc
    }

    #[test]
    fn test_document_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());
        let doc = sample_document();

        store.save_document("deploy", &doc).unwrap();
        let loaded = store.load_document("deploy").unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_values_round_trip_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = DocumentStore::new(temp_dir.path());

        // Nothing has run yet
        assert!(store.load_values("deploy").unwrap().is_empty());

        let doc = sample_document();
        let id = doc.steps.get(0).unwrap().id;
        let mut values = StepValues::default();
        values.insert(
            id,
            StepInstanceValue {
                completed: true,
                ..StepInstanceValue::default()
            },
        );

        store.save_values("deploy", &values).unwrap();
        let loaded = store.load_values("deploy").unwrap();
        assert_eq!(loaded, values);
    }

    #[test]
    fn test_malformed_document_surfaces_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{nope").unwrap();

        let err = DocumentStore::read_document(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed document"));
    }

    #[test]
    fn test_sibling_values_path() {
        let path = Path::new("/docs/deploy.json");
        assert_eq!(
            DocumentStore::sibling_values_path(path),
            PathBuf::from("/docs/deploy.values.json")
        );
    }
}
