//! Persisted collection store.
//!
//! Lists the collections available in durable storage and loads them as
//! retrieval sources.

use crate::collection::VectorCollection;
use crate::embeddings::Embedder;
use crate::source::RetrievalSource;
use docquery_core::{AppError, AppResult};
use std::path::PathBuf;
use std::sync::Arc;
use walkdir::WalkDir;

/// Durable storage of indexed collections.
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    /// Names of the collections currently persisted.
    async fn list_collections(&self) -> AppResult<Vec<String>>;

    /// Load a collection as a retrieval source returning `top_k` passages.
    async fn load_collection(
        &self,
        name: &str,
        top_k: usize,
    ) -> AppResult<Arc<dyn RetrievalSource>>;
}

/// Collection store backed by one directory per collection.
///
/// Layout: `<root>/<collection>/chunks.jsonl`.
#[derive(Debug, Clone)]
pub struct FsCollectionStore {
    root: PathBuf,
    embedder: Arc<dyn Embedder>,
}

impl FsCollectionStore {
    pub fn new(root: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            root: root.into(),
            embedder,
        }
    }
}

/// A collection name must be a single plain path component.
fn is_valid_collection_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[async_trait::async_trait]
impl CollectionStore for FsCollectionStore {
    async fn list_collections(&self) -> AppResult<Vec<String>> {
        if !self.root.exists() {
            tracing::debug!("Collection root {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();

        names.sort();

        tracing::debug!("Found {} persisted collections", names.len());
        Ok(names)
    }

    async fn load_collection(
        &self,
        name: &str,
        top_k: usize,
    ) -> AppResult<Arc<dyn RetrievalSource>> {
        if !is_valid_collection_name(name) {
            return Err(AppError::SourceUnavailable(format!(
                "Invalid collection name: {:?}",
                name
            )));
        }

        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(AppError::SourceUnavailable(format!(
                "Collection '{}' not found in {:?}",
                name, self.root
            )));
        }

        let collection = VectorCollection::open(&dir, name, self.embedder.clone(), top_k).await?;
        Ok(Arc::new(collection))
    }
}
