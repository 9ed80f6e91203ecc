//! On-disk vector collection.
//!
//! A collection directory holds `chunks.jsonl`: one JSON object per line with
//! the chunk `text`, its `embedding`, and optionally the `source` document it
//! was cut from. The whole file is held in memory and searched by cosine
//! similarity.

use crate::embeddings::Embedder;
use crate::source::RetrievalSource;
use crate::types::Passage;
use docquery_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// File inside a collection directory holding its chunks.
pub const CHUNKS_FILE: &str = "chunks.jsonl";

/// A persisted chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Text content
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,

    /// Document the chunk came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A loaded collection searchable for its top-k chunks.
pub struct VectorCollection {
    name: String,
    chunks: Vec<ChunkRecord>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl VectorCollection {
    pub fn new(
        name: impl Into<String>,
        chunks: Vec<ChunkRecord>,
        embedder: Arc<dyn Embedder>,
        top_k: usize,
    ) -> Self {
        Self {
            name: name.into(),
            chunks,
            embedder,
            top_k,
        }
    }

    /// Load the collection stored in `dir`.
    pub async fn open(
        dir: &Path,
        name: &str,
        embedder: Arc<dyn Embedder>,
        top_k: usize,
    ) -> AppResult<Self> {
        let path = dir.join(CHUNKS_FILE);
        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AppError::SourceUnavailable(format!(
                "Collection '{}' cannot be read from {:?}: {}",
                name, path, e
            ))
        })?;

        let chunks = parse_chunks(&contents)
            .map_err(|e| AppError::Serialization(format!("{:?}: {}", path, e)))?;

        tracing::debug!("Loaded collection '{}' with {} chunks", name, chunks.len());

        Ok(Self::new(name, chunks, embedder, top_k))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Indices of the top-k chunks for a query embedding, best first.
    ///
    /// Equal scores keep file order.
    fn search(&self, query: &[f32]) -> Vec<usize> {
        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| (i, cosine_similarity(query, &chunk.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.top_k);
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

impl fmt::Debug for VectorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorCollection")
            .field("name", &self.name)
            .field("chunks", &self.chunks.len())
            .field("top_k", &self.top_k)
            .finish()
    }
}

#[async_trait::async_trait]
impl RetrievalSource for VectorCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve(&self, question: &str) -> AppResult<Vec<Passage>> {
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question).await?;

        Ok(self
            .search(&query)
            .into_iter()
            .map(|i| Passage::new(self.name.as_str(), self.chunks[i].text.as_str()))
            .collect())
    }
}

/// Parse `chunks.jsonl` contents, skipping blank lines.
fn parse_chunks(contents: &str) -> Result<Vec<ChunkRecord>, String> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<ChunkRecord>(line).map_err(|e| format!("line {}: {}", i + 1, e))
        })
        .collect()
}

/// Cosine similarity of two vectors; 0.0 for mismatched, zero or non-finite vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fakes::FixedEmbedder;
    use tempfile::TempDir;

    fn chunk(text: &str, embedding: Vec<f32>) -> ChunkRecord {
        ChunkRecord {
            text: text.to_string(),
            embedding,
            source: None,
        }
    }

    fn collection(top_k: usize) -> VectorCollection {
        VectorCollection::new(
            "alpha",
            vec![
                chunk("cooking pasta", vec![0.0, 1.0, 0.0]),
                chunk("rust ownership", vec![1.0, 0.1, 0.0]),
                chunk("rust borrowing", vec![0.9, 0.3, 0.0]),
                chunk("gardening", vec![0.0, 0.0, 1.0]),
            ],
            Arc::new(FixedEmbedder::new(vec![1.0, 0.0, 0.0])),
            top_k,
        )
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_retrieve_top_k_best_first() {
        let passages = collection(2).retrieve("what about rust?").await.unwrap();

        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0].content, "rust ownership");
        assert_eq!(passages[1].content, "rust borrowing");
        assert!(passages.iter().all(|p| p.source_name == "alpha"));
    }

    #[tokio::test]
    async fn test_retrieve_fewer_chunks_than_k() {
        let passages = collection(10).retrieve("anything").await.unwrap();
        assert_eq!(passages.len(), 4);
    }

    #[test]
    fn test_ties_keep_file_order() {
        let collection = VectorCollection::new(
            "tied",
            vec![
                chunk("first", vec![1.0, 0.0]),
                chunk("second", vec![1.0, 0.0]),
                chunk("third", vec![1.0, 0.0]),
            ],
            Arc::new(FixedEmbedder::new(vec![1.0, 0.0])),
            2,
        );

        assert_eq!(collection.search(&[1.0, 0.0]), vec![0, 1]);
    }

    #[test]
    fn test_nan_embedding_ranks_with_unrelated_chunks() {
        let collection = VectorCollection::new(
            "corrupt",
            vec![
                chunk("broken", vec![f32::NAN, 0.0]),
                chunk("related", vec![1.0, 0.2]),
                chunk("unrelated", vec![-1.0, 0.0]),
            ],
            Arc::new(FixedEmbedder::new(vec![1.0, 0.0])),
            3,
        );

        assert_eq!(cosine_similarity(&[1.0, 0.0], &[f32::NAN, 0.0]), 0.0);
        assert_eq!(collection.search(&[1.0, 0.0]), vec![1, 0, 2]);
    }

    #[tokio::test]
    async fn test_open_reads_jsonl() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CHUNKS_FILE),
            concat!(
                r#"{"text":"X is a letter","embedding":[1.0,0.0],"source":"data/docs/x.pdf"}"#,
                "\n\n",
                r#"{"text":"Y follows X","embedding":[0.0,1.0]}"#,
                "\n"
            ),
        )
        .unwrap();

        let collection = VectorCollection::open(
            temp.path(),
            "letters",
            Arc::new(FixedEmbedder::new(vec![1.0, 0.0])),
            3,
        )
        .await
        .unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.name(), "letters");
    }

    #[tokio::test]
    async fn test_open_reports_bad_line() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CHUNKS_FILE),
            "{\"text\":\"ok\",\"embedding\":[1.0]}\nnot json\n",
        )
        .unwrap();

        let result = VectorCollection::open(
            temp.path(),
            "broken",
            Arc::new(FixedEmbedder::new(vec![1.0])),
            3,
        )
        .await;

        match result {
            Err(AppError::Serialization(msg)) => assert!(msg.contains("line 2")),
            other => panic!("Expected serialization error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = VectorCollection::open(
            temp.path(),
            "empty-dir",
            Arc::new(FixedEmbedder::new(vec![1.0])),
            3,
        )
        .await;

        assert!(matches!(result, Err(AppError::SourceUnavailable(_))));
    }
}
