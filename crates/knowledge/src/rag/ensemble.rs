//! Ensemble retriever.
//!
//! Composes several retrieval sources into one logical retriever. A question
//! is fanned out to every source concurrently; results are concatenated in
//! configuration order, each source keeping its own ranking. There is no
//! cross-source re-ranking.

use crate::source::RetrievalSource;
use crate::types::Passage;
use docquery_core::{AppError, AppResult};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An ordered, non-empty set of uniquely named retrieval sources.
pub struct EnsembleRetriever {
    sources: Vec<Arc<dyn RetrievalSource>>,
}

impl EnsembleRetriever {
    /// Combine sources into an ensemble.
    ///
    /// Returns `None` for an empty list: no sources is represented as no
    /// retriever, never as an empty ensemble. A repeated name keeps its first
    /// occurrence.
    pub fn combine(sources: Vec<Arc<dyn RetrievalSource>>) -> Option<Self> {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(sources.len());

        for source in sources {
            if seen.insert(source.name().to_string()) {
                unique.push(source);
            } else {
                tracing::warn!("Ignoring duplicate retrieval source '{}'", source.name());
            }
        }

        if unique.is_empty() {
            None
        } else {
            Some(Self { sources: unique })
        }
    }

    /// Source names in configuration order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Retrieve passages from every source.
    ///
    /// Sources are queried concurrently. Any failing source fails the whole
    /// call; there is no partial result.
    pub async fn retrieve(&self, question: &str) -> AppResult<Vec<Passage>> {
        let per_source = try_join_all(self.sources.iter().map(|source| async move {
            let name = source.name();
            let passages = source.retrieve(question).await.map_err(|e| {
                tracing::error!("Retrieval from '{}' failed: {}", name, e);
                e
            })?;

            tracing::debug!("Source '{}' returned {} passages", name, passages.len());

            Ok::<_, AppError>(
                passages
                    .into_iter()
                    .map(|p| Passage::new(name, p.content))
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        Ok(per_source.into_iter().flatten().collect())
    }
}

impl fmt::Debug for EnsembleRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnsembleRetriever")
            .field("sources", &self.source_names())
            .finish()
    }
}
