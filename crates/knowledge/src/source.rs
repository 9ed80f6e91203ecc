//! Retrieval source abstraction.

use crate::types::Passage;
use docquery_core::AppResult;

/// Default number of passages a source returns per question.
pub const DEFAULT_TOP_K: usize = 3;

/// One indexed document collection, queryable for its top-k passages.
///
/// Implementations return passages best-first and tag each with `name()`.
#[async_trait::async_trait]
pub trait RetrievalSource: Send + Sync {
    /// Unique name of the source within an active configuration.
    fn name(&self) -> &str;

    /// Retrieve the most relevant passages for `question`.
    async fn retrieve(&self, question: &str) -> AppResult<Vec<Passage>>;
}
