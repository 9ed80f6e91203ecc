//! Retrieval-augmented answering.
//!
//! Fans a question out over the active sources and turns the retrieved
//! passages into a merged, source-labelled answer.

pub mod ensemble;
pub mod synthesis;

pub use ensemble::EnsembleRetriever;
pub use synthesis::{group_by_source, SynthesisEngine, NO_CONTEXT_ANSWER};
