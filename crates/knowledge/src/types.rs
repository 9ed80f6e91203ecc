//! Query-time value types.

use serde::{Deserialize, Serialize};

/// A retrieved unit of document content with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Text content
    pub content: String,

    /// Name of the retrieval source that produced this passage
    pub source_name: String,
}

impl Passage {
    pub fn new(source_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source_name: source_name.into(),
        }
    }
}

/// The generated answer for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceAnswer {
    pub source_name: String,
    pub answer: String,
}

/// Per-source answers of one question, in the order sources were encountered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerBundle {
    answers: Vec<SourceAnswer>,
}

impl AnswerBundle {
    pub fn new(answers: Vec<SourceAnswer>) -> Self {
        Self { answers }
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answer generated for `source_name`, if that source contributed.
    pub fn answer_for(&self, source_name: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.source_name == source_name)
            .map(|a| a.answer.as_str())
    }

    /// Names of the contributing sources, in merge order.
    pub fn source_names(&self) -> Vec<String> {
        self.answers.iter().map(|a| a.source_name.clone()).collect()
    }

    /// Merge into one text: `"{label}:\n{answer}"` blocks separated by a blank line.
    pub fn merged(&self, label_prefix_len: usize) -> String {
        self.answers
            .iter()
            .map(|a| {
                format!(
                    "{}:\n{}",
                    source_label(&a.source_name, label_prefix_len),
                    a.answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Display label of a source: its name minus the first `prefix_len` characters.
///
/// The prefix is storage-path bookkeeping. A name no longer than the prefix
/// is shown whole.
pub fn source_label(source_name: &str, prefix_len: usize) -> &str {
    match source_name.char_indices().nth(prefix_len) {
        Some((idx, _)) => &source_name[idx..],
        None => source_name,
    }
}

/// The answer to one question as returned to callers.
///
/// `source_files` is present in split mode only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnswer {
    pub answer: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_files: Option<Vec<String>>,
}
