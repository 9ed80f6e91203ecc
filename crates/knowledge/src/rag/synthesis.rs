//! Answer synthesis.
//!
//! Turns retrieved passages plus a question into an answer. In split mode
//! passages are grouped by source, one prompt is rendered per source, the
//! model is invoked once per source (concurrently), and the per-source answers
//! are merged in first-seen source order. In single mode all passages are
//! stuffed into one prompt.

use crate::rag::ensemble::EnsembleRetriever;
use crate::types::{AnswerBundle, Passage, QueryAnswer, SourceAnswer};
use docquery_core::{AnswerMode, AppError, AppResult};
use docquery_llm::LanguageModel;
use docquery_prompt::AnswerPrompt;
use futures::future::try_join_all;

/// Answer given when retrieval produced no passages at all.
pub const NO_CONTEXT_ANSWER: &str = "I don't know.";

/// Separator between passages of one source inside a prompt context.
const PASSAGE_SEPARATOR: &str = "\n";

/// Separator between passages in single-mode context.
const SINGLE_MODE_SEPARATOR: &str = "\n\n";

/// Per-question synthesis driver.
#[derive(Debug)]
pub struct SynthesisEngine {
    prompt: AnswerPrompt,
    mode: AnswerMode,
    label_prefix_len: usize,
}

impl SynthesisEngine {
    pub fn new(prompt: AnswerPrompt, mode: AnswerMode, label_prefix_len: usize) -> Self {
        Self {
            prompt,
            mode,
            label_prefix_len,
        }
    }

    /// Render one prompt per source, in first-seen source order.
    pub fn build_prompts(
        &self,
        question: &str,
        passages: &[Passage],
    ) -> AppResult<Vec<(String, String)>> {
        group_by_source(passages)
            .into_iter()
            .map(|(source, context)| {
                let prompt = self.prompt.render(question, &context)?;
                Ok((source, prompt))
            })
            .collect()
    }

    /// Invoke the model once per source and collect answers in source order.
    ///
    /// Calls run concurrently; the bundle order never depends on which call
    /// finishes first. Any failing call fails the whole synthesis.
    pub async fn synthesize(
        &self,
        model: &LanguageModel,
        question: &str,
        passages: &[Passage],
    ) -> AppResult<AnswerBundle> {
        let prompts = self.build_prompts(question, passages)?;

        tracing::debug!(
            "Synthesizing {} per-source answers with model '{}'",
            prompts.len(),
            model.name()
        );

        let answers = try_join_all(prompts.into_iter().map(|(source_name, prompt)| async move {
            let answer = model.invoke(&prompt).await.map_err(|e| {
                tracing::error!("Model call for source '{}' failed: {}", source_name, e);
                e
            })?;
            Ok::<_, AppError>(SourceAnswer {
                source_name,
                answer,
            })
        }))
        .await?;

        Ok(AnswerBundle::new(answers))
    }

    /// Answer from all passages with a single prompt and model call.
    pub async fn synthesize_single(
        &self,
        model: &LanguageModel,
        question: &str,
        passages: &[Passage],
    ) -> AppResult<String> {
        let context = passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(SINGLE_MODE_SEPARATOR);

        let prompt = self.prompt.render(question, &context)?;
        model.invoke(&prompt).await
    }

    /// Answer a question against a retriever and model captured by the caller.
    ///
    /// Fails with `NotInitialized` before any retrieval or model call if either
    /// is missing.
    pub async fn run(
        &self,
        retriever: Option<&EnsembleRetriever>,
        model: Option<&LanguageModel>,
        question: &str,
    ) -> AppResult<QueryAnswer> {
        let retriever = retriever.ok_or_else(|| {
            AppError::NotInitialized("no retrieval sources are configured".to_string())
        })?;
        let model = model.ok_or_else(|| {
            AppError::NotInitialized("no language model is selected".to_string())
        })?;

        let passages = retriever.retrieve(question).await?;

        tracing::info!(
            "Retrieved {} passages from {} sources",
            passages.len(),
            retriever.len()
        );

        if passages.is_empty() {
            return Ok(QueryAnswer {
                answer: NO_CONTEXT_ANSWER.to_string(),
                source_files: match self.mode {
                    AnswerMode::Split => Some(Vec::new()),
                    AnswerMode::Single => None,
                },
            });
        }

        match self.mode {
            AnswerMode::Split => {
                let bundle = self.synthesize(model, question, &passages).await?;
                Ok(QueryAnswer {
                    answer: bundle.merged(self.label_prefix_len),
                    source_files: Some(bundle.source_names()),
                })
            }
            AnswerMode::Single => Ok(QueryAnswer {
                answer: self.synthesize_single(model, question, &passages).await?,
                source_files: None,
            }),
        }
    }
}

/// Group passage contents by source in first-seen order, newline-joined.
pub fn group_by_source(passages: &[Passage]) -> Vec<(String, String)> {
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();

    for passage in passages {
        match groups.iter_mut().find(|(name, _)| *name == passage.source_name) {
            Some((_, contents)) => contents.push(&passage.content),
            None => groups.push((passage.source_name.clone(), vec![&passage.content])),
        }
    }

    groups
        .into_iter()
        .map(|(name, contents)| (name, contents.join(PASSAGE_SEPARATOR)))
        .collect()
}
