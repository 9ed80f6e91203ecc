//! Prompt loader for YAML prompt definitions.

use crate::types::PromptDefinition;
use docquery_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt definition by ID from a prompts directory.
///
/// Looks for `<prompts_dir>/<id>.yml`.
///
/// # Example
/// ```no_run
/// use docquery_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("data/prompts"), "doc_query.answer")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load `prompt_id` if an override file exists, otherwise return `fallback`.
///
/// A present but invalid override is an error, not a silent fallback.
pub fn resolve_prompt(
    prompts_dir: &Path,
    prompt_id: &str,
    fallback: PromptDefinition,
) -> AppResult<PromptDefinition> {
    if prompts_dir.join(format!("{}.yml", prompt_id)).exists() {
        load_prompt(prompts_dir, prompt_id)
    } else {
        tracing::debug!("No override for prompt '{}', using built-in", prompt_id);
        Ok(fallback)
    }
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in ["context", "question"] {
        if !def.template.contains(&format!("{{{{{}}}}}", variable)) {
            return Err(AppError::Prompt(format!(
                "Prompt '{}' template must reference {{{{{}}}}}",
                def.id, variable
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(format!("{}.yml", id)), content).unwrap();
    }

    fn valid_yaml(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Terse answers"
apiVersion: "1.0"
createdBy: test
template: |
  Context:
  {{{{context}}}}
  Q: {{{{question}}}}
"#,
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "doc_query.answer", &valid_yaml("doc_query.answer"));

        let prompt = load_prompt(temp_dir.path(), "doc_query.answer").unwrap();
        assert_eq!(prompt.id, "doc_query.answer");
        assert_eq!(prompt.title, "Terse answers");
        assert!(prompt.template.contains("{{context}}"));
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt(temp_dir.path(), "nonexistent");
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");

        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_template_must_reference_context() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "no_context",
            "id: no_context\ntitle: T\napiVersion: \"1.0\"\ntemplate: \"Q: {{question}}\"\n",
        );

        match load_prompt(temp_dir.path(), "no_context") {
            Err(AppError::Prompt(msg)) => assert!(msg.contains("{{context}}")),
            other => panic!("Expected prompt error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_falls_back_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = resolve_prompt(
            temp_dir.path(),
            "doc_query.answer",
            PromptDefinition::default_answer(),
        )
        .unwrap();
        assert_eq!(resolved.created_by, "docquery");
    }

    #[test]
    fn test_resolve_prefers_override() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "doc_query.answer", &valid_yaml("doc_query.answer"));

        let resolved = resolve_prompt(
            temp_dir.path(),
            "doc_query.answer",
            PromptDefinition::default_answer(),
        )
        .unwrap();
        assert_eq!(resolved.title, "Terse answers");
    }
}
