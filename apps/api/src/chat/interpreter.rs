//! Instruction interpreter — hands the current CV and the user's command to the
//! model and returns its raw reply. No validation happens here; see `merger`.

use std::sync::Arc;

use tracing::debug;

use crate::chat::prompts::{CV_EDIT_PROMPT_TEMPLATE, CV_EDIT_SYSTEM};
use crate::chat::ChatError;
use crate::llm_client::prompts::{FULL_DOCUMENT_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LanguageModel;
use crate::models::CvDocument;

#[derive(Clone)]
pub struct Interpreter {
    model: Arc<dyn LanguageModel>,
}

impl Interpreter {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// One model round-trip. The caller has already rejected blank instructions.
    pub async fn interpret(
        &self,
        instruction: &str,
        document: &CvDocument,
    ) -> Result<String, ChatError> {
        let prompt = build_edit_prompt(instruction, document)?;
        let system = format!("{CV_EDIT_SYSTEM} {JSON_ONLY_SYSTEM}");

        let raw = self.model.complete(&prompt, &system).await?;
        debug!("Interpreter received {} bytes from the model", raw.len());
        Ok(raw)
    }
}

fn build_edit_prompt(instruction: &str, document: &CvDocument) -> Result<String, ChatError> {
    let document_json = serde_json::to_string_pretty(document)?;
    // JSON-quoted so the command cannot break out of its slot in the prompt
    let instruction_json = serde_json::to_string(instruction)?;

    Ok(fill_template(
        CV_EDIT_PROMPT_TEMPLATE,
        &[
            ("full_document_instruction", FULL_DOCUMENT_INSTRUCTION),
            ("document_json", document_json.as_str()),
            ("instruction", instruction_json.as_str()),
        ],
    ))
}

/// Substitutes `{name}` placeholders in one pass over the template. Substituted
/// text is never scanned again, so a CV summary that happens to contain
/// `{instruction}` stays literal.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'scan: while let Some(start) = rest.find('{') {
        let after_brace = &rest[start + 1..];
        for &(name, value) in vars {
            if let Some(tail) = after_brace
                .strip_prefix(name)
                .and_then(|s| s.strip_prefix('}'))
            {
                out.push_str(&rest[..start]);
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        out.push_str(&rest[..=start]);
        rest = after_brace;
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::testing::ScriptedModel;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let out = fill_template("a {x} b {y} {unknown} {", &[("x", "1"), ("y", "2")]);
        assert_eq!(out, "a 1 b 2 {unknown} {");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let out = fill_template("{a}|{b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b}|B");
    }

    #[test]
    fn test_prompt_embeds_document_and_quoted_instruction() {
        let prompt = build_edit_prompt("Change la \"couleur\"", &CvDocument::sample()).unwrap();
        assert!(prompt.contains("\"primaryColor\": \"#4f46e5\""));
        assert!(prompt.contains("USER COMMAND (JSON string):\n\"Change la \\\"couleur\\\"\"\n"));
        assert!(!prompt.contains("\"\"Change"));
        assert!(prompt.contains("updatedData"));
        assert!(prompt.contains("assistantResponse"));
        assert!(!prompt.contains("{document_json}"));
        assert!(!prompt.contains("{full_document_instruction}"));
    }

    #[test]
    fn test_template_keeps_color_example_and_output_contract() {
        assert!(CV_EDIT_PROMPT_TEMPLATE.contains("e.g. \"#0a1a3f\""));
        assert!(CV_EDIT_PROMPT_TEMPLATE.ends_with("no code fences."));
        for placeholder in ["{document_json}", "{instruction}", "{full_document_instruction}"] {
            assert!(CV_EDIT_PROMPT_TEMPLATE.contains(placeholder), "{placeholder} missing");
        }
    }

    #[test]
    fn test_prompt_keeps_placeholder_text_inside_document() {
        let mut doc = CvDocument::sample();
        doc.personal_info.summary = "literal {instruction}".to_string();
        let prompt = build_edit_prompt("hello", &doc).unwrap();
        assert!(prompt.contains("literal {instruction}"));
    }

    #[tokio::test]
    async fn test_interpret_returns_raw_text() {
        let model = Arc::new(ScriptedModel::new(vec![Ok("not even json".to_string())]));
        let interpreter = Interpreter::new(model.clone());

        let raw = interpreter
            .interpret("Reformule mon profil", &CvDocument::sample())
            .await
            .unwrap();

        assert_eq!(raw, "not even json");
        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Reformule mon profil"));
        assert!(calls[0].system.contains("valid JSON only"));
    }

    #[tokio::test]
    async fn test_interpret_surfaces_model_failure() {
        let model = Arc::new(ScriptedModel::new(vec![Err(LlmError::RateLimited { retries: 3 })]));
        let interpreter = Interpreter::new(model);

        let err = interpreter
            .interpret("Change la couleur", &CvDocument::sample())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::ModelInvocation(_)));
    }
}
