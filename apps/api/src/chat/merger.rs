//! Response validator/merger — turns whatever the model sent back into the next
//! document and a confirmation line.
//!
//! Fail-open: `merge_reply` never returns an error. Any failure (model call,
//! unparseable text, wrong shape, broken invariants) yields the previous document
//! untouched plus the generic apology. A usable reply replaces the document
//! wholesale; there is no field-level merge and no retry.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::chat::prompts::{DEFAULT_CONFIRMATION, FAILURE_MESSAGE};
use crate::chat::ChatError;
use crate::llm_client::strip_json_fences;
use crate::models::CvDocument;

const UPDATED_DATA_KEY: &str = "updatedData";
const ASSISTANT_RESPONSE_KEY: &str = "assistantResponse";

#[derive(Debug)]
pub struct MergeOutcome {
    pub document: Arc<CvDocument>,
    pub confirmation: String,
    /// Set when the reply was discarded and `document` is the previous value.
    pub error: Option<ChatError>,
}

impl MergeOutcome {
    pub fn is_applied(&self) -> bool {
        self.error.is_none()
    }
}

/// `raw` is the interpreter's result; `previous` is the document that was sent.
/// `retired` are the record ids retired before the request was made.
pub fn merge_reply(
    raw: Result<String, ChatError>,
    previous: Arc<CvDocument>,
    retired: &HashSet<String>,
) -> MergeOutcome {
    match raw.and_then(|text| parse_reply(&text, &previous, retired)) {
        Ok((document, confirmation)) => MergeOutcome {
            document: Arc::new(document),
            confirmation,
            error: None,
        },
        Err(e) => MergeOutcome {
            document: previous,
            confirmation: FAILURE_MESSAGE.to_string(),
            error: Some(e),
        },
    }
}

fn parse_reply(
    text: &str,
    previous: &CvDocument,
    retired: &HashSet<String>,
) -> Result<(CvDocument, String), ChatError> {
    let value: Value = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| ChatError::MalformedReply(format!("reply is not JSON: {e}")))?;

    let Value::Object(mut reply) = value else {
        return Err(ChatError::MalformedReply(
            "reply is not a JSON object".to_string(),
        ));
    };

    let updated = reply
        .remove(UPDATED_DATA_KEY)
        .ok_or_else(|| ChatError::MalformedReply(format!("reply has no '{UPDATED_DATA_KEY}'")))?;

    if !updated.is_object() {
        return Err(ChatError::ValidationRejected(format!(
            "'{UPDATED_DATA_KEY}' is not an object"
        )));
    }

    let document: CvDocument = serde_json::from_value(updated).map_err(|e| {
        ChatError::ValidationRejected(format!("'{UPDATED_DATA_KEY}' does not match the CV schema: {e}"))
    })?;

    document
        .validate_reply(previous, retired)
        .map_err(|e| ChatError::ValidationRejected(e.to_string()))?;

    let confirmation = match reply.get(ASSISTANT_RESPONSE_KEY) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => DEFAULT_CONFIRMATION.to_string(),
    };

    Ok((document, confirmation))
}
