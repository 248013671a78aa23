//! Photo attachment: inline an uploaded image as a `data:` URI on the document.
//!
//! Runs locally and synchronously. It does not go through the chat pipeline
//! and appends no conversation turn.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;

use crate::models::CvDocument;
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoError {
    #[error("Unsupported content type '{0}', expected an image")]
    NotAnImage(String),

    #[error("Photo upload is empty")]
    Empty,
}

pub struct PhotoUpload {
    pub content_type: String,
    pub data: Bytes,
}

pub fn encode_data_uri(upload: &PhotoUpload) -> Result<String, PhotoError> {
    let mime = upload.content_type.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(PhotoError::NotAnImage(upload.content_type.clone()));
    }
    if upload.data.is_empty() {
        return Err(PhotoError::Empty);
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(&upload.data)))
}

/// Replaces `personalInfo.photo` with the encoded upload.
pub fn attach_photo(
    store: &DocumentStore,
    upload: &PhotoUpload,
) -> Result<Arc<CvDocument>, PhotoError> {
    let uri = encode_data_uri(upload)?;
    store.update(|doc| {
        let mut next = doc.clone();
        next.personal_info.photo = uri;
        Ok(next)
    })
}
