//! Request validation shared by the API handlers.

use thiserror::Error;
use uuid::Uuid;

use super::model::{ContentPatch, PatchAction};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("content id cannot be empty")]
    EmptyId,
    #[error("content id is not a valid identifier: {0}")]
    InvalidId(String),
    #[error("draftData is required when saving a draft")]
    MissingDraftData,
    #[error("revert does not accept draftData")]
    RevertWithData,
}

/// Validate a content id taken from the request path.
pub fn validate_content_id(id: &str) -> Result<Uuid, ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyId);
    }
    Uuid::parse_str(id).map_err(|_| ValidationError::InvalidId(id.to_string()))
}

/// Validate that a patch body is one of the accepted shapes.
pub fn validate_patch(patch: &ContentPatch) -> Result<(), ValidationError> {
    match (patch.action, &patch.draft_data) {
        (None, None) => Err(ValidationError::MissingDraftData),
        (Some(PatchAction::Revert), Some(_)) => Err(ValidationError::RevertWithData),
        _ => Ok(()),
    }
}
