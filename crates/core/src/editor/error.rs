use thiserror::Error;

use crate::client::StoreError;

/// Failures surfaced to the person editing. `Display` is the message shown.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to save draft")]
    SaveFailed(#[source] StoreError),

    #[error("Failed to publish")]
    PublishFailed(#[source] StoreError),

    #[error("Failed to revert")]
    RevertFailed(#[source] StoreError),

    #[error("Nothing to revert. No published content exists for this section.")]
    NothingToRevert,
}
