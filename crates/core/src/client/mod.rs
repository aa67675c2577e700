//! Content Store Client: turns editor intents into calls against the
//! content-by-section resource.
//!
//! No caching and no retries: each user action issues its requests at most
//! once and surfaces the failure to the caller.

pub mod config;
pub mod error;
pub mod http;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::content::{ContentData, ContentPatch, ContentSection, Section};

pub use config::ClientConfig;
pub use error::StoreError;
pub use http::HttpContentStore;

/// The four calls the editor needs from the content API.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// `None` when the section has never been saved.
    async fn fetch_by_section(&self, section: Section)
        -> Result<Option<ContentSection>, StoreError>;

    async fn fetch_by_id(&self, id: &str) -> Result<ContentSection, StoreError>;

    async fn create(&self, section: Section, data: ContentData)
        -> Result<ContentSection, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` no longer exists.
    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentSection, StoreError>;
}

/// What a create-or-patch call should do with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistAction {
    SaveDraft,
    Publish,
}

/// Persist `draft` for `section`, patching the known record or creating one.
///
/// A PATCH that comes back 404 means the record went away underneath us, so
/// the draft is written to a fresh record instead. A publish that had to
/// create first is followed by a publish on the new id.
pub async fn create_or_patch<S>(
    store: &S,
    content_id: Option<&str>,
    section: Section,
    draft: &ContentData,
    action: PersistAction,
) -> Result<ContentSection, StoreError>
where
    S: ContentStore + ?Sized,
{
    if let Some(id) = content_id {
        let patch = match action {
            PersistAction::SaveDraft => ContentPatch::save_draft(draft.clone()),
            PersistAction::Publish => ContentPatch::publish(draft.clone()),
        };
        match store.patch(id, patch).await {
            Err(StoreError::NotFound) => {
                tracing::warn!(%section, content_id = id, "content record missing, recreating");
            }
            result => return result,
        }
    }

    let created = store.create(section, draft.clone()).await?;
    match action {
        PersistAction::SaveDraft => Ok(created),
        PersistAction::Publish => {
            let id = created.id.as_deref().ok_or(StoreError::MissingId)?;
            store.patch(id, ContentPatch::publish(draft.clone())).await
        }
    }
}
