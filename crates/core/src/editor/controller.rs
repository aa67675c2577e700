use serde_json::Value;

use super::error::EditorError;
use super::state::{Effect, EditorEvent, SectionEditor};
use crate::client::{create_or_patch, ContentStore, PersistAction, StoreError};
use crate::content::{ContentPatch, ContentSection, Section};

/// Drives a [`SectionEditor`] against a content store.
///
/// Failed actions leave the editor state exactly as it was before the
/// attempt; the caller shows the error and the user retries by hand.
pub struct EditorController<S> {
    store: S,
    editor: SectionEditor,
}

impl<S: ContentStore> EditorController<S> {
    /// Starts on `section`'s defaults; call [`load_section`](Self::load_section)
    /// to pull the stored record.
    pub fn new(store: S, section: Section) -> Self {
        Self {
            store,
            editor: SectionEditor::new(section),
        }
    }

    pub fn editor(&self) -> &SectionEditor {
        &self.editor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make `section` active and load it. Never fails: an unreachable store
    /// leaves the section on its defaults.
    pub async fn load_section(&mut self, section: Section) {
        if let Err(err) = self.dispatch(EditorEvent::LoadRequested(section)).await {
            tracing::warn!(%section, error = %err, "section load failed");
        }
    }

    pub fn edit_field(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        tracing::trace!(section = %self.editor.section(), field = %name, "field edited");
        self.editor.set_field(name, value);
    }

    pub async fn save_draft(&mut self) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::SaveRequested).await
    }

    pub async fn publish(&mut self) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::PublishRequested).await
    }

    pub async fn revert(&mut self) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::RevertRequested).await
    }

    /// Apply `event`, run the resulting effect, and feed its outcome back
    /// until the machine settles.
    async fn dispatch(&mut self, event: EditorEvent) -> Result<(), EditorError> {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            next = match self.editor.apply(event)? {
                Effect::None => None,
                Effect::Fetch(section) => Some(self.fetch(section).await),
                Effect::Persist {
                    content_id,
                    section,
                    draft,
                    action,
                } => {
                    let result =
                        create_or_patch(&self.store, content_id.as_deref(), section, &draft, action)
                            .await;
                    Some(persisted(section, action, result)?)
                }
                Effect::Revert { content_id } => {
                    let section = self.editor.section();
                    match self.store.patch(&content_id, ContentPatch::revert()).await {
                        Ok(record) => {
                            tracing::info!(%section, %content_id, "draft reverted");
                            Some(EditorEvent::Reverted(record))
                        }
                        Err(StoreError::NotFound) => {
                            tracing::warn!(%section, %content_id, "revert target no longer exists");
                            return Err(EditorError::NothingToRevert);
                        }
                        Err(err) => {
                            tracing::warn!(%section, %content_id, error = %err, "revert failed");
                            return Err(EditorError::RevertFailed(err));
                        }
                    }
                }
            };
        }
        Ok(())
    }

    async fn fetch(&self, section: Section) -> EditorEvent {
        let record = match self.store.fetch_by_section(section).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(%section, error = %err, "content fetch failed, using defaults");
                None
            }
        };
        EditorEvent::Loaded { section, record }
    }
}

fn persisted(
    section: Section,
    action: PersistAction,
    result: Result<ContentSection, StoreError>,
) -> Result<EditorEvent, EditorError> {
    match (action, result) {
        (PersistAction::SaveDraft, Ok(record)) => {
            tracing::info!(%section, content_id = ?record.id, "draft saved");
            Ok(EditorEvent::DraftSaved(record))
        }
        (PersistAction::Publish, Ok(record)) => {
            tracing::info!(%section, content_id = ?record.id, "section published");
            Ok(EditorEvent::Published(record))
        }
        (PersistAction::SaveDraft, Err(err)) => {
            tracing::warn!(%section, error = %err, "draft save failed");
            Err(EditorError::SaveFailed(err))
        }
        (PersistAction::Publish, Err(err)) => {
            tracing::warn!(%section, error = %err, "publish failed");
            Err(EditorError::PublishFailed(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{Call, FakeStore};
    use crate::content::{ContentData, PatchAction, Status};
    use serde_json::json;

    async fn loaded(section: Section) -> EditorController<FakeStore> {
        let mut controller = EditorController::new(FakeStore::new(), section);
        controller.load_section(section).await;
        controller
    }

    #[tokio::test]
    async fn hero_walkthrough() {
        let mut controller = loaded(Section::Hero).await;
        assert_eq!(controller.editor().draft(), &Section::Hero.defaults());
        assert_eq!(controller.editor().status(), Status::Unpublished);
        assert!(controller.editor().content_id().is_none());

        controller.edit_field("subheadline", json!("New tagline"));
        controller.save_draft().await.unwrap();
        assert_eq!(controller.editor().status(), Status::Draft);
        let id = controller.editor().content_id().unwrap().to_string();

        controller.publish().await.unwrap();
        assert_eq!(controller.editor().status(), Status::Published);
        assert_eq!(
            controller.editor().published()["subheadline"],
            json!("New tagline")
        );

        controller.revert().await.unwrap();
        assert!(controller.editor().draft().is_empty());
        assert_eq!(
            controller.editor().published()["subheadline"],
            json!("New tagline")
        );

        let calls = controller.store().calls();
        assert_eq!(
            calls,
            vec![
                Call::FetchSection(Section::Hero),
                Call::Create(Section::Hero),
                Call::Patch(id.clone(), Some(PatchAction::Publish)),
                Call::Patch(id, Some(PatchAction::Revert)),
            ]
        );
    }

    #[tokio::test]
    async fn saving_without_edits_leaves_published_alone() {
        let store = FakeStore::new();
        let live: ContentData = [("title".to_string(), json!("Live team"))].into_iter().collect();
        let seeded = store.seed(Section::Team, live.clone(), live.clone());
        let mut controller = EditorController::new(store, Section::Team);
        controller.load_section(Section::Team).await;

        controller.save_draft().await.unwrap();

        let stored = controller.store().get(seeded.id.as_deref().unwrap()).unwrap();
        assert_eq!(stored.published_data, live);
        assert_eq!(controller.editor().published(), &live);
    }

    #[tokio::test]
    async fn publish_converges_draft_and_published() {
        let mut controller = loaded(Section::About).await;
        controller.edit_field("title", json!("About us"));

        controller.publish().await.unwrap();

        assert_eq!(controller.editor().draft(), controller.editor().published());
        assert!(!controller.editor().has_unsaved_changes());
    }

    #[tokio::test]
    async fn created_id_is_reused() {
        let mut controller = loaded(Section::Process).await;
        controller.save_draft().await.unwrap();
        let id = controller.editor().content_id().unwrap().to_string();
        controller.store().clear_calls();

        controller.edit_field("title", json!("Our process"));
        controller.save_draft().await.unwrap();

        assert_eq!(controller.editor().content_id(), Some(id.as_str()));
        assert_eq!(controller.store().calls(), vec![Call::Patch(id, None)]);
    }

    #[tokio::test]
    async fn vanished_record_is_recreated_with_edits() {
        let mut controller = loaded(Section::Contact).await;
        controller.save_draft().await.unwrap();
        let old_id = controller.editor().content_id().unwrap().to_string();
        controller.store().remove(&old_id);

        controller.edit_field("phone", json!("+44 20 0000 0000"));
        controller.save_draft().await.unwrap();

        let new_id = controller.editor().content_id().unwrap().to_string();
        assert_ne!(new_id, old_id);
        let stored = controller.store().get(&new_id).unwrap();
        assert_eq!(stored.draft_data["phone"], json!("+44 20 0000 0000"));
    }

    #[tokio::test]
    async fn publish_on_vanished_record_recreates_then_publishes() {
        let mut controller = loaded(Section::Hero).await;
        controller.save_draft().await.unwrap();
        let old_id = controller.editor().content_id().unwrap().to_string();
        controller.store().remove(&old_id);
        controller.store().clear_calls();

        controller.edit_field("subheadline", json!("Back again"));
        controller.publish().await.unwrap();

        let new_id = controller.editor().content_id().unwrap().to_string();
        assert_ne!(new_id, old_id);
        assert_eq!(
            controller.store().calls(),
            vec![
                Call::Patch(old_id, Some(PatchAction::Publish)),
                Call::Create(Section::Hero),
                Call::Patch(new_id.clone(), Some(PatchAction::Publish)),
            ]
        );
        assert_eq!(controller.editor().status(), Status::Published);
        assert_eq!(controller.editor().published()["subheadline"], json!("Back again"));
        let stored = controller.store().get(&new_id).unwrap();
        assert_eq!(stored.published_data["subheadline"], json!("Back again"));
    }

    #[tokio::test]
    async fn failed_load_falls_back_to_defaults() {
        let store = FakeStore::new();
        store.seed(Section::Hero, ContentData::new(), ContentData::new());
        store.fail_requests(true);
        let mut controller = EditorController::new(store, Section::Hero);

        controller.load_section(Section::Hero).await;

        assert_eq!(controller.editor().draft(), &Section::Hero.defaults());
        assert_eq!(controller.editor().status(), Status::Unpublished);
        assert!(controller.editor().content_id().is_none());
    }

    #[tokio::test]
    async fn failed_save_leaves_state_untouched() {
        let mut controller = loaded(Section::Footer).await;
        controller.edit_field("tagline", json!("Unsaved"));
        let before = controller.editor().clone();
        controller.store().fail_requests(true);

        let err = controller.save_draft().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save draft");
        assert_eq!(controller.editor(), &before);

        let err = controller.publish().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to publish");
        assert_eq!(controller.editor(), &before);
    }

    #[tokio::test]
    async fn revert_needs_a_record() {
        let mut controller = loaded(Section::Portfolio).await;

        let err = controller.revert().await.unwrap_err();

        assert!(matches!(err, EditorError::NothingToRevert));
        assert_eq!(controller.store().calls(), vec![Call::FetchSection(Section::Portfolio)]);
    }

    #[tokio::test]
    async fn revert_of_vanished_record_has_nothing_to_revert() {
        let mut controller = loaded(Section::Team).await;
        controller.save_draft().await.unwrap();
        let id = controller.editor().content_id().unwrap().to_string();
        controller.store().remove(&id);

        let err = controller.revert().await.unwrap_err();

        assert!(matches!(err, EditorError::NothingToRevert));
    }

    #[tokio::test]
    async fn revert_failure_is_reported() {
        let mut controller = loaded(Section::Team).await;
        controller.save_draft().await.unwrap();
        controller.store().fail_requests(true);

        let err = controller.revert().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to revert");
        assert_eq!(controller.editor().status(), Status::Draft);
    }
}
