use serde_json::Value;

use super::error::EditorError;
use crate::client::PersistAction;
use crate::content::{ContentData, ContentSection, Section, Status};

/// Inputs to the editor state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The active section changed; state resets to that section's defaults.
    LoadRequested(Section),
    /// Result of the fetch issued for `section`. `None` covers both "no
    /// record yet" and a failed fetch.
    Loaded {
        section: Section,
        record: Option<ContentSection>,
    },
    FieldEdited { name: String, value: Value },
    SaveRequested,
    PublishRequested,
    RevertRequested,
    DraftSaved(ContentSection),
    Published(ContentSection),
    Reverted(ContentSection),
}

/// Store call the controller must make next.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Fetch(Section),
    Persist {
        content_id: Option<String>,
        section: Section,
        draft: ContentData,
        action: PersistAction,
    },
    Revert { content_id: String },
}

/// Editing state for the active section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEditor {
    section: Section,
    draft: ContentData,
    published: ContentData,
    status: Status,
    content_id: Option<String>,
    /// Draft as last read from or written to the server.
    persisted: ContentData,
}

impl SectionEditor {
    pub fn new(section: Section) -> Self {
        let draft = section.defaults();
        Self {
            section,
            persisted: draft.clone(),
            draft,
            published: ContentData::new(),
            status: Status::Unpublished,
            content_id: None,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn draft(&self) -> &ContentData {
        &self.draft
    }

    pub fn published(&self) -> &ContentData {
        &self.published
    }

    /// Server-reported status. Field edits do not change it until the next
    /// round trip; see [`has_unsaved_changes`](Self::has_unsaved_changes).
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// Whether the local draft differs from what the server last held.
    pub fn has_unsaved_changes(&self) -> bool {
        self.draft != self.persisted
    }

    /// Overwrite one draft field. Purely local: status and the persisted
    /// snapshot are untouched.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.draft.insert(name.into(), value);
    }

    /// Advance the state machine.
    ///
    /// Outcomes for a section other than the active one are stale and are
    /// dropped. A revert with no known record is rejected.
    pub fn apply(&mut self, event: EditorEvent) -> Result<Effect, EditorError> {
        match event {
            EditorEvent::LoadRequested(section) => {
                *self = SectionEditor::new(section);
                Ok(Effect::Fetch(section))
            }
            EditorEvent::Loaded { section, record } => {
                if section != self.section {
                    tracing::debug!(%section, active = %self.section, "dropping stale load");
                    return Ok(Effect::None);
                }
                if let Some(record) = record {
                    self.adopt_loaded(record);
                }
                Ok(Effect::None)
            }
            EditorEvent::FieldEdited { name, value } => {
                self.set_field(name, value);
                Ok(Effect::None)
            }
            EditorEvent::SaveRequested => Ok(self.persist(PersistAction::SaveDraft)),
            EditorEvent::PublishRequested => Ok(self.persist(PersistAction::Publish)),
            EditorEvent::RevertRequested => match &self.content_id {
                Some(id) => Ok(Effect::Revert {
                    content_id: id.clone(),
                }),
                None => Err(EditorError::NothingToRevert),
            },
            EditorEvent::DraftSaved(record) => {
                if self.is_current(&record) {
                    self.content_id = record.id.or(self.content_id.take());
                    self.persisted = record.draft_data;
                    self.status = Status::Draft;
                }
                Ok(Effect::None)
            }
            EditorEvent::Published(record) => {
                if self.is_current(&record) {
                    self.status = record.effective_status();
                    self.content_id = record.id.or(self.content_id.take());
                    self.draft = record.draft_data;
                    self.persisted = self.draft.clone();
                    self.published = record.published_data;
                }
                Ok(Effect::None)
            }
            EditorEvent::Reverted(record) => {
                if self.is_current(&record) {
                    self.status = record.effective_status();
                    self.draft = ContentData::new();
                    self.persisted = ContentData::new();
                    self.published = record.published_data;
                }
                Ok(Effect::None)
            }
        }
    }

    fn adopt_loaded(&mut self, record: ContentSection) {
        self.status = record.effective_status();
        self.draft = self.section.with_defaults(record.working_data());
        self.persisted = self.draft.clone();
        self.published = record.published_data;
        self.content_id = record.id;
    }

    fn persist(&self, action: PersistAction) -> Effect {
        Effect::Persist {
            content_id: self.content_id.clone(),
            section: self.section,
            draft: self.draft.clone(),
            action,
        }
    }

    fn is_current(&self, record: &ContentSection) -> bool {
        let current = record.section == self.section;
        if !current {
            tracing::debug!(section = %record.section, active = %self.section, "dropping stale result");
        }
        current
    }
}
