use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::section::Section;
use super::status::Status;

/// Free-form field map for one section. Shape depends on the section.
pub type ContentData = serde_json::Map<String, Value>;

/// One section's content record as exchanged over `/api/content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSection {
    /// Assigned by the server on first persist.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub section: Section,
    #[serde(default)]
    pub draft_data: ContentData,
    #[serde(default)]
    pub published_data: ContentData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentSection {
    /// A record that has not been persisted yet.
    pub fn new(section: Section) -> Self {
        Self {
            id: None,
            section,
            draft_data: ContentData::new(),
            published_data: ContentData::new(),
            status: Some(Status::Unpublished),
            created_at: None,
            updated_at: None,
        }
    }

    /// Stored status, or the one implied by the data when the server sent none.
    pub fn effective_status(&self) -> Status {
        self.status
            .unwrap_or_else(|| Status::derive(&self.draft_data, &self.published_data))
    }

    /// Data an editor should start from: the draft, or the published
    /// snapshot when there is no pending draft.
    pub fn working_data(&self) -> &ContentData {
        if self.draft_data.is_empty() {
            &self.published_data
        } else {
            &self.draft_data
        }
    }
}

/// `POST /api/content` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateContent {
    pub section: Section,
    #[serde(default)]
    pub data: ContentData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchAction {
    Publish,
    Revert,
}

/// `PATCH /api/content/{id}` body.
///
/// One of `{draftData}`, `{action: "publish", draftData}` or
/// `{action: "revert"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PatchAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_data: Option<ContentData>,
}

impl ContentPatch {
    pub fn save_draft(draft: ContentData) -> Self {
        Self {
            action: None,
            draft_data: Some(draft),
        }
    }

    pub fn publish(draft: ContentData) -> Self {
        Self {
            action: Some(PatchAction::Publish),
            draft_data: Some(draft),
        }
    }

    pub fn revert() -> Self {
        Self {
            action: Some(PatchAction::Revert),
            draft_data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_server_record() {
        let record: ContentSection = serde_json::from_value(json!({
            "_id": "0192f3a4-0000-7000-8000-000000000001",
            "section": "hero",
            "draftData": { "headline": "Hi" },
            "publishedData": {},
            "status": "draft",
            "createdAt": "2024-05-01T10:00:00Z",
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("0192f3a4-0000-7000-8000-000000000001"));
        assert_eq!(record.section, Section::Hero);
        assert_eq!(record.draft_data["headline"], json!("Hi"));
        assert_eq!(record.status, Some(Status::Draft));
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn missing_status_is_derived() {
        let record: ContentSection = serde_json::from_value(json!({
            "section": "team",
            "publishedData": { "title": "Team" },
        }))
        .unwrap();

        assert_eq!(record.status, None);
        assert_eq!(record.effective_status(), Status::Published);
    }

    #[test]
    fn working_data_falls_back_to_published() {
        let mut record = ContentSection::new(Section::About);
        record.published_data.insert("title".into(), json!("Live"));
        assert_eq!(record.working_data()["title"], json!("Live"));

        record.draft_data.insert("title".into(), json!("Pending"));
        assert_eq!(record.working_data()["title"], json!("Pending"));
    }

    #[test]
    fn patch_bodies_match_wire_shapes() {
        let mut draft = ContentData::new();
        draft.insert("title".into(), json!("About"));

        assert_eq!(
            serde_json::to_value(ContentPatch::save_draft(draft.clone())).unwrap(),
            json!({ "draftData": { "title": "About" } })
        );
        assert_eq!(
            serde_json::to_value(ContentPatch::publish(draft)).unwrap(),
            json!({ "action": "publish", "draftData": { "title": "About" } })
        );
        assert_eq!(
            serde_json::to_value(ContentPatch::revert()).unwrap(),
            json!({ "action": "revert" })
        );
    }
}
