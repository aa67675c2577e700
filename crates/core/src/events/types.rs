use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentSection, Section, Status};

/// Emitted after each successful content mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    Created(ContentChange),
    DraftSaved(ContentChange),
    Published(ContentChange),
    Reverted(ContentChange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChange {
    pub content_id: String,
    pub section: Section,
    pub status: Status,
    pub timestamp: DateTime<Utc>,
}

impl ContentChange {
    pub fn of(record: &ContentSection) -> Self {
        Self {
            content_id: record.id.clone().unwrap_or_default(),
            section: record.section,
            status: record.effective_status(),
            timestamp: record.updated_at.unwrap_or_else(Utc::now),
        }
    }
}

impl ContentEvent {
    pub fn change(&self) -> &ContentChange {
        match self {
            ContentEvent::Created(change)
            | ContentEvent::DraftSaved(change)
            | ContentEvent::Published(change)
            | ContentEvent::Reverted(change) => change,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentEvent::Created(_) => "created",
            ContentEvent::DraftSaved(_) => "draftSaved",
            ContentEvent::Published(_) => "published",
            ContentEvent::Reverted(_) => "reverted",
        }
    }
}
