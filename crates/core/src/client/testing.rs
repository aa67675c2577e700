//! In-process [`ContentStore`] double that applies the server's rules.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ContentStore, StoreError};
use crate::content::{ContentData, ContentPatch, ContentSection, PatchAction, Section, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchSection(Section),
    FetchId(String),
    Create(Section),
    Patch(String, Option<PatchAction>),
}

#[derive(Default)]
pub struct FakeStore {
    records: Mutex<HashMap<String, ContentSection>>,
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, section: Section, draft: ContentData, published: ContentData) -> ContentSection {
        let mut record = ContentSection::new(section);
        record.id = Some(Uuid::now_v7().to_string());
        record.status = Some(Status::derive(&draft, &published));
        record.draft_data = draft;
        record.published_data = published;
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone().unwrap(), record.clone());
        record
    }

    /// Drop a record as if another editor deleted it.
    pub fn remove(&self, id: &str) {
        self.records.lock().unwrap().remove(id);
    }

    pub fn get(&self, id: &str) -> Option<ContentSection> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn fail_requests(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 500,
                message: "An internal error occurred".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FakeStore {
    async fn fetch_by_section(
        &self,
        section: Section,
    ) -> Result<Option<ContentSection>, StoreError> {
        self.record(Call::FetchSection(section))?;
        let records = self.records.lock().unwrap();
        Ok(records.values().find(|r| r.section == section).cloned())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<ContentSection, StoreError> {
        self.record(Call::FetchId(id.to_string()))?;
        self.get(id).ok_or(StoreError::NotFound)
    }

    async fn create(
        &self,
        section: Section,
        data: ContentData,
    ) -> Result<ContentSection, StoreError> {
        self.record(Call::Create(section))?;
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.values_mut().find(|r| r.section == section) {
            existing.draft_data = data;
            existing.status = Some(Status::Draft);
            return Ok(existing.clone());
        }
        let mut record = ContentSection::new(section);
        record.id = Some(Uuid::now_v7().to_string());
        record.draft_data = data;
        record.status = Some(Status::Draft);
        records.insert(record.id.clone().unwrap(), record.clone());
        Ok(record)
    }

    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentSection, StoreError> {
        self.record(Call::Patch(id.to_string(), patch.action))?;
        let mut records = self.records.lock().unwrap();
        let record = records.get_mut(id).ok_or(StoreError::NotFound)?;
        match patch.action {
            None => {
                record.draft_data = patch.draft_data.unwrap_or_default();
                record.status = Some(Status::Draft);
            }
            Some(PatchAction::Publish) => {
                if let Some(draft) = patch.draft_data {
                    record.draft_data = draft;
                }
                record.published_data = record.draft_data.clone();
                record.status = Some(Status::Published);
            }
            Some(PatchAction::Revert) => {
                record.draft_data = ContentData::new();
                record.status = Some(Status::after_revert(&record.published_data));
            }
        }
        Ok(record.clone())
    }
}
