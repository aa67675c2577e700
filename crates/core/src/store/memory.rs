use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContentRepository, RepositoryError, Upserted};
use crate::content::{ContentData, ContentSection, Section, Status};

/// Process-local repository. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryContentRepository {
    records: RwLock<BTreeMap<Section, ContentSection>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, id: &str, apply: F) -> Option<ContentSection>
    where
        F: FnOnce(&mut ContentSection) + Send,
    {
        let mut records = self.records.write().await;
        let record = records
            .values_mut()
            .find(|record| record.id.as_deref() == Some(id))?;
        apply(record);
        record.updated_at = Some(Utc::now());
        Some(record.clone())
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn find_by_section(
        &self,
        section: Section,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        Ok(self.records.read().await.get(&section).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.id.as_deref() == Some(id))
            .cloned())
    }

    async fn upsert_draft(
        &self,
        section: Section,
        data: ContentData,
    ) -> Result<(ContentSection, Upserted), RepositoryError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&section) {
            record.draft_data = data;
            record.status = Some(Status::Draft);
            record.updated_at = Some(now);
            return Ok((record.clone(), Upserted::Updated));
        }

        let record = ContentSection {
            id: Some(Uuid::now_v7().to_string()),
            section,
            draft_data: data,
            published_data: ContentData::new(),
            status: Some(Status::Draft),
            created_at: Some(now),
            updated_at: Some(now),
        };
        records.insert(section, record.clone());
        Ok((record, Upserted::Created))
    }

    async fn save_draft(
        &self,
        id: &str,
        data: ContentData,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        Ok(self
            .update(id, |record| {
                record.draft_data = data;
                record.status = Some(Status::Draft);
            })
            .await)
    }

    async fn publish(
        &self,
        id: &str,
        data: Option<ContentData>,
    ) -> Result<Option<ContentSection>, RepositoryError> {
        Ok(self
            .update(id, |record| {
                if let Some(data) = data {
                    record.draft_data = data;
                }
                record.published_data = record.draft_data.clone();
                record.status = Some(Status::Published);
            })
            .await)
    }

    async fn revert(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError> {
        Ok(self
            .update(id, |record| {
                record.draft_data = ContentData::new();
                record.status = Some(Status::after_revert(&record.published_data));
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> ContentData {
        pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
    }

    #[tokio::test]
    async fn upsert_keeps_one_record_per_section() {
        let repo = MemoryContentRepository::new();

        let (first, created) = repo
            .upsert_draft(Section::Hero, fields(&[("headline", "One")]))
            .await
            .unwrap();
        let (second, updated) = repo
            .upsert_draft(Section::Hero, fields(&[("headline", "Two")]))
            .await
            .unwrap();

        assert_eq!(created, Upserted::Created);
        assert_eq!(updated, Upserted::Updated);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert_eq!(second.draft_data["headline"], json!("Two"));
    }

    #[tokio::test]
    async fn drafts_never_touch_published() {
        let repo = MemoryContentRepository::new();
        let (record, _) = repo
            .upsert_draft(Section::About, fields(&[("title", "v1")]))
            .await
            .unwrap();
        let id = record.id.unwrap();
        repo.publish(&id, None).await.unwrap();

        let saved = repo
            .save_draft(&id, fields(&[("title", "v2")]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(saved.status, Some(Status::Draft));
        assert_eq!(saved.published_data["title"], json!("v1"));
    }

    #[tokio::test]
    async fn publish_then_revert() {
        let repo = MemoryContentRepository::new();
        let (record, _) = repo
            .upsert_draft(Section::Team, fields(&[("title", "draft")]))
            .await
            .unwrap();
        let id = record.id.unwrap();

        let published = repo
            .publish(&id, Some(fields(&[("title", "final")])))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(published.status, Some(Status::Published));
        assert_eq!(published.draft_data, published.published_data);

        let reverted = repo.revert(&id).await.unwrap().unwrap();
        assert!(reverted.draft_data.is_empty());
        assert_eq!(reverted.published_data["title"], json!("final"));
        assert_eq!(reverted.status, Some(Status::Published));
    }

    #[tokio::test]
    async fn revert_of_unpublished_is_unpublished() {
        let repo = MemoryContentRepository::new();
        let (record, _) = repo
            .upsert_draft(Section::Footer, fields(&[("tagline", "x")]))
            .await
            .unwrap();

        let reverted = repo.revert(record.id.as_deref().unwrap()).await.unwrap().unwrap();

        assert_eq!(reverted.status, Some(Status::Unpublished));
    }

    #[tokio::test]
    async fn unknown_ids_return_none() {
        let repo = MemoryContentRepository::new();
        let id = Uuid::now_v7().to_string();

        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(repo.save_draft(&id, ContentData::new()).await.unwrap().is_none());
        assert!(repo.publish(&id, None).await.unwrap().is_none());
        assert!(repo.revert(&id).await.unwrap().is_none());
    }
}
