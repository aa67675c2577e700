//! Server-side persistence for content sections.
//!
//! Each repository keeps at most one record per [`Section`]. Status values
//! written here follow the rules in [`Status`](crate::content::Status):
//! saves produce `draft`, publishes `published`, and reverts fall back to
//! whatever the published snapshot implies.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::{ContentData, ContentSection, Section};

pub use memory::MemoryContentRepository;
pub use postgres::PgContentRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("stored content is corrupt: {0}")]
    Corrupt(String),
}

/// Whether an upsert inserted a new record or updated the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Updated,
}

/// Mutating calls return `Ok(None)` when `id` matches no record.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Short label for health output.
    fn kind(&self) -> &'static str;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    async fn list(&self) -> Result<Vec<ContentSection>, RepositoryError>;

    async fn find_by_section(
        &self,
        section: Section,
    ) -> Result<Option<ContentSection>, RepositoryError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError>;

    /// Write `data` as the section's draft, creating the record if needed.
    async fn upsert_draft(
        &self,
        section: Section,
        data: ContentData,
    ) -> Result<(ContentSection, Upserted), RepositoryError>;

    async fn save_draft(
        &self,
        id: &str,
        data: ContentData,
    ) -> Result<Option<ContentSection>, RepositoryError>;

    /// Copy the draft into the published snapshot. `data`, when given,
    /// replaces the draft first.
    async fn publish(
        &self,
        id: &str,
        data: Option<ContentData>,
    ) -> Result<Option<ContentSection>, RepositoryError>;

    /// Clear the draft. The published snapshot is left alone.
    async fn revert(&self, id: &str) -> Result<Option<ContentSection>, RepositoryError>;
}
