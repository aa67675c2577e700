//! Preview data assembly.
//!
//! Builds the props each marketing component is rendered with, so editors can
//! check a draft before publishing it.

use futures::future::join_all;
use serde::Serialize;

use crate::client::ContentStore;
use crate::content::{ContentData, ContentSection, Section};

/// Which side of a record to preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewMode {
    #[default]
    Draft,
    Published,
}

/// Props for one section's component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewProps {
    pub section: Section,
    pub props: ContentData,
}

impl PreviewProps {
    pub fn from_draft(section: Section, draft: &ContentData) -> Self {
        Self {
            section,
            props: section.with_defaults(draft),
        }
    }

    pub fn from_record(record: &ContentSection, mode: PreviewMode) -> Self {
        let data = match mode {
            PreviewMode::Draft => record.working_data(),
            PreviewMode::Published => &record.published_data,
        };
        Self::from_draft(record.section, data)
    }
}

/// One slot of the full-page preview. `props` is `None` when the section
/// could not be loaded; the component then renders its built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPreview {
    pub section: Section,
    pub props: Option<ContentData>,
}

/// Fetch every section concurrently and assemble the whole page, in page
/// order.
pub async fn assemble_full_page<S>(store: &S, mode: PreviewMode) -> Vec<SectionPreview>
where
    S: ContentStore + ?Sized,
{
    let fetches = Section::ALL.into_iter().map(|section| async move {
        let props = match store.fetch_by_section(section).await {
            Ok(Some(record)) => Some(PreviewProps::from_record(&record, mode).props),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(%section, error = %err, "preview fetch failed");
                None
            }
        };
        SectionPreview { section, props }
    });
    join_all(fetches).await
}
