use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::ContentData;
use super::validate::ValidationError;

/// Publication state of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Nothing has ever been published.
    #[default]
    Unpublished,
    /// A saved draft exists that is not live yet.
    Draft,
    /// The live snapshot matches the working copy.
    Published,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unpublished => "unpublished",
            Status::Draft => "draft",
            Status::Published => "published",
        }
    }

    /// Steady-state status for a draft/published pair.
    ///
    /// An empty draft means "no pending edits", so the section reads as
    /// whatever the published snapshot says.
    pub fn derive(draft: &ContentData, published: &ContentData) -> Self {
        match (draft.is_empty(), published.is_empty()) {
            (true, true) => Status::Unpublished,
            (true, false) => Status::Published,
            (false, _) if draft == published => Status::Published,
            (false, _) => Status::Draft,
        }
    }

    /// Status after a revert cleared the draft.
    pub fn after_revert(published: &ContentData) -> Self {
        if published.is_empty() {
            Status::Unpublished
        } else {
            Status::Published
        }
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpublished" => Ok(Status::Unpublished),
            "draft" => Ok(Status::Draft),
            "published" => Ok(Status::Published),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
