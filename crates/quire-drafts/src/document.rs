//! The note being edited and its two persisted projections.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use quire_common::Clock;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

use crate::error::ValidationError;

/// Stable identifier shared by a note's published and draft records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(SmolStr);

impl DocumentId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    /// Mint an id for a note that has never been saved.
    ///
    /// Derived from the clock in milliseconds, so two notes created in the
    /// same millisecond collide. Fine for a single author.
    pub fn generate(clock: &impl Clock) -> Self {
        Self(format_smolstr!("new-{}", clock.now().timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Published,
}

/// Editable fields of a note.
///
/// Missing fields in a persisted record deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentBody {
    pub title: String,
    pub description: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub featured_image: String,
    pub status: DocumentStatus,
}

/// The in-memory note owned by an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub body: DocumentBody,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Document {
    /// An empty note, as in create mode.
    pub fn new(id: DocumentId) -> Self {
        Self {
            id,
            body: DocumentBody::default(),
            updated_at: None,
        }
    }

    pub fn from_published(id: DocumentId, record: PublishedRecord) -> Self {
        Self {
            id,
            body: record.body,
            updated_at: Some(record.updated_at),
        }
    }

    /// Resume from a draft. The status is forced to `Draft` whatever the
    /// record says.
    pub fn from_draft(id: DocumentId, record: DraftRecord) -> Self {
        let mut body = record.body;
        body.status = DocumentStatus::Draft;
        Self {
            id,
            body,
            updated_at: Some(record.updated_at),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.body.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }
}

/// The authoritative, explicitly committed projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRecord {
    #[serde(flatten)]
    pub body: DocumentBody,
    pub updated_at: DateTime<Utc>,
}

/// The auto-saved projection.
///
/// `is_draft == false` means the record was synced by a commit and carries
/// nothing beyond what is published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    #[serde(flatten)]
    pub body: DocumentBody,
    #[serde(default = "default_is_draft")]
    pub is_draft: bool,
    pub updated_at: DateTime<Utc>,
}

fn default_is_draft() -> bool {
    true
}

/// Merge-upsert payload for a draft write. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub featured_image: Option<String>,
    pub status: Option<DocumentStatus>,
    pub is_draft: bool,
}

impl DraftPatch {
    /// Everything the editor lets the author change, minus `status`.
    pub fn autosave(body: &DocumentBody) -> Self {
        Self {
            title: Some(body.title.clone()),
            description: Some(body.description.clone()),
            content: Some(body.content.clone()),
            tags: Some(body.tags.clone()),
            featured_image: Some(body.featured_image.clone()),
            status: None,
            is_draft: true,
        }
    }

    /// The full body, marked as settled. Written right after a publish.
    pub fn settled(body: &DocumentBody) -> Self {
        Self {
            status: Some(body.status),
            is_draft: false,
            ..Self::autosave(body)
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            is_draft: true,
            ..Self::default()
        }
    }

    /// Merge into `body`, overwriting only the fields this patch carries.
    pub fn merge_into(self, body: &mut DocumentBody) {
        if let Some(title) = self.title {
            body.title = title;
        }
        if let Some(description) = self.description {
            body.description = description;
        }
        if let Some(content) = self.content {
            body.content = content;
        }
        if let Some(tags) = self.tags {
            body.tags = tags;
        }
        if let Some(featured_image) = self.featured_image {
            body.featured_image = featured_image;
        }
        if let Some(status) = self.status {
            body.status = status;
        }
    }
}
