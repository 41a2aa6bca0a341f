//! Reconciliation of published and draft records on open.

use metrics::counter;
use tracing::{debug, info, warn};

use crate::document::{Document, DocumentId, DraftRecord, PublishedRecord};
use crate::error::{DraftError, Result, StoreError};
use crate::store::DocumentStore;

/// Where the session's starting state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing persisted yet.
    New,
    Published,
    /// Resumed from an auto-saved draft newer than the published record.
    Draft,
}

impl LoadSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

/// The read that failed when a load went ahead on the other one.
#[derive(Debug)]
pub enum FailedRead {
    Published(StoreError),
    Draft(StoreError),
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub document: Document,
    pub source: LoadSource,
    /// A draft resume starts out with unsaved changes.
    pub has_unsaved_changes: bool,
    pub degraded: Option<FailedRead>,
}

/// Pick the authoritative starting state.
///
/// A draft wins only when it is a real draft and strictly newer than the
/// published record. Ties go to published.
pub fn reconcile(
    id: DocumentId,
    published: Option<PublishedRecord>,
    draft: Option<DraftRecord>,
) -> (Document, LoadSource) {
    match (published, draft) {
        (None, None) => (Document::new(id), LoadSource::New),
        (Some(published), None) => (Document::from_published(id, published), LoadSource::Published),
        (None, Some(draft)) => (Document::from_draft(id, draft), LoadSource::Draft),
        (Some(published), Some(draft)) => {
            if draft.is_draft && draft.updated_at > published.updated_at {
                (Document::from_draft(id, draft), LoadSource::Draft)
            } else {
                (Document::from_published(id, published), LoadSource::Published)
            }
        }
    }
}

/// Loads notes from a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct Loader<S> {
    store: S,
}

impl<S: DocumentStore> Loader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read both records concurrently and reconcile them.
    ///
    /// One failed read degrades the load to whatever the other read found.
    /// Both failing is an error.
    pub async fn load(&self, id: &DocumentId) -> Result<LoadOutcome> {
        let (published, draft) =
            tokio::join!(self.store.get_published(id), self.store.get_draft(id));

        let (published, draft, degraded) = match (published, draft) {
            (Ok(published), Ok(draft)) => (published, draft, None),
            (Err(e), Ok(draft)) => {
                warn!(%id, error = %e, "published read failed, continuing from draft");
                (None, draft, Some(FailedRead::Published(e)))
            }
            (Ok(published), Err(e)) => {
                warn!(%id, error = %e, "draft read failed, continuing from published");
                (published, None, Some(FailedRead::Draft(e)))
            }
            (Err(published), Err(draft)) => {
                counter!("quire_loads_total", "source" => "failed").increment(1);
                return Err(DraftError::Load {
                    id: id.clone(),
                    published,
                    draft,
                });
            }
        };

        let (document, source) = reconcile(id.clone(), published, draft);
        counter!("quire_loads_total", "source" => source.as_str()).increment(1);
        match source {
            LoadSource::Draft => {
                info!(%id, updated_at = ?document.updated_at, "resumed from unsaved draft")
            }
            _ => debug!(%id, source = source.as_str(), "loaded note"),
        }

        Ok(LoadOutcome {
            has_unsaved_changes: source == LoadSource::Draft,
            document,
            source,
            degraded,
        })
    }

    /// Like [`load`](Self::load), but a note with no records at all is an
    /// error rather than a blank document.
    pub async fn load_existing(&self, id: &DocumentId) -> Result<LoadOutcome> {
        let outcome = self.load(id).await?;
        if outcome.source != LoadSource::New {
            return Ok(outcome);
        }
        match outcome.degraded {
            None => Err(DraftError::NotFound { id: id.clone() }),
            // Can't tell "missing" from "unreadable" with one side down.
            Some(FailedRead::Published(e) | FailedRead::Draft(e)) => Err(DraftError::Store(e)),
        }
    }
}
