//! Commit: write the published record, then settle the draft slot.

use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{info, warn};

use crate::autosave::AutoSaver;
use crate::document::{Document, DraftPatch};
use crate::error::{Result, StoreError};
use crate::store::DocumentStore;

/// What happened to the draft record after a successful publish.
#[derive(Debug)]
pub enum DraftSync {
    Synced { at: DateTime<Utc> },
    /// The publish stands; the draft may still look newer on next open if its
    /// marker was never cleared.
    Failed(StoreError),
}

#[derive(Debug)]
pub struct CommitReport {
    pub published_at: DateTime<Utc>,
    pub draft_sync: DraftSync,
}

impl CommitReport {
    pub fn draft_synced(&self) -> bool {
        matches!(self.draft_sync, DraftSync::Synced { .. })
    }
}

/// Publishes notes to a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct Committer<S> {
    store: S,
}

impl<S: DocumentStore> Committer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate, publish, then mark the draft as settled.
    ///
    /// `autosave` is settled before anything is written so a late draft
    /// write cannot land on top of the sync. Only the publish write can fail
    /// the commit.
    pub async fn commit(
        &self,
        document: &Document,
        autosave: Option<&AutoSaver>,
    ) -> Result<CommitReport> {
        let id = &document.id;
        if let Err(e) = document.validate() {
            counter!("quire_commits_total", "outcome" => "invalid").increment(1);
            return Err(e.into());
        }

        if let Some(autosave) = autosave {
            autosave.settle().await;
        }

        let published_at = match self.store.put_published(id, document.body.clone()).await {
            Ok(at) => at,
            Err(e) => {
                counter!("quire_commits_total", "outcome" => "failed").increment(1);
                warn!(%id, error = %e, "publish failed");
                return Err(e.into());
            }
        };
        info!(%id, %published_at, title = %document.body.title, "note published");

        let draft_sync = match self
            .store
            .put_draft(id, DraftPatch::settled(&document.body))
            .await
        {
            Ok(at) => DraftSync::Synced { at },
            Err(e) => {
                warn!(%id, error = %e, "draft sync after publish failed");
                DraftSync::Failed(e)
            }
        };

        let outcome = if matches!(draft_sync, DraftSync::Synced { .. }) {
            "published"
        } else {
            "published_unsynced"
        };
        counter!("quire_commits_total", "outcome" => outcome).increment(1);

        Ok(CommitReport {
            published_at,
            draft_sync,
        })
    }
}
