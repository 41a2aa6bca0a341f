//! Persistence contract for published and draft records.
//!
//! A store keeps at most one published record and one draft record per
//! [`DocumentId`]. Both writes are upserts; `put_draft` additionally merges the
//! patch into whatever draft already exists.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::document::{DocumentBody, DocumentId, DraftPatch, DraftRecord, PublishedRecord};
use crate::error::StoreError;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Backing storage for notes.
pub trait DocumentStore: Send + Sync + 'static {
    fn get_published(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<PublishedRecord>, StoreError>> + Send;

    fn get_draft(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<DraftRecord>, StoreError>> + Send;

    /// Merge-upsert the draft record, stamping `updated_at` with the store's
    /// clock. Returns the stamp.
    fn put_draft(
        &self,
        id: &DocumentId,
        patch: DraftPatch,
    ) -> impl Future<Output = Result<DateTime<Utc>, StoreError>> + Send;

    /// Upsert the published record, stamping `updated_at`. Returns the stamp.
    fn put_published(
        &self,
        id: &DocumentId,
        body: DocumentBody,
    ) -> impl Future<Output = Result<DateTime<Utc>, StoreError>> + Send;
}

impl<S: DocumentStore> DocumentStore for Arc<S> {
    fn get_published(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<PublishedRecord>, StoreError>> + Send {
        (**self).get_published(id)
    }

    fn get_draft(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<Option<DraftRecord>, StoreError>> + Send {
        (**self).get_draft(id)
    }

    fn put_draft(
        &self,
        id: &DocumentId,
        patch: DraftPatch,
    ) -> impl Future<Output = Result<DateTime<Utc>, StoreError>> + Send {
        (**self).put_draft(id, patch)
    }

    fn put_published(
        &self,
        id: &DocumentId,
        body: DocumentBody,
    ) -> impl Future<Output = Result<DateTime<Utc>, StoreError>> + Send {
        (**self).put_published(id, body)
    }
}
