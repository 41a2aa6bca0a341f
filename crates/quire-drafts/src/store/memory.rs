use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use quire_common::{Clock, SystemClock};

use super::DocumentStore;
use crate::document::{DocumentBody, DocumentId, DraftPatch, DraftRecord, PublishedRecord};
use crate::error::StoreError;

#[derive(Default)]
struct Records {
    published: HashMap<DocumentId, PublishedRecord>,
    drafts: HashMap<DocumentId, DraftRecord>,
}

/// In-process store. Clones share the same records.
#[derive(Clone)]
pub struct MemoryStore {
    records: Arc<Mutex<Records>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock) -> Self {
        Self {
            records: Arc::new(Mutex::new(Records::default())),
            clock: Arc::new(clock),
        }
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a published record, keeping its timestamp.
    pub fn insert_published(&self, id: impl Into<DocumentId>, record: PublishedRecord) {
        self.records().published.insert(id.into(), record);
    }

    /// Seed a draft record, keeping its timestamp.
    pub fn insert_draft(&self, id: impl Into<DocumentId>, record: DraftRecord) {
        self.records().drafts.insert(id.into(), record);
    }

    pub fn remove_draft(&self, id: &DocumentId) -> Option<DraftRecord> {
        self.records().drafts.remove(id)
    }

    pub fn published_count(&self) -> usize {
        self.records().published.len()
    }

    pub fn draft_count(&self) -> usize {
        self.records().drafts.len()
    }
}

impl DocumentStore for MemoryStore {
    async fn get_published(&self, id: &DocumentId) -> Result<Option<PublishedRecord>, StoreError> {
        Ok(self.records().published.get(id).cloned())
    }

    async fn get_draft(&self, id: &DocumentId) -> Result<Option<DraftRecord>, StoreError> {
        Ok(self.records().drafts.get(id).cloned())
    }

    async fn put_draft(
        &self,
        id: &DocumentId,
        patch: DraftPatch,
    ) -> Result<DateTime<Utc>, StoreError> {
        let now = self.clock.now();
        let mut records = self.records();
        let record = records
            .drafts
            .entry(id.clone())
            .or_insert_with(|| DraftRecord {
                body: DocumentBody::default(),
                is_draft: true,
                updated_at: now,
            });
        record.is_draft = patch.is_draft;
        record.updated_at = now;
        patch.merge_into(&mut record.body);
        Ok(now)
    }

    async fn put_published(
        &self,
        id: &DocumentId,
        body: DocumentBody,
    ) -> Result<DateTime<Utc>, StoreError> {
        let now = self.clock.now();
        self.records().published.insert(
            id.clone(),
            PublishedRecord {
                body,
                updated_at: now,
            },
        );
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use quire_common::ManualClock;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn draft_writes_merge_into_one_record() {
        let clock = clock();
        let store = MemoryStore::with_clock(clock.clone());
        let id = DocumentId::new("n1");

        let first = store
            .put_draft(
                &id,
                DraftPatch {
                    title: Some("Title".into()),
                    ..DraftPatch::content("a")
                },
            )
            .await
            .unwrap();
        clock.advance(Duration::seconds(5));
        let second = store.put_draft(&id, DraftPatch::content("ab")).await.unwrap();

        assert!(second > first);
        assert_eq!(store.draft_count(), 1);
        let draft = store.get_draft(&id).await.unwrap().unwrap();
        assert_eq!(draft.body.title, "Title");
        assert_eq!(draft.body.content, "ab");
        assert_eq!(draft.updated_at, second);
        assert!(draft.is_draft);
    }

    #[tokio::test]
    async fn published_writes_replace() {
        let store = MemoryStore::with_clock(clock());
        let id = DocumentId::new("n1");
        for content in ["one", "two"] {
            let body = DocumentBody {
                content: content.into(),
                ..Default::default()
            };
            store.put_published(&id, body).await.unwrap();
        }
        assert_eq!(store.published_count(), 1);
        let published = store.get_published(&id).await.unwrap().unwrap();
        assert_eq!(published.body.content, "two");
    }

    #[tokio::test]
    async fn missing_records_are_none() {
        let store = MemoryStore::new();
        let id = DocumentId::new("ghost");
        assert!(store.get_published(&id).await.unwrap().is_none());
        assert!(store.get_draft(&id).await.unwrap().is_none());
    }
}
