#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use quire_common::ManualClock;
use quire_drafts::{
    DocumentBody, DocumentId, DocumentStore, DraftPatch, DraftRecord, MemoryStore,
    PublishedRecord, StoreError,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

pub fn body(title: &str, content: &str) -> DocumentBody {
    DocumentBody {
        title: title.into(),
        content: content.into(),
        ..Default::default()
    }
}

#[derive(Default)]
struct Script {
    draft_delays: VecDeque<Duration>,
    /// Draft contents in the order their writes completed.
    completed_drafts: Vec<Option<String>>,
    draft_attempts: usize,
    published_attempts: usize,
}

/// A [`MemoryStore`] with injectable latency and failures that records every
/// draft write.
#[derive(Clone)]
pub struct ScriptedStore {
    pub inner: MemoryStore,
    pub clock: ManualClock,
    script: Arc<Mutex<Script>>,
    fail_published_reads: Arc<AtomicBool>,
    fail_draft_reads: Arc<AtomicBool>,
    fail_published_writes: Arc<AtomicBool>,
    fail_draft_writes: Arc<AtomicBool>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        let clock = ManualClock::new(t0());
        Self {
            inner: MemoryStore::with_clock(clock.clone()),
            clock,
            script: Arc::default(),
            fail_published_reads: Arc::default(),
            fail_draft_reads: Arc::default(),
            fail_published_writes: Arc::default(),
            fail_draft_writes: Arc::default(),
        }
    }

    /// Delay the next draft write by `delay`. Calls queue up.
    pub fn delay_next_draft_write(&self, delay: Duration) {
        self.script.lock().unwrap().draft_delays.push_back(delay);
    }

    pub fn fail_published_reads(&self, fail: bool) {
        self.fail_published_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_draft_reads(&self, fail: bool) {
        self.fail_draft_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_published_writes(&self, fail: bool) {
        self.fail_published_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_draft_writes(&self, fail: bool) {
        self.fail_draft_writes.store(fail, Ordering::SeqCst);
    }

    pub fn completed_drafts(&self) -> Vec<Option<String>> {
        self.script.lock().unwrap().completed_drafts.clone()
    }

    pub fn draft_attempts(&self) -> usize {
        self.script.lock().unwrap().draft_attempts
    }

    pub fn published_attempts(&self) -> usize {
        self.script.lock().unwrap().published_attempts
    }
}

impl DocumentStore for ScriptedStore {
    async fn get_published(&self, id: &DocumentId) -> Result<Option<PublishedRecord>, StoreError> {
        if self.fail_published_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("published collection offline"));
        }
        self.inner.get_published(id).await
    }

    async fn get_draft(&self, id: &DocumentId) -> Result<Option<DraftRecord>, StoreError> {
        if self.fail_draft_reads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("drafts collection offline"));
        }
        self.inner.get_draft(id).await
    }

    async fn put_draft(
        &self,
        id: &DocumentId,
        patch: DraftPatch,
    ) -> Result<DateTime<Utc>, StoreError> {
        let delay = {
            let mut script = self.script.lock().unwrap();
            script.draft_attempts += 1;
            script.draft_delays.pop_front()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_draft_writes.load(Ordering::SeqCst) {
            return Err(StoreError::rejected("draft write refused"));
        }
        let content = patch.content.clone();
        let at = self.inner.put_draft(id, patch).await?;
        self.script.lock().unwrap().completed_drafts.push(content);
        Ok(at)
    }

    async fn put_published(
        &self,
        id: &DocumentId,
        body: DocumentBody,
    ) -> Result<DateTime<Utc>, StoreError> {
        self.script.lock().unwrap().published_attempts += 1;
        if self.fail_published_writes.load(Ordering::SeqCst) {
            return Err(StoreError::rejected("publish refused"));
        }
        self.inner.put_published(id, body).await
    }
}
