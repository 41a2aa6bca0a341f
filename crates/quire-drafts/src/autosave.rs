//! Debounced, serialized draft writes.
//!
//! Each [`AutoSaver`] owns one note's draft slot. [`AutoSaver::schedule`]
//! replaces the pending payload and restarts the quiet-period timer; when the
//! timer fires, the payload at that moment is handed to a single writer task.
//! Every write for the note goes through that task's queue, and jobs are
//! queued synchronously in call order, so a slow early write can never land
//! after a later one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::document::{DocumentId, DraftPatch};
use crate::error::StoreError;
use crate::store::DocumentStore;

/// Progress of one draft write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// About to hit the store.
    Saving,
    Saved { at: DateTime<Utc> },
    Error { message: String },
}

pub type StatusCallback = Arc<dyn Fn(SaveStatus) + Send + Sync>;

/// Outcome of a single draft write.
pub type WriteResult = Result<DateTime<Utc>, StoreError>;

enum WriteJob {
    Write {
        patch: DraftPatch,
        on_status: StatusCallback,
        done: Option<oneshot::Sender<WriteResult>>,
    },
    /// Resolves once every job queued before it has finished.
    Barrier(oneshot::Sender<()>),
}

#[derive(Default)]
struct Pending {
    payload: Option<(DraftPatch, StatusCallback)>,
    timer: Option<JoinHandle<()>>,
    /// Bumped on every schedule; a timer only fires its own generation.
    generation: u64,
}

impl Pending {
    fn clear(&mut self) -> bool {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.payload.take().is_some()
    }
}

/// Debounced auto-save for one note.
///
/// Must be created inside a tokio runtime.
pub struct AutoSaver {
    id: DocumentId,
    debounce: Duration,
    pending: Arc<Mutex<Pending>>,
    jobs: mpsc::UnboundedSender<WriteJob>,
}

impl AutoSaver {
    pub fn new<S: DocumentStore>(store: S, id: DocumentId, debounce: Duration) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, id.clone(), rx));
        Self {
            id,
            debounce,
            pending: Arc::new(Mutex::new(Pending::default())),
            jobs,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        lock(&self.pending)
    }

    /// Replace the pending payload and restart the debounce timer.
    ///
    /// Auto-saved drafts are always written with `is_draft` set, whatever the
    /// patch carries.
    pub fn schedule(
        &self,
        data: DraftPatch,
        on_status: impl Fn(SaveStatus) + Send + Sync + 'static,
    ) {
        self.schedule_with(data, Arc::new(on_status));
    }

    pub fn schedule_with(&self, mut data: DraftPatch, on_status: StatusCallback) {
        data.is_draft = true;
        let mut pending = self.pending();
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.payload = Some((data, on_status));
        pending.generation += 1;

        let generation = pending.generation;
        let shared = Arc::clone(&self.pending);
        let jobs = self.jobs.clone();
        let debounce = self.debounce;
        let id = self.id.clone();
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let mut pending = lock(&shared);
            if pending.generation != generation {
                return;
            }
            pending.timer = None;
            if let Some((patch, on_status)) = pending.payload.take() {
                debug!(%id, "debounce elapsed, queueing draft write");
                let _ = jobs.send(WriteJob::Write {
                    patch,
                    on_status,
                    done: None,
                });
            }
        }));
        debug!(id = %self.id, debounce = ?self.debounce, "autosave scheduled");
    }

    pub fn is_pending(&self) -> bool {
        self.pending().payload.is_some()
    }

    /// Write the pending payload now and wait for it.
    ///
    /// Returns `None` if nothing was pending.
    pub async fn flush(&self) -> Option<WriteResult> {
        let (done_tx, done_rx) = oneshot::channel();
        {
            let mut pending = self.pending();
            let (patch, on_status) = pending.payload.take()?;
            if let Some(timer) = pending.timer.take() {
                timer.abort();
            }
            let job = WriteJob::Write {
                patch,
                on_status,
                done: Some(done_tx),
            };
            if self.jobs.send(job).is_err() {
                return Some(Err(writer_stopped()));
            }
        }
        Some(done_rx.await.unwrap_or_else(|_| Err(writer_stopped())))
    }

    /// Drop the pending timer and payload. Writes already queued still run.
    ///
    /// Returns whether anything was pending.
    pub fn cancel(&self) -> bool {
        let dropped = self.pending().clear();
        if dropped {
            debug!(id = %self.id, "pending autosave cancelled");
        }
        dropped
    }

    /// Cancel anything pending, then wait for every queued write to finish.
    pub async fn settle(&self) {
        self.cancel();
        let (tx, rx) = oneshot::channel();
        if self.jobs.send(WriteJob::Barrier(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        lock(&self.pending).clear();
    }
}

fn lock(pending: &Mutex<Pending>) -> MutexGuard<'_, Pending> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

fn writer_stopped() -> StoreError {
    StoreError::unavailable("autosave writer stopped")
}

/// Drains write jobs in order until every sender is gone.
async fn run_writer<S: DocumentStore>(
    store: S,
    id: DocumentId,
    mut rx: mpsc::UnboundedReceiver<WriteJob>,
) {
    while let Some(job) = rx.recv().await {
        match job {
            WriteJob::Write {
                patch,
                on_status,
                done,
            } => {
                on_status(SaveStatus::Saving);
                let result = store.put_draft(&id, patch).await;
                match &result {
                    Ok(at) => {
                        counter!("quire_autosave_writes_total", "outcome" => "saved").increment(1);
                        debug!(%id, %at, "draft saved");
                        on_status(SaveStatus::Saved { at: *at });
                    }
                    Err(e) => {
                        counter!("quire_autosave_writes_total", "outcome" => "error").increment(1);
                        error!(%id, error = %e, "draft save failed");
                        on_status(SaveStatus::Error {
                            message: e.to_string(),
                        });
                    }
                }
                if let Some(done) = done {
                    let _ = done.send(result);
                }
            }
            WriteJob::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(%id, "autosave writer stopped");
}
