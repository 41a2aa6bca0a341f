//! quire-drafts: persistence for the quire note editor.
//!
//! A note lives in two records that share an id: the published record,
//! written only by an explicit commit, and the draft record, written by
//! debounced auto-save. This crate provides:
//! - [`store`] - the storage contract plus in-memory and file-backed stores
//! - [`Loader`] - picks the starting state when a note is opened
//! - [`AutoSaver`] - debounced draft writes, serialized per note
//! - [`Committer`] - validate, publish, then settle the draft
//! - [`EditorSession`] - ties the above to an in-memory document and the
//!   command dispatcher from `quire-editor-core`

pub mod autosave;
pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod publish;
pub mod session;
pub mod store;

pub use autosave::{AutoSaver, SaveStatus, StatusCallback, WriteResult};
pub use config::EditorConfig;
pub use document::{
    Document, DocumentBody, DocumentId, DocumentStatus, DraftPatch, DraftRecord, PublishedRecord,
};
pub use error::{ConfigError, DraftError, Result, StoreError, ValidationError};
pub use loader::{FailedRead, LoadOutcome, LoadSource, Loader, reconcile};
pub use publish::{CommitReport, Committer, DraftSync};
pub use session::{EditorSession, RunOutcome, SaveIndicator};
pub use store::{DocumentStore, FileStore, MemoryStore};
