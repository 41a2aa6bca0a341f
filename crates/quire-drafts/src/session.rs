//! An open note: in-memory document, selection, auto-save and commit.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use quire_common::SystemClock;
use quire_editor_core::{Command, Dispatch, SelectionRange, TextRequester, Trigger, dispatch};
use tracing::debug;

use crate::autosave::{AutoSaver, SaveStatus, StatusCallback};
use crate::config::EditorConfig;
use crate::document::{Document, DocumentBody, DocumentId, DocumentStatus, DraftPatch};
use crate::error::{DraftError, Result};
use crate::loader::{LoadSource, Loader};
use crate::publish::{CommitReport, Committer};
use crate::store::DocumentStore;

/// State behind the toolbar's save indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveIndicator {
    pub saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Result of [`EditorSession::run`].
#[derive(Debug)]
pub enum RunOutcome {
    Edited,
    Unchanged,
    Committed(CommitReport),
}

pub struct EditorSession<S> {
    document: Document,
    selection: SelectionRange,
    source: LoadSource,
    unsaved: bool,
    indicator: Arc<Mutex<SaveIndicator>>,
    autosave: AutoSaver,
    committer: Committer<S>,
}

impl<S: DocumentStore + Clone> EditorSession<S> {
    /// Start a new, empty note under a freshly minted id.
    pub fn create(store: S, config: &EditorConfig) -> Self {
        let id = DocumentId::generate(&SystemClock);
        Self::from_parts(store, Document::new(id), LoadSource::New, false, config)
    }

    /// Open an existing note, resuming from its draft if that is newer.
    pub async fn open(store: S, id: &DocumentId, config: &EditorConfig) -> Result<Self> {
        let outcome = Loader::new(store.clone()).load_existing(id).await?;
        Ok(Self::from_parts(
            store,
            outcome.document,
            outcome.source,
            outcome.has_unsaved_changes,
            config,
        ))
    }

    fn from_parts(
        store: S,
        document: Document,
        source: LoadSource,
        unsaved: bool,
        config: &EditorConfig,
    ) -> Self {
        let autosave = AutoSaver::new(store.clone(), document.id.clone(), config.autosave_debounce);
        let mut indicator = SaveIndicator::default();
        if source == LoadSource::Draft {
            indicator.last_saved = document.updated_at;
        }
        Self {
            document,
            selection: SelectionRange::default(),
            source,
            unsaved,
            indicator: Arc::new(Mutex::new(indicator)),
            autosave,
            committer: Committer::new(store),
        }
    }
}

impl<S: DocumentStore> EditorSession<S> {
    pub fn id(&self) -> &DocumentId {
        &self.document.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    /// Set the selection, clamped to the current content.
    pub fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = selection.clamp_to(self.document.body.content.chars().count());
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn save_indicator(&self) -> SaveIndicator {
        self.indicator
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn autosave(&self) -> &AutoSaver {
        &self.autosave
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        self.edit(|body| replace(&mut body.title, title))
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        let description = description.into();
        self.edit(|body| replace(&mut body.description, description))
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        let changed = self.edit(|body| replace(&mut body.content, content));
        self.set_selection(self.selection);
        changed
    }

    pub fn set_tags<I, T>(&mut self, tags: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tags: BTreeSet<String> = tags
            .into_iter()
            .map(Into::into)
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        self.edit(|body| replace(&mut body.tags, tags))
    }

    pub fn set_featured_image(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        self.edit(|body| replace(&mut body.featured_image, url))
    }

    pub fn set_status(&mut self, status: DocumentStatus) -> bool {
        self.edit(|body| replace(&mut body.status, status))
    }

    /// Apply `change` and, if it changed anything, schedule an autosave.
    fn edit(&mut self, change: impl FnOnce(&mut DocumentBody) -> bool) -> bool {
        if !change(&mut self.document.body) {
            return false;
        }
        self.unsaved = true;
        self.autosave
            .schedule_with(DraftPatch::autosave(&self.document.body), self.status_callback());
        true
    }

    fn status_callback(&self) -> StatusCallback {
        let indicator = Arc::clone(&self.indicator);
        Arc::new(move |status: SaveStatus| {
            let mut indicator = indicator.lock().unwrap_or_else(PoisonError::into_inner);
            match status {
                SaveStatus::Saving => indicator.saving = true,
                SaveStatus::Saved { at } => {
                    indicator.saving = false;
                    indicator.last_saved = Some(at);
                    indicator.last_error = None;
                }
                SaveStatus::Error { message } => {
                    indicator.saving = false;
                    indicator.last_error = Some(message);
                }
            }
        })
    }

    /// Publish the note.
    ///
    /// On success the session has no unsaved changes. A failed publish
    /// leaves them in place and shows up in the save indicator; a validation
    /// failure only returns the error.
    pub async fn commit(&mut self) -> Result<CommitReport> {
        match self.committer.commit(&self.document, Some(&self.autosave)).await {
            Ok(report) => {
                self.unsaved = false;
                self.document.updated_at = Some(report.published_at);
                let mut indicator = self.indicator.lock().unwrap_or_else(PoisonError::into_inner);
                indicator.last_saved = Some(report.published_at);
                indicator.last_error = None;
                Ok(report)
            }
            Err(e) => {
                if let DraftError::Store(store_err) = &e {
                    self.indicator
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .last_error = Some(store_err.to_string());
                }
                Err(e)
            }
        }
    }

    /// Run a command from either input surface against the current content
    /// and selection.
    pub async fn run<R: TextRequester>(
        &mut self,
        trigger: Trigger,
        command: &Command,
        requester: &R,
    ) -> Result<RunOutcome> {
        debug!(id = %self.document.id, ?trigger, command = command.name(), "running command");
        let content = &self.document.body.content;
        match dispatch(command, content, self.selection, requester).await {
            Dispatch::Edited { text, selection } => {
                self.set_content(text);
                self.set_selection(selection);
                Ok(RunOutcome::Edited)
            }
            Dispatch::Unchanged => Ok(RunOutcome::Unchanged),
            Dispatch::Save => self.commit().await.map(RunOutcome::Committed),
        }
    }

    /// End the session, dropping any pending autosave. Writes already
    /// queued still complete.
    pub fn close(self) -> Document {
        if self.autosave.cancel() {
            debug!(id = %self.document.id, "closed with a pending autosave");
        }
        self.document
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
