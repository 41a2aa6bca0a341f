use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use quire_common::{Clock, SystemClock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::DocumentStore;
use crate::document::{DocumentBody, DocumentId, DraftPatch, DraftRecord, PublishedRecord};
use crate::error::StoreError;

const PUBLISHED_DIR: &str = "published";
const DRAFTS_DIR: &str = "drafts";

/// One JSON file per record:
///
/// ```text
/// <root>/published/<id>.json
/// <root>/drafts/<id>.json
/// ```
///
/// Writes go to a temp file that is renamed over the record, so readers see
/// either the old record or the new one.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_clock(root, SystemClock)
    }

    pub fn with_clock(root: impl AsRef<Path>, clock: impl Clock) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            clock: Arc::new(clock),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, kind: &str, id: &DocumentId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        let valid = !raw.is_empty()
            && !raw.starts_with('.')
            && !raw.contains(['/', '\\', '\0'])
            && !Path::new(raw).is_absolute();
        if !valid {
            return Err(StoreError::InvalidId { id: raw.to_owned() });
        }
        Ok(self.root.join(kind).join(format!("{raw}.json")))
    }
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(record)?;
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(io_err(dir))?;
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    tokio::fs::write(&tmp, &bytes).await.map_err(io_err(&tmp))?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err(path))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote record");
    Ok(())
}

impl DocumentStore for FileStore {
    async fn get_published(&self, id: &DocumentId) -> Result<Option<PublishedRecord>, StoreError> {
        read_record(&self.record_path(PUBLISHED_DIR, id)?).await
    }

    async fn get_draft(&self, id: &DocumentId) -> Result<Option<DraftRecord>, StoreError> {
        read_record(&self.record_path(DRAFTS_DIR, id)?).await
    }

    async fn put_draft(
        &self,
        id: &DocumentId,
        patch: DraftPatch,
    ) -> Result<DateTime<Utc>, StoreError> {
        let path = self.record_path(DRAFTS_DIR, id)?;
        let now = self.clock.now();
        let existing = match read_record::<DraftRecord>(&path).await {
            Ok(existing) => existing,
            // An unreadable draft would otherwise block every later write.
            Err(StoreError::Serde { source }) => {
                warn!(%id, path = %path.display(), error = %source, "replacing unreadable draft");
                None
            }
            Err(e) => return Err(e),
        };
        let mut record = existing.unwrap_or_else(|| DraftRecord {
            body: DocumentBody::default(),
            is_draft: true,
            updated_at: now,
        });
        record.is_draft = patch.is_draft;
        record.updated_at = now;
        patch.merge_into(&mut record.body);
        write_record(&path, &record).await?;
        Ok(now)
    }

    async fn put_published(
        &self,
        id: &DocumentId,
        body: DocumentBody,
    ) -> Result<DateTime<Utc>, StoreError> {
        let path = self.record_path(PUBLISHED_DIR, id)?;
        let now = self.clock.now();
        let record = PublishedRecord {
            body,
            updated_at: now,
        };
        write_record(&path, &record).await?;
        Ok(now)
    }
}
