use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConfigError, DraftError};

/// Editor persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Quiet period after the last edit before a draft is written.
    pub autosave_debounce: Duration,
    /// Root directory for a [`FileStore`](crate::store::FileStore), if any.
    pub store_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_debounce: Self::DEFAULT_DEBOUNCE,
            store_dir: None,
        }
    }
}

impl EditorConfig {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(30);

    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `QUIRE_AUTOSAVE_DEBOUNCE_MS`: debounce window in milliseconds (default: 30000)
    /// - `QUIRE_STORE_DIR`: directory for file-backed storage (default: none)
    pub fn from_env() -> Result<Self, DraftError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DraftError> {
        let autosave_debounce = match lookup("QUIRE_AUTOSAVE_DEBOUNCE_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                    var: "QUIRE_AUTOSAVE_DEBOUNCE_MS",
                    message: format!("{e}"),
                })?;
                Duration::from_millis(ms)
            }
            None => Self::DEFAULT_DEBOUNCE,
        };

        let store_dir = match lookup("QUIRE_STORE_DIR") {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    var: "QUIRE_STORE_DIR",
                    message: "must not be empty".into(),
                }
                .into());
            }
            Some(dir) => Some(PathBuf::from(dir)),
            None => None,
        };

        Ok(Self {
            autosave_debounce,
            store_dir,
        })
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.autosave_debounce = debounce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = EditorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.autosave_debounce, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = EditorConfig::from_lookup(lookup(&[
            ("QUIRE_AUTOSAVE_DEBOUNCE_MS", "300"),
            ("QUIRE_STORE_DIR", "/tmp/notes"),
        ]))
        .unwrap();
        assert_eq!(config.autosave_debounce, Duration::from_millis(300));
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/notes")));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = EditorConfig::from_lookup(lookup(&[("QUIRE_AUTOSAVE_DEBOUNCE_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            DraftError::Config(ConfigError::Invalid {
                var: "QUIRE_AUTOSAVE_DEBOUNCE_MS",
                ..
            })
        ));

        let err = EditorConfig::from_lookup(lookup(&[("QUIRE_STORE_DIR", " ")])).unwrap_err();
        assert!(matches!(err, DraftError::Config(_)));
    }
}
