use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::fs::atomic_write;
use crate::translation::TranslationResult;

/// A past translation together with the text that was translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub source_text: String,
    #[serde(flatten)]
    pub result: TranslationResult,
}

impl HistoryRecord {
    pub const fn new(source_text: String, result: TranslationResult) -> Self {
        Self {
            source_text,
            result,
        }
    }

    /// Whether either side of the translation is in `lang` (case-insensitive).
    pub fn involves(&self, lang: &str) -> bool {
        self.result.resolved_source.eq_ignore_ascii_case(lang)
            || self.result.target.eq_ignore_ascii_case(lang)
    }
}

/// Size-bounded, append-only translation log backed by a JSON array file.
///
/// Records are stored oldest first. When an append pushes the log past
/// `max_history`, the oldest records are evicted. A `max_history` of zero
/// disables recording.
pub struct HistoryStore {
    path: PathBuf,
    max_history: usize,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub const fn new(path: PathBuf, max_history: usize) -> Self {
        Self {
            path,
            max_history,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn max_history(&self) -> usize {
        self.max_history
    }

    pub const fn is_enabled(&self) -> bool {
        self.max_history > 0
    }

    /// Appends a record, evicting the oldest ones beyond `max_history`.
    pub fn append(&self, record: HistoryRecord) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut records = self.load()?;
        records.push(record);
        if records.len() > self.max_history {
            let overflow = records.len() - self.max_history;
            records.drain(..overflow);
            debug!(evicted = overflow, "history trimmed");
        }
        self.save(&records)
    }

    /// Returns up to `limit` records, most recent first, optionally only
    /// those whose source or target is `filter_lang`.
    pub fn list(&self, limit: usize, filter_lang: Option<&str>) -> Vec<HistoryRecord> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.load_for_display()
            .into_iter()
            .rev()
            .filter(|r| filter_lang.is_none_or(|lang| r.involves(lang)))
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.load_for_display().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the store. Clearing an empty or missing store succeeds.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        self.save(&[])
    }

    /// Reads every record, oldest first.
    ///
    /// A file that is not valid UTF-8 or not a JSON array of records is moved
    /// aside and read as empty. Any other read failure is an error, so callers
    /// never overwrite a file they could not read.
    fn load(&self) -> Result<Vec<HistoryRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                self.quarantine(&e)?;
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read history file: {}", self.path.display())
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                self.quarantine(&e)?;
                Ok(Vec::new())
            }
        }
    }

    /// Like [`Self::load`], but a read failure is logged and yields nothing.
    fn load_for_display(&self) -> Vec<HistoryRecord> {
        self.load().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "failed to read history");
            Vec::new()
        })
    }

    /// Moves an unreadable history file to `<name>.corrupt` so the next write
    /// starts fresh without destroying what was there.
    fn quarantine(&self, reason: &dyn fmt::Display) -> Result<()> {
        let mut corrupt = self.path.clone().into_os_string();
        corrupt.push(".corrupt");
        let corrupt = PathBuf::from(corrupt);
        warn!(
            path = %self.path.display(),
            moved_to = %corrupt.display(),
            error = %reason,
            "history file is corrupted; starting a new one"
        );
        fs::rename(&self.path, &corrupt).with_context(|| {
            format!(
                "Failed to move corrupted history aside to {}",
                corrupt.display()
            )
        })
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(records).context("Failed to serialize history")?;
        atomic_write(&self.path, &contents)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))
    }
}
