//! Persisted state in the quality directory.
//!
//! Every file is pretty-printed JSON, rewritten in full. A missing file reads
//! as the default value; a file that exists but does not parse is an error.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use ratchet_core::constants::{PATTERNS_FILE, PAUSE_FILE, SCORECARD_FILE, VERIFICATION_FILE};
use ratchet_core::errors::StorageError;

use crate::patterns::PatternState;
use crate::scorecard::Scorecard;
use crate::verify::VerificationReport;

/// Reads and writes the quality directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The pause flag suppresses scoring runs while present.
    pub fn is_paused(&self) -> bool {
        self.dir.join(PAUSE_FILE).exists()
    }

    pub fn load_scorecard(&self) -> Result<Scorecard, StorageError> {
        self.read_or_default(SCORECARD_FILE)
    }

    pub fn save_scorecard(&self, scorecard: &Scorecard) -> Result<(), StorageError> {
        self.write(SCORECARD_FILE, scorecard)
    }

    pub fn load_patterns(&self) -> Result<PatternState, StorageError> {
        self.read_or_default(PATTERNS_FILE)
    }

    pub fn save_patterns(&self, state: &PatternState) -> Result<(), StorageError> {
        self.write(PATTERNS_FILE, state)
    }

    /// The last verification artifact, if one was written.
    pub fn load_verification(&self) -> Result<Option<VerificationReport>, StorageError> {
        let path = self.dir.join(VERIFICATION_FILE);
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn save_verification(&self, report: &VerificationReport) -> Result<(), StorageError> {
        self.write(VERIFICATION_FILE, report)
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, StorageError> {
        let path = self.dir.join(name);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no previous state, starting fresh");
            return Ok(T::default());
        }
        read_json(&path)
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(name);
        let write_err = |message: String| StorageError::Write {
            path: path.display().to_string(),
            message,
        };
        std::fs::create_dir_all(&self.dir).map_err(|e| write_err(e.to_string()))?;
        let mut body = serde_json::to_string_pretty(value).map_err(|e| write_err(e.to_string()))?;
        body.push('\n');
        std::fs::write(&path, body).map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), "state written");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let text = std::fs::read_to_string(path).map_err(|e| StorageError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| StorageError::Corrupt {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
