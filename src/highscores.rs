//! High score persistence
//!
//! A single integer, stored as a bare JSON number. Native builds use a file,
//! the browser build uses LocalStorage, tests use memory.

use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// Somewhere to keep the best score between sessions
pub trait HighScoreStore {
    /// Stored high score; 0 when nothing has been saved yet
    fn load_high_score(&self) -> Result<u64, PersistError>;

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError>;
}

/// Decode a stored value; whitespace around the number is allowed
fn parse_score(raw: &str) -> Result<u64, PersistError> {
    Ok(serde_json::from_str(raw.trim())?)
}

/// Keeps the score in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    score: Option<u64>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a score
    pub fn with_score(score: u64) -> Self {
        Self {
            score: Some(score),
            saves: 0,
        }
    }

    /// How many times the score was written
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> Result<u64, PersistError> {
        Ok(self.score.unwrap_or(0))
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError> {
        self.score = Some(score);
        self.saves += 1;
        Ok(())
    }
}

/// JSON number in a file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> Result<u64, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let score = parse_score(&raw)?;
                log::info!("Loaded high score {} from {}", score, self.path.display());
                Ok(score)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                Ok(0)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string(&score)?)?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// Browser LocalStorage under a fixed key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "floaterball_highscore";

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load_high_score(&self) -> Result<u64, PersistError> {
        let storage = Self::storage()?;
        match storage
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| PersistError::Unavailable)?
        {
            Some(raw) => parse_score(&raw),
            None => Ok(0),
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        storage
            .set_item(Self::STORAGE_KEY, &serde_json::to_string(&score)?)
            .map_err(|_| PersistError::Unavailable)?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}
