//! Best-score persistence
//!
//! The engine only talks to a [`ScoreStore`]; the terminal build keeps the
//! values in a small JSON file under the platform data directory
//! (e.g. ~/.local/share/blockfall/scores.json).

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key the best score is stored under
pub const BEST_SCORE_KEY: &str = "tetris-highscore";

/// Key-value collaborator holding durable numeric values
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u64>>;
    fn set(&mut self, key: &str, value: u64) -> Result<()>;
}

/// In-memory store, for tests and runs without a writable data dir
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best(best: u64) -> Self {
        let mut store = Self::new();
        store.values.insert(BEST_SCORE_KEY.to_string(), best);
        store
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object file mapping keys to values
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`; the file is created on first write
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "blockfall", "blockfall")
            .context("could not determine data directory")?;
        Ok(Self::at(dirs.data_dir().join("scores.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u64>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("corrupt score file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read {}", self.path.display()))
            }
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u64>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<()> {
        // A corrupt file is replaced rather than blocking the save
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value);

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let contents = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}
