use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};
use crate::session::DEFAULT_REPETITIONS;

pub const DEFAULT_WORDS_FILE: &str = "words.txt";
pub const DEFAULT_RECORDS_FILE: &str = "typing_records.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub repetitions_per_word: usize,
    pub words_file: PathBuf,
    pub records_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repetitions_per_word: DEFAULT_REPETITIONS,
            words_file: PathBuf::from(DEFAULT_WORDS_FILE),
            records_file: PathBuf::from(DEFAULT_RECORDS_FILE),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.repetitions_per_word == 0 {
            return Err(Error::InvalidRepetitions);
        }
        Ok(())
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("wordrill_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_reference_layout() {
        let cfg = Config::default();
        assert_eq!(cfg.repetitions_per_word, 2);
        assert_eq!(cfg.words_file, PathBuf::from("words.txt"));
        assert_eq!(cfg.records_file, PathBuf::from("typing_records.db"));
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            repetitions_per_word: 5,
            words_file: PathBuf::from("/tmp/hard_words.txt"),
            records_file: PathBuf::from("scores.db"),
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "repetitions_per_word": 4 }"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.repetitions_per_word, 4);
        assert_eq!(cfg.words_file, PathBuf::from(DEFAULT_WORDS_FILE));
    }

    #[test]
    fn malformed_or_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());

        fs::write(&path, "not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn zero_repetitions_is_invalid() {
        let cfg = Config {
            repetitions_per_word: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(Error::InvalidRepetitions));
        assert!(Config::default().validate().is_ok());
    }
}
