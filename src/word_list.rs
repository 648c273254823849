use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// An ordered list of practice words
pub trait WordRepository {
    /// Non-blank, trimmed words in stored order. A missing backing store
    /// yields an empty list.
    fn list(&self) -> Result<Vec<String>>;

    /// Append a word. Surrounding whitespace is trimmed; blank input is rejected.
    fn add(&mut self, word: &str) -> Result<String>;

    /// Remove the word at the 1-based `index` as shown by [`list`](Self::list)
    /// and return it.
    fn remove(&mut self, index: usize) -> Result<String>;
}

/// Word list kept in a text file, one word per line
#[derive(Debug, Clone)]
pub struct FileWordList {
    path: PathBuf,
}

impl FileWordList {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Split file contents into practice words: trimmed, blank lines dropped
pub fn parse_words(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl WordRepository for FileWordList {
    fn list(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(parse_words(&contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "word list file not found");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn add(&mut self, word: &str) -> Result<String> {
        let word = word.trim();
        if word.is_empty() {
            return Err(Error::BlankWord);
        }

        // a hand-edited file may lack the final newline
        let unterminated = fs::read(&self.path)
            .map(|bytes| bytes.last().is_some_and(|&b| b != b'\n'))
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if unterminated {
            writeln!(file)?;
        }
        writeln!(file, "{word}")?;

        info!(word, "added word");
        Ok(word.to_string())
    }

    fn remove(&mut self, index: usize) -> Result<String> {
        let mut words = self.list()?;
        if index == 0 || index > words.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: words.len(),
            });
        }

        let removed = words.remove(index - 1);
        fs::write(&self.path, words.join("\n") + "\n")?;

        info!(word = %removed, index, "removed word");
        Ok(removed)
    }
}
