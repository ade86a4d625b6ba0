use crate::error::{Error, Result};
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

static LANG_DIR: Dir = include_dir!("src/lang");

/// A named list of words to draw session prompts from
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Dictionary {
    pub name: String,
    pub words: Vec<String>,
}

impl Dictionary {
    pub const DEFAULT: &'static str = "common200";

    /// Load one of the dictionaries bundled with the binary
    pub fn builtin(name: &str) -> Result<Self> {
        let file = LANG_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| Error::UnknownDictionary {
                name: name.to_string(),
                available: Self::available().join(", "),
            })?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| Error::EmptyDictionary(name.to_string()))?;

        Self::parse(contents)
    }

    /// Load a dictionary from a JSON file on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&contents)
    }

    pub fn from_words<S: Into<String>>(name: S, words: Vec<String>) -> Result<Self> {
        Self {
            name: name.into(),
            words,
        }
        .validated()
    }

    /// Names of the bundled dictionaries, sorted
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = LANG_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|ext| ext == "json"))
            .filter_map(|f| f.path().file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn parse(contents: &str) -> Result<Self> {
        let dictionary: Dictionary = serde_json::from_str(contents)?;
        dictionary.validated()
    }

    // Words containing whitespace could never be committed by a single space.
    fn validated(mut self) -> Result<Self> {
        let before = self.words.len();
        self.words = self
            .words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty() && !w.contains(char::is_whitespace))
            .collect();

        if self.words.len() != before {
            debug!(
                dictionary = %self.name,
                dropped = before - self.words.len(),
                "dropped blank or multi-word entries"
            );
        }

        if self.words.is_empty() {
            return Err(Error::EmptyDictionary(self.name));
        }
        Ok(self)
    }
}
