use chrono::{Datelike, Local, NaiveDate};
use include_dir::{include_dir, Dir};
use log::info;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

static WORDS_DIR: Dir = include_dir!("src/words");

const DEFAULT_WORD_FILE: &str = "french.txt";

#[derive(Debug, Error)]
pub enum WordBankError {
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),
    #[error("word list contains no usable words")]
    Empty,
}

/// Immutable, ordered list of lowercase candidate words.
///
/// Constructed once at startup and passed by reference to every session;
/// there is no shared static cache to warm up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    pub(crate) words: Vec<String>,
}

impl WordBank {
    /// Build the bank from the word list compiled into the binary.
    pub fn embedded() -> Result<Self, WordBankError> {
        let file = WORDS_DIR
            .get_file(DEFAULT_WORD_FILE)
            .expect("Embedded word file not found");
        let contents = file
            .contents_utf8()
            .expect("Unable to interpret word file as a string");
        Self::from_lines(contents)
    }

    /// Build the bank from a text file with one word per line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WordBankError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let bank = Self::from_lines(&contents)?;
        info!(
            "loaded {} words from {}",
            bank.len(),
            path.as_ref().display()
        );
        Ok(bank)
    }

    /// Build the bank from raw text, one word per line. Lines are trimmed
    /// and lowercased; blank lines are dropped.
    pub fn from_lines(data: &str) -> Result<Self, WordBankError> {
        let words: Vec<String> = data
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();

        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The word assigned to the given calendar day: 1-based day of year,
    /// modulo the list length. The same date always maps to the same word
    /// for a fixed list.
    pub fn word_for_day(&self, date: NaiveDate) -> Result<&str, WordBankError> {
        if self.words.is_empty() {
            return Err(WordBankError::Empty);
        }
        let index = date.ordinal() as usize % self.words.len();
        Ok(&self.words[index])
    }

    /// Today's word, using the host-local calendar date. Which day "today"
    /// is depends on the process time zone.
    pub fn word_of_the_day(&self) -> Result<&str, WordBankError> {
        self.word_for_day(Local::now().date_naive())
    }
}
