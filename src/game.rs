use crate::wordbank::WordBank;
use chrono::{DateTime, Duration, DurationRound, Local, NaiveDate, Utc};
use itertools::Itertools;
use log::debug;
use thiserror::Error;

pub const MAX_TRIES: i32 = 5;
pub const STARTING_SCORE: i64 = 1000;
pub const WRONG_GUESS_PENALTY: i64 = 50;
pub const MASK: char = '#';
pub const MAX_USERNAME_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no words available to choose from")]
    NoWordsAvailable,
    #[error("the word has not been set; the game was not initialized properly")]
    Uninitialized,
    #[error("the number of tries must be between 0 and {MAX_TRIES}")]
    InvalidTryCount,
    #[error("username must not exceed {MAX_USERNAME_LEN} characters")]
    UsernameTooLong,
    #[error("username must only contain letters and digits")]
    UsernameInvalidChars,
    #[error("invalid transfer state: {0}")]
    InvalidTransferState(String),
}

/// One player's attempt at the word of the day.
///
/// Mutated only through `guess_letter` and `reset`; between requests it
/// lives as a serialized transfer state (see `session`). Fields are public
/// so a restored session can be inspected, which is also why `guess_letter`
/// re-validates the try count instead of trusting it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub secret_word: String,
    pub revealed: String,
    pub remaining_tries: i32,
    pub wrong_guesses: u32,
    pub guessed_letters: Vec<char>,
    pub score: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub username: Option<String>,
}

/// Timestamps are kept at millisecond precision so the transfer encoding
/// (epoch milliseconds) reproduces them exactly.
pub(crate) fn truncate_to_millis(t: DateTime<Utc>) -> DateTime<Utc> {
    t.duration_trunc(Duration::milliseconds(1)).unwrap_or(t)
}

impl GameSession {
    /// Start a session against today's word (host-local calendar date).
    pub fn new(bank: &WordBank) -> Result<Self, GameError> {
        Self::new_at(bank, Local::now().date_naive(), Utc::now())
    }

    /// Start a session for an explicit day and instant.
    pub fn new_at(bank: &WordBank, day: NaiveDate, now: DateTime<Utc>) -> Result<Self, GameError> {
        let word = bank
            .word_for_day(day)
            .map_err(|_| GameError::NoWordsAvailable)?
            .to_string();
        let mask = MASK.to_string().repeat(word.chars().count());
        Ok(Self {
            secret_word: word,
            revealed: mask,
            remaining_tries: MAX_TRIES,
            wrong_guesses: 0,
            guessed_letters: Vec::new(),
            score: STARTING_SCORE,
            start_time: truncate_to_millis(now),
            end_time: None,
            username: None,
        })
    }

    /// Start over on the current day's word: full mask, 5 tries, score 1000,
    /// cleared guesses, fresh clock. The username survives a reset.
    pub fn reset(&mut self, bank: &WordBank) -> Result<(), GameError> {
        self.reset_at(bank, Local::now().date_naive(), Utc::now())
    }

    pub fn reset_at(
        &mut self,
        bank: &WordBank,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(), GameError> {
        let username = self.username.take();
        *self = Self::new_at(bank, day, now)?;
        self.username = username;
        Ok(())
    }

    /// Evaluate one guess at the current wall-clock instant.
    pub fn guess_letter(&mut self, input: &str) -> Result<bool, GameError> {
        self.guess_letter_at(input, Utc::now())
    }

    /// Evaluate one guess. `Ok(true)` means the letter is in the word.
    /// `Ok(false)` covers both a miss and a rejected input (not a single
    /// ASCII letter, or already guessed); rejected inputs change nothing.
    pub fn guess_letter_at(
        &mut self,
        input: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, GameError> {
        if self.secret_word.is_empty() {
            return Err(GameError::Uninitialized);
        }
        if self.remaining_tries < 0 || self.remaining_tries > MAX_TRIES {
            return Err(GameError::InvalidTryCount);
        }

        let lower = input.to_lowercase();
        let mut chars = lower.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => c,
            _ => return Ok(false),
        };
        if self.guessed_letters.contains(&letter) {
            return Ok(false);
        }

        self.update_score_at(now);
        self.guessed_letters.push(letter);

        if self.secret_word.contains(letter) {
            self.revealed = self
                .secret_word
                .chars()
                .zip(self.revealed.chars())
                .map(|(secret, shown)| if secret == letter { secret } else { shown })
                .collect();
            debug!("guessed correctly: {letter}, pattern now {}", self.revealed);
            return Ok(true);
        }

        self.remaining_tries -= 1;
        self.wrong_guesses += 1;
        debug!(
            "guessed incorrectly: {letter}, {} tries left",
            self.remaining_tries
        );
        Ok(false)
    }

    /// Recompute the score from elapsed time and wrong guesses. Idempotent
    /// at a fixed instant; once the score reaches 0 it stays 0. A set
    /// `end_time` freezes the clock.
    pub fn update_score(&mut self) {
        self.update_score_at(Utc::now());
    }

    pub fn update_score_at(&mut self, now: DateTime<Utc>) {
        if self.score <= 0 {
            self.score = 0;
            return;
        }
        let reference = self.end_time.unwrap_or(now);
        let elapsed_secs = (reference - self.start_time).num_seconds();
        self.score = (STARTING_SCORE - elapsed_secs - self.wrong_guesses as i64 * WRONG_GUESS_PENALTY)
            .max(0);
    }

    /// Read-through score: reflects elapsed time at the moment of the call.
    pub fn get_score(&mut self) -> i64 {
        self.get_score_at(Utc::now())
    }

    pub fn get_score_at(&mut self, now: DateTime<Utc>) -> i64 {
        self.update_score_at(now);
        self.score
    }

    /// Freeze score decay by pinning `end_time`, if not already pinned.
    pub fn finish(&mut self) {
        self.finish_at(Utc::now());
    }

    pub fn finish_at(&mut self, now: DateTime<Utc>) {
        if self.end_time.is_none() {
            self.end_time = Some(truncate_to_millis(now));
        }
        self.update_score_at(now);
    }

    pub fn render(&self) -> &str {
        &self.revealed
    }

    pub fn tries_remaining(&self) -> i32 {
        self.remaining_tries
    }

    /// Guessed letters in the order they were tried, comma-separated.
    pub fn guessed_letters_display(&self) -> String {
        self.guessed_letters.iter().join(", ")
    }

    pub fn has_won(&self) -> bool {
        self.revealed == self.secret_word
    }

    // "<= 0" rather than "== 0": a corrupted restore can go negative and
    // must still read as exhausted.
    pub fn has_lost(&self) -> bool {
        self.remaining_tries <= 0
    }

    /// Store the player name used for the leaderboard: 1-20 ASCII letters
    /// or digits.
    pub fn set_username(&mut self, name: &str) -> Result<(), GameError> {
        if name.len() > MAX_USERNAME_LEN {
            return Err(GameError::UsernameTooLong);
        }
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(GameError::UsernameInvalidChars);
        }
        self.username = Some(name.to_string());
        Ok(())
    }
}
