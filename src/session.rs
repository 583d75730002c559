use crate::game::{truncate_to_millis, GameError, GameSession};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Serializable snapshot of a `GameSession`, persisted between requests by
/// the session store. `start_time_ms` is epoch milliseconds; `end_time` is
/// RFC 3339 or null, matching the stored-form schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferState {
    pub remaining_tries: i32,
    pub secret_word: String,
    pub revealed_pattern: String,
    pub guessed_letters: Vec<char>,
    pub score: i64,
    pub wrong_guess_count: u32,
    pub start_time_ms: i64,
    pub end_time: Option<String>,
}

impl GameSession {
    pub fn to_transfer_state(&self) -> TransferState {
        TransferState {
            remaining_tries: self.remaining_tries,
            secret_word: self.secret_word.clone(),
            revealed_pattern: self.revealed.clone(),
            guessed_letters: self.guessed_letters.clone(),
            score: self.score,
            wrong_guess_count: self.wrong_guesses,
            start_time_ms: self.start_time.timestamp_millis(),
            end_time: self
                .end_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    /// Rebuild a session from its stored form. Malformed timestamps surface
    /// as `InvalidTransferState` rather than a panic: the stored form comes
    /// from outside the process and may be corrupted.
    pub fn from_transfer_state(data: TransferState) -> Result<Self, GameError> {
        let start_time = DateTime::<Utc>::from_timestamp_millis(data.start_time_ms)
            .ok_or_else(|| {
                GameError::InvalidTransferState(format!(
                    "start time {} is out of range",
                    data.start_time_ms
                ))
            })?;
        let end_time = data
            .end_time
            .map(|raw| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|t| truncate_to_millis(t.with_timezone(&Utc)))
                    .map_err(|e| {
                        GameError::InvalidTransferState(format!("end time {raw:?}: {e}"))
                    })
            })
            .transpose()?;

        Ok(Self {
            secret_word: data.secret_word,
            revealed: data.revealed_pattern,
            remaining_tries: data.remaining_tries,
            wrong_guesses: data.wrong_guess_count,
            guessed_letters: data.guessed_letters,
            score: data.score,
            start_time,
            end_time,
            username: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordbank::WordBank;
    use assert_matches::assert_matches;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn sample_session() -> GameSession {
        let bank = WordBank::from_lines("roulade").unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        let mut session = GameSession::new_at(&bank, day, t0()).unwrap();
        session.guess_letter_at("r", t0()).unwrap();
        session
            .guess_letter_at("z", t0() + Duration::seconds(2))
            .unwrap();
        session
    }

    #[test]
    fn test_round_trip_preserves_observable_fields() {
        let session = sample_session();
        let restored = GameSession::from_transfer_state(session.to_transfer_state()).unwrap();
        assert_eq!(restored.secret_word, session.secret_word);
        assert_eq!(restored.revealed, session.revealed);
        assert_eq!(restored.guessed_letters, session.guessed_letters);
        assert_eq!(restored.score, session.score);
        assert_eq!(restored.wrong_guesses, session.wrong_guesses);
        assert_eq!(restored.remaining_tries, session.remaining_tries);
        assert_eq!(restored.start_time, session.start_time);
        assert_eq!(restored.end_time, session.end_time);
    }

    #[test]
    fn test_round_trip_preserves_end_time_to_the_millisecond() {
        let mut session = sample_session();
        session.finish_at(t0() + Duration::milliseconds(12_345));
        let restored = GameSession::from_transfer_state(session.to_transfer_state()).unwrap();
        assert_eq!(restored.end_time, session.end_time);
    }

    #[test]
    fn test_null_end_time_stays_null() {
        let session = sample_session();
        let state = session.to_transfer_state();
        assert!(state.end_time.is_none());
        let restored = GameSession::from_transfer_state(state).unwrap();
        assert!(restored.end_time.is_none());
    }

    #[test]
    fn test_transfer_state_field_values() {
        let session = sample_session();
        let state = session.to_transfer_state();
        assert_eq!(state.secret_word, "roulade");
        assert_eq!(state.revealed_pattern, "r######");
        assert_eq!(state.guessed_letters, vec!['r', 'z']);
        assert_eq!(state.remaining_tries, 4);
        assert_eq!(state.wrong_guess_count, 1);
        assert_eq!(state.start_time_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_restored_session_keeps_playing() {
        let session = sample_session();
        let mut restored = GameSession::from_transfer_state(session.to_transfer_state()).unwrap();
        assert!(restored.guess_letter_at("o", t0()).unwrap());
        assert_eq!(restored.render(), "ro#####");
    }

    #[test]
    fn test_json_round_trip() {
        let session = sample_session();
        let json = serde_json::to_string(&session.to_transfer_state()).unwrap();
        let state: TransferState = serde_json::from_str(&json).unwrap();
        let restored = GameSession::from_transfer_state(state).unwrap();
        assert_eq!(restored.revealed, session.revealed);
        assert_eq!(restored.start_time, session.start_time);
    }

    #[test]
    fn test_malformed_end_time_is_rejected() {
        let mut state = sample_session().to_transfer_state();
        state.end_time = Some("not-a-timestamp".to_string());
        assert_matches!(
            GameSession::from_transfer_state(state),
            Err(GameError::InvalidTransferState(_))
        );
    }

    #[test]
    fn test_out_of_range_start_time_is_rejected() {
        let mut state = sample_session().to_transfer_state();
        state.start_time_ms = i64::MAX;
        assert_matches!(
            GameSession::from_transfer_state(state),
            Err(GameError::InvalidTransferState(_))
        );
    }
}
