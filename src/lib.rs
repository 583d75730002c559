// Library surface for the integration tests and the CLI binary.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod game;
pub mod leaderboard;
pub mod logging;
pub mod session;
pub mod wordbank;

pub use game::{GameError, GameSession};
pub use leaderboard::{Leaderboard, ScoreEntry};
pub use session::TransferState;
pub use wordbank::{WordBank, WordBankError};
