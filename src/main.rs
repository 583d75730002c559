use clap::Parser;
use directories::ProjectDirs;
use log::warn;
use pendu::config::{Config, ConfigStore, FileConfigStore};
use pendu::{logging, GameSession, Leaderboard, ScoreEntry, TransferState, WordBank};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// daily word guessing game with time-decayed scoring
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Guess the word of the day one letter at a time. Everyone gets the same \
word on the same calendar day; your score starts at 1000 and decays with elapsed time \
and wrong guesses. The session is persisted between runs, so you can keep guessing \
until you win, run out of tries, or reset."
)]
struct Cli {
    /// guess one or more letters against today's word
    #[clap(short = 'g', long = "guess", value_name = "LETTER")]
    guesses: Vec<String>,

    /// path to a custom word list (one word per line)
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// abandon the current session and start over on today's word
    #[clap(long)]
    reset: bool,

    /// record the finished score on the demo leaderboard under this name
    #[clap(long, value_name = "NAME")]
    save_as: Option<String>,

    /// show the demo leaderboard after the session summary
    #[clap(long)]
    leaderboard: bool,
}

fn session_path(cfg: &Config) -> PathBuf {
    if let Some(path) = &cfg.session_file {
        return path.clone();
    }
    if let Some(pd) = ProjectDirs::from("", "", "pendu") {
        pd.data_local_dir().join("session.json")
    } else {
        PathBuf::from("pendu_session.json")
    }
}

fn load_session(path: &Path, bank: &WordBank) -> Result<GameSession, Box<dyn Error>> {
    let Ok(bytes) = fs::read(path) else {
        return Ok(GameSession::new(bank)?);
    };
    let state: TransferState = serde_json::from_slice(&bytes)?;
    let session = GameSession::from_transfer_state(state)?;
    // A session left over from a previous day plays yesterday's word;
    // start fresh instead.
    if session.secret_word != bank.word_of_the_day()? {
        return Ok(GameSession::new(bank)?);
    }
    Ok(session)
}

fn save_session(path: &Path, session: &GameSession) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(&session.to_transfer_state()).unwrap_or_default();
    fs::write(path, data)
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let cli = Cli::parse();
    let cfg = FileConfigStore::new().load();

    let bank = match cli.words.as_ref().or(cfg.words_file.as_ref()) {
        Some(path) => WordBank::from_file(path)?,
        None => WordBank::embedded()?,
    };

    let path = session_path(&cfg);
    let mut session = load_session(&path, &bank)?;
    if cli.reset {
        session.reset(&bank)?;
        println!("session reset; a fresh attempt at today's word begins now");
    }

    for guess in &cli.guesses {
        if session.has_won() || session.has_lost() {
            break;
        }
        if session.guess_letter(guess)? {
            println!("'{guess}' is in the word");
        } else {
            println!("'{guess}' is not in the word");
        }
    }

    if session.has_won() || session.has_lost() {
        session.finish();
    }

    println!("word:    {}", session.render());
    println!("tries:   {}", session.tries_remaining());
    println!("letters: {}", session.guessed_letters_display());
    println!("score:   {}", session.get_score());
    if session.has_won() {
        println!("you won! the word was '{}'", session.secret_word);
    } else if session.has_lost() {
        println!("you lost. the word was '{}'", session.secret_word);
    }

    if cli.save_as.is_some() || cli.leaderboard {
        let mut board = Leaderboard::new(cfg.leaderboard_size);
        if cli.leaderboard {
            board.seed_demo_entries(cfg.leaderboard_size);
        }
        if let Some(name) = &cli.save_as {
            if session.has_won() || session.has_lost() {
                session.set_username(name)?;
                board.insert(ScoreEntry::new(name.clone(), session.get_score()));
            } else {
                warn!("game still in progress; score not saved");
            }
        }
        println!("--- leaderboard ---");
        for (rank, entry) in board.top(10).iter().enumerate() {
            println!("{:>2}. {:<20} {}", rank + 1, entry.name, entry.score);
        }
    }

    save_session(&path, &session)?;
    Ok(())
}
