//! Solves Wordle puzzles by tracking what each guess reveals about the hidden word, and picking
//! the next guess that is expected to narrow down the remaining words the most.
//!
//! ```
//! use rs_wordle_sieve::*;
//! use rs_wordle_sieve::scorers::MaxEntropyScorer;
//!
//! let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
//! let guesser = MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, MaxEntropyScorer::new(&bank));
//!
//! let result = play_game_with_guesser("place", 6, guesser)?;
//!
//! assert_eq!(result.num_guesses(), Some(2));
//! # Ok::<(), WordleError>(())
//! ```

mod benchmark;
mod config;
mod constraints;
mod dictionary;
mod engine;
mod results;
mod session;

pub mod scorers;

pub use benchmark::*;
pub use config::*;
pub use constraints::ConstraintSet;
pub use dictionary::WordBank;
pub use engine::*;
pub use results::Feedback;
pub use results::GameResult;
pub use results::GuessResult;
pub use results::Mark;
pub use results::WordleError;
pub use results::get_feedback_for_guess;
pub use session::*;

/// Lower-level building blocks, for writing custom scorers.
pub mod details {
    pub use crate::constraints::filter;
    pub use crate::dictionary::LocatedLetter;
    pub use crate::dictionary::WordCounter;
    pub use crate::results::CompressedFeedback;
    pub use crate::results::MAX_LETTERS_IN_COMPRESSED_FEEDBACK;
}
