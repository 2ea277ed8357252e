use crate::dictionary::WordBank;
use crate::engine::GuessFrom;
use crate::results::WordleError;
use crate::results::MAX_LETTERS_IN_COMPRESSED_FEEDBACK;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default word list on most Linux systems.
pub const DEFAULT_DICTIONARY_PATH: &str = "/usr/share/dict/american-english";

/// How guesses are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Exact expected information, see [`crate::scorers::MaxEntropyScorer`].
    #[default]
    Entropy,
    /// Letter frequency approximation, see [`crate::scorers::LetterFrequencyScorer`].
    Frequency,
}

/// Settings for solving games and running benchmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    pub word_length: usize,
    pub max_guesses: usize,
    /// A file with one word per line.
    pub dictionary_path: PathBuf,
    pub strategy: Strategy,
    pub guess_from: GuessFrom,
    /// How many games to play when benchmarking.
    pub trials: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            word_length: 5,
            max_guesses: 6,
            dictionary_path: PathBuf::from(DEFAULT_DICTIONARY_PATH),
            strategy: Strategy::Entropy,
            guess_from: GuessFrom::PossibleWords,
            trials: 100,
        }
    }
}

impl SolverConfig {
    /// Checks that words of the configured length can be solved.
    pub fn validate(&self) -> Result<(), WordleError> {
        if self.word_length == 0 || self.word_length > MAX_LETTERS_IN_COMPRESSED_FEEDBACK {
            return Err(WordleError::WordLength(self.word_length));
        }
        Ok(())
    }

    /// Reads the dictionary file, keeping only words of the configured length.
    pub fn load_word_bank(&self) -> Result<WordBank, WordleError> {
        self.validate()?;
        let file = File::open(&self.dictionary_path)?;
        WordBank::from_reader(BufReader::new(file), self.word_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = SolverConfig::default();

        assert_eq!(config.word_length, 5);
        assert_eq!(config.max_guesses, 6);
        assert_eq!(config.strategy, Strategy::Entropy);
        assert_eq!(config.guess_from, GuessFrom::PossibleWords);
        assert_eq!(config.trials, 100);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_word_length() {
        let mut config = SolverConfig::default();

        config.word_length = 0;
        assert_eq!(config.validate(), Err(WordleError::WordLength(0)));
        config.word_length = 21;
        assert_eq!(config.validate(), Err(WordleError::WordLength(21)));
    }

    #[test]
    fn load_word_bank_from_file() -> Result<(), WordleError> {
        let path = std::env::temp_dir().join(format!(
            "rs-wordle-sieve-config-test-{}.txt",
            std::process::id()
        ));
        {
            let mut file = File::create(&path)?;
            writeln!(file, "Crane\nslate\nox\ncranes")?;
        }
        let config = SolverConfig {
            dictionary_path: path.clone(),
            ..SolverConfig::default()
        };

        let bank = config.load_word_bank();
        std::fs::remove_file(&path)?;

        assert_eq!(bank?.len(), 2);
        Ok(())
    }

    #[test]
    fn load_word_bank_missing_file() {
        let config = SolverConfig {
            dictionary_path: PathBuf::from("/this/path/does/not/exist"),
            ..SolverConfig::default()
        };

        assert_matches!(config.load_word_bank(), Err(WordleError::Io(_)));
    }
}
