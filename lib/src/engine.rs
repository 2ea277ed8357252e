use crate::constraints::filter;
use crate::constraints::ConstraintSet;
use crate::dictionary::WordBank;
use crate::results::GuessResult;
use crate::results::WordleError;
use crate::scorers::WordScorer;
use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Guesses words in order to solve a single Wordle game.
pub trait Guesser {
    /// Updates this guesser with information about a word.
    ///
    /// If the result is malformed or contradicts earlier results, this returns an error and the
    /// guesser is left unchanged.
    fn update<'a>(&mut self, result: &'a GuessResult) -> Result<(), WordleError>;

    /// Selects a new guess for the Wordle.
    ///
    /// Returns `None` if no known words are possible given the known restrictions imposed by
    /// previous calls to [`Self::update()`].
    fn select_next_guess(&self) -> Option<Arc<str>>;

    /// Provides read access to the remaining set of possible words in this guesser.
    fn possible_words(&self) -> &[Arc<str>];

    /// Provides read access to what is known about the hidden word.
    fn constraints(&self) -> &ConstraintSet;

    /// Removes a word from consideration entirely, e.g. because the game would not accept it as
    /// a guess.
    fn reject_word(&mut self, word: &str);
}

/// Indicates which set of words to guess from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GuessFrom {
    /// Choose the next guess from any unguessed word in the whole word list, even ones that can't
    /// be the answer. Such a guess can sometimes narrow things down faster.
    AllUnguessedWords,
    /// Choose the next guess from any of the words that could still be the answer.
    PossibleWords,
}

/// A word along with the score its guesser gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredGuess {
    pub word: Arc<str>,
    pub score: i64,
    /// Whether the word could itself be the answer.
    pub is_possible: bool,
}

/// Ranks guesses by score. Ties prefer words that could be the answer, then earlier words in
/// alphabetical order, so the best guess is always the maximum.
fn compare_scored_guesses(a: &ScoredGuess, b: &ScoredGuess) -> Ordering {
    a.score
        .cmp(&b.score)
        .then(a.is_possible.cmp(&b.is_possible))
        .then_with(|| b.word.cmp(&a.word))
}

/// Selects the next guess that maximizes the score according to the given scorer.
///
/// Words are scored in parallel, so the scorer must be [`Sync`].
///
/// ```
/// use rs_wordle_sieve::*;
/// use rs_wordle_sieve::scorers::MaxEntropyScorer;
///
/// let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
/// let scorer = MaxEntropyScorer::new(&bank);
/// let mut guesser = MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, scorer);
///
/// let guess = guesser.select_next_guess().unwrap();
/// let feedback = get_feedback_for_guess("grace", &guess)?;
/// guesser.update(&GuessResult { guess: &guess, feedback })?;
///
/// assert!(guesser.possible_words().iter().any(|word| word.as_ref() == "grace"));
/// # Ok::<(), WordleError>(())
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaxScoreGuesser<T>
where
    T: WordScorer,
{
    guess_mode: GuessFrom,
    all_unguessed_words: Vec<Arc<str>>,
    possible_words: Vec<Arc<str>>,
    constraints: ConstraintSet,
    scorer: T,
}

impl<T> MaxScoreGuesser<T>
where
    T: WordScorer + Sync,
{
    /// Constructs a new `MaxScoreGuesser` that will guess the hidden word from the given bank,
    /// ranking guesses with the given scorer.
    pub fn new(guess_mode: GuessFrom, bank: &WordBank, scorer: T) -> MaxScoreGuesser<T> {
        MaxScoreGuesser {
            guess_mode,
            all_unguessed_words: bank.to_vec(),
            possible_words: bank.to_vec(),
            constraints: ConstraintSet::new(bank.word_length()),
            scorer,
        }
    }

    /// Returns up to the top `n` guesses, best first.
    pub fn select_top_n_guesses(&self, n: usize) -> Vec<ScoredGuess> {
        let mut scored: Vec<ScoredGuess> = self
            .words_to_score()
            .par_iter()
            .map(|word| self.score(word))
            .collect();
        scored.sort_unstable_by(|a, b| compare_scored_guesses(b, a));
        scored.truncate(n);
        scored
    }

    /// Provides read access to the scorer.
    pub fn scorer(&self) -> &T {
        &self.scorer
    }

    fn words_to_score(&self) -> &[Arc<str>] {
        // With two or fewer options left, guessing one of them is never worse.
        if self.possible_words.len() <= 2 || self.guess_mode == GuessFrom::PossibleWords {
            return &self.possible_words;
        }
        &self.all_unguessed_words
    }

    fn score(&self, word: &Arc<str>) -> ScoredGuess {
        ScoredGuess {
            word: Arc::clone(word),
            score: self.scorer.score_word(word),
            is_possible: self.constraints.is_satisfied_by(word),
        }
    }
}

impl<T> Guesser for MaxScoreGuesser<T>
where
    T: WordScorer + Sync,
{
    fn update<'a>(&mut self, result: &'a GuessResult) -> Result<(), WordleError> {
        let constraints = self.constraints.apply(result)?;
        let possible_words = filter(&self.possible_words, &constraints);
        self.scorer.update(result.guess, &constraints, &possible_words)?;
        debug!(
            "{} narrowed {} possible words to {}.",
            result.guess,
            self.possible_words.len(),
            possible_words.len()
        );
        self.all_unguessed_words.retain(|word| word.as_ref() != result.guess);
        self.constraints = constraints;
        self.possible_words = possible_words;
        Ok(())
    }

    fn select_next_guess(&self) -> Option<Arc<str>> {
        if self.possible_words.len() == 1 {
            return Some(Arc::clone(&self.possible_words[0]));
        }
        if self.possible_words.is_empty() {
            return None;
        }
        let best = self
            .words_to_score()
            .par_iter()
            .map(|word| self.score(word))
            .max_by(compare_scored_guesses)?;
        debug!(
            "Selected {} (score {}) from {} possible words.",
            best.word,
            best.score,
            self.possible_words.len()
        );
        Some(best.word)
    }

    fn possible_words(&self) -> &[Arc<str>] {
        &self.possible_words
    }

    fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    fn reject_word(&mut self, word: &str) {
        self.all_unguessed_words.retain(|other| other.as_ref() != word);
        self.possible_words.retain(|other| other.as_ref() != word);
        self.scorer.remove_word(word, &self.possible_words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::get_feedback_for_guess;
    use crate::scorers::compute_entropy;
    use crate::scorers::LetterFrequencyScorer;
    use crate::scorers::MaxEntropyScorer;

    fn bank() -> WordBank {
        WordBank::from_iterator(["alpha", "allot", "begot", "below", "endow", "ingot"], 5)
            .unwrap()
    }

    #[test]
    fn letter_frequency_guesser_select_next_guess() {
        let bank = bank();
        let guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        assert_eq!(guesser.select_next_guess().as_deref(), Some("begot"));
    }

    #[test]
    fn letter_frequency_guesser_update() -> Result<(), WordleError> {
        let bank = bank();
        let mut guesser = MaxScoreGuesser::new(
            GuessFrom::AllUnguessedWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        guesser.update(&GuessResult {
            guess: "begot",
            feedback: get_feedback_for_guess("endow", "begot")?,
        })?;

        assert_eq!(guesser.possible_words(), &[Arc::<str>::from("endow")]);
        assert_eq!(guesser.scorer().score_word(&Arc::from("endow")), 8);
        assert_eq!(guesser.scorer().score_word(&Arc::from("below")), 3);
        assert_eq!(guesser.select_next_guess().as_deref(), Some("endow"));
        Ok(())
    }

    #[test]
    fn update_with_inconsistent_result_leaves_guesser_unchanged() -> Result<(), WordleError> {
        let bank = bank();
        let mut guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );
        guesser.update(&GuessResult {
            guess: "begot",
            feedback: "xxxxx".parse()?,
        })?;
        let possible_before = guesser.possible_words().to_vec();

        assert_eq!(
            guesser.update(&GuessResult {
                guess: "ingot",
                feedback: "xxxox".parse()?,
            }),
            Err(WordleError::InvalidResults)
        );
        assert_eq!(guesser.possible_words(), &possible_before[..]);
        Ok(())
    }

    #[test]
    fn select_next_guess_none_when_no_words_remain() -> Result<(), WordleError> {
        let bank = bank();
        let mut guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        guesser.update(&GuessResult {
            guess: "other",
            feedback: "xxxxx".parse()?,
        })?;

        assert!(guesser.possible_words().is_empty());
        assert_eq!(guesser.select_next_guess(), None);
        Ok(())
    }

    #[test]
    fn ties_are_broken_alphabetically() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["dog", "cat", "bat"], 3)?;
        let scorer = LetterFrequencyScorer::new(&bank);
        let guesser = MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, scorer);

        let top = guesser.select_top_n_guesses(3);

        // "bat" and "cat" score the same.
        assert_eq!(top[0].score, top[1].score);
        assert_eq!(top[0].word.as_ref(), "bat");
        assert_eq!(top[1].word.as_ref(), "cat");
        assert_eq!(top[2].word.as_ref(), "dog");
        assert_eq!(guesser.select_next_guess().as_deref(), Some("bat"));
        Ok(())
    }

    #[test]
    fn guess_from_all_words_can_pick_impossible_word() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["cod", "kod", "mod", "mwc", "wod"], 3)?;
        let scorer = MaxEntropyScorer::new(&bank);
        let mut all_words_guesser =
            MaxScoreGuesser::new(GuessFrom::AllUnguessedWords, &bank, scorer.clone());
        let mut possible_words_guesser =
            MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, scorer);
        let result = GuessResult {
            guess: "kod",
            feedback: "xoo".parse()?,
        };

        // Leaves "cod", "mod", and "wod".
        all_words_guesser.update(&result)?;
        possible_words_guesser.update(&result)?;

        assert_eq!(all_words_guesser.possible_words().len(), 3);
        // "mwc" can't be the answer, but tells all three apart.
        assert_eq!(all_words_guesser.select_next_guess().as_deref(), Some("mwc"));
        assert_eq!(
            possible_words_guesser.select_next_guess().as_deref(),
            Some("cod")
        );
        Ok(())
    }

    #[test]
    fn reject_word() {
        let bank = bank();
        let mut guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        guesser.reject_word("begot");

        assert_eq!(guesser.possible_words().len(), 5);
        // Scored against the five remaining words.
        assert_eq!(guesser.scorer().score_word(&Arc::from("allot")), 23);
        assert_eq!(guesser.scorer().score_word(&Arc::from("below")), 22);
        assert_eq!(guesser.select_next_guess().as_deref(), Some("allot"));
    }

    #[test]
    fn reject_word_rescores_remaining_words() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
        let mut guesser =
            MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, MaxEntropyScorer::new(&bank));

        guesser.reject_word("grace");

        for word in guesser.possible_words() {
            let expected =
                (compute_entropy(word, guesser.possible_words()) * 1_000_000.0).round() as i64;
            assert_eq!(guesser.scorer().score_word(word), expected);
        }
        // Every remaining word now splits the other four evenly, so the tie goes to "crane".
        assert_eq!(guesser.select_next_guess().as_deref(), Some("crane"));
        Ok(())
    }
}
