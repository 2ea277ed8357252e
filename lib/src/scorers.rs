use crate::constraints::ConstraintSet;
use crate::dictionary::*;
use crate::results::is_supported_word;
use crate::results::CompressedFeedback;
use crate::results::MAX_LETTERS_IN_COMPRESSED_FEEDBACK;
use crate::results::WordleError;
use log::info;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Gives words a score, where the maximum score indicates the best guess.
///
/// Use [`MaxEntropyScorer`] to guess the word in the fewest number of guesses if you can afford the
/// computation cost, or [`LetterFrequencyScorer`] for a much cheaper approximation.
pub trait WordScorer {
    /// Updates the scorer with the latest guess, the updated constraints, and the updated list of
    /// possible words.
    fn update(
        &mut self,
        latest_guess: &str,
        constraints: &ConstraintSet,
        possible_words: &[Arc<str>],
    ) -> Result<(), WordleError>;
    /// Updates the scorer after a word was dropped without being guessed, e.g. because the game
    /// would not accept it. `possible_words` no longer contains it.
    fn remove_word(&mut self, word: &str, possible_words: &[Arc<str>]);
    /// Determines a score for the given word. The higher the score, the better the guess.
    fn score_word(&self, word: &Arc<str>) -> i64;
}

impl<S: WordScorer + ?Sized> WordScorer for Box<S> {
    fn update(
        &mut self,
        latest_guess: &str,
        constraints: &ConstraintSet,
        possible_words: &[Arc<str>],
    ) -> Result<(), WordleError> {
        (**self).update(latest_guess, constraints, possible_words)
    }

    fn remove_word(&mut self, word: &str, possible_words: &[Arc<str>]) {
        (**self).remove_word(word, possible_words)
    }

    fn score_word(&self, word: &Arc<str>) -> i64 {
        (**self).score_word(word)
    }
}

/// Scores each word by the Shannon entropy, in bits, of the feedback it would produce across the
/// possible words. Higher entropy means the feedback is expected to split the possible words into
/// more, smaller groups.
///
/// Scores are the entropy multiplied by 1,000,000 and rounded.
///
/// Computing the first round is the most expensive step, since every word must be compared
/// against every other word. That table is computed once on construction and shared between
/// clones, so clone a prototype scorer for each game rather than constructing a new one.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaxEntropyScorer {
    possible_words: Vec<Arc<str>>,
    first_guess_entropies: Arc<HashMap<Arc<str>, f64>>,
    is_first_round: bool,
}

impl MaxEntropyScorer {
    /// Constructs a `MaxEntropyScorer`. **Be careful, this is expensive to compute!**
    ///
    /// The cost scales in approximately *O*(*n*<sup>2</sup>), where *n* is the number of words.
    ///
    /// ```
    /// use rs_wordle_sieve::GuessFrom;
    /// use rs_wordle_sieve::Guesser;
    /// use rs_wordle_sieve::MaxScoreGuesser;
    /// use rs_wordle_sieve::WordBank;
    /// use rs_wordle_sieve::scorers::MaxEntropyScorer;
    ///
    /// let bank = WordBank::from_iterator(&["abc", "def", "ghi"], 3).unwrap();
    /// let scorer = MaxEntropyScorer::new(&bank);
    /// let guesser = MaxScoreGuesser::new(GuessFrom::AllUnguessedWords, &bank, scorer);
    ///
    /// assert!(guesser.select_next_guess().is_some());
    /// ```
    pub fn new(all_words: &[Arc<str>]) -> MaxEntropyScorer {
        let first_guess_entropies: HashMap<Arc<str>, f64> = all_words
            .par_iter()
            .map(|word| (Arc::clone(word), compute_entropy(word, all_words)))
            .collect();
        info!(
            "Computed first-guess entropy for {} words.",
            first_guess_entropies.len()
        );
        MaxEntropyScorer {
            possible_words: all_words.to_vec(),
            first_guess_entropies: Arc::new(first_guess_entropies),
            is_first_round: true,
        }
    }

    /// Constructs a `MaxEntropyScorer` from a table previously returned by
    /// [`MaxEntropyScorer::first_guess_entropies`] for the same words.
    ///
    /// Words missing from the table are computed on demand.
    pub fn from_first_guess_entropies(
        all_words: &[Arc<str>],
        first_guess_entropies: HashMap<Arc<str>, f64>,
    ) -> MaxEntropyScorer {
        MaxEntropyScorer {
            possible_words: all_words.to_vec(),
            first_guess_entropies: Arc::new(first_guess_entropies),
            is_first_round: true,
        }
    }

    /// The entropy of each word as a first guess, keyed by word.
    pub fn first_guess_entropies(&self) -> &HashMap<Arc<str>, f64> {
        &self.first_guess_entropies
    }

    /// The entropy, in bits, of the feedback the given word would produce against the current
    /// possible words.
    pub fn entropy(&self, word: &Arc<str>) -> f64 {
        if self.is_first_round {
            if let Some(entropy) = self.first_guess_entropies.get(word) {
                return *entropy;
            }
        }
        compute_entropy(word, &self.possible_words)
    }
}

impl WordScorer for MaxEntropyScorer {
    fn update(
        &mut self,
        _latest_guess: &str,
        _constraints: &ConstraintSet,
        possible_words: &[Arc<str>],
    ) -> Result<(), WordleError> {
        self.possible_words = possible_words.to_vec();
        self.is_first_round = false;
        Ok(())
    }

    fn remove_word(&mut self, _word: &str, possible_words: &[Arc<str>]) {
        // The first-round table was computed with the removed word.
        self.possible_words = possible_words.to_vec();
        self.is_first_round = false;
    }

    fn score_word(&self, word: &Arc<str>) -> i64 {
        (self.entropy(word) * 1_000_000.0).round() as i64
    }
}

/// Computes the entropy, in bits, of the feedback `guess` would produce against each of the
/// possible words, treating each possible word as equally likely.
///
/// Returns 0 if the guess can't be compared against the possible words (e.g. it has a different
/// length).
pub fn compute_entropy(guess: &str, possible_words: &[Arc<str>]) -> f64 {
    if possible_words.is_empty()
        || guess.len() > MAX_LETTERS_IN_COMPRESSED_FEEDBACK
        || !is_supported_word(guess)
    {
        return 0.0;
    }
    // Ordered so that the floating point sum is reproducible.
    let mut num_per_feedback: BTreeMap<CompressedFeedback, u32> = BTreeMap::new();
    for possible_word in possible_words {
        if possible_word.len() != guess.len() || !is_supported_word(possible_word) {
            return 0.0;
        }
        *num_per_feedback
            .entry(CompressedFeedback::between(possible_word, guess))
            .or_insert(0) += 1;
    }
    let total = possible_words.len() as f64;
    num_per_feedback.values().fold(0.0, |entropy, count| {
        let probability = *count as f64 / total;
        entropy - probability * probability.log2()
    })
}

/// A cheap approximation of the most informative guess. The score is computed for each letter and
/// then summed. Each letter is scored as follows:
///
/// * 0 points if the letter is known to be absent, or known not to be in this location.
/// * 1 point if the letter is known to be in this location.
/// * Otherwise, 1 point for every possible word with this letter in this location.
/// * Plus, if this is the letter's first appearance in the word and it has not been guessed
///   before, 1 point for every possible word containing this letter anywhere.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LetterFrequencyScorer {
    counter: WordCounter,
    constraints: ConstraintSet,
    tried_letters: HashSet<char>,
}

impl LetterFrequencyScorer {
    /// Constructs a `LetterFrequencyScorer` based on the given [`WordBank`].
    ///
    /// ```
    /// use rs_wordle_sieve::GuessFrom;
    /// use rs_wordle_sieve::Guesser;
    /// use rs_wordle_sieve::MaxScoreGuesser;
    /// use rs_wordle_sieve::WordBank;
    /// use rs_wordle_sieve::scorers::LetterFrequencyScorer;
    ///
    /// let bank = WordBank::from_iterator(&["abc", "def", "ghi"], 3).unwrap();
    /// let scorer = LetterFrequencyScorer::new(&bank);
    /// let guesser = MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, scorer);
    ///
    /// assert!(guesser.select_next_guess().is_some());
    /// ```
    pub fn new(bank: &WordBank) -> LetterFrequencyScorer {
        LetterFrequencyScorer {
            counter: WordCounter::new(bank),
            constraints: ConstraintSet::new(bank.word_length()),
            tried_letters: HashSet::new(),
        }
    }
}

impl WordScorer for LetterFrequencyScorer {
    fn update(
        &mut self,
        latest_guess: &str,
        constraints: &ConstraintSet,
        possible_words: &[Arc<str>],
    ) -> Result<(), WordleError> {
        self.tried_letters.extend(latest_guess.chars());
        self.constraints = constraints.clone();
        self.counter = WordCounter::new(possible_words);
        Ok(())
    }

    fn remove_word(&mut self, _word: &str, possible_words: &[Arc<str>]) {
        self.counter = WordCounter::new(possible_words);
    }

    fn score_word(&self, word: &Arc<str>) -> i64 {
        let mut sum = 0;
        for (index, letter) in word.char_indices() {
            if self.constraints.is_known_absent(letter)
                || self.constraints.is_excluded_at(index, letter)
            {
                continue;
            }
            if self.constraints.fixed(index) == Some(letter) {
                sum += 1;
                continue;
            }
            let located_letter = LocatedLetter::new(letter, index as u8);
            sum += self.counter.num_words_with_located_letter(&located_letter) as i64;
            let is_first_in_word = word
                .chars()
                .take(index)
                .all(|other_letter| other_letter != letter);
            if is_first_in_word && !self.tried_letters.contains(&letter) {
                sum += self.counter.num_words_with_letter(letter) as i64;
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_words(words: &[&str]) -> Vec<Arc<str>> {
        words.iter().map(|word| Arc::from(*word)).collect()
    }

    #[test]
    fn compute_entropy_all_distinct() {
        let words = arc_words(&["cod", "wod", "mod"]);

        // "mwc" gives a different result for each word: log2(3).
        let entropy = compute_entropy("mwc", &words);

        assert!((entropy - 3f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn compute_entropy_no_information() {
        let words = arc_words(&["cod", "wod", "mod"]);

        assert_eq!(compute_entropy("zzz", &words), 0.0);
        assert_eq!(compute_entropy("zzzz", &words), 0.0);
        assert_eq!(compute_entropy("ZZZ", &words), 0.0);
        assert_eq!(compute_entropy("abc", &[]), 0.0);
    }

    #[test]
    fn compute_entropy_uneven_split() {
        let words = arc_words(&["cod", "wod", "mod"]);

        // "cod" is either correct (1/3), or "xoo" (2/3).
        let expected = -(1.0 / 3.0) * (1.0f64 / 3.0).log2() - (2.0 / 3.0) * (2.0f64 / 3.0).log2();

        assert!((compute_entropy("cod", &words) - expected).abs() < 1e-12);
    }

    #[test]
    fn max_entropy_scorer_first_round_uses_table() {
        let words = arc_words(&["cod", "wod", "mod"]);
        let mut table = HashMap::new();
        table.insert(Arc::clone(&words[0]), 5.0);
        let scorer = MaxEntropyScorer::from_first_guess_entropies(&words, table);

        assert_eq!(scorer.score_word(&words[0]), 5_000_000);
        // Not in the table, so computed.
        assert_eq!(scorer.score_word(&Arc::from("mwc")), 1_584_963);
    }

    #[test]
    fn max_entropy_scorer_after_update() -> Result<(), WordleError> {
        let words = arc_words(&["abb", "abc", "bad", "zza", "zzz"]);
        let mut scorer = MaxEntropyScorer::new(&words);

        scorer.update("zza", &ConstraintSet::new(3), &words[0..3])?;
        // Still possible: abb, abc, bad

        // Splits the three words into three groups.
        assert_eq!(scorer.score_word(&words[1]), 1_584_963);
        assert_eq!(scorer.score_word(&Arc::from("zzz")), 0);
        Ok(())
    }

    #[test]
    fn max_entropy_scorer_remove_word_drops_first_round_table() {
        let words = arc_words(&["crane", "grace", "place", "slate", "trace"]);
        let mut scorer = MaxEntropyScorer::new(&words);
        let remaining = arc_words(&["crane", "place", "slate", "trace"]);

        scorer.remove_word("grace", &remaining);

        for word in &words {
            let expected = (compute_entropy(word, &remaining) * 1_000_000.0).round() as i64;
            assert_eq!(scorer.score_word(word), expected);
        }
        assert_eq!(scorer.score_word(&words[0]), 2_000_000);
    }

    #[test]
    fn letter_frequency_scorer_remove_word() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "grace", "place", "slate", "trace"], 5)?;
        let mut scorer = LetterFrequencyScorer::new(&bank);
        let remaining = WordBank::from_iterator(["crane", "grace", "place", "slate"], 5)?;

        scorer.remove_word("trace", &remaining);

        let fresh = LetterFrequencyScorer::new(&remaining);
        for word in bank.iter() {
            assert_eq!(scorer.score_word(word), fresh.score_word(word));
        }
        assert_eq!(scorer.score_word(&Arc::from("crane")), 1 + 3 + 2 + 2 + 4 + 4 + 1 + 1 + 4 + 4);
        assert_eq!(scorer.score_word(&Arc::from("grace")), 1 + 1 + 2 + 2 + 4 + 4 + 2 + 3 + 4 + 4);
        Ok(())
    }

    #[test]
    fn letter_frequency_scorer_score_word() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(
            ["alpha", "allot", "begot", "below", "endow", "ingot"],
            5,
        )?;
        let scorer = LetterFrequencyScorer::new(&bank);

        assert_eq!(scorer.score_word(&Arc::from("alpha")), 4 + 5 + 2 + 2 + 1);
        assert_eq!(scorer.score_word(&Arc::from("allot")), 4 + 5 + 2 + 10 + 6);
        assert_eq!(scorer.score_word(&Arc::from("begot")), 4 + 5 + 4 + 10 + 6);
        assert_eq!(scorer.score_word(&Arc::from("below")), 4 + 5 + 5 + 10 + 4);
        Ok(())
    }
}
