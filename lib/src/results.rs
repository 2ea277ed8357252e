use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of letters that can be stored in a [`CompressedFeedback`].
pub const MAX_LETTERS_IN_COMPRESSED_FEEDBACK: usize = 20;

/// The feedback given for a single letter of a guess.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mark {
    /// The letter is in the word, at this location.
    Hit,
    /// The letter is in the word, but somewhere else.
    Present,
    /// The letter is not in the word, or at least not more times than it has already been marked
    /// `Hit` or `Present` in this guess.
    Miss,
}

impl Mark {
    /// Parses a single feedback character.
    ///
    /// `o` and `g` mean [`Mark::Hit`], `v` and `y` mean [`Mark::Present`], `x` and `.` mean
    /// [`Mark::Miss`]. Letters are case-insensitive.
    pub fn from_char(c: char) -> Option<Mark> {
        match c.to_ascii_lowercase() {
            'o' | 'g' => Some(Mark::Hit),
            'v' | 'y' => Some(Mark::Present),
            'x' | '.' => Some(Mark::Miss),
            _ => None,
        }
    }

    /// The canonical character for this mark.
    pub fn as_char(&self) -> char {
        match self {
            Mark::Hit => 'o',
            Mark::Present => 'v',
            Mark::Miss => 'x',
        }
    }

    fn as_digit(&self) -> u32 {
        match self {
            Mark::Miss => 0,
            Mark::Present => 1,
            Mark::Hit => 2,
        }
    }
}

/// The feedback for a whole guess: one [`Mark`] per letter, aligned with the guess.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feedback {
    marks: Vec<Mark>,
}

impl Feedback {
    pub fn new(marks: Vec<Mark>) -> Feedback {
        Feedback { marks }
    }

    /// Feedback where every letter is a [`Mark::Hit`].
    pub fn all_hits(word_length: usize) -> Feedback {
        Feedback {
            marks: vec![Mark::Hit; word_length],
        }
    }

    /// Parses feedback typed by a player, and checks that it has the expected length.
    ///
    /// ```
    /// use rs_wordle_sieve::{Feedback, Mark, WordleError};
    ///
    /// let feedback = Feedback::parse("xvoxx", 5).unwrap();
    /// assert_eq!(feedback.marks()[2], Mark::Hit);
    ///
    /// assert!(matches!(Feedback::parse("xvox", 5), Err(WordleError::InvalidFeedback(_))));
    /// ```
    pub fn parse(input: &str, word_length: usize) -> Result<Feedback, WordleError> {
        let feedback: Feedback = input.trim().parse()?;
        feedback.check_length(word_length)?;
        Ok(feedback)
    }

    /// Returns an [`WordleError::InvalidFeedback`] error unless this has exactly `word_length`
    /// marks.
    pub fn check_length(&self, word_length: usize) -> Result<(), WordleError> {
        if self.marks.len() != word_length {
            return Err(WordleError::InvalidFeedback(format!(
                "expected {} marks, but got {}",
                word_length,
                self.marks.len()
            )));
        }
        Ok(())
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Whether this feedback means the guess was the hidden word.
    pub fn is_all_hits(&self) -> bool {
        !self.marks.is_empty() && self.marks.iter().all(|mark| *mark == Mark::Hit)
    }
}

impl FromStr for Feedback {
    type Err = WordleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input
            .chars()
            .map(|c| {
                Mark::from_char(c).ok_or_else(|| {
                    WordleError::InvalidFeedback(format!("unrecognized mark '{}'", c))
                })
            })
            .collect::<Result<Vec<Mark>, WordleError>>()
            .map(Feedback::new)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mark in &self.marks {
            write!(f, "{}", mark.as_char())?;
        }
        Ok(())
    }
}

/// The result of a single word guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessResult<'a> {
    /// The guess that was made.
    pub guess: &'a str,
    /// The result of each letter, provided in the same letter order as in the guess.
    pub feedback: Feedback,
}

/// Indicates that an error occurred while trying to guess the objective word.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WordleError {
    /// The dictionary had no words of the requested length.
    #[error("no words of length {0} were found in the dictionary")]
    EmptyDictionary(usize),
    /// Every candidate word has been eliminated. Either the objective word is not in the
    /// dictionary, or the feedback was wrong.
    #[error("no candidate words remain")]
    NoCandidatesRemain,
    /// The given feedback was malformed, and was not applied.
    #[error("invalid feedback: {0}")]
    InvalidFeedback(String),
    /// The given feedback contradicts feedback that was given earlier.
    #[error("the feedback is inconsistent with earlier feedback")]
    InvalidResults,
    /// Words must have the given length.
    #[error("words must have length {0}")]
    WordLength(usize),
    /// A word contained a character outside `a`-`z`.
    #[error("words may only contain the letters a-z")]
    UnsupportedCharacter,
    /// The session has already finished.
    #[error("the game is already over")]
    SessionOver,
    /// Feedback was given, but no guess is waiting for it.
    #[error("no guess is waiting for feedback")]
    NoPendingGuess,
    /// The word list could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<io::Error> for WordleError {
    fn from(e: io::Error) -> Self {
        WordleError::Io(e.to_string())
    }
}

/// Whether the game was won or lost by the guesser.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    /// Indicates that the guesser won the game, and provides the guesses that were given.
    Success(Vec<Arc<str>>),
    /// Indicates that the guesser ran out of turns, and provides the guesses that were given.
    Failure(Vec<Arc<str>>),
    /// Indicates that every candidate was eliminated, so the given word was not in the word bank.
    UnknownWord,
}

impl GameResult {
    /// The number of guesses made, if the game was played to a win or a loss.
    pub fn num_guesses(&self) -> Option<usize> {
        match self {
            GameResult::Success(guesses) | GameResult::Failure(guesses) => Some(guesses.len()),
            GameResult::UnknownWord => None,
        }
    }
}

/// Determines the feedback for the given `guess` when played against the given `objective`.
///
/// Repeated letters follow the usual rules: each letter of the objective can justify at most one
/// `Hit` or `Present` mark. Hits are assigned first, then presents from left to right.
///
/// ```
/// use rs_wordle_sieve::{get_feedback_for_guess, Mark};
///
/// let feedback = get_feedback_for_guess("grace", "crane").unwrap();
/// assert_eq!(feedback.to_string(), "vooxo");
///
/// // "crepe" has two 'e's: one is hit at the end, the other only justifies one present mark.
/// let feedback = get_feedback_for_guess("crepe", "eerie").unwrap();
/// assert_eq!(feedback.marks(), &[Mark::Present, Mark::Miss, Mark::Present, Mark::Miss, Mark::Hit]);
/// ```
pub fn get_feedback_for_guess(objective: &str, guess: &str) -> Result<Feedback, WordleError> {
    if objective.len() != guess.len() {
        return Err(WordleError::WordLength(objective.len()));
    }
    if !is_supported_word(objective) || !is_supported_word(guess) {
        return Err(WordleError::UnsupportedCharacter);
    }
    let mut marks = vec![Mark::Miss; guess.len()];
    compute_marks(objective.as_bytes(), guess.as_bytes(), &mut marks);
    Ok(Feedback::new(marks))
}

pub(crate) fn is_supported_word(word: &str) -> bool {
    word.bytes().all(|b| b.is_ascii_lowercase())
}

/// Fills `marks` with the feedback for `guess` against `objective`. Both must be the same length,
/// and contain only `a`-`z`.
fn compute_marks(objective: &[u8], guess: &[u8], marks: &mut [Mark]) {
    let mut unmatched = [0u8; 26];
    for (index, (objective_letter, guess_letter)) in objective.iter().zip(guess).enumerate() {
        if objective_letter == guess_letter {
            marks[index] = Mark::Hit;
        } else {
            marks[index] = Mark::Miss;
            unmatched[(objective_letter - b'a') as usize] += 1;
        }
    }
    for (index, guess_letter) in guess.iter().enumerate() {
        if marks[index] == Mark::Hit {
            continue;
        }
        let count = &mut unmatched[(guess_letter - b'a') as usize];
        if *count > 0 {
            *count -= 1;
            marks[index] = Mark::Present;
        }
    }
}

/// A compact representation of a [`Feedback`], useful for grouping objectives by the feedback a
/// guess would produce.
///
/// Each mark is stored as a base-3 digit, so this supports words of up to
/// [`MAX_LETTERS_IN_COMPRESSED_FEEDBACK`] letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompressedFeedback {
    data: u32,
}

impl CompressedFeedback {
    /// Compresses the given marks.
    pub fn from_marks(marks: &[Mark]) -> Result<CompressedFeedback, WordleError> {
        if marks.len() > MAX_LETTERS_IN_COMPRESSED_FEEDBACK {
            return Err(WordleError::WordLength(MAX_LETTERS_IN_COMPRESSED_FEEDBACK));
        }
        Ok(CompressedFeedback::pack(marks))
    }

    /// Computes the compressed feedback directly. Both words must be the same length, contain only
    /// `a`-`z`, and be no longer than [`MAX_LETTERS_IN_COMPRESSED_FEEDBACK`].
    pub(crate) fn between(objective: &str, guess: &str) -> CompressedFeedback {
        let mut marks = [Mark::Miss; MAX_LETTERS_IN_COMPRESSED_FEEDBACK];
        let length = guess.len();
        compute_marks(objective.as_bytes(), guess.as_bytes(), &mut marks[..length]);
        CompressedFeedback::pack(&marks[..length])
    }

    fn pack(marks: &[Mark]) -> CompressedFeedback {
        CompressedFeedback {
            data: marks.iter().fold(0, |data, mark| data * 3 + mark.as_digit()),
        }
    }
}
