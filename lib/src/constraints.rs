use crate::results::GuessResult;
use crate::results::Mark;
use crate::results::WordleError;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::iter::zip;
use std::result::Result;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The accumulated knowledge about the hidden word, built from every guess result seen so far.
///
/// Constraints only ever become more restrictive: applying more feedback can never make a word
/// that was ruled out acceptable again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintSet {
    word_length: usize,
    /// The letter known to be at each location.
    fixed: Vec<Option<char>>,
    /// Letters known not to be at each location.
    excluded_at: Vec<BTreeSet<char>>,
    /// The minimum number of times each letter appears in the word.
    min_count: BTreeMap<char, u8>,
    /// The exact number of times each letter appears, once a miss has revealed it.
    max_count: BTreeMap<char, u8>,
}

/// Per-letter tally of the marks in one guess.
#[derive(Default)]
struct LetterTally {
    num_marked: u8,
    has_miss: bool,
}

impl ConstraintSet {
    /// Creates an unconstrained `ConstraintSet` for words of the given length.
    pub fn new(word_length: usize) -> ConstraintSet {
        ConstraintSet {
            word_length,
            fixed: vec![None; word_length],
            excluded_at: vec![BTreeSet::new(); word_length],
            min_count: BTreeMap::new(),
            max_count: BTreeMap::new(),
        }
    }

    /// Returns the constraints imposed by the given result alone.
    pub fn from_result(result: &GuessResult) -> Result<ConstraintSet, WordleError> {
        ConstraintSet::new(result.guess.len()).apply(result)
    }

    /// Returns a copy of these constraints with the given result folded in.
    ///
    /// The marks for a repeated letter are considered together. If a letter was marked `Hit` or
    /// `Present` *n* times, the word contains it at least *n* times. If any of its marks was a
    /// `Miss`, it contains it exactly *n* times.
    ///
    /// ```
    /// use rs_wordle_sieve::{ConstraintSet, GuessResult};
    ///
    /// let constraints = ConstraintSet::new(5);
    /// let constraints = constraints.apply(&GuessResult {
    ///     guess: "sheep",
    ///     feedback: "xooxo".parse().unwrap(),
    /// }).unwrap();
    ///
    /// assert_eq!(constraints.min_count('e'), 1);
    /// assert_eq!(constraints.max_count('e'), Some(1));
    /// assert!(constraints.is_satisfied_by("cheap"));
    /// assert!(!constraints.is_satisfied_by("cheep"));
    /// ```
    pub fn apply(&self, result: &GuessResult) -> Result<ConstraintSet, WordleError> {
        if result.guess.chars().count() != self.word_length {
            return Err(WordleError::WordLength(self.word_length));
        }
        result.feedback.check_length(self.word_length)?;

        let mut next = self.clone();
        let mut tallies: BTreeMap<char, LetterTally> = BTreeMap::new();
        for ((index, letter), mark) in zip(result.guess.chars().enumerate(), result.feedback.marks())
        {
            let tally = tallies.entry(letter).or_default();
            match mark {
                Mark::Hit => {
                    next.set_fixed(index, letter)?;
                    tally.num_marked += 1;
                }
                Mark::Present => {
                    next.set_excluded_at(index, letter)?;
                    tally.num_marked += 1;
                }
                Mark::Miss => {
                    next.set_excluded_at(index, letter)?;
                    tally.has_miss = true;
                }
            }
        }
        for (letter, tally) in tallies {
            next.raise_min_count(letter, tally.num_marked)?;
            if tally.has_miss {
                next.set_exact_count(letter, tally.num_marked)?;
            }
        }
        next.check_consistency()?;
        Ok(next)
    }

    /// Adds constraints arising from the given guess result.
    ///
    /// If the result contradicts what is already known, this returns
    /// [`WordleError::InvalidResults`] and leaves the constraints unchanged.
    pub fn update(&mut self, result: &GuessResult) -> Result<(), WordleError> {
        *self = self.apply(result)?;
        Ok(())
    }

    /// Adds the given constraints to these constraints.
    pub fn merge(&mut self, other: &ConstraintSet) -> Result<(), WordleError> {
        if self.word_length != other.word_length {
            return Err(WordleError::InvalidResults);
        }
        let mut next = self.clone();
        for (index, maybe_letter) in other.fixed.iter().enumerate() {
            if let Some(letter) = maybe_letter {
                next.set_fixed(index, *letter)?;
            }
        }
        for (index, letters) in other.excluded_at.iter().enumerate() {
            for letter in letters {
                next.set_excluded_at(index, *letter)?;
            }
        }
        for (letter, count) in &other.min_count {
            next.raise_min_count(*letter, *count)?;
        }
        for (letter, count) in &other.max_count {
            next.set_exact_count(*letter, *count)?;
        }
        next.check_consistency()?;
        *self = next;
        Ok(())
    }

    /// Returns `true` iff the given word satisfies these constraints.
    pub fn is_satisfied_by(&self, word: &str) -> bool {
        let mut num_letters = 0;
        for (index, letter) in word.chars().enumerate() {
            if index >= self.word_length {
                return false;
            }
            num_letters += 1;
            if let Some(fixed_letter) = self.fixed[index] {
                if fixed_letter != letter {
                    return false;
                }
            }
            if self.excluded_at[index].contains(&letter) {
                return false;
            }
        }
        num_letters == self.word_length
            && self
                .min_count
                .iter()
                .all(|(letter, min)| count_letter(word, *letter) >= *min)
            && self
                .max_count
                .iter()
                .all(|(letter, max)| count_letter(word, *letter) <= *max)
    }

    /// The length of words these constraints apply to.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// The letter known to be at the given location, if any.
    pub fn fixed(&self, index: usize) -> Option<char> {
        self.fixed.get(index).copied().flatten()
    }

    /// Whether the letter is known not to be at the given location.
    pub fn is_excluded_at(&self, index: usize, letter: char) -> bool {
        self.excluded_at
            .get(index)
            .map_or(false, |letters| letters.contains(&letter))
    }

    /// The minimum number of times the letter must appear.
    pub fn min_count(&self, letter: char) -> u8 {
        *self.min_count.get(&letter).unwrap_or(&0)
    }

    /// The maximum number of times the letter may appear, if known.
    pub fn max_count(&self, letter: char) -> Option<u8> {
        self.max_count.get(&letter).copied()
    }

    /// Whether the letter is known to be absent from the word.
    pub fn is_known_absent(&self, letter: char) -> bool {
        self.max_count(letter) == Some(0)
    }

    /// Whether the number of times this letter appears in the word is known exactly.
    pub fn is_count_known(&self, letter: char) -> bool {
        self.max_count.contains_key(&letter)
    }

    /// Whether no feedback has been applied yet.
    pub fn is_unconstrained(&self) -> bool {
        self.fixed.iter().all(Option::is_none)
            && self.excluded_at.iter().all(BTreeSet::is_empty)
            && self.min_count.is_empty()
            && self.max_count.is_empty()
    }

    fn set_fixed(&mut self, index: usize, letter: char) -> Result<(), WordleError> {
        match self.fixed[index] {
            Some(existing) if existing != letter => return Err(WordleError::InvalidResults),
            _ => {}
        }
        if self.excluded_at[index].contains(&letter) {
            return Err(WordleError::InvalidResults);
        }
        self.fixed[index] = Some(letter);
        Ok(())
    }

    fn set_excluded_at(&mut self, index: usize, letter: char) -> Result<(), WordleError> {
        if self.fixed[index] == Some(letter) {
            return Err(WordleError::InvalidResults);
        }
        self.excluded_at[index].insert(letter);
        Ok(())
    }

    fn raise_min_count(&mut self, letter: char, count: u8) -> Result<(), WordleError> {
        if count == 0 {
            return Ok(());
        }
        if let Some(max) = self.max_count(letter) {
            if count > max {
                return Err(WordleError::InvalidResults);
            }
        }
        let min = self.min_count.entry(letter).or_insert(0);
        if *min < count {
            *min = count;
        }
        Ok(())
    }

    fn set_exact_count(&mut self, letter: char, count: u8) -> Result<(), WordleError> {
        if let Some(existing) = self.max_count(letter) {
            if existing != count {
                return Err(WordleError::InvalidResults);
            }
        }
        if self.min_count(letter) > count {
            return Err(WordleError::InvalidResults);
        }
        self.max_count.insert(letter, count);
        if count > 0 {
            self.min_count.insert(letter, count);
        }
        Ok(())
    }

    /// Checks that some word could still satisfy these constraints, at least as far as can be
    /// told without a word list, and tightens minimum counts implied by fixed letters.
    fn check_consistency(&mut self) -> Result<(), WordleError> {
        let mut num_fixed: BTreeMap<char, u8> = BTreeMap::new();
        for letter in self.fixed.iter().flatten() {
            *num_fixed.entry(*letter).or_insert(0) += 1;
        }
        for (letter, count) in num_fixed {
            self.raise_min_count(letter, count)?;
        }
        let total_min: usize = self.min_count.values().map(|count| *count as usize).sum();
        if total_min > self.word_length {
            return Err(WordleError::InvalidResults);
        }
        for (letter, min) in &self.min_count {
            let num_possible_locations = (0..self.word_length)
                .filter(|index| {
                    !self.excluded_at[*index].contains(letter)
                        && self.fixed[*index].map_or(true, |fixed| fixed == *letter)
                })
                .count();
            if num_possible_locations < *min as usize {
                return Err(WordleError::InvalidResults);
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern: String = self.fixed.iter().map(|letter| letter.unwrap_or('_')).collect();
        write!(f, "fixed: {}", pattern)?;
        for (index, letters) in self.excluded_at.iter().enumerate() {
            if !letters.is_empty() {
                let letters: String = letters.iter().collect();
                write!(f, "; not at {}: {}", index, letters)?;
            }
        }
        for (letter, min) in &self.min_count {
            match self.max_count(*letter) {
                Some(max) if max == *min => write!(f, "; {} exactly {}", letter, max)?,
                _ => write!(f, "; {} at least {}", letter, min)?,
            }
        }
        let absent: String = self
            .max_count
            .iter()
            .filter(|(_, max)| **max == 0)
            .map(|(letter, _)| *letter)
            .collect();
        if !absent.is_empty() {
            write!(f, "; absent: {}", absent)?;
        }
        Ok(())
    }
}

fn count_letter(word: &str, letter: char) -> u8 {
    word.chars().filter(|other| *other == letter).count() as u8
}

/// Returns the candidates that satisfy the given constraints, in their original order.
pub fn filter(candidates: &[Arc<str>], constraints: &ConstraintSet) -> Vec<Arc<str>> {
    candidates
        .iter()
        .filter(|word| constraints.is_satisfied_by(word))
        .map(Arc::clone)
        .collect()
}
