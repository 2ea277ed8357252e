use crate::results::WordleError;
use crate::results::MAX_LETTERS_IN_COMPRESSED_FEEDBACK;
use log::info;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::io::BufRead;
use std::ops::Deref;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A letter along with its location in the word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocatedLetter {
    pub letter: char,
    /// The zero-based location (i.e. index) for this letter in a word.
    pub location: u8,
}

impl LocatedLetter {
    pub fn new(letter: char, location: u8) -> LocatedLetter {
        LocatedLetter { letter, location }
    }
}

/// Contains all the possible words for this Wordle game.
///
/// The words are stored sorted and deduplicated, and the list is shared, so cloning a bank is
/// cheap. One bank can be used by many concurrent games.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SerializedWordBank"))]
pub struct WordBank {
    all_words: Arc<[Arc<str>]>,
    word_length: usize,
}

impl WordBank {
    /// Constructs a new `WordBank` by reading words from the given reader.
    ///
    /// The reader should provide one word per line. See [`WordBank::from_iterator`] for how each
    /// line is normalized.
    pub fn from_reader<R: BufRead>(word_reader: R, word_length: usize) -> Result<Self, WordleError> {
        let lines = word_reader
            .lines()
            .collect::<Result<Vec<String>, std::io::Error>>()?;
        WordBank::from_iterator(lines, word_length)
    }

    /// Constructs a new `WordBank` from the given words.
    ///
    /// Each word is trimmed, converted to lower case, and stripped of any characters other than
    /// `a`-`z`. Words that then don't have exactly `word_length` letters are dropped.
    ///
    /// ```
    /// use rs_wordle_sieve::WordBank;
    ///
    /// let bank = WordBank::from_iterator(["Crane", "can't", "slate", "crane", "ox"], 5).unwrap();
    /// assert_eq!(bank.len(), 2);
    /// assert_eq!(bank[0].as_ref(), "crane");
    /// assert_eq!(bank[1].as_ref(), "slate");
    /// ```
    pub fn from_iterator<S, I>(words: I, word_length: usize) -> Result<Self, WordleError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        if word_length > MAX_LETTERS_IN_COMPRESSED_FEEDBACK {
            return Err(WordleError::WordLength(MAX_LETTERS_IN_COMPRESSED_FEEDBACK));
        }
        let unique_words: BTreeSet<String> = words
            .into_iter()
            .map(|word| normalize(word.as_ref()))
            .filter(|word| word_length > 0 && word.len() == word_length)
            .collect();
        if unique_words.is_empty() {
            return Err(WordleError::EmptyDictionary(word_length));
        }
        let all_words: Arc<[Arc<str>]> = unique_words
            .into_iter()
            .map(|word| Arc::from(word.as_str()))
            .collect();
        info!(
            "Loaded {} words of length {}.",
            all_words.len(),
            word_length
        );
        Ok(WordBank {
            all_words,
            word_length,
        })
    }

    /// Returns the number of words in the bank.
    pub fn len(&self) -> usize {
        self.all_words.len()
    }

    /// Always `false`: a bank cannot be constructed without words.
    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Returns the length of every word in the bank.
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Whether the given word is in the bank.
    pub fn contains(&self, word: &str) -> bool {
        self.all_words
            .binary_search_by(|other| other.as_ref().cmp(word))
            .is_ok()
    }
}

/// The serialized form of a [`WordBank`], checked again on the way back in.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct SerializedWordBank {
    all_words: Vec<String>,
    word_length: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<SerializedWordBank> for WordBank {
    type Error = WordleError;

    fn try_from(serialized: SerializedWordBank) -> Result<Self, Self::Error> {
        WordBank::from_iterator(serialized.all_words, serialized.word_length)
    }
}

impl Deref for WordBank {
    type Target = [Arc<str>];

    fn deref(&self) -> &Self::Target {
        &self.all_words
    }
}

fn normalize(word: &str) -> String {
    word.trim()
        .to_lowercase()
        .chars()
        .filter(|letter| letter.is_ascii_lowercase())
        .collect()
}

/// Counts the number of words that have letters in certain locations.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordCounter {
    num_words: u32,
    num_words_by_ll: HashMap<LocatedLetter, u32>,
    num_words_by_letter: HashMap<char, u32>,
}

impl WordCounter {
    /// Creates a new word counter based on the given word list.
    pub fn new<S>(words: &[S]) -> WordCounter
    where
        S: AsRef<str>,
    {
        let mut num_words_by_ll: HashMap<LocatedLetter, u32> = HashMap::new();
        let mut num_words_by_letter: HashMap<char, u32> = HashMap::new();
        for word in words {
            let word = word.as_ref();
            for (index, letter) in word.char_indices() {
                *num_words_by_ll
                    .entry(LocatedLetter::new(letter, index as u8))
                    .or_insert(0) += 1;
                if word
                    .chars()
                    .take(index)
                    .all(|other_letter| other_letter != letter)
                {
                    *num_words_by_letter.entry(letter).or_insert(0) += 1;
                }
            }
        }
        WordCounter {
            num_words: words.len() as u32,
            num_words_by_ll,
            num_words_by_letter,
        }
    }

    /// Retrieves the number of words that were counted.
    pub fn num_words(&self) -> u32 {
        self.num_words
    }

    /// Retrieves the count of words with the given letter at the given location.
    pub fn num_words_with_located_letter(&self, ll: &LocatedLetter) -> u32 {
        *self.num_words_by_ll.get(ll).unwrap_or(&0)
    }

    /// Retrieves the count of words that contain the given letter.
    pub fn num_words_with_letter(&self, letter: char) -> u32 {
        *self.num_words_by_letter.get(&letter).unwrap_or(&0)
    }
}
