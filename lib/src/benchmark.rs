use crate::dictionary::WordBank;
use crate::engine::Guesser;
use crate::results::GameResult;
use crate::results::WordleError;
use crate::session::play_game_with_guesser;
use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The outcome of one benchmark game.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialReport {
    pub target: Arc<str>,
    pub result: GameResult,
}

impl TrialReport {
    /// The number of guesses used, if the game was played to a win or a loss.
    pub fn num_guesses(&self) -> Option<usize> {
        self.result.num_guesses()
    }
}

/// Plays one independent game per target, in parallel.
///
/// `make_guesser` is called once per game. Guessers that are expensive to construct should be
/// built once and cloned here, e.g. [`crate::scorers::MaxEntropyScorer`] shares its first-round
/// table between clones.
///
/// The reports are returned in the same order as the targets.
pub fn run_trials<G, F>(
    targets: &[Arc<str>],
    max_guesses: usize,
    make_guesser: F,
) -> Result<Vec<TrialReport>, WordleError>
where
    G: Guesser,
    F: Fn() -> G + Sync,
{
    info!("Running {} trials.", targets.len());
    targets
        .par_iter()
        .map(|target| {
            play_game_with_guesser(target, max_guesses, make_guesser()).map(|result| TrialReport {
                target: Arc::clone(target),
                result,
            })
        })
        .collect()
}

/// Picks `num_targets` words from the bank at random, with replacement.
///
/// The same seed always picks the same words from the same bank. Without a seed, the words are
/// picked using entropy from the operating system.
pub fn sample_targets(bank: &WordBank, num_targets: usize, seed: Option<u64>) -> Vec<Arc<str>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..num_targets)
        .filter_map(|_| bank.choose(&mut rng).cloned())
        .collect()
}

/// Aggregate statistics over a set of [`TrialReport`]s.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BenchmarkSummary {
    pub num_trials: usize,
    pub num_solved: usize,
    /// Games that ran out of guesses.
    pub num_failed: usize,
    /// Games whose target was eliminated, i.e. it wasn't in the word bank.
    pub num_unknown: usize,
    /// Mean number of guesses across solved games, or 0 if none were solved.
    pub average_guesses: f64,
    /// Population standard deviation of the number of guesses across solved games.
    pub std_dev: f64,
    /// Number of solved games keyed by the number of guesses they took.
    pub num_games_by_guesses: BTreeMap<usize, usize>,
}

impl BenchmarkSummary {
    pub fn from_reports(reports: &[TrialReport]) -> BenchmarkSummary {
        let mut num_failed = 0;
        let mut num_unknown = 0;
        let mut num_games_by_guesses: BTreeMap<usize, usize> = BTreeMap::new();
        let mut solved_guesses: Vec<usize> = Vec::new();
        for report in reports {
            match &report.result {
                GameResult::Success(guesses) => {
                    *num_games_by_guesses.entry(guesses.len()).or_insert(0) += 1;
                    solved_guesses.push(guesses.len());
                }
                GameResult::Failure(_) => num_failed += 1,
                GameResult::UnknownWord => num_unknown += 1,
            }
        }

        let (average_guesses, std_dev) = if solved_guesses.is_empty() {
            (0.0, 0.0)
        } else {
            let num_solved = solved_guesses.len() as f64;
            let average = solved_guesses.iter().sum::<usize>() as f64 / num_solved;
            let variance = solved_guesses
                .iter()
                .map(|num_guesses| (*num_guesses as f64 - average).powi(2))
                .sum::<f64>()
                / num_solved;
            (average, variance.sqrt())
        };

        BenchmarkSummary {
            num_trials: reports.len(),
            num_solved: solved_guesses.len(),
            num_failed,
            num_unknown,
            average_guesses,
            std_dev,
            num_games_by_guesses,
        }
    }
}
