use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dyn_clone::DynClone;
use log::info;
use rs_wordle_sieve::scorers::*;
use rs_wordle_sieve::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Solves Wordle puzzles: suggests a guess, reads the feedback, and narrows down the word.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a file that contains a list of possible words, with one word on each line.
    #[arg(short = 'f', long, default_value = DEFAULT_DICTIONARY_PATH)]
    words_file: PathBuf,

    /// The number of letters in each word.
    #[arg(short = 'l', long, default_value_t = 5)]
    word_length: usize,

    /// The maximum number of guesses per game.
    #[arg(short = 'g', long, default_value_t = 6)]
    max_guesses: usize,

    /// How to score guesses.
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Entropy)]
    strategy: StrategyArg,

    /// Which words may be guessed.
    #[arg(long, value_enum, default_value_t = GuessFromArg::Possible)]
    guess_from: GuessFromArg,

    /// Outputs much less. Suitable for machine parsing.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive game against the solver.
    Interactive,
    /// Run a single game with the given word.
    Single { word: String },
    /// Play games against randomly chosen words from the words file.
    Benchmark {
        /// How many games to play.
        #[arg(short = 'n', long, default_value_t = 100)]
        trials: usize,
        /// Seed for choosing the words, to repeat a benchmark.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Entropy,
    Frequency,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GuessFromArg {
    Possible,
    All,
}

impl Args {
    fn to_config(&self) -> SolverConfig {
        let mut config = SolverConfig {
            word_length: self.word_length,
            max_guesses: self.max_guesses,
            dictionary_path: self.words_file.clone(),
            strategy: match self.strategy {
                StrategyArg::Entropy => Strategy::Entropy,
                StrategyArg::Frequency => Strategy::Frequency,
            },
            guess_from: match self.guess_from {
                GuessFromArg::Possible => GuessFrom::PossibleWords,
                GuessFromArg::All => GuessFrom::AllUnguessedWords,
            },
            ..SolverConfig::default()
        };
        if let Command::Benchmark { trials, .. } = self.command {
            config.trials = trials;
        }
        config
    }
}

/// A scorer that can be cloned for each game and shared between benchmark threads.
trait ClonableScorer: WordScorer + DynClone + Send + Sync {}

impl<T> ClonableScorer for T where T: WordScorer + Clone + Send + Sync {}

dyn_clone::clone_trait_object!(ClonableScorer);

type CliGuesser = MaxScoreGuesser<Box<dyn ClonableScorer>>;

fn main() -> Result<()> {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();
    let config = args.to_config();

    let word_bank = config
        .load_word_bank()
        .with_context(|| format!("Failed to load words from {}", config.dictionary_path.display()))?;
    let scorer = create_scorer(config.strategy, &word_bank);

    match &args.command {
        Command::Interactive => play_interactive_game(&config, &word_bank, scorer, args.quiet)?,
        Command::Single { word } => {
            play_single_game(word, &config, &word_bank, scorer, args.quiet)?
        }
        Command::Benchmark { seed, .. } => run_benchmark(&config, &word_bank, scorer, *seed)?,
    }

    info!(
        "Command executed in {:.3}s.",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

fn create_scorer(strategy: Strategy, word_bank: &WordBank) -> Box<dyn ClonableScorer> {
    match strategy {
        Strategy::Entropy => Box::new(MaxEntropyScorer::new(word_bank)),
        Strategy::Frequency => Box::new(LetterFrequencyScorer::new(word_bank)),
    }
}

fn new_session(
    config: &SolverConfig,
    word_bank: &WordBank,
    scorer: Box<dyn ClonableScorer>,
) -> Session<CliGuesser> {
    let guesser = MaxScoreGuesser::new(config.guess_from, word_bank, scorer);
    Session::new(guesser, config.max_guesses)
}

fn run_benchmark(
    config: &SolverConfig,
    word_bank: &WordBank,
    scorer: Box<dyn ClonableScorer>,
    seed: Option<u64>,
) -> Result<()> {
    let targets = sample_targets(word_bank, config.trials, seed);
    let reports = run_trials(&targets, config.max_guesses, || {
        MaxScoreGuesser::new(config.guess_from, word_bank, scorer.clone())
    })?;
    let summary = BenchmarkSummary::from_reports(&reports);

    println!(
        "Played {} games: {} solved, {} out of guesses, {} unknown.",
        summary.num_trials, summary.num_solved, summary.num_failed, summary.num_unknown
    );
    println!("|Num guesses|Num games|");
    println!("|-----------|---------|");
    for (num_guesses, num_games) in &summary.num_games_by_guesses {
        println!("|{}|{}|", num_guesses, num_games);
    }
    println!(
        "\n**Average number of guesses:** {:.2} +/- {:.2}",
        summary.average_guesses, summary.std_dev
    );
    Ok(())
}

fn play_single_game(
    word: &str,
    config: &SolverConfig,
    word_bank: &WordBank,
    scorer: Box<dyn ClonableScorer>,
    quiet: bool,
) -> Result<()> {
    let objective = word.trim().to_lowercase();
    if !word_bank.contains(&objective) {
        bail!("{} is not in the word list.", objective);
    }
    let mut session = new_session(config, word_bank, scorer);
    while !session.is_over() {
        let guess = match session.next_guess() {
            Ok(guess) => guess,
            Err(WordleError::NoCandidatesRemain | WordleError::SessionOver) => break,
            Err(e) => return Err(e.into()),
        };
        print_guess(&session, &guess, quiet);
        session.submit_feedback(get_feedback_for_guess(&objective, &guess)?)?;
    }
    print_status(&session);
    Ok(())
}

fn play_interactive_game(
    config: &SolverConfig,
    word_bank: &WordBank,
    scorer: Box<dyn ClonableScorer>,
    quiet: bool,
) -> Result<()> {
    let prompt = if quiet { "" } else { "> " };
    if !quiet {
        println!(
            "There are {} possible words. Type help for instructions.",
            word_bank.len()
        );
    }
    let mut session = new_session(config, word_bank, scorer);
    if !propose_guess(&mut session, quiet) {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt);
        io::stdout().flush()?;
        let command = match lines.next() {
            Some(line) => line?.trim().to_lowercase(),
            None => return Ok(()),
        };
        match command.as_str() {
            "help" => {
                print_help(config.word_length);
                continue;
            }
            "quit" | "exit" => return Ok(()),
            "list" => {
                print_ranked_words(&session);
                continue;
            }
            "debug" => {
                println!("{}", session.guesser().constraints());
                continue;
            }
            "n/a" => session.reject_guess()?,
            _ => match Feedback::parse(&command, config.word_length)
                .and_then(|feedback| session.submit_feedback(feedback))
            {
                Ok(_) => {}
                Err(e @ (WordleError::InvalidFeedback(_) | WordleError::InvalidResults)) => {
                    println!("{}", e);
                    print_help(config.word_length);
                    continue;
                }
                Err(e) => return Err(e.into()),
            },
        }
        if !propose_guess(&mut session, quiet) {
            return Ok(());
        }
    }
}

/// Prints the next guess, or the final status if the game is over. Returns whether the game
/// continues.
fn propose_guess(session: &mut Session<CliGuesser>, quiet: bool) -> bool {
    if session.is_over() {
        print_status(session);
        return false;
    }
    match session.next_guess() {
        Ok(guess) => {
            print_guess(session, &guess, quiet);
            true
        }
        Err(_) => {
            print_status(session);
            false
        }
    }
}

fn print_guess(session: &Session<CliGuesser>, guess: &Arc<str>, quiet: bool) {
    if quiet {
        println!("{}", guess);
        return;
    }
    let guesser = session.guesser();
    println!(
        "{} (score {}). {} possible words remain.",
        guess,
        guesser.scorer().score_word(guess),
        guesser.possible_words().len()
    );
}

fn print_status(session: &Session<CliGuesser>) {
    match session.state() {
        SessionState::Solved => println!("Solved it! It took me {} guesses.", session.num_guesses()),
        SessionState::Exhausted(ExhaustedReason::GuessLimit) => println!(
            "I still couldn't solve it after {} guesses :(",
            session.num_guesses()
        ),
        SessionState::Exhausted(ExhaustedReason::NoCandidatesRemain) => {
            println!("No words in the word list match that feedback.")
        }
        SessionState::AwaitingGuess | SessionState::AwaitingFeedback(_) => {}
    }
}

fn print_ranked_words(session: &Session<CliGuesser>) {
    let guesser = session.guesser();
    let mut ranked: Vec<(i64, &Arc<str>)> = guesser
        .possible_words()
        .iter()
        .map(|word| (guesser.scorer().score_word(word), word))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    for (_, word) in ranked {
        println!("{}", word);
    }
}

fn print_help(word_length: usize) {
    println!("After each guess, enter {} characters of feedback:", word_length);
    println!("- x (or .) to indicate a missed letter");
    println!("- v (or y) to indicate the letter is in the word but in the incorrect place");
    println!("- o (or g) to indicate a correctly placed letter");
    println!();
    println!("If the guess is not in the game's dictionary, type n/a to get a new suggestion.");
    println!("Type list to see the remaining words, or debug to see what is known so far.");
    println!("Type quit to stop.");
}
