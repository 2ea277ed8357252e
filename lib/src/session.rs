use crate::engine::Guesser;
use crate::results::get_feedback_for_guess;
use crate::results::Feedback;
use crate::results::GameResult;
use crate::results::GuessResult;
use crate::results::WordleError;
use log::debug;
use log::warn;
use std::sync::Arc;

/// Why a session ended without solving the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustedReason {
    /// Every allowed guess was used.
    GuessLimit,
    /// No word in the dictionary is consistent with the feedback.
    NoCandidatesRemain,
}

/// Where a [`Session`] is in its turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for [`Session::next_guess`].
    AwaitingGuess,
    /// The given guess was made, and is waiting for [`Session::submit_feedback`].
    AwaitingFeedback(Arc<str>),
    /// The word was guessed.
    Solved,
    /// The session ended without guessing the word.
    Exhausted(ExhaustedReason),
}

/// What happened as a result of a turn's feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The session is ready for the next guess.
    Continue,
    Solved {
        num_guesses: usize,
    },
    Exhausted(ExhaustedReason),
}

/// Drives a single game: asks the guesser for a guess, accepts the feedback for it, and keeps
/// count of the turns.
///
/// The feedback can come from anywhere, such as a human playing the real game, or
/// [`get_feedback_for_guess`] when the objective is known.
///
/// ```
/// use rs_wordle_sieve::*;
/// use rs_wordle_sieve::scorers::MaxEntropyScorer;
///
/// let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
/// let guesser = MaxScoreGuesser::new(GuessFrom::PossibleWords, &bank, MaxEntropyScorer::new(&bank));
/// let mut session = Session::new(guesser, 6);
///
/// let guess = session.next_guess()?;
/// session.submit_feedback(Feedback::all_hits(5))?;
///
/// assert_eq!(session.state(), &SessionState::Solved);
/// assert_eq!(session.result(), Some(GameResult::Success(vec![guess])));
/// # Ok::<(), WordleError>(())
/// ```
pub struct Session<G: Guesser> {
    guesser: G,
    max_guesses: usize,
    guesses: Vec<Arc<str>>,
    state: SessionState,
}

impl<G: Guesser> Session<G> {
    /// Starts a new session that allows at most `max_guesses` guesses.
    pub fn new(guesser: G, max_guesses: usize) -> Session<G> {
        Session {
            guesser,
            max_guesses,
            guesses: Vec::new(),
            state: SessionState::AwaitingGuess,
        }
    }

    /// Returns the guess to play this turn.
    ///
    /// Calling this again before submitting feedback returns the same guess.
    pub fn next_guess(&mut self) -> Result<Arc<str>, WordleError> {
        match &self.state {
            SessionState::AwaitingFeedback(guess) => return Ok(Arc::clone(guess)),
            SessionState::Solved | SessionState::Exhausted(_) => {
                return Err(WordleError::SessionOver)
            }
            SessionState::AwaitingGuess => {}
        }
        if self.guesses.len() >= self.max_guesses {
            self.state = SessionState::Exhausted(ExhaustedReason::GuessLimit);
            return Err(WordleError::SessionOver);
        }
        match self.guesser.select_next_guess() {
            Some(guess) => {
                debug!("Guess {}: {}", self.guesses.len() + 1, guess);
                self.state = SessionState::AwaitingFeedback(Arc::clone(&guess));
                Ok(guess)
            }
            None => {
                warn!("No candidate words remain.");
                self.state = SessionState::Exhausted(ExhaustedReason::NoCandidatesRemain);
                Err(WordleError::NoCandidatesRemain)
            }
        }
    }

    /// Applies the feedback for the pending guess.
    ///
    /// If the feedback is malformed or contradicts earlier feedback, this returns an error and
    /// nothing changes: the same guess still awaits feedback.
    pub fn submit_feedback(&mut self, feedback: Feedback) -> Result<TurnOutcome, WordleError> {
        let guess = match &self.state {
            SessionState::AwaitingFeedback(guess) => Arc::clone(guess),
            SessionState::AwaitingGuess => return Err(WordleError::NoPendingGuess),
            SessionState::Solved | SessionState::Exhausted(_) => {
                return Err(WordleError::SessionOver)
            }
        };
        feedback.check_length(guess.len())?;

        if feedback.is_all_hits() {
            self.guesses.push(guess);
            self.state = SessionState::Solved;
            debug!("Solved in {} guesses.", self.guesses.len());
            return Ok(TurnOutcome::Solved {
                num_guesses: self.guesses.len(),
            });
        }

        self.guesser.update(&GuessResult {
            guess: &guess,
            feedback,
        })?;
        self.guesses.push(guess);

        if self.guesser.possible_words().is_empty() {
            warn!(
                "No candidate words remain after {} guesses.",
                self.guesses.len()
            );
            self.state = SessionState::Exhausted(ExhaustedReason::NoCandidatesRemain);
        } else if self.guesses.len() >= self.max_guesses {
            self.state = SessionState::Exhausted(ExhaustedReason::GuessLimit);
        } else {
            self.state = SessionState::AwaitingGuess;
        }
        Ok(match self.state {
            SessionState::Exhausted(reason) => TurnOutcome::Exhausted(reason),
            _ => TurnOutcome::Continue,
        })
    }

    /// Tells the session that the pending guess was not accepted by the game. The word is never
    /// suggested again, and the turn is not counted.
    pub fn reject_guess(&mut self) -> Result<(), WordleError> {
        match &self.state {
            SessionState::AwaitingFeedback(guess) => {
                let guess = Arc::clone(guess);
                debug!("Rejected {}.", guess);
                self.guesser.reject_word(&guess);
                self.state = SessionState::AwaitingGuess;
                Ok(())
            }
            SessionState::AwaitingGuess => Err(WordleError::NoPendingGuess),
            SessionState::Solved | SessionState::Exhausted(_) => Err(WordleError::SessionOver),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The guesses that have received feedback, in order.
    pub fn guesses(&self) -> &[Arc<str>] {
        &self.guesses
    }

    pub fn num_guesses(&self) -> usize {
        self.guesses.len()
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    pub fn guesser(&self) -> &G {
        &self.guesser
    }

    pub fn is_over(&self) -> bool {
        matches!(
            self.state,
            SessionState::Solved | SessionState::Exhausted(_)
        )
    }

    /// The result of the game, or `None` if it is still in progress.
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            SessionState::Solved => Some(GameResult::Success(self.guesses.clone())),
            SessionState::Exhausted(ExhaustedReason::GuessLimit) => {
                Some(GameResult::Failure(self.guesses.clone()))
            }
            SessionState::Exhausted(ExhaustedReason::NoCandidatesRemain) => {
                Some(GameResult::UnknownWord)
            }
            SessionState::AwaitingGuess | SessionState::AwaitingFeedback(_) => None,
        }
    }
}

/// Attempts to guess the given word within the maximum number of guesses, using the given word
/// guesser.
///
/// ```
/// use rs_wordle_sieve::*;
/// use rs_wordle_sieve::scorers::LetterFrequencyScorer;
///
/// let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
/// let guesser = MaxScoreGuesser::new(
///     GuessFrom::PossibleWords,
///     &bank,
///     LetterFrequencyScorer::new(&bank),
/// );
///
/// let result = play_game_with_guesser("grace", 6, guesser)?;
///
/// assert!(matches!(result, GameResult::Success(_)));
/// # Ok::<(), WordleError>(())
/// ```
pub fn play_game_with_guesser<G: Guesser>(
    objective: &str,
    max_guesses: usize,
    guesser: G,
) -> Result<GameResult, WordleError> {
    let mut session = Session::new(guesser, max_guesses);
    loop {
        let guess = match session.next_guess() {
            Ok(guess) => guess,
            Err(e) => return session.result().ok_or(e),
        };
        let feedback = get_feedback_for_guess(objective, &guess)?;
        session.submit_feedback(feedback)?;
        if let Some(result) = session.result() {
            return Ok(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordBank;
    use crate::engine::GuessFrom;
    use crate::engine::MaxScoreGuesser;
    use crate::scorers::LetterFrequencyScorer;
    use assert_matches::assert_matches;

    fn new_session(max_guesses: usize) -> Session<MaxScoreGuesser<LetterFrequencyScorer>> {
        let bank =
            WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5).unwrap();
        let guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );
        Session::new(guesser, max_guesses)
    }

    fn feedback(marks: &str) -> Feedback {
        marks.parse().unwrap()
    }

    #[test]
    fn solves_over_two_turns() -> Result<(), WordleError> {
        let mut session = new_session(6);

        assert_eq!(session.next_guess()?.as_ref(), "trace");
        assert_eq!(
            session.submit_feedback(feedback("xoooo"))?,
            TurnOutcome::Continue
        );
        assert_eq!(session.state(), &SessionState::AwaitingGuess);
        assert_eq!(session.next_guess()?.as_ref(), "grace");
        assert_eq!(
            session.submit_feedback(feedback("ooooo"))?,
            TurnOutcome::Solved { num_guesses: 2 }
        );

        assert!(session.is_over());
        assert_matches!(session.result(), Some(GameResult::Success(guesses)) if guesses.len() == 2);
        Ok(())
    }

    #[test]
    fn next_guess_is_stable_until_feedback() -> Result<(), WordleError> {
        let mut session = new_session(6);

        let first = session.next_guess()?;
        let second = session.next_guess()?;

        assert_eq!(first, second);
        assert_eq!(session.state(), &SessionState::AwaitingFeedback(first));
        assert_eq!(session.num_guesses(), 0);
        Ok(())
    }

    #[test]
    fn all_hits_solves_immediately() -> Result<(), WordleError> {
        let mut session = new_session(6);
        session.next_guess()?;

        assert_eq!(
            session.submit_feedback(Feedback::all_hits(5))?,
            TurnOutcome::Solved { num_guesses: 1 }
        );
        assert_eq!(session.state(), &SessionState::Solved);
        assert_eq!(session.guesser().possible_words().len(), 5);
        Ok(())
    }

    #[test]
    fn short_feedback_leaves_turn_unchanged() -> Result<(), WordleError> {
        let mut session = new_session(6);
        let guess = session.next_guess()?;

        assert_matches!(
            session.submit_feedback(feedback("xooo")),
            Err(WordleError::InvalidFeedback(_))
        );
        assert_eq!(session.state(), &SessionState::AwaitingFeedback(guess));
        assert_eq!(session.num_guesses(), 0);
        assert_eq!(session.guesser().possible_words().len(), 5);
        Ok(())
    }

    #[test]
    fn contradictory_feedback_leaves_turn_unchanged() -> Result<(), WordleError> {
        let mut session = new_session(6);
        session.next_guess()?;
        session.submit_feedback(feedback("xoooo"))?;
        let guess = session.next_guess()?;

        // 'r' was already a hit in this location.
        assert_eq!(
            session.submit_feedback(feedback("oxoox")),
            Err(WordleError::InvalidResults)
        );
        assert_eq!(session.state(), &SessionState::AwaitingFeedback(guess));
        assert_eq!(session.num_guesses(), 1);
        Ok(())
    }

    #[test]
    fn no_candidates_remain() -> Result<(), WordleError> {
        let mut session = new_session(6);
        session.next_guess()?;

        assert_eq!(
            session.submit_feedback(feedback("xxxxx"))?,
            TurnOutcome::Exhausted(ExhaustedReason::NoCandidatesRemain)
        );
        assert_eq!(session.result(), Some(GameResult::UnknownWord));
        assert_eq!(session.next_guess(), Err(WordleError::SessionOver));
        Ok(())
    }

    #[test]
    fn guess_limit_reached() -> Result<(), WordleError> {
        let mut session = new_session(1);
        session.next_guess()?;

        assert_eq!(
            session.submit_feedback(feedback("xoooo"))?,
            TurnOutcome::Exhausted(ExhaustedReason::GuessLimit)
        );
        assert_eq!(
            session.result(),
            Some(GameResult::Failure(vec![Arc::from("trace")]))
        );
        Ok(())
    }

    #[test]
    fn zero_guess_limit() {
        let mut session = new_session(0);

        assert_eq!(session.next_guess(), Err(WordleError::SessionOver));
        assert_eq!(
            session.state(),
            &SessionState::Exhausted(ExhaustedReason::GuessLimit)
        );
    }

    #[test]
    fn reject_guess_picks_another_word() -> Result<(), WordleError> {
        let mut session = new_session(6);
        assert_eq!(session.next_guess()?.as_ref(), "trace");

        session.reject_guess()?;

        assert_eq!(session.state(), &SessionState::AwaitingGuess);
        assert_eq!(session.next_guess()?.as_ref(), "grace");
        assert_eq!(session.num_guesses(), 0);
        Ok(())
    }

    #[test]
    fn feedback_without_guess() {
        let mut session = new_session(6);

        assert_eq!(
            session.submit_feedback(feedback("xxxxx")),
            Err(WordleError::NoPendingGuess)
        );
        assert_eq!(session.reject_guess(), Err(WordleError::NoPendingGuess));
    }

    #[test]
    fn play_game_with_guesser_success() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
        let guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        let result = play_game_with_guesser("grace", 6, guesser)?;

        assert_eq!(
            result,
            GameResult::Success(vec![Arc::from("trace"), Arc::from("grace")])
        );
        Ok(())
    }

    #[test]
    fn play_game_with_guesser_unknown_word() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate", "trace", "grace", "place"], 5)?;
        let guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        assert_eq!(
            play_game_with_guesser("zzzzz", 6, guesser)?,
            GameResult::UnknownWord
        );
        Ok(())
    }

    #[test]
    fn play_game_with_guesser_wrong_length() -> Result<(), WordleError> {
        let bank = WordBank::from_iterator(["crane", "slate"], 5)?;
        let guesser = MaxScoreGuesser::new(
            GuessFrom::PossibleWords,
            &bank,
            LetterFrequencyScorer::new(&bank),
        );

        assert_eq!(
            play_game_with_guesser("cranes", 6, guesser),
            Err(WordleError::WordLength(6))
        );
        Ok(())
    }
}
