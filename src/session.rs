use std::collections::VecDeque;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::records::{RecordStore, UpsertOutcome};
use crate::scoring::{accuracy, words_per_minute};
use crate::util::mean;

pub const DEFAULT_REPETITIONS: usize = 2;

/// One submitted line and how long it took to type
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub submitted_text: String,
    pub elapsed_seconds: f64,
}

impl Attempt {
    pub fn new(submitted_text: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            submitted_text: submitted_text.into(),
            elapsed_seconds,
        }
    }
}

/// Everything the terminal needs to ask for the next attempt
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptPrompt<'a> {
    pub word: &'a str,
    /// 1-based index of the repetition being asked for
    pub repetition: usize,
    pub repetitions: usize,
    /// Raw text of the previous submission for this word, if any
    pub previous_attempt: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Counted toward the required repetitions
    Accepted,
    /// Discarded; the same repetition is asked for again
    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFeedback {
    pub outcome: AttemptOutcome,
    pub accuracy: f64,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    AwaitingAttempt,
    WordComplete,
}

/// Aggregate for one word once all repetitions were accepted
#[derive(Debug, Clone, PartialEq)]
pub struct WordResult {
    pub word: String,
    pub average_accuracy: f64,
    pub average_time_seconds: f64,
    pub wpm: f64,
}

/// Results of one practice session, in word-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub results: Vec<WordResult>,
    /// Words whose result could not be written to the record store
    pub unsaved: Vec<String>,
}

impl SessionSummary {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }
}

/// Repeated-attempt state for a single word
#[derive(Debug, Clone)]
pub struct WordDrill {
    word: String,
    repetitions: usize,
    times: Vec<f64>,
    accuracies: Vec<f64>,
    previous_attempt: Option<String>,
}

impl WordDrill {
    pub fn new(word: impl Into<String>, repetitions: usize) -> Result<Self> {
        let word = word.into();
        if repetitions == 0 {
            return Err(Error::InvalidRepetitions);
        }
        if word.chars().all(|c| c == ' ') {
            return Err(Error::EmptyTarget);
        }

        Ok(Self {
            word,
            repetitions,
            times: Vec::with_capacity(repetitions),
            accuracies: Vec::with_capacity(repetitions),
            previous_attempt: None,
        })
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn completed(&self) -> usize {
        self.times.len()
    }

    pub fn state(&self) -> DrillState {
        if self.completed() >= self.repetitions {
            DrillState::WordComplete
        } else {
            DrillState::AwaitingAttempt
        }
    }

    pub fn prompt(&self) -> AttemptPrompt<'_> {
        AttemptPrompt {
            word: &self.word,
            repetition: (self.completed() + 1).min(self.repetitions),
            repetitions: self.repetitions,
            previous_attempt: self.previous_attempt.as_deref(),
        }
    }

    /// Score an attempt and accept it iff its trimmed text equals the word.
    pub fn submit(&mut self, attempt: Attempt) -> Result<AttemptFeedback> {
        debug_assert_eq!(self.state(), DrillState::AwaitingAttempt);

        let accuracy = accuracy(&self.word, &attempt.submitted_text)?;
        let outcome = if attempt.submitted_text.trim() == self.word {
            self.times.push(attempt.elapsed_seconds);
            self.accuracies.push(accuracy);
            AttemptOutcome::Accepted
        } else {
            AttemptOutcome::Retry
        };

        debug!(
            word = %self.word,
            ?outcome,
            accuracy,
            elapsed = attempt.elapsed_seconds,
            "scored attempt"
        );
        self.previous_attempt = Some(attempt.submitted_text);

        Ok(AttemptFeedback {
            outcome,
            accuracy,
            elapsed_seconds: attempt.elapsed_seconds,
        })
    }

    /// Averages over the accepted attempts and WPM over their total time.
    pub fn finish(self) -> Result<WordResult> {
        debug_assert_eq!(self.state(), DrillState::WordComplete);

        let total_time: f64 = self.times.iter().sum();
        let wpm = words_per_minute(self.word.chars().count(), self.repetitions, total_time)?;

        Ok(WordResult {
            average_accuracy: mean(&self.accuracies).unwrap_or(0.0),
            average_time_seconds: mean(&self.times).unwrap_or(0.0),
            wpm,
            word: self.word,
        })
    }
}

/// Terminal side of a practice session
pub trait PracticeTerminal {
    /// Block until a line is submitted. `Ok(None)` means input has ended.
    fn read_attempt(&mut self, prompt: &AttemptPrompt<'_>) -> Result<Option<Attempt>>;

    fn show_feedback(&mut self, _feedback: &AttemptFeedback) -> Result<()> {
        Ok(())
    }

    /// `saved` is `None` when the record store rejected the result.
    fn show_word_result(
        &mut self,
        _result: &WordResult,
        _saved: Option<UpsertOutcome>,
    ) -> Result<()> {
        Ok(())
    }
}

/// Drives every word of a list through its repetitions and keeps best scores
#[derive(Debug)]
pub struct PracticeSession<'a, S: RecordStore + ?Sized> {
    repetitions: usize,
    records: &'a mut S,
}

impl<'a, S: RecordStore + ?Sized> PracticeSession<'a, S> {
    pub fn new(repetitions: usize, records: &'a mut S) -> Result<Self> {
        if repetitions == 0 {
            return Err(Error::InvalidRepetitions);
        }
        Ok(Self {
            repetitions,
            records,
        })
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Practice one word until its repetitions are complete.
    pub fn drill_word<T: PracticeTerminal + ?Sized>(
        &self,
        word: &str,
        terminal: &mut T,
    ) -> Result<WordResult> {
        let mut drill = WordDrill::new(word, self.repetitions)?;

        while drill.state() == DrillState::AwaitingAttempt {
            let attempt = terminal
                .read_attempt(&drill.prompt())?
                .ok_or(Error::InputClosed)?;
            let feedback = drill.submit(attempt)?;
            terminal.show_feedback(&feedback)?;
        }

        drill.finish()
    }

    /// Persist a finished word. Storage failures are logged and reported as
    /// `None` so the session can carry on.
    pub fn save(&mut self, result: &WordResult) -> Option<UpsertOutcome> {
        match self
            .records
            .upsert(&result.word, result.wpm, result.average_accuracy)
        {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(word = %result.word, error = %e, "failed to save best record");
                None
            }
        }
    }

    /// Practice every word in order. An empty list yields an empty summary.
    pub fn run<T: PracticeTerminal + ?Sized>(
        &mut self,
        words: &[String],
        terminal: &mut T,
    ) -> Result<SessionSummary> {
        info!(words = words.len(), repetitions = self.repetitions, "starting session");
        let mut summary = SessionSummary::default();

        for word in words {
            let result = self.drill_word(word, terminal)?;
            let saved = self.save(&result);
            if saved.is_none() {
                summary.unsaved.push(result.word.clone());
            }
            terminal.show_word_result(&result, saved)?;
            summary.results.push(result);
        }

        info!(
            completed = summary.len(),
            unsaved = summary.unsaved.len(),
            "session finished"
        );
        Ok(summary)
    }
}

/// Terminal that replays a fixed list of attempts, for tests and demos
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    attempts: VecDeque<Attempt>,
    pub prompts: Vec<(String, usize, Option<String>)>,
    pub feedback: Vec<AttemptFeedback>,
    pub word_results: Vec<(WordResult, Option<UpsertOutcome>)>,
}

impl ScriptedTerminal {
    pub fn new(attempts: impl IntoIterator<Item = Attempt>) -> Self {
        Self {
            attempts: attempts.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.attempts.len()
    }
}

impl PracticeTerminal for ScriptedTerminal {
    fn read_attempt(&mut self, prompt: &AttemptPrompt<'_>) -> Result<Option<Attempt>> {
        self.prompts.push((
            prompt.word.to_string(),
            prompt.repetition,
            prompt.previous_attempt.map(str::to_string),
        ));
        Ok(self.attempts.pop_front())
    }

    fn show_feedback(&mut self, feedback: &AttemptFeedback) -> Result<()> {
        self.feedback.push(feedback.clone());
        Ok(())
    }

    fn show_word_result(&mut self, result: &WordResult, saved: Option<UpsertOutcome>) -> Result<()> {
        self.word_results.push((result.clone(), saved));
        Ok(())
    }
}
