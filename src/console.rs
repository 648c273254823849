use crossterm::{
    cursor::MoveTo,
    queue,
    style::Stylize,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use std::fmt::Display;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::time::Instant;

use crate::error::Result;
use crate::records::UpsertOutcome;
use crate::session::{
    Attempt, AttemptFeedback, AttemptOutcome, AttemptPrompt, PracticeTerminal, WordResult,
};
use crate::ui;

pub const INPUT_MARKER: &str = ">>> ";

/// Floor for a measured submission; a line already sitting in the input
/// buffer can read back in under one clock tick.
const MIN_ELAPSED_SECS: f64 = 1e-6;

/// Line-oriented terminal: one prompt, one submitted line at a time
pub struct Console<R, W> {
    input: R,
    output: W,
    /// Clear the screen and use colors; off when output is not a terminal
    interactive: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdout = io::stdout();
        let interactive = stdout.is_tty();
        Self::new(io::stdin().lock(), stdout, interactive)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Next line without its terminator, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Print `question` without a newline and wait for the answer.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        writeln!(self.output)?;
        Ok(())
    }

    pub fn alert(&mut self, text: &str) -> Result<()> {
        if self.interactive {
            writeln!(self.output, "{}", text.red())?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    pub fn celebrate(&mut self, text: &str) -> Result<()> {
        if self.interactive {
            writeln!(self.output, "{}", text.green().bold())?;
        } else {
            writeln!(self.output, "{text}")?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        if self.interactive {
            queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
            self.output.flush()?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> PracticeTerminal for Console<R, W> {
    fn read_attempt(&mut self, prompt: &AttemptPrompt<'_>) -> Result<Option<Attempt>> {
        self.clear()?;
        for line in ui::prompt_header(prompt) {
            self.say(line)?;
        }
        write!(self.output, "{INPUT_MARKER}")?;
        self.output.flush()?;

        let started = Instant::now();
        let line = self.read_line()?;
        let elapsed = started.elapsed().as_secs_f64().max(MIN_ELAPSED_SECS);

        Ok(line.map(|text| Attempt::new(text, elapsed)))
    }

    fn show_feedback(&mut self, feedback: &AttemptFeedback) -> Result<()> {
        if feedback.outcome == AttemptOutcome::Retry {
            self.alert("INCORRECT! The attempt does not count. Try again.")?;
        }
        self.say(ui::attempt_report(feedback))?;
        self.blank()
    }

    fn show_word_result(&mut self, result: &WordResult, saved: Option<UpsertOutcome>) -> Result<()> {
        self.blank()?;
        self.say(ui::word_summary(result))?;
        match saved {
            Some(UpsertOutcome::Improved) => {
                self.celebrate(&format!("New personal best for '{}'!", result.word))?
            }
            Some(UpsertOutcome::Created | UpsertOutcome::Unchanged) => {}
            None => self.alert(&format!("Could not save the record for '{}'.", result.word))?,
        }
        self.blank()
    }
}
