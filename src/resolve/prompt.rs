//! Interactive prompting

use crate::error::SwitchdlError;
use std::collections::VecDeque;
use std::io::{BufRead, IsTerminal, Write};
use tokio_util::sync::CancellationToken;

/// Source of interactive answers.
///
/// Every caller checks [`Prompter::is_interactive`] before asking, so a run
/// without an input device never blocks.
pub trait Prompter {
    /// Whether an input device is attached
    fn is_interactive(&self) -> bool;

    /// Show a line to the user
    fn say(&mut self, line: &str);

    /// Show `prompt` and read one trimmed line.
    ///
    /// Fails with [`SwitchdlError::Cancelled`] once the run was interrupted.
    fn ask(&mut self, prompt: &str) -> Result<String, SwitchdlError>;
}

/// Prompter reading from stdin and writing to stdout
#[derive(Debug, Clone)]
pub struct TerminalPrompter {
    interactive: bool,
    cancel: CancellationToken,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal(),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop answering prompts once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn ask(&mut self, prompt: &str) -> Result<String, SwitchdlError> {
        if self.cancel.is_cancelled() {
            return Err(SwitchdlError::Cancelled);
        }
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| SwitchdlError::Input(e.to_string()))?;
        // Ctrl-C arrived while blocked on stdin
        if self.cancel.is_cancelled() {
            return Err(SwitchdlError::Cancelled);
        }
        if read == 0 {
            return Err(SwitchdlError::Input("unexpected end of input".to_string()));
        }
        Ok(line.trim().to_string())
    }
}

/// Prompter replaying queued answers and recording everything shown
#[derive(Debug, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    interactive: bool,
    transcript: Vec<String>,
    cancel: CancellationToken,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            interactive: true,
            transcript: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Prompter behaving like a run without an input device
    pub fn non_interactive() -> Self {
        Self {
            answers: VecDeque::new(),
            interactive: false,
            transcript: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Behave like an interrupted terminal once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Lines and prompts shown so far
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }

    /// Whether any shown line contains `needle`
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<String, SwitchdlError> {
        self.transcript.push(prompt.to_string());
        if self.cancel.is_cancelled() {
            return Err(SwitchdlError::Cancelled);
        }
        self.answers
            .pop_front()
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| SwitchdlError::Input("no scripted answer left".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompter_replays_answers() {
        let mut prompter = ScriptedPrompter::new([" 1 ", "two"]);
        assert!(prompter.is_interactive());
        assert_eq!(prompter.ask("first? ").unwrap(), "1");
        prompter.say("hello");
        assert_eq!(prompter.ask("second? ").unwrap(), "two");
        assert_eq!(prompter.remaining_answers(), 0);
        assert!(matches!(prompter.ask("third? "), Err(SwitchdlError::Input(_))));
        assert_eq!(prompter.transcript()[1], "hello");
        assert!(prompter.saw("third?"));
    }

    #[test]
    fn test_cancelled_prompter_stops_answering() {
        let cancel = CancellationToken::new();
        let mut prompter = ScriptedPrompter::new(["a", "b"]).with_cancellation(cancel.clone());
        assert_eq!(prompter.ask("first? ").unwrap(), "a");
        cancel.cancel();
        assert!(matches!(prompter.ask("second? "), Err(SwitchdlError::Cancelled)));
        assert_eq!(prompter.remaining_answers(), 1);
    }

    #[test]
    fn test_non_interactive_prompter() {
        let prompter = ScriptedPrompter::non_interactive();
        assert!(!prompter.is_interactive());
    }
}
