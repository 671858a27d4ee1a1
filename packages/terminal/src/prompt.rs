//! Yes/no confirmation.

use std::io::IsTerminal;

use dialoguer::Input;

use crate::TerminalError;

/// Whether an answer means "yes" (`y` or `yes`, any case).
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks the user questions.
pub trait Prompter {
    /// Whether answers can be read at all.
    fn is_interactive(&self) -> bool;

    /// Ask `question` and report whether the answer was affirmative.
    ///
    /// # Errors
    ///
    /// * [`TerminalError::NonInteractive`] when not interactive.
    /// * [`TerminalError::Io`] if reading the answer fails.
    fn confirm(&self, question: &str) -> Result<bool, TerminalError>;
}

fn prompt_text(question: &str) -> String {
    format!("{question} [y/N]")
}

/// Prompts on stderr and reads answers from the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn is_interactive(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    fn confirm(&self, question: &str) -> Result<bool, TerminalError> {
        if !self.is_interactive() {
            return Err(TerminalError::NonInteractive);
        }

        let answer: String = Input::new()
            .with_prompt(prompt_text(question))
            .allow_empty(true)
            .report(false)
            .interact_text()
            .map_err(|e| TerminalError::Io(std::io::Error::other(e)))?;

        Ok(is_affirmative(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", " Yes\n"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
        for answer in ["", "n", "no", "yep", "sure"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn test_prompt_defaults_to_no() {
        assert_eq!(
            prompt_text("Delete branch \"x\" from acme/widgets?"),
            "Delete branch \"x\" from acme/widgets? [y/N]"
        );
    }
}
