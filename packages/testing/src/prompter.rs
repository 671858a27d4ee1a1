use std::cell::RefCell;
use std::collections::VecDeque;

use bkt_terminal::{Prompter, TerminalError, TextEditor, is_affirmative};

/// Answers prompts from a fixed script and records the questions asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    interactive: bool,
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    /// An interactive prompter that answers in order.
    #[must_use]
    pub fn answering<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interactive: true,
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// A prompter whose stdin is not a terminal.
    #[must_use]
    pub fn non_interactive() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn confirm(&self, question: &str) -> Result<bool, TerminalError> {
        if !self.interactive {
            return Err(TerminalError::NonInteractive);
        }
        self.asked.borrow_mut().push(question.to_string());
        let answer = self.answers.borrow_mut().pop_front().unwrap_or_default();
        Ok(is_affirmative(&answer))
    }
}

/// Returns fixed text instead of launching an editor.
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    text: String,
    opened: RefCell<usize>,
}

impl ScriptedEditor {
    #[must_use]
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opened: RefCell::new(0),
        }
    }

    /// How many times the editor was opened.
    #[must_use]
    pub fn opened(&self) -> usize {
        *self.opened.borrow()
    }
}

impl TextEditor for ScriptedEditor {
    fn edit(&self, _initial: &str) -> Result<String, TerminalError> {
        *self.opened.borrow_mut() += 1;
        Ok(self.text.trim().to_string())
    }
}
