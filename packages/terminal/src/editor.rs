//! External editor invocation on a scratch file.

use std::io::Write;

use bkt_config::{BKT_EDITOR, EDITOR, Environment, VISUAL};

use crate::{TerminalError, shell_command};

const FALLBACK_EDITOR: &str = if cfg!(windows) { "notepad" } else { "vi" };

/// The user's text editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    command: String,
}

impl Editor {
    /// Pick the editor: `BKT_EDITOR`, then the configured editor, then
    /// `VISUAL`, then `EDITOR`, then the platform fallback.
    #[must_use]
    pub fn resolve(env: &Environment, configured: Option<&str>) -> Self {
        let command = env
            .get(BKT_EDITOR)
            .or_else(|| configured.filter(|c| !c.is_empty()))
            .or_else(|| env.first_of(&[VISUAL, EDITOR]))
            .unwrap_or(FALLBACK_EDITOR);
        Self {
            command: command.to_string(),
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Collects free text from the user.
pub trait TextEditor {
    /// Open `initial` in the editor and return the saved text with comment
    /// lines removed and surrounding whitespace trimmed.
    ///
    /// The scratch file is removed when this returns, on every path.
    ///
    /// # Errors
    ///
    /// * [`TerminalError::Io`] if the scratch file cannot be written or read.
    /// * [`TerminalError::CommandFailed`] if the editor exits non-zero.
    fn edit(&self, initial: &str) -> Result<String, TerminalError>;
}

impl TextEditor for Editor {
    fn edit(&self, initial: &str) -> Result<String, TerminalError> {
        let mut scratch = tempfile::Builder::new()
            .prefix("bkt-")
            .suffix(".md")
            .tempfile()?;
        scratch.write_all(initial.as_bytes())?;
        scratch.flush()?;

        let path = scratch.path().to_string_lossy().into_owned();
        log::debug!("Opening {path} with {}", self.command);

        let status = shell_command(&self.command, &path)
            .status()
            .map_err(|e| TerminalError::CommandFailed {
                program: self.command.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(TerminalError::CommandFailed {
                program: self.command.clone(),
                message: format!("exited with {status}"),
            });
        }

        let content = std::fs::read_to_string(scratch.path())?;
        Ok(strip_comment_lines(&content))
    }
}

/// Drop lines starting with `#` and trim the result.
#[must_use]
pub fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
