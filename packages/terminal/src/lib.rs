#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Terminal collaborators for `bkt`: confirmation prompts, the external
//! editor, the web browser and colour detection.

mod browser;
mod editor;
mod prompt;

pub use browser::Browser;
pub use editor::{Editor, TextEditor, strip_comment_lines};
pub use prompt::{Prompter, StdinPrompter, is_affirmative};

use bkt_config::{BKT_NO_COLOR, Environment, NO_COLOR};

#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    /// A prompt was needed but stdin is not a terminal.
    #[error("cannot prompt in non-interactive mode")]
    NonInteractive,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The editor or browser could not be started or exited non-zero.
    #[error("{program} failed: {message}")]
    CommandFailed { program: String, message: String },
}

/// Whether output should be coloured.
///
/// `NO_COLOR` disables colour whenever it is present, even empty.
#[must_use]
pub fn color_enabled(env: &Environment, config_no_color: bool, is_tty: bool) -> bool {
    is_tty && !config_no_color && !env.is_present(NO_COLOR) && env.get(BKT_NO_COLOR).is_none()
}

/// Run `command` through the shell with `arg` appended as `$1`, so commands
/// such as `code --wait` keep their own arguments.
pub(crate) fn shell_command(command: &str, arg: &str) -> std::process::Command {
    if cfg!(windows) {
        let mut cmd = std::process::Command::new("cmd");
        cmd.args(["/C", &format!("{command} \"{arg}\"")]);
        cmd
    } else {
        let mut cmd = std::process::Command::new("sh");
        cmd.args(["-c", &format!("{command} \"$1\""), "sh", arg]);
        cmd
    }
}
