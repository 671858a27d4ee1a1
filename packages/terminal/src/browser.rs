//! Web browser launching.

use bkt_config::{BKT_BROWSER, BROWSER, Environment};

use crate::{TerminalError, shell_command};

/// How URLs are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browser {
    /// A user-chosen command.
    Command(String),
    /// The platform opener (`open`, `xdg-open`, `start`).
    System,
}

impl Browser {
    /// `BKT_BROWSER`, then `BROWSER`, then the configured browser, then the
    /// platform opener.
    #[must_use]
    pub fn resolve(env: &Environment, configured: Option<&str>) -> Self {
        env.first_of(&[BKT_BROWSER, BROWSER])
            .or_else(|| configured.filter(|c| !c.is_empty()))
            .map_or(Self::System, |command| Self::Command(command.to_string()))
    }

    /// Open `url` and wait for the launcher to exit.
    ///
    /// # Errors
    ///
    /// * [`TerminalError::CommandFailed`] if the launcher cannot be started
    ///   or exits non-zero.
    pub fn open(&self, url: &str) -> Result<(), TerminalError> {
        let (program, mut command) = match self {
            Self::Command(cmd) => (cmd.clone(), shell_command(cmd, url)),
            Self::System => system_opener(url),
        };
        log::debug!("Opening {url} with {program}");

        let status = command.status().map_err(|e| TerminalError::CommandFailed {
            program: program.clone(),
            message: e.to_string(),
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(TerminalError::CommandFailed {
                program,
                message: format!("exited with {status}"),
            })
        }
    }
}

fn system_opener(url: &str) -> (String, std::process::Command) {
    let program = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "cmd"
    } else {
        "xdg-open"
    };

    let mut command = std::process::Command::new(program);
    if cfg!(windows) {
        command.args(["/C", "start", "", url]);
    } else {
        command.arg(url);
    }
    (program.to_string(), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order() {
        let env = Environment::from_pairs([(BKT_BROWSER, "firefox"), (BROWSER, "chromium")]);
        assert_eq!(
            Browser::resolve(&env, Some("lynx")),
            Browser::Command("firefox".to_string())
        );

        let env = Environment::from_pairs([(BROWSER, "chromium")]);
        assert_eq!(
            Browser::resolve(&env, Some("lynx")),
            Browser::Command("chromium".to_string())
        );

        assert_eq!(
            Browser::resolve(&Environment::default(), Some("lynx")),
            Browser::Command("lynx".to_string())
        );
        assert_eq!(Browser::resolve(&Environment::default(), None), Browser::System);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_url() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("url.txt");
        let browser = Browser::Command(format!("printf '%s' > '{}'", out.display()));

        // The URL lands as $1 after the redirect target, so printf sees it as
        // its argument.
        browser.open("https://bitbucket.org/acme/widgets").unwrap();
        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            "https://bitbucket.org/acme/widgets"
        );
    }
}
