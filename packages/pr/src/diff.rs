use std::fmt::Write;

use anstyle::{AnsiColor, Color, Style};

use crate::{Outcome, PrError, PrOperations};

const FILE_HEADER: Style = Style::new().bold();
const ADDED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const REMOVED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
const HUNK: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
const DIFF_LINE: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Blue)));

fn line_style(line: &str) -> Option<Style> {
    if line.starts_with("+++") || line.starts_with("---") {
        Some(FILE_HEADER)
    } else if line.starts_with('+') {
        Some(ADDED)
    } else if line.starts_with('-') {
        Some(REMOVED)
    } else if line.starts_with("@@") {
        Some(HUNK)
    } else if line.starts_with("diff ") {
        Some(DIFF_LINE)
    } else {
        None
    }
}

/// Colour a unified diff line by line according to its prefix.
#[must_use]
pub fn colorize_diff(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len() + diff.len() / 4);
    for line in diff.split_inclusive('\n') {
        let (text, newline) = line
            .strip_suffix('\n')
            .map_or((line, ""), |text| (text, "\n"));
        match line_style(text) {
            Some(style) => {
                let _ = write!(out, "{style}{text}{style:#}{newline}");
            }
            None => out.push_str(line),
        }
    }
    out
}

impl PrOperations<'_> {
    /// The unified diff of a pull request, uncoloured.
    ///
    /// # Errors
    ///
    /// Any selector resolution or service error.
    pub async fn diff(&self, selector: Option<&str>) -> Result<Outcome<String>, PrError> {
        let id = self.resolve(selector).await?;
        let pr = self.client.get_pull_request(self.repo, id).await?;
        let diff = self
            .client
            .get_pull_request_diff(self.repo, id, pr.links.diff_href())
            .await?;
        Ok(Outcome::new(diff))
    }
}
