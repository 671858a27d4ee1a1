//! Human-readable and JSON rendering.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use anstyle::{AnsiColor, Color, Style};
use bkt_bitbucket::models::{Project, PullRequest};
use serde::Serialize;

const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
const HEADER: Style = Style::new().bold();

/// The process's output streams.
pub struct Io {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    pub stdout_is_terminal: bool,
    pub stderr_is_terminal: bool,
}

impl Io {
    #[must_use]
    pub fn system() -> Self {
        Self {
            stdout_is_terminal: io::stdout().is_terminal(),
            stderr_is_terminal: io::stderr().is_terminal(),
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
        }
    }

    /// Streams that are never terminals.
    #[must_use]
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            out,
            err,
            stdout_is_terminal: false,
            stderr_is_terminal: false,
        }
    }

    pub fn printer(&mut self, color_out: bool, color_err: bool) -> Printer<'_> {
        Printer {
            out: self.out.as_mut(),
            err: self.err.as_mut(),
            color_out,
            color_err,
        }
    }
}

/// Writes command results to stdout and diagnostics to stderr.
pub struct Printer<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    color_out: bool,
    color_err: bool,
}

impl Printer<'_> {
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub const fn color_out(&self) -> bool {
        self.color_out
    }

    /// # Errors
    ///
    /// If stdout cannot be written.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    /// # Errors
    ///
    /// If stdout cannot be written.
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        if self.color_out {
            writeln!(self.out, "{SUCCESS}✓{SUCCESS:#} {message}")
        } else {
            writeln!(self.out, "✓ {message}")
        }
    }

    /// # Errors
    ///
    /// If stderr cannot be written.
    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        if self.color_err {
            writeln!(self.err, "{WARNING}!{WARNING:#} {message}")
        } else {
            writeln!(self.err, "! {message}")
        }
    }

    /// # Errors
    ///
    /// If stderr cannot be written.
    pub fn warnings(&mut self, warnings: &[String]) -> io::Result<()> {
        warnings.iter().try_for_each(|warning| self.warning(warning))
    }

    /// Informational text that is not part of the result.
    ///
    /// # Errors
    ///
    /// If stderr cannot be written.
    pub fn note(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.err, "{message}")
    }

    /// Compact JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// If stdout cannot be written.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut *self.out, value)?;
        writeln!(self.out)
    }

    /// # Errors
    ///
    /// If stdout cannot be written.
    pub fn table(&mut self, table: &Table) -> io::Result<()> {
        self.out.write_all(table.render(self.color_out).as_bytes())
    }

    /// # Errors
    ///
    /// If stderr cannot be written.
    pub fn error(&mut self, error: &anyhow::Error) -> io::Result<()> {
        write_error(&mut *self.err, self.color_err, error)
    }
}

/// `✗ message` in red, or `error: message` without colour.
///
/// # Errors
///
/// If `w` cannot be written.
pub fn write_error(w: &mut dyn Write, color: bool, error: &anyhow::Error) -> io::Result<()> {
    let message = error_chain(error);
    if color {
        writeln!(w, "{ERROR}✗ {message}{ERROR:#}")
    } else {
        writeln!(w, "error: {message}")
    }
}

/// The error chain on one line. Causes already quoted by the message above
/// them are skipped.
#[must_use]
pub fn error_chain(error: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in error.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

/// Left-aligned columns separated by two spaces.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub const fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(ToString::to_string).collect();
        let header = render_row(&header, &widths);
        if color {
            let _ = writeln!(out, "{HEADER}{header}{HEADER:#}");
        } else {
            let _ = writeln!(out, "{header}");
        }
        for row in &self.rows {
            let _ = writeln!(out, "{}", render_row(row, &widths));
        }
        out
    }
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i == last {
            line.push_str(cell);
        } else {
            let width = widths.get(i).copied().unwrap_or_default();
            let _ = write!(line, "{cell:<width$}  ");
        }
    }
    line.trim_end().to_string()
}

/// The `pr view` record.
#[must_use]
pub fn pull_request_record(pr: &PullRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title: {}", pr.title);
    let _ = writeln!(out, "Number: #{}", pr.id);
    let _ = writeln!(out, "State: {}", pr.state);
    if let Some(author) = &pr.author {
        let _ = writeln!(out, "Author: {}", author.name());
    }
    let _ = writeln!(
        out,
        "Branch: {} → {}",
        pr.source_branch(),
        pr.destination_branch()
    );
    if !pr.reviewers.is_empty() {
        let names: Vec<&str> = pr.reviewers.iter().map(|r| r.name()).collect();
        let _ = writeln!(out, "Reviewers: {}", names.join(", "));
    }
    let approvals: Vec<&str> = pr
        .approvals()
        .filter_map(|p| p.user.as_ref().map(|u| u.name()))
        .collect();
    if !approvals.is_empty() {
        let _ = writeln!(out, "Approved by: {}", approvals.join(", "));
    }
    let _ = writeln!(out, "Comments: {}", pr.comment_count);
    if let Some(updated) = pr.updated_on {
        let _ = writeln!(out, "Updated: {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(url) = pr.links.html_href() {
        let _ = writeln!(out, "URL: {url}");
    }
    if !pr.description.trim().is_empty() {
        let _ = write!(out, "\n{}\n", pr.description.trim_end());
    }
    out
}

/// The `project view` record.
#[must_use]
pub fn project_record(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Key: {}", project.key);
    let _ = writeln!(out, "Name: {}", project.name);
    let _ = writeln!(
        out,
        "Visibility: {}",
        if project.is_private { "private" } else { "public" }
    );
    if !project.description.is_empty() {
        let _ = writeln!(out, "Description: {}", project.description);
    }
    if let Some(url) = project.links.html_href() {
        let _ = writeln!(out, "URL: {url}");
    }
    out
}

#[cfg(test)]
pub mod capture {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    /// A shared in-memory stream.
    #[derive(Debug, Clone, Default)]
    pub struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Capture {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl super::Io {
        /// Non-terminal streams and handles to read back stdout and stderr.
        pub fn captured() -> (Self, Capture, Capture) {
            let (out, err) = (Capture::default(), Capture::default());
            (
                Self::new(Box::new(out.clone()), Box::new(err.clone())),
                out,
                err,
            )
        }
    }
}
