use std::path::{Path, PathBuf};

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    lexer::prelude::LexicalError,
    parser::prelude::ParseError,
    resolver::prelude::LexiconError,
    utils::prelude::SrcSpan,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to tokenize source code")]
    Lex {
        path: PathBuf,
        src: String,
        error: LexicalError
    },
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("evaluation failed")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("failed to load lexicon: {error}")]
    Lexicon {
        path: PathBuf,
        error: LexiconError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    /// Display name and message, e.g. `("Invalid Syntax", "Expected ')'")`.
    pub fn details(&self) -> (&'static str, String) {
        match self {
            Error::Lex { error, .. } => error.details(),
            Error::Parse { error, .. } => error.details(),
            Error::Runtime { error, .. } => error.details(),
            Error::Lexicon { error, .. } => ("Lexicon Error", error.to_string()),
            Error::StdIo { err } => ("IO Error", err.to_string()),
        }
    }

    /// The plain text report: optional traceback, `Kind: details`, the file
    /// and line, then the offending source lines with carets underneath.
    pub fn render(&self) -> String {
        let (name, details) = self.details();

        let (path, src, span) = match self {
            Error::Lex { path, src, error } => (path, src, error.location),
            Error::Parse { path, src, error } => (path, src, error.span),
            Error::Runtime { path, src, error } => (path, src, error.location),
            Error::Lexicon { path, .. } => {
                return format!("{name}: {details}\nFile {}", path.display())
            },
            Error::StdIo { .. } => return format!("{name}: {details}"),
        };

        let traceback = match self {
            Error::Runtime { path, error, .. } => traceback(path, error),
            _ => String::new(),
        };

        format!(
            "{traceback}{name}: {details}\nFile {}, line {}\n\n{}",
            path.display(),
            span.start.line + 1,
            string_with_arrows(src, span)
        )
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            // an in-memory buffer only fails on codespan range errors, which
            // the clamped labels rule out
            let _ = diagnostic.write(buf);
            let _ = writeln!(buf);
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic<'_>> {
        let (name, details) = self.details();

        match self {
            Error::Lex { path, src, error } => {
                vec![located(name, details, path, src, error.location, None)]
            },
            Error::Parse { path, src, error } => {
                vec![located(name, details, path, src, error.span, None)]
            },
            Error::Runtime { path, src, error } => {
                let text = traceback(path, error);
                let mut diagnostic = located(name, details, path, src, error.location, Some(text));

                if let Some(location) = &mut diagnostic.location {
                    // the call sites that led here
                    location.extra_labels = error.context.frames(error.location)
                        .into_iter()
                        .skip(1)
                        .map(|(frame, span)| Label {
                            text: Some(format!("in {frame}")),
                            span,
                        })
                        .collect();
                }

                vec![diagnostic]
            },
            Error::Lexicon { path, error } => {
                vec![Diagnostic {
                    title: name.into(),
                    text: format!("{}: {error}", path.display()),
                    level: Level::Error,
                    location: None,
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::StdIo { err: value.kind() }
    }
}

fn located<'a>(
    name: &str,
    details: String,
    path: &Path,
    src: &'a str,
    span: SrcSpan,
    text: Option<String>,
) -> Diagnostic<'a> {
    Diagnostic {
        title: name.into(),
        text: text.unwrap_or_default(),
        level: Level::Error,
        location: Some(Location {
            src,
            path: path.to_path_buf(),
            label: Label {
                text: Some(details),
                span,
            },
            extra_labels: vec![],
        }),
    }
}

/// `Traceback (most recent call last):` followed by one line per frame, the
/// outermost first.
pub fn traceback(path: &Path, error: &RuntimeError) -> String {
    let frames = error.context.frames(error.location)
        .into_iter()
        .rev()
        .map(|(frame, span)| format!(
            "  File {}, line {}, in {frame}\n",
            path.display(),
            span.start.line + 1
        ))
        .collect::<String>();

    format!("Traceback (most recent call last):\n{frames}")
}

/// Each source line the span touches, followed by a row of carets under the
/// columns the span covers. Tabs are dropped from the output.
pub fn string_with_arrows(src: &str, span: SrcSpan) -> String {
    let lines = src.split('\n').collect::<Vec<&str>>();
    let first = span.start.line as usize;
    let last = (span.end.line as usize).max(first);

    let mut rendered = vec![];

    for line_no in first..=last {
        let line = lines.get(line_no).copied().unwrap_or_default();
        let line = line.strip_suffix('\r').unwrap_or(line);
        let width = line.chars().count();

        let col_start = if line_no == first { span.start.column as usize } else { 0 };
        let col_end = if line_no == last { span.end.column as usize } else { width };

        rendered.push(format!(
            "{line}\n{}{}",
            " ".repeat(col_start),
            "^".repeat(col_end.saturating_sub(col_start))
        ));
    }

    rendered.join("\n").replace('\t', "")
}
