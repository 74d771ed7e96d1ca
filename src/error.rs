use std::cmp::{max, min};
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::types::span::Span;

/// An error that can occur while processing a template.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    location: Option<Location>,
    source: Option<Arc<io::Error>>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A malformed or misplaced directive, e.g. a `#set` without exactly one
    /// `=`, an `#else` outside of an `#if` block, or an `#end` with no open
    /// block.
    Directive,
    /// An `#if` or `#elseif` condition did not evaluate to a boolean.
    Condition,
    /// An expression could not be lexed, parsed or evaluated.
    Expression,
    /// Reading a template or writing the output failed.
    Io,
    /// Any other error, e.g. one returned by a custom evaluator.
    Other,
}

/// Where in the source an error occurred.
#[derive(Clone)]
struct Location {
    /// The one-based line number, `None` for a standalone expression.
    line: Option<usize>,
    /// The offending line or expression, without its terminator.
    code: String,
    /// The region of `code` to underline.
    span: Span,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            location: None,
            source: None,
        }
    }

    fn located(kind: ErrorKind, msg: impl Into<String>, location: Location) -> Self {
        Self {
            location: Some(location),
            ..Self::new(kind, msg)
        }
    }

    /// Constructs a directive error for the given source line.
    pub(crate) fn directive(
        msg: impl Into<String>,
        line: usize,
        code: &str,
        span: impl Into<Span>,
    ) -> Self {
        Self::located(ErrorKind::Directive, msg, Location::line(line, code, span))
    }

    /// Constructs a condition error for the given source line.
    pub(crate) fn condition(
        msg: impl Into<String>,
        line: usize,
        code: &str,
        span: impl Into<Span>,
    ) -> Self {
        Self::located(ErrorKind::Condition, msg, Location::line(line, code, span))
    }

    /// Constructs an error for a standalone expression.
    pub(crate) fn expression(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::located(ErrorKind::Expression, msg, Location::new(None, source, span))
    }

    /// Returns the category of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the one-based line number at which the error occurred, if
    /// known.
    #[inline]
    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().and_then(|loc| loc.line)
    }

    /// Returns the error message without any location information.
    #[inline]
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl Location {
    fn new(line: Option<usize>, code: &str, span: impl Into<Span>) -> Self {
        let code = code.trim_end_matches(['\r', '\n']);
        // The span may point at the end of the source which could have been
        // trimmed away above.
        let span = span.into();
        let m = min(span.m, code.len());
        let n = min(max(span.n, m), code.len());
        Self {
            line,
            code: code.to_owned(),
            span: Span::from(m..n),
        }
    }

    fn line(line: usize, code: &str, span: impl Into<Span>) -> Self {
        Self::new(Some(line), code, span)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            source: Some(Arc::new(err)),
            ..Self::new(ErrorKind::Io, "io error")
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::new(ErrorKind::Other, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::new(ErrorKind::Other, msg)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::new(ErrorKind::Other, msg.to_string())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => fmt_pretty(&self.msg, loc, f),
            None => fmt::Display::fmt(self, f),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.location, &self.source) {
            (Some(loc), _) if f.alternate() => fmt_pretty(&self.msg, loc, f),
            (Some(Location { line: Some(n), .. }), _) => write!(f, "{} on line {}", self.msg, n),
            (Some(Location { span, .. }), _) => {
                write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)
            }
            (None, Some(err)) => write!(f, "{}: {}", self.msg, err),
            (None, None) => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, loc: &Location, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let code = loc.code.as_str();
    let col = width(&code[..loc.span.m]);
    let w = max(1, width(&code[loc.span]));

    let num = loc.line.unwrap_or(1).to_string();
    let pad = width(&num);
    let pipe = "|";
    let underline = "^".repeat(w);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + w,
        msg = msg
    )
}

#[cfg(feature = "unicode")]
fn width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn width(s: &str) -> usize {
    s.chars().count()
}
