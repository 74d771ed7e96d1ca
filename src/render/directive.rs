use crate::types::span::Span;

/// A classified template line.
///
/// The spans refer to the parenthesized text of the directive, relative to
/// the start of the trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `#set ($name = "value")`
    Set(Span),
    /// `#if (cond)`
    If(Span),
    /// `#elseif (cond)`
    ElseIf(Span),
    /// `#else`
    Else,
    /// `#end`
    End,
    /// A directive that is recognized but not supported, it is passed
    /// through as content.
    Unsupported(&'static str),
    /// Anything else.
    Content,
}

const SET: &str = "#set (";
const IF: &str = "#if (";
const ELSE_IF: &str = "#elseif (";
const ELSE: &str = "#else";
const END: &str = "#end";

const UNSUPPORTED: &[&str] = &[
    "#foreach", "#include", "#parse", "#evaluate", "#break", "#stop", "#macro", "#define",
];

impl Directive {
    /// Classifies a line that has already had its trailing whitespace,
    /// including the line terminator, removed.
    ///
    /// Directives must begin at the very start of the line and must fit on
    /// one line. The parenthesized text is taken verbatim between the fixed
    /// prefix and the final `)`, parentheses are not balanced.
    pub fn classify(trimmed: &str) -> Self {
        if let Some(span) = parenthesized(trimmed, SET) {
            Self::Set(span)
        } else if let Some(span) = parenthesized(trimmed, IF) {
            Self::If(span)
        } else if let Some(span) = parenthesized(trimmed, ELSE_IF) {
            Self::ElseIf(span)
        } else if trimmed.starts_with(ELSE) {
            Self::Else
        } else if trimmed.starts_with(END) {
            Self::End
        } else if let Some(name) = UNSUPPORTED.iter().find(|d| trimmed.starts_with(**d)) {
            Self::Unsupported(*name)
        } else {
            Self::Content
        }
    }

    pub fn human(&self) -> &'static str {
        match self {
            Self::Set(_) => "#set",
            Self::If(_) => "#if",
            Self::ElseIf(_) => "#elseif",
            Self::Else => "#else",
            Self::End => "#end",
            Self::Unsupported(name) => *name,
            Self::Content => "content",
        }
    }
}

/// Returns the span between `prefix` and a final `)`.
fn parenthesized(trimmed: &str, prefix: &str) -> Option<Span> {
    if trimmed.starts_with(prefix) && trimmed.ends_with(')') {
        Some(Span::from(prefix.len()..trimmed.len() - 1))
    } else {
        None
    }
}
