use crate::types::span::Span;
use crate::{Error, Result};

/// A lexer that tokenizes a condition expression.
///
/// The lexer is implemented as a fallible iterator. The parser should
/// repeatedly call the [`.next()?`][Lexer::next] method to return the next
/// non-whitespace token until [`None`] is returned.
#[derive(Debug)]
pub struct Lexer<'source> {
    /// The original expression source.
    pub source: &'source str,

    /// A cursor over the expression source.
    cursor: usize,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `||`
    PipePipe,
    /// `&&`
    AmpAmp,
    /// `==` or `=`
    Eq,
    /// `!=` or `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// Sequence of whitespace characters
    Whitespace,
    /// A word like `true`, `and` or `not`, or any other identifier
    Ident,
    /// An integer or float literal, e.g. `19`, `0.5` or `1e3`.
    Number,
    /// A string literal, e.g. `"Hello World!\n"` or `'it\'s'`.
    String,
}

impl<'source> Lexer<'source> {
    /// Construct a new lexer.
    pub fn new(source: &'source str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Returns the next non-whitespace token and its span.
    pub fn next(&mut self) -> Result<Option<(Token, Span)>> {
        loop {
            match self.lex()? {
                Some((tk, sp)) if !tk.is_whitespace() => return Ok(Some((tk, sp))),
                None => return Ok(None),
                _ => continue,
            }
        }
    }

    /// Returns the next token and span.
    fn lex(&mut self) -> Result<Option<(Token, Span)>> {
        let i = self.cursor;

        // We iterate over chars because that is nicer than operating on raw
        // bytes. The map call here fixes the index to be relative to the
        // actual expression source.
        let mut iter = self.source[i..].char_indices().map(|(d, c)| (i + d, c));

        let c = match iter.next() {
            Some((_, c)) => c,
            None => return Ok(None),
        };

        let (tk, j) = match c {
            // Single character to token mappings.
            '(' => (Token::OpenParen, i + 1),
            ')' => (Token::CloseParen, i + 1),
            '+' => (Token::Plus, i + 1),
            '-' => (Token::Minus, i + 1),
            '*' => (Token::Star, i + 1),
            '/' => (Token::Slash, i + 1),
            '%' => (Token::Percent, i + 1),

            // Tokens that may be followed by a second character.
            '|' => self.lex_pair(iter, i, '|', Token::PipePipe, None)?,
            '&' => self.lex_pair(iter, i, '&', Token::AmpAmp, None)?,
            '=' => self.lex_pair(iter, i, '=', Token::Eq, Some(Token::Eq))?,
            '!' => self.lex_pair(iter, i, '=', Token::Ne, Some(Token::Bang))?,
            '>' => self.lex_pair(iter, i, '=', Token::Ge, Some(Token::Gt))?,
            '<' => match iter.next() {
                Some((_, '=')) => (Token::Le, i + 2),
                Some((_, '>')) => (Token::Ne, i + 2),
                _ => (Token::Lt, i + 1),
            },

            // Multi-character tokens with a distinct start character.
            '"' | '\'' => self.lex_string(iter, i, c)?,
            c if c.is_ascii_digit() => (Token::Number, self.lex_number(i)),
            c if c.is_whitespace() => self.lex_whitespace(iter),
            c if is_ident_start(c) => (Token::Ident, self.lex_while(iter, is_ident)),

            // Any other character...
            _ => {
                return Err(self.err_unexpected_character(i..(i + c.len_utf8())));
            }
        };

        // Finally, we need to update the cursor.
        self.cursor = j;

        Ok(Some((tk, Span::from(i..j))))
    }

    /// Lexes a token made up of the current character followed by `second`,
    /// or just the current character if `single` is given.
    fn lex_pair<I>(
        &mut self,
        mut iter: I,
        i: usize,
        second: char,
        double: Token,
        single: Option<Token>,
    ) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        match (iter.next(), single) {
            (Some((_, c)), _) if c == second => Ok((double, i + 2)),
            (_, Some(tk)) => Ok((tk, i + 1)),
            (Some((j, c)), None) => Err(self.err_unexpected_character(i..j + c.len_utf8())),
            (None, None) => Err(self.err_unexpected_character(i..self.source.len())),
        }
    }

    fn lex_string<I>(&mut self, mut iter: I, i: usize, quote: char) -> Result<(Token, usize)>
    where
        I: Iterator<Item = (usize, char)>,
    {
        loop {
            match iter.next() {
                None => {
                    return Err(self.err_undelimited_string(i..self.source.len()));
                }
                Some((_, '\\')) => {
                    // Skip the escaped character, it is validated by the
                    // parser.
                    iter.next();
                }
                Some((j, c)) if c == quote => {
                    return Ok((Token::String, j + 1));
                }
                Some(_) => {}
            }
        }
    }

    /// Lexes an integer or float starting at `i`.
    ///
    /// Only ASCII is matched so we can operate on bytes.
    fn lex_number(&self, i: usize) -> usize {
        let bytes = self.source.as_bytes();
        let is_digit = |j: usize| bytes.get(j).map_or(false, u8::is_ascii_digit);
        let digits = |mut j: usize| {
            while is_digit(j) {
                j += 1;
            }
            j
        };

        // ddd.ddde+ddd
        // ^  ^   ^ ^
        // i  j   j k
        let mut j = digits(i);
        if bytes.get(j) == Some(&b'.') && is_digit(j + 1) {
            j = digits(j + 1);
        }
        if matches!(bytes.get(j), Some(b'e' | b'E')) {
            let k = match bytes.get(j + 1) {
                Some(b'+' | b'-') => j + 2,
                _ => j + 1,
            };
            if is_digit(k) {
                j = digits(k);
            }
        }
        j
    }

    fn lex_whitespace<I>(&mut self, iter: I) -> (Token, usize)
    where
        I: Iterator<Item = (usize, char)> + Clone,
    {
        (Token::Whitespace, self.lex_while(iter, char::is_whitespace))
    }

    fn lex_while<I, P>(&mut self, mut iter: I, pred: P) -> usize
    where
        I: Iterator<Item = (usize, char)> + Clone,
        P: Fn(char) -> bool,
    {
        loop {
            match iter.clone().next() {
                Some((_, c)) if pred(c) => {
                    iter.next();
                }
                Some((j, _)) => return j,
                None => return self.source.len(),
            }
        }
    }

    fn err_unexpected_character(&self, span: impl Into<Span>) -> Error {
        Error::expression("unexpected character", self.source, span)
    }

    fn err_undelimited_string(&self, span: impl Into<Span>) -> Error {
        Error::expression("undelimited string", self.source, span)
    }
}

impl Token {
    pub fn human(&self) -> &'static str {
        match self {
            Self::OpenParen => "open parenthesis",
            Self::CloseParen => "close parenthesis",
            Self::PipePipe => "`||`",
            Self::AmpAmp => "`&&`",
            Self::Eq => "`==`",
            Self::Ne => "`!=`",
            Self::Lt => "`<`",
            Self::Le => "`<=`",
            Self::Gt => "`>`",
            Self::Ge => "`>=`",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::Bang => "`!`",
            Self::Whitespace => "whitespace",
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }
}

#[cfg(feature = "unicode")]
fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
fn is_ident(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_' | '$')
}

#[cfg(not(feature = "unicode"))]
fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_')
}
