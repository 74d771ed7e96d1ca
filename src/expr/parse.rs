use std::fmt::Display;

use crate::expr::lex::{Lexer, Token};
use crate::types::ast;
use crate::types::ast::{BinaryOp, UnaryOp};
use crate::types::span::Span;
use crate::{Error, Result, Value};

/// A parser that constructs an AST from a token stream.
///
/// The parser is a hand written precedence climbing parser. It sometimes
/// needs to peek at the next token to know how to proceed and uses the
/// `peeked` buffer to do this.
pub struct Parser<'source> {
    /// A lexer that tokenizes the expression source.
    tokens: Lexer<'source>,

    /// Remember a peeked value, even if it was `None`
    peeked: Option<Option<(Token, Span)>>,

    /// The depth of the expression tree being built.
    depth: usize,
}

/// The maximum depth of the expression tree.
const MAX_DEPTH: usize = 256;

/// A word with a special meaning, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    And,
    Or,
    Not,
    True,
    False,
}

impl<'source> Parser<'source> {
    /// Construct a new parser.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: Lexer::new(source),
            peeked: None,
            depth: 0,
        }
    }

    /// Parses the entire source as a single expression.
    pub fn parse_all(mut self) -> Result<ast::Expr> {
        let expr = self.parse_expr(0)?;
        match self.next()? {
            None => Ok(expr),
            Some((tk, span)) => Err(self.err_unexpected_token("operator", tk, span)),
        }
    }

    /// Parses binary operations that bind at least as tightly as `min`.
    ///
    /// All binary operators are left associative.
    fn parse_expr(&mut self, min: u8) -> Result<ast::Expr> {
        let depth = self.depth;
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.peek_binary_op()? {
            let precedence = op.precedence();
            if precedence < min {
                break;
            }
            let (_, span) = self.parse()?;
            // Each operator in a chain nests the left hand side one deeper.
            self.enter(span)?;
            let rhs = self.parse_expr(precedence + 1)?;
            let span = lhs.span().combine(rhs.span());
            lhs = ast::Expr::Binary(ast::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            });
        }
        self.depth = depth;
        Ok(lhs)
    }

    /// Parses a prefix operator applied to an expression, or a primary
    /// expression.
    fn parse_unary(&mut self) -> Result<ast::Expr> {
        let (op, span) = match self.peek()? {
            Some((Token::Bang, span)) => (UnaryOp::Not, span),
            Some((Token::Minus, span)) => (UnaryOp::Neg, span),
            Some((Token::Ident, span)) if self.keyword(span) == Some(Keyword::Not) => {
                (UnaryOp::Not, span)
            }
            _ => return self.parse_primary(),
        };
        self.next()?;
        self.enter(span)?;
        let expr = self.parse_unary()?;
        self.depth -= 1;
        let span = span.combine(expr.span());
        Ok(ast::Expr::Unary(ast::Unary {
            op,
            expr: Box::new(expr),
            span,
        }))
    }

    /// Parses a literal or a parenthesized expression.
    fn parse_primary(&mut self) -> Result<ast::Expr> {
        let (tk, span) = self.parse()?;
        let value = match tk {
            Token::OpenParen => {
                self.enter(span)?;
                let expr = self.parse_expr(0)?;
                self.depth -= 1;
                self.expect(Token::CloseParen)?;
                return Ok(expr);
            }
            Token::Number => self.parse_number(span)?,
            Token::String => Value::String(self.parse_string(span)?),
            Token::Ident => match self.keyword(span) {
                Some(Keyword::True) => Value::Bool(true),
                Some(Keyword::False) => Value::Bool(false),
                Some(kw) => {
                    return Err(Error::expression(
                        format!("unexpected keyword `{}`", kw.human()),
                        self.source(),
                        span,
                    ));
                }
                None => {
                    return Err(Error::expression(
                        "unknown identifier",
                        self.source(),
                        span,
                    ));
                }
            },
            tk => return Err(self.err_unexpected_token("expression", tk, span)),
        };
        Ok(ast::Expr::Literal(ast::Literal { value, span }))
    }

    /// Parses an integer or a float.
    fn parse_number(&self, span: Span) -> Result<Value> {
        let raw = &self.source()[span];
        if raw.contains(['.', 'e', 'E']) {
            let float = raw
                .parse()
                .map_err(|_| Error::expression("invalid float literal", self.source(), span))?;
            Ok(Value::Float(float))
        } else {
            let int = raw.parse().map_err(|_| {
                Error::expression(
                    "integer literal out of range for 64-bit integer",
                    self.source(),
                    span,
                )
            })?;
            Ok(Value::Integer(int))
        }
    }

    /// Parses a string and handles escape characters.
    fn parse_string(&self, span: Span) -> Result<String> {
        let raw = &self.source()[span];
        let inner = &raw[1..raw.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }

        let mut iter = inner.char_indices().map(|(i, c)| (span.m + 1 + i, c));
        let mut string = String::with_capacity(inner.len());
        while let Some((i, c)) = iter.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            // The lexer guarantees that a backslash is never the last
            // character before the closing quote.
            let esc = match iter.next() {
                Some((_, esc)) => esc,
                None => unreachable!("escape at end of string"),
            };
            let c = match esc {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                '\\' => '\\',
                '"' => '"',
                '\'' => '\'',
                _ => {
                    let j = i + 1 + esc.len_utf8();
                    return Err(Error::expression(
                        "unknown escape character",
                        self.source(),
                        i..j,
                    ));
                }
            };
            string.push(c);
        }
        Ok(string)
    }

    /// Returns the binary operator that is next in the stream, if any.
    fn peek_binary_op(&mut self) -> Result<Option<BinaryOp>> {
        let op = match self.peek()? {
            Some((Token::PipePipe, _)) => BinaryOp::Or,
            Some((Token::AmpAmp, _)) => BinaryOp::And,
            Some((Token::Eq, _)) => BinaryOp::Eq,
            Some((Token::Ne, _)) => BinaryOp::Ne,
            Some((Token::Lt, _)) => BinaryOp::Lt,
            Some((Token::Le, _)) => BinaryOp::Le,
            Some((Token::Gt, _)) => BinaryOp::Gt,
            Some((Token::Ge, _)) => BinaryOp::Ge,
            Some((Token::Plus, _)) => BinaryOp::Add,
            Some((Token::Minus, _)) => BinaryOp::Sub,
            Some((Token::Star, _)) => BinaryOp::Mul,
            Some((Token::Slash, _)) => BinaryOp::Div,
            Some((Token::Percent, _)) => BinaryOp::Rem,
            Some((Token::Ident, span)) => match self.keyword(span) {
                Some(Keyword::Or) => BinaryOp::Or,
                Some(Keyword::And) => BinaryOp::And,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    /// Returns the keyword for the identifier at `span`, if it is one.
    fn keyword(&self, span: Span) -> Option<Keyword> {
        let ident = &self.source()[span];
        Keyword::all()
            .iter()
            .copied()
            .find(|kw| kw.human().eq_ignore_ascii_case(ident))
    }

    /// Parses any token.
    fn parse(&mut self) -> Result<(Token, Span)> {
        match self.next()? {
            Some((tk, sp)) => Ok((tk, sp)),
            None => Err(self.err_unexpected_eof("expression")),
        }
    }

    /// Parses the specified token and returns its span.
    fn expect(&mut self, exp: Token) -> Result<Span> {
        match self.next()? {
            Some((tk, span)) if tk == exp => Ok(span),
            Some((tk, span)) => Err(self.err_unexpected_token(exp.human(), tk, span)),
            None => Err(self.err_unexpected_eof(exp.human())),
        }
    }

    /// Returns a copy of the next token without affecting the result of the
    /// following `.next()` call.
    fn peek(&mut self) -> Result<Option<(Token, Span)>> {
        if let o @ None = &mut self.peeked {
            *o = Some(self.tokens.next()?);
        }
        Ok(self.peeked.flatten())
    }

    /// Returns the next token and span in the stream.
    fn next(&mut self) -> Result<Option<(Token, Span)>> {
        match self.peeked.take() {
            Some(v) => Ok(v),
            None => self.tokens.next(),
        }
    }

    /// Descends one level into the expression tree.
    fn enter(&mut self, span: Span) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::expression(
                format!("expression nested more than {MAX_DEPTH} levels deep"),
                self.source(),
                span,
            ));
        }
        Ok(())
    }

    fn source(&self) -> &'source str {
        self.tokens.source
    }

    fn err_unexpected_eof(&self, exp: impl Display) -> Error {
        let n = self.source().len();
        Error::expression(format!("expected {exp}, found EOF"), self.source(), n..n)
    }

    fn err_unexpected_token(&self, exp: impl Display, got: Token, span: Span) -> Error {
        let got = got.human();
        Error::expression(format!("expected {exp}, found {got}"), self.source(), span)
    }
}

impl Keyword {
    const fn all() -> &'static [Keyword] {
        &[Self::And, Self::Or, Self::Not, Self::True, Self::False]
    }

    const fn human(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::True => "true",
            Self::False => "false",
        }
    }
}

impl BinaryOp {
    /// Returns the binding power of the operator, higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_precedence() {
        assert_eq!(sexpr("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(sexpr("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(sexpr("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(
            sexpr("1 < 2 and 3 > 4 or true"),
            "(|| (&& (< 1 2) (> 3 4)) true)"
        );
        assert_eq!(sexpr("1 = 2 <> 3"), "(!= (== 1 2) 3)");
    }

    #[test]
    fn parse_unary() {
        assert_eq!(sexpr("!true"), "(! true)");
        assert_eq!(sexpr("NOT not false"), "(! (! false))");
        assert_eq!(sexpr("-1 + 2"), "(+ (- 1) 2)");
        assert_eq!(sexpr("- -1"), "(- (- 1))");
    }

    #[test]
    fn parse_literals() {
        assert_eq!(sexpr("TRUE"), "true");
        assert_eq!(sexpr("1.5e1"), "15");
        assert_eq!(sexpr(r#""a\tb""#), "\"a\\tb\"");
        assert_eq!(sexpr(r"'it\'s'"), "\"it's\"");
    }

    #[test]
    fn parse_err_unknown_identifier() {
        let err = Parser::new("$foo < 10").parse_all().unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | $foo < 10
   | ^^^^ unknown identifier
"
        );
    }

    #[test]
    fn parse_err_eof() {
        let err = Parser::new("1 <").parse_all().unwrap_err();
        assert_eq!(err.message(), "expected expression, found EOF");
        assert_eq!(err.to_string(), "expected expression, found EOF between bytes 3 and 3");
    }

    #[test]
    fn parse_err_trailing_token() {
        let err = Parser::new("1 2").parse_all().unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | 1 2
   |   ^ expected operator, found number
"
        );
    }

    #[test]
    fn parse_err_unclosed_paren() {
        let err = Parser::new("(1 + 2").parse_all().unwrap_err();
        assert_eq!(err.message(), "expected close parenthesis, found EOF");
    }

    #[test]
    fn parse_err_unknown_escape() {
        let err = Parser::new(r#""a\qb""#).parse_all().unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            r#"
   |
 1 | "a\qb"
   |   ^^ unknown escape character
"#
        );
    }

    #[test]
    fn parse_err_integer_overflow() {
        let err = Parser::new("9223372036854775808").parse_all().unwrap_err();
        assert_eq!(
            err.message(),
            "integer literal out of range for 64-bit integer"
        );
    }

    #[test]
    fn parse_nesting_within_limit() {
        let source = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(sexpr(&source), "1");
        let source = format!("{}true", "!".repeat(MAX_DEPTH));
        assert!(Parser::new(&source).parse_all().is_ok());
    }

    #[test]
    fn parse_err_nested_too_deep() {
        let msg = "expression nested more than 256 levels deep";

        let source = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let err = Parser::new(&source).parse_all().unwrap_err();
        assert_eq!(err.message(), msg);
        assert_eq!(err.to_string(), format!("{msg} between bytes 256 and 257"));

        let source = format!("{}true", "!".repeat(100_000));
        let err = Parser::new(&source).parse_all().unwrap_err();
        assert_eq!(err.message(), msg);

        let source = format!("1{}", " + 1".repeat(100_000));
        let err = Parser::new(&source).parse_all().unwrap_err();
        assert_eq!(err.message(), msg);
    }

    /// Renders the AST as an s-expression.
    fn sexpr(source: &str) -> String {
        fn fmt(expr: &ast::Expr) -> String {
            match expr {
                ast::Expr::Literal(lit) => match &lit.value {
                    Value::String(s) => format!("{s:?}"),
                    v => v.to_string(),
                },
                ast::Expr::Unary(u) => {
                    let op = match u.op {
                        UnaryOp::Not => "!",
                        UnaryOp::Neg => "-",
                    };
                    format!("({op} {})", fmt(&u.expr))
                }
                ast::Expr::Binary(b) => {
                    format!("({} {} {})", b.op.human(), fmt(&b.lhs), fmt(&b.rhs))
                }
            }
        }
        fmt(&Parser::new(source).parse_all().unwrap())
    }
}
