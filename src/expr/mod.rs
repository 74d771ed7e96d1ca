//! The built-in condition expression language.

mod eval;
mod lex;
mod parse;

use crate::expr::parse::Parser;
use crate::{Result, Value};

/// Evaluate an expression.
///
/// This is the default evaluator used by an [`Engine`][crate::Engine] for
/// `#if` and `#elseif` conditions, after variables have been substituted.
///
/// The language supports the following, listed from loosest to tightest
/// binding:
///
/// - Logical or: `||`, `or`
/// - Logical and: `&&`, `and`
/// - Equality: `==`, `=`, `!=`, `<>`
/// - Comparison: `<`, `<=`, `>`, `>=`
/// - Addition: `+`, `-`
/// - Multiplication: `*`, `/`, `%`
/// - Unary: `!`, `not`, `-`
///
/// Operands are integer, float, and string literals in single or double
/// quotes, `true` and `false`, or a parenthesized expression. Keywords are
/// case-insensitive. Any other identifier is an error.
///
/// # Examples
///
/// ```
/// use vtl::Value;
///
/// assert_eq!(vtl::eval("1 < 10 && 'a' + 'b' == \"ab\"")?, Value::Bool(true));
/// assert_eq!(vtl::eval("(1 + 2) * 3")?, Value::Integer(9));
/// assert_eq!(vtl::eval("7 / 2")?, Value::Float(3.5));
/// # Ok::<(), vtl::Error>(())
/// ```
pub fn eval(source: &str) -> Result<Value> {
    let expr = Parser::new(source).parse_all()?;
    eval::evaluate(source, &expr)
}
