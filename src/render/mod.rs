mod directive;
mod lines;
mod stack;

use std::borrow::Cow;

use log::{debug, trace};

use crate::render::directive::Directive;
use crate::render::lines::Lines;
use crate::render::stack::{transition, Block, Stack, Transition};
use crate::types::span::Span;
use crate::{Engine, Error, Result, Value, Variables};

/// Processes a template source in a single pass and returns the output.
pub(crate) fn template(engine: &Engine, source: &str, vars: &mut Variables) -> Result<String> {
    Renderer {
        engine,
        vars,
        stack: Stack::new(),
    }
    .render(source)
}

/// The per-call processing state.
struct Renderer<'a> {
    engine: &'a Engine,
    vars: &'a mut Variables,
    stack: Stack,
}

impl Renderer<'_> {
    fn render(mut self, source: &str) -> Result<String> {
        debug!(
            "processing template, {} bytes, {} variables",
            source.len(),
            self.vars.len()
        );

        let engine = self.engine;
        let mut out = String::with_capacity(source.len());
        let mut count = 0;

        for (i, line) in Lines::new(source, engine.syntax.newline()).enumerate() {
            let n = i + 1;
            let code = line.trim_end();
            let directive = Directive::classify(code);
            trace!("line {n}: {}", directive.human());

            match directive {
                Directive::Content => self.emit(&mut out, &line),
                Directive::Unsupported(name) => {
                    debug!("line {n}: `{name}` is not supported, passing it through as content");
                    self.emit(&mut out, &line);
                }
                Directive::Set(span) => self.set(n, code, span)?,
                Directive::If(span) => self.block(Block::If, n, code, span)?,
                Directive::ElseIf(span) => self.block(Block::ElseIf, n, code, span)?,
                Directive::Else => self.block(Block::Else, n, code, keyword(Block::Else))?,
                Directive::End => self.block(Block::End, n, code, keyword(Block::End))?,
            }
            count = n;
        }

        if self.stack.depth() > 0 {
            debug!("{} blocks still open at the end of the template", self.stack.depth());
        }
        debug!("processed {count} lines, {} bytes of output", out.len());
        Ok(out)
    }

    /// Writes a content line to the output if the current position is live.
    fn emit(&self, out: &mut String, line: &str) {
        if self.stack.is_live() {
            out.push_str(&substitute(line, self.vars, self.engine.syntax.prefix()));
        }
    }

    /// Applies a `#set ($name = "value")` directive.
    ///
    /// Assignments are applied even if the current position is not live.
    fn set(&mut self, n: usize, code: &str, span: Span) -> Result<()> {
        let inner = &code[span];
        let mut parts = inner.split('=');
        let (name, value) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(value), None) => (name, value),
            _ => {
                return Err(Error::directive(
                    "expected `#set` to contain exactly one `=`",
                    n,
                    code,
                    span,
                ));
            }
        };

        let prefix = self.engine.syntax.prefix();
        let name = name.trim_matches(' ');
        let name = name.strip_prefix(prefix).unwrap_or(name);

        let value = value.trim_matches(' ');
        let value = value.strip_prefix('"').unwrap_or(value);
        let value = value.strip_suffix('"').unwrap_or(value);

        trace!("line {n}: setting `{name}`");
        self.vars.insert(name, Value::from(value));
        Ok(())
    }

    /// Applies a structural directive to the condition stack.
    fn block(&mut self, block: Block, n: usize, code: &str, span: Span) -> Result<()> {
        let top = self.stack.top();
        let t = transition(top, block, || self.condition(n, code, span))?;
        if t == Transition::Unexpected {
            let msg = format!("unexpected `{}`", block.human());
            return Err(Error::directive(msg, n, code, keyword(block)));
        }
        self.stack.apply(t);
        Ok(())
    }

    /// Substitutes variables into a condition and evaluates it.
    fn condition(&self, n: usize, code: &str, span: Span) -> Result<bool> {
        let span = trimmed(code, span);
        let expr = substitute(&code[span], self.vars, self.engine.syntax.prefix());
        match (self.engine.evaluator)(&*expr) {
            Ok(Value::Bool(cond)) => Ok(cond),
            Ok(value) => Err(Error::condition(
                format!(
                    "condition does not evaluate as a boolean, found {}",
                    value.human()
                ),
                n,
                code,
                span,
            )),
            Err(err) => Err(Error::condition(
                format!("condition does not evaluate as a boolean: {}", err.message()),
                n,
                code,
                span,
            )),
        }
    }
}

/// Replaces every `$name` and `${name}` token in `text` with the value of
/// the variable, where `$` is the configured prefix.
///
/// This is a plain textual replacement applied for each variable in
/// insertion order. A variable whose name is a prefix of another variable's
/// name will clobber it if it was inserted first, e.g. `$foo` will replace
/// the start of `$foobar`.
pub(crate) fn substitute<'a>(text: &'a str, vars: &Variables, prefix: char) -> Cow<'a, str> {
    if !text.contains(prefix) {
        return Cow::Borrowed(text);
    }
    let mut out = Cow::Borrowed(text);
    for (name, value) in vars {
        let bare = format!("{prefix}{name}");
        let braced = format!("{prefix}{{{name}}}");
        if out.contains(&bare) || out.contains(&braced) {
            let value = value.to_string();
            out = Cow::Owned(out.replace(&bare, &value).replace(&braced, &value));
        }
    }
    out
}

/// The span of the directive keyword at the start of the line.
fn keyword(block: Block) -> Span {
    Span::from(0..block.human().len())
}

/// Shrinks the span to exclude surrounding whitespace.
fn trimmed(code: &str, span: Span) -> Span {
    let s = &code[span];
    let m = span.m + (s.len() - s.trim_start().len());
    let n = m + s.trim().len();
    Span::from(m..n)
}
