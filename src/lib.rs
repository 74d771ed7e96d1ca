//! A line-oriented template processor with a small directive language.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Variables: `$name` and `${name}`
//! - Assignment: `#set ($name = "value")`
//! - Conditionals: `#if ($count > 10) ... #elseif ($count > 5) ... #else ... #end`
//! - Configurable variable prefix: `+name`, `+{name}`
//!
//! ### Engine
//!
//! - Clear and well documented API
//! - Built-in condition language with arithmetic, comparison, and logical
//!   operators, or bring your own evaluator
//! - Newline normalization with an optional override
//! - Process to a [`String`] or any [`std::io::Write`] implementor
//! - Build variables from any [`serde`] serializable struct
//! - Convenient macro for quick processing: `vtl::vars! { name: "John" }`
//! - Minimal dependencies
//!
//! # Getting started
//!
//! Your entry point is the [`Engine`] struct. The engine stores the syntax
//! config and the condition evaluator. Generally, you only need to construct
//! one engine during the lifetime of a program.
//!
//! ```
//! let engine = vtl::Engine::new();
//! ```
//!
//! A template is processed using [`.parse`][Engine::parse] together with a
//! set of [`Variables`]. Variables assigned in the template using `#set` are
//! written back into the given variables.
//!
//! ```
//! # let engine = vtl::Engine::new();
//! let mut vars = vtl::vars! { user: "John Smith" };
//! let result = engine.parse("Hello $user!", &mut vars)?;
//! assert_eq!(result, "Hello John Smith!");
//! # Ok::<(), vtl::Error>(())
//! ```
//!
//! # Templates
//!
//! Templates are processed line by line. A line is a directive if it starts
//! with one of the following, otherwise it is content.
//!
//! | Directive             | Meaning                                          |
//! | --------------------- | ------------------------------------------------ |
//! | `#set ($name = value)`| assign a variable, always applied                |
//! | `#if (cond)`          | open a conditional block                         |
//! | `#elseif (cond)`      | try another branch                               |
//! | `#else`               | the fallback branch                              |
//! | `#end`                | close the innermost block                        |
//!
//! Directive lines never appear in the output. Content lines are emitted,
//! with variables substituted, if the innermost open block is live. Conditions
//! have variables substituted before they are evaluated and must evaluate to
//! a boolean.
//!
//! ```
//! let template = "\
//! #set ($limit = 10)
//! #if ($count < $limit)
//! few
//! #elseif ($count < $limit * 10)
//! many
//! #else
//! lots
//! #end
//! ";
//!
//! let engine = vtl::Engine::new();
//! let mut vars = vtl::vars! { count: 42 };
//! let result = engine.parse(template, &mut vars)?;
//! assert_eq!(result, "many\n");
//! assert_eq!(vars["limit"], "10");
//! # Ok::<(), vtl::Error>(())
//! ```
//!
//! Line terminators are normalized. If the template contains any carriage
//! return then every line is terminated with `\r\n`, otherwise `\n`. A
//! specific terminator can be configured using [`SyntaxBuilder::newline`].
//!
//! # Examples
//!
//! ### Process using structured data
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context { name: String, admin: bool }
//!
//! let ctx = Context { name: "John Smith".into(), admin: true };
//! let mut vars = vtl::to_variables(&ctx)?;
//!
//! let result = vtl::Engine::new().parse("#if ($admin)\nHello $name\n#end\n", &mut vars)?;
//!
//! assert_eq!(result, "Hello John Smith\n");
//! # Ok::<(), vtl::Error>(())
//! ```
//!
//! ### Process using custom syntax
//!
//! ```
//! let syntax = vtl::Syntax::builder().prefix('+').newline("\r\n").build();
//!
//! let result = vtl::Engine::with_syntax(syntax)
//!     .parse("Hello +{name}\n", &mut vtl::vars! { name: "John Smith" })?;
//!
//! assert_eq!(result, "Hello John Smith\r\n");
//! # Ok::<(), vtl::Error>(())
//! ```
//!
//! ### Use a custom condition evaluator
//!
//! ```
//! use vtl::Value;
//!
//! let mut engine = vtl::Engine::new();
//! engine.set_evaluator(|expr: &str| match expr {
//!     "yes" => Ok(Value::Bool(true)),
//!     "no" => Ok(Value::Bool(false)),
//!     _ => Err(format!("expected `yes` or `no`, found `{expr}`").into()),
//! });
//!
//! let result = engine.parse("#if ($answer)\nok\n#end\n", &mut vtl::vars! { answer: "yes" })?;
//! assert_eq!(result, "ok\n");
//! # Ok::<(), vtl::Error>(())
//! ```
//!
//! ### Process to an `impl io::Write`
//!
//! ```
//! use std::io;
//!
//! let stdout = io::BufWriter::new(io::stdout());
//!
//! vtl::Engine::new()
//!     .parse_to_writer("Hello $user\n", &mut vtl::vars! { user: "John Smith" }, stdout)?;
//! # Ok::<(), vtl::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod expr;
mod macros;
mod render;
mod types;
mod value;

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

pub use crate::error::{Error, ErrorKind};
pub use crate::expr::eval;
pub use crate::types::syntax::{Syntax, SyntaxBuilder};
#[cfg(feature = "serde")]
pub use crate::value::to_variables;
pub use crate::value::{IntoIter, Iter, Value, Variables};

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The template processing engine.
pub struct Engine {
    syntax: Syntax,
    evaluator: Box<EvalFn>,
}

/// A condition evaluator function or closure.
type EvalFn = dyn Fn(&str) -> Result<Value> + Send + Sync + 'static;

impl Default for Engine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Construct a new engine.
    #[inline]
    pub fn new() -> Self {
        Self::with_syntax(Syntax::default())
    }

    /// Construct a new engine with custom syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use vtl::{Engine, Syntax};
    ///
    /// let syntax = Syntax::builder().prefix('@').build();
    /// let engine = Engine::with_syntax(syntax);
    /// ```
    #[inline]
    pub fn with_syntax(syntax: Syntax) -> Self {
        Self {
            syntax,
            evaluator: Box::new(eval),
        }
    }

    /// Set the condition evaluator.
    ///
    /// The evaluator is called with the text of an `#if` or `#elseif`
    /// condition after variables have been substituted. It must return a
    /// [`Value::Bool`], any other value is an error. The default evaluator is
    /// [`eval`].
    #[inline]
    pub fn set_evaluator<F>(&mut self, f: F)
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.evaluator = Box::new(f);
    }

    /// Returns the syntax config of this engine.
    #[inline]
    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Process a template.
    ///
    /// On success the output is returned and `vars` contains any variables
    /// assigned using `#set`. On failure no output is returned, but `vars`
    /// may contain assignments made before the failing line.
    #[inline]
    pub fn parse(&self, source: &str, vars: &mut Variables) -> Result<String> {
        render::template(self, source, vars)
    }

    /// Process a template, reporting failure as a flag.
    ///
    /// Returns `(true, output)` on success and `(false, "")` on failure.
    /// Prefer [`.parse(..)`][Engine::parse] which returns the reason for the
    /// failure.
    pub fn try_parse(&self, source: &str, vars: &mut Variables) -> (bool, String) {
        match self.parse(source, vars) {
            Ok(output) => (true, output),
            Err(err) => {
                debug!("failed to process template: {err}");
                (false, String::new())
            }
        }
    }

    /// Read a UTF-8 template from a file and process it.
    pub fn parse_file<P>(&self, path: P, vars: &mut Variables) -> Result<String>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!("reading template from {}", path.display());
        let source = fs::read_to_string(path)?;
        self.parse(&source, vars)
    }

    /// Process a template and write the output to a writer.
    ///
    /// Nothing is written if processing fails.
    pub fn parse_to_writer<W>(&self, source: &str, vars: &mut Variables, mut writer: W) -> Result<()>
    where
        W: io::Write,
    {
        let output = self.parse(source, vars)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}
