/// The template syntax configuration.
///
/// Use [`Syntax::default()`] to get the default syntax configuration and
/// [`Syntax::builder()`] to create a custom syntax configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub(crate) prefix: char,
    pub(crate) newline: Option<String>,
}

/// A builder for the syntax configuration.
///
/// This struct is typically created using [`Syntax::builder()`].
#[derive(Debug, Clone)]
pub struct SyntaxBuilder {
    prefix: char,
    newline: Option<String>,
}

impl Default for Syntax {
    /// Returns the default syntax configuration.
    ///
    /// This is equivalent to the following.
    /// ```
    /// use vtl::Syntax;
    ///
    /// let syntax = Syntax::builder().prefix('$').build();
    /// assert_eq!(syntax, Syntax::default());
    /// ```
    #[inline]
    fn default() -> Self {
        Syntax::builder().build()
    }
}

impl Syntax {
    /// Create a new syntax builder.
    ///
    /// # Examples
    ///
    /// ```
    /// let syntax = vtl::Syntax::builder()
    ///     .prefix('+')
    ///     .newline("\r\n")
    ///     .build();
    /// ```
    #[inline]
    pub fn builder() -> SyntaxBuilder {
        SyntaxBuilder::new()
    }

    /// Returns the character that introduces a variable, e.g. `$` in
    /// `$name` and `${name}`.
    #[inline]
    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Returns the line terminator override, if any.
    #[inline]
    pub fn newline(&self) -> Option<&str> {
        self.newline.as_deref()
    }
}

impl SyntaxBuilder {
    /// Creates a new syntax builder.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            prefix: '$',
            newline: None,
        }
    }

    /// Set the variable prefix character.
    ///
    /// This is used both for interpolation (`$name`, `${name}`) and for the
    /// target of a `#set` directive. Defaults to `$`.
    #[inline]
    pub fn prefix(&mut self, prefix: char) -> &mut Self {
        self.prefix = prefix;
        self
    }

    /// Set the line terminator written after every line.
    ///
    /// If not set then the terminator is detected from the source: `\r\n` if
    /// the source contains any carriage return, otherwise `\n`. An empty
    /// terminator joins all the lines together.
    #[inline]
    pub fn newline(&mut self, newline: &str) -> &mut Self {
        self.newline = Some(newline.into());
        self
    }

    /// Builds the syntax configuration.
    pub fn build(&self) -> Syntax {
        Syntax {
            prefix: self.prefix,
            newline: self.newline.clone(),
        }
    }
}
