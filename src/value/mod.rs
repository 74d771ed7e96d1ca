//! Defines the [`Value`] enum, representing any value that can be substituted
//! into a template, and the [`Variables`] map that holds them.

mod from;
#[cfg(feature = "serde")]
mod ser;
mod variables;

use std::fmt;

#[cfg(feature = "serde")]
pub use crate::value::ser::to_variables;
pub use crate::value::variables::{IntoIter, Iter, Variables};

/// A variable value.
///
/// Every value has a textual representation which is what gets substituted
/// into the template, see the [`Display`][fmt::Display] implementation.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// A value that was already converted to text by the caller.
    Formatted(String),
}

impl Value {
    /// Construct a [`Value::Formatted`] from anything that implements
    /// [`Display`][fmt::Display].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::net::Ipv4Addr;
    /// use vtl::Value;
    ///
    /// let value = Value::formatted(Ipv4Addr::LOCALHOST);
    /// assert_eq!(value.to_string(), "127.0.0.1");
    /// ```
    pub fn formatted<T>(value: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Formatted(value.to_string())
    }

    /// Returns the text if this value is a string.
    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Formatted(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn human(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) | Self::Formatted(_) => "string",
        }
    }
}

/// Values are formatted as follows:
/// - [`Value::Bool`]: `true` or `false`
/// - [`Value::Integer`]: the integer formatted using [`Display`][fmt::Display]
/// - [`Value::Float`]: the float formatted using [`Display`][fmt::Display],
///   so `1.0` is formatted as `1`
/// - [`Value::String`] and [`Value::Formatted`]: the string, unescaped
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) | Self::Formatted(s) => f.write_str(s),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::Formatted(s), Self::Formatted(o)) => s == o,
            _ => false,
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

#[test]
fn value_eq_discriminant() {
    assert_ne!(Value::String("1".into()), Value::Formatted("1".into()));
    assert_ne!(Value::Integer(1), Value::Float(1.0));
    assert_eq!(Value::from("1"), "1");
}
