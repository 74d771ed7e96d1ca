use std::ops::Index;
use std::slice;
use std::vec;

use crate::Value;

/// A map of variable names to values that remembers insertion order.
///
/// The order matters because substitution visits variables in the order they
/// were first inserted. Overwriting an existing variable keeps its original
/// position.
///
/// # Examples
///
/// ```
/// use vtl::{Value, Variables};
///
/// let mut vars = Variables::new();
/// vars.insert("name", "John");
/// vars.insert("age", 42);
///
/// assert_eq!(vars.get("age"), Some(&Value::Integer(42)));
/// assert_eq!(vars.keys().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables {
    entries: Vec<(String, Value)>,
}

/// An iterator over the entries of [`Variables`].
pub type Iter<'a> = slice::Iter<'a, (String, Value)>;

/// An owning iterator over the entries of [`Variables`].
pub type IntoIter = vec::IntoIter<(String, Value)>;

impl Variables {
    /// Construct an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty map with space for at least `capacity` variables.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no variables.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value of the named variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// Returns a mutable reference to the value of the named variable.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.position(name).map(move |i| &mut self.entries[i].1)
    }

    /// Returns `true` if the named variable exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert a variable, returning the previous value if there was one.
    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a variable, returning its value if it existed.
    ///
    /// The relative order of the remaining variables is preserved.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Returns an iterator over the variables in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        self.entries.iter()
    }

    /// Returns an iterator over the variable names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == name)
    }
}

impl Index<&str> for Variables {
    type Output = Value;

    /// # Panics
    ///
    /// If the variable does not exist.
    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(value) => value,
            None => panic!("variable `{name}` not found"),
        }
    }
}

impl<K, V> Extend<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut vars = Self::new();
        vars.extend(iter);
        vars
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Variables
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for Variables {
    type Item = (String, Value);
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = &'a (String, Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
