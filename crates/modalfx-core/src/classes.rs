#![forbid(unsafe_code)]

//! Ordered CSS class sets.
//!
//! A [`ClassSet`] is the unit the engine writes to the host: every element it
//! manages receives its full class list as one string. Keeping the list
//! ordered (insertion order) makes the written attribute stable, which in turn
//! makes layout application idempotent at the string level.
//!
//! # Invariants
//!
//! - No duplicates: inserting an existing class is a no-op.
//! - No empty or whitespace-containing tokens: input strings are split on
//!   ASCII whitespace before insertion.
//! - Iteration order is insertion order.

use std::fmt;

/// An ordered, de-duplicated set of CSS class names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassSet {
    classes: Vec<String>,
}

impl ClassSet {
    /// Create an empty class set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Parse a whitespace-separated class attribute.
    #[must_use]
    pub fn parse(attr: &str) -> Self {
        let mut set = Self::new();
        set.insert_all(attr);
        set
    }

    /// Insert a single class. Returns `true` if it was not present.
    ///
    /// Tokens containing whitespace are split and inserted individually.
    pub fn insert(&mut self, class: impl AsRef<str>) -> bool {
        let mut added = false;
        for token in class.as_ref().split_ascii_whitespace() {
            if !self.contains(token) {
                self.classes.push(token.to_owned());
                added = true;
            }
        }
        added
    }

    /// Insert every class of a whitespace-separated string.
    pub fn insert_all(&mut self, attr: &str) {
        for token in attr.split_ascii_whitespace() {
            self.insert(token);
        }
    }

    /// Remove a class. Returns `true` if it was present.
    pub fn remove(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }

    /// Add or remove `class` depending on `on`.
    pub fn toggle(&mut self, class: &str, on: bool) {
        if on {
            self.insert(class);
        } else {
            self.remove(class);
        }
    }

    /// Remove every class.
    pub fn clear(&mut self) {
        self.classes.clear();
    }

    /// Whether the set contains `class`.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate classes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// A new set holding `self` followed by the classes of `other`.
    #[must_use]
    pub fn union(&self, other: &ClassSet) -> ClassSet {
        let mut out = self.clone();
        out.extend(other.iter());
        out
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for class in &self.classes {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(class)?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for ClassSet {
    fn from(attr: &str) -> Self {
        Self::parse(attr)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ClassSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for class in iter {
            self.insert(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_and_dedupes() {
        let set = ClassSet::parse("  flex  hidden flex\titems-center ");
        assert_eq!(set.to_string(), "flex hidden items-center");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn insert_reports_novelty() {
        let mut set = ClassSet::new();
        assert!(set.insert("animated"));
        assert!(!set.insert("animated"));
        assert!(set.insert("a b"));
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn remove_and_toggle() {
        let mut set = ClassSet::parse("x y z");
        assert!(set.remove("y"));
        assert!(!set.remove("y"));
        set.toggle("y", true);
        set.toggle("x", false);
        assert_eq!(set.to_string(), "z y");
    }

    #[test]
    fn union_preserves_order() {
        let a = ClassSet::parse("one two");
        let b = ClassSet::parse("two three");
        assert_eq!(a.union(&b).to_string(), "one two three");
    }

    #[test]
    fn empty_displays_as_empty_string() {
        assert_eq!(ClassSet::new().to_string(), "");
        assert!(ClassSet::parse("   ").is_empty());
    }
}
