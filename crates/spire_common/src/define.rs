//! Preprocessor macro definitions passed to the shader compilers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A set of preprocessor macro assignments with unique names.
///
/// Backed by an ordered map so that command lines built from a set are
/// deterministic. Inserting an existing name replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineSet(BTreeMap<String, String>);

/// A macro name that is not a valid preprocessor identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid macro name '{name}'")]
pub struct InvalidDefineError {
    /// The rejected name.
    pub name: String,
}

impl DefineSet {
    /// Creates an empty define set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set where each name is defined to `1`.
    pub fn from_flags<'a>(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, InvalidDefineError> {
        let mut set = Self::new();
        for name in names {
            set.insert(name, "1")?;
        }
        Ok(set)
    }

    /// Defines `name` to `value`, replacing any previous value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), InvalidDefineError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(InvalidDefineError { name });
        }
        self.0.insert(name, value.into());
        Ok(())
    }

    /// Returns the value assigned to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of defined macros.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no macros are defined.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates the defined names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for DefineSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flags_assigns_one() {
        let set = DefineSet::from_flags(["DEPTH_ONLY", "CSM"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("DEPTH_ONLY"), Some("1"));
        assert_eq!(set.get("CSM"), Some("1"));
    }

    #[test]
    fn keys_are_unique() {
        let mut set = DefineSet::new();
        set.insert("MASKED", "1").unwrap();
        set.insert("MASKED", "0").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("MASKED"), Some("0"));
    }

    #[test]
    fn iteration_is_sorted() {
        let set = DefineSet::from_flags(["MULTIVIEW", "CSM", "DEPTH_ONLY"]).unwrap();
        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["CSM", "DEPTH_ONLY", "MULTIVIEW"]);
    }

    #[test]
    fn rejects_invalid_names() {
        let mut set = DefineSet::new();
        assert!(set.insert("", "1").is_err());
        assert!(set.insert("1ABC", "1").is_err());
        assert!(set.insert("A-B", "1").is_err());
        let err = set.insert("HAS SPACE", "1").unwrap_err();
        assert_eq!(err.to_string(), "invalid macro name 'HAS SPACE'");
        assert!(set.is_empty());
    }

    #[test]
    fn display_format() {
        let set = DefineSet::from_flags(["RSM", "MASKED"]).unwrap();
        assert_eq!(set.to_string(), "MASKED=1 RSM=1");
        assert_eq!(DefineSet::new().to_string(), "");
    }
}
