use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Location of a hierarchical instance: sheet identifiers from the root.
///
/// Ordering is lexicographic over segments, so every descendant of a path
/// sorts after it and before the path's next sibling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SheetPath(Vec<String>);

impl SheetPath {
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }

    /// Strict ancestor test: a path is not its own ancestor.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &SheetPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for SheetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for s in &self.0 {
            write!(f, "/{s}")?;
        }
        Ok(())
    }
}

impl FromStr for SheetPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split('/').filter(|s| !s.is_empty())))
    }
}

impl From<String> for SheetPath {
    fn from(raw: String) -> Self {
        Self::new(raw.split('/').filter(|s| !s.is_empty()))
    }
}

impl From<SheetPath> for String {
    fn from(path: SheetPath) -> Self {
        path.to_string()
    }
}
