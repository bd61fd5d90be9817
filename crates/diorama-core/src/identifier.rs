//! Identifiers for nodes and edges.
//!
//! Diagram ids are plain strings chosen by whoever built the graph, so [`Id`]
//! owns its text instead of interning it. That keeps every graph
//! self-contained: two graphs never share identifier state.

use std::{borrow::Borrow, convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A node or edge identifier.
///
/// # Examples
///
/// ```
/// use diorama_core::identifier::Id;
///
/// let start = Id::new("start");
/// let review = Id::new("review");
///
/// // Edges without an explicit id are named after their endpoints
/// let edge_id = Id::for_edge(&start, &review);
/// assert_eq!(edge_id, "estart-review");
///
/// // Merged proposal nodes are numbered from a seed
/// assert_eq!(Id::from_seed(5), "5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Creates an `Id` from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates the id allocated for sequence number `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self(seed.to_string())
    }

    /// Derives the id of an edge that was declared without one.
    ///
    /// The derived form is `e<source>-<target>`.
    pub fn for_edge(source: &Id, target: &Id) -> Self {
        Self(format!("e{source}-{target}"))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
