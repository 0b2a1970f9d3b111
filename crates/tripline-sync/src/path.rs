//! Store tree paths
//!
//! Everything under a trip is addressed by a hierarchical path of string
//! segments, e.g. `trips/T/days/2025-06-01/I`. Prefix relations drive
//! subscription fan-out: a write anywhere below a subscribed path means
//! that subscriber gets a fresh snapshot.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A segment between separators was empty
    #[error("empty path segment in {0:?}")]
    EmptySegment(String),
}

/// Hierarchical address within the shared store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(Vec<String>);

impl TreePath {
    /// The store root (empty path)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build from ready-made segments
    #[inline]
    #[must_use]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Path segments, outermost first
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append one segment
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.0.push(segment.into());
        next
    }

    /// Everything but the last segment; `None` at the root
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Last segment; `None` at the root
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Whether every segment of `self` prefixes `other` (root prefixes
    /// everything; a path prefixes itself)
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Whether a write at `written` is visible at this path — true when
    /// either path is a prefix of the other
    #[inline]
    #[must_use]
    pub fn touches(&self, written: &Self) -> bool {
        self.is_prefix_of(written) || written.is_prefix_of(self)
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = s.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(s.to_string()));
        }
        Ok(Self(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_round_trip() {
        let path: TreePath = "trips/t1/days/2025-06-01".parse().unwrap();
        assert_eq!(path.to_string(), "trips/t1/days/2025-06-01");
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(matches!(
            "trips//t1".parse::<TreePath>(),
            Err(PathError::EmptySegment(_))
        ));
    }

    #[test]
    fn prefix_relations() {
        let trip: TreePath = "trips/t1".parse().unwrap();
        let item: TreePath = "trips/t1/days/2025-06-01/i1".parse().unwrap();
        let other: TreePath = "trips/t2".parse().unwrap();

        assert!(trip.is_prefix_of(&item));
        assert!(trip.is_prefix_of(&trip));
        assert!(!item.is_prefix_of(&trip));
        assert!(!trip.is_prefix_of(&other));
        assert!(TreePath::root().is_prefix_of(&item));
    }

    #[test]
    fn touches_goes_both_ways() {
        let trip: TreePath = "trips/t1".parse().unwrap();
        let item: TreePath = "trips/t1/days/2025-06-01/i1".parse().unwrap();
        let sibling: TreePath = "trips/t2/meta".parse().unwrap();

        // Deep write refreshes a shallow subscription and vice versa.
        assert!(trip.touches(&item));
        assert!(item.touches(&trip));
        assert!(!trip.touches(&sibling));
    }

    #[test]
    fn parent_and_last() {
        let item: TreePath = "trips/t1/days/2025-06-01/i1".parse().unwrap();
        assert_eq!(item.last(), Some("i1"));
        assert_eq!(item.parent().unwrap().to_string(), "trips/t1/days/2025-06-01");
        assert_eq!(TreePath::root().parent(), None);
    }
}
