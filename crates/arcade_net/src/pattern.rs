//! Listen-pattern matching for presence paths.
//!
//! The presence feed is queried with patterns such as `status/.*`. Only the
//! subset of the regex syntax that presence listeners actually use is
//! supported: `/`-separated literal segments, optionally followed by a final
//! `.*` segment that matches any remainder.

use crate::error::NetError;

const WILDCARD: &str = ".*";

/// A parsed listen pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// Literal leading segments.
    literals: Vec<String>,
    /// Whether the pattern ends in `.*`.
    open_tail: bool,
}

impl PathPattern {
    /// Parse a listen pattern.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::InvalidPattern`] if the pattern is empty or uses
    /// `.*` anywhere but the final segment.
    pub fn parse(pattern: &str) -> Result<Self, NetError> {
        let invalid = |reason| NetError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let segments: Vec<&str> = pattern.split('/').collect();
        let last = segments.len() - 1;
        let mut literals = Vec::with_capacity(segments.len());
        let mut open_tail = false;

        for (idx, segment) in segments.into_iter().enumerate() {
            if segment == WILDCARD {
                if idx != last {
                    return Err(invalid("`.*` is only supported as the final segment"));
                }
                open_tail = true;
            } else if segment.contains(WILDCARD) {
                return Err(invalid("`.*` must occupy a whole segment"));
            } else {
                literals.push(segment.to_string());
            }
        }

        Ok(Self {
            literals,
            open_tail,
        })
    }

    /// Returns `true` if `path` matches this pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('/').collect();
        let prefix_matches = segments
            .iter()
            .zip(&self.literals)
            .all(|(segment, literal)| segment == literal);

        if self.open_tail {
            segments.len() > self.literals.len() && prefix_matches
        } else {
            segments.len() == self.literals.len() && prefix_matches
        }
    }
}

impl std::str::FromStr for PathPattern {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
