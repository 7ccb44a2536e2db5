//! Directory depth comparators.
//!
//! Expressions look like `> 1`, `<3`, `>= 0`, `== 2` or a bare `2`
//! (meaning `== 2`). A [`DepthRange`] holds several comparators that must
//! all hold. Depth 0 is the root folder itself.

use std::fmt;
use std::str::FromStr;

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl DepthOperator {
    fn as_str(self) -> &'static str {
        match self {
            DepthOperator::Eq => "==",
            DepthOperator::Ne => "!=",
            DepthOperator::Lt => "<",
            DepthOperator::Le => "<=",
            DepthOperator::Gt => ">",
            DepthOperator::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthComparator {
    pub operator: DepthOperator,
    pub target: usize,
}

impl DepthComparator {
    pub fn matches(&self, depth: usize) -> bool {
        match self.operator {
            DepthOperator::Eq => depth == self.target,
            DepthOperator::Ne => depth != self.target,
            DepthOperator::Lt => depth < self.target,
            DepthOperator::Le => depth <= self.target,
            DepthOperator::Gt => depth > self.target,
            DepthOperator::Ge => depth >= self.target,
        }
    }

    /// Deepest level this comparator can accept, if it is bounded above.
    /// `None` inside `Some` means no level can match.
    fn upper_bound(&self) -> Option<Option<usize>> {
        match self.operator {
            DepthOperator::Lt => Some(self.target.checked_sub(1)),
            DepthOperator::Le | DepthOperator::Eq => Some(Some(self.target)),
            _ => None,
        }
    }
}

impl fmt::Display for DepthComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator.as_str(), self.target)
    }
}

impl FromStr for DepthComparator {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Two-character operators first so `>=` is not read as `>`.
        let (operator, rest) = [
            ("==", DepthOperator::Eq),
            ("!=", DepthOperator::Ne),
            ("<=", DepthOperator::Le),
            (">=", DepthOperator::Ge),
            ("<", DepthOperator::Lt),
            (">", DepthOperator::Gt),
        ]
        .into_iter()
        .find_map(|(prefix, op)| trimmed.strip_prefix(prefix).map(|rest| (op, rest)))
        .unwrap_or((DepthOperator::Eq, trimmed));

        let target = rest.trim().parse::<usize>().map_err(|_| {
            ImportError::InvalidInput(format!("Unsupported depth expression: '{s}'"))
        })?;

        Ok(Self { operator, target })
    }
}

/// A set of depth comparators combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthRange {
    comparators: Vec<DepthComparator>,
}

impl DepthRange {
    /// Parse every expression; the first bad one fails the whole range.
    pub fn parse<I, S>(expressions: I) -> Result<Self, ImportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let comparators = expressions
            .into_iter()
            .map(|expr| expr.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { comparators })
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    pub fn matches(&self, depth: usize) -> bool {
        self.comparators.iter().all(|c| c.matches(depth))
    }

    /// Deepest level worth descending to. `Some(None)` means nothing matches.
    pub fn max_depth(&self) -> Option<Option<usize>> {
        self.comparators
            .iter()
            .filter_map(DepthComparator::upper_bound)
            .reduce(|a, b| match (a, b) {
                (Some(a), Some(b)) => Some(a.min(b)),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operators_with_and_without_spaces() {
        let cases = [
            ("> 1", DepthOperator::Gt, 1),
            ("<3", DepthOperator::Lt, 3),
            (">= 0", DepthOperator::Ge, 0),
            ("<=2", DepthOperator::Le, 2),
            ("== 4", DepthOperator::Eq, 4),
            ("!= 1", DepthOperator::Ne, 1),
            (" 2 ", DepthOperator::Eq, 2),
        ];
        for (expr, operator, target) in cases {
            let parsed: DepthComparator = expr.parse().unwrap();
            assert_eq!(parsed, DepthComparator { operator, target }, "{expr}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for expr in ["", ">", "=> 1", "< -1", "deep"] {
            let err = expr.parse::<DepthComparator>().unwrap_err();
            assert!(matches!(err, ImportError::InvalidInput(_)), "{expr}");
        }
    }

    #[test]
    fn range_requires_every_comparator() {
        let range = DepthRange::parse([">= 1", "< 3"]).unwrap();
        assert!(!range.matches(0));
        assert!(range.matches(1));
        assert!(range.matches(2));
        assert!(!range.matches(3));
    }

    #[test]
    fn max_depth_takes_tightest_bound() {
        assert_eq!(DepthRange::parse(["< 2"]).unwrap().max_depth(), Some(Some(1)));
        assert_eq!(
            DepthRange::parse(["<= 4", "== 2"]).unwrap().max_depth(),
            Some(Some(2))
        );
        assert_eq!(DepthRange::parse(["> 1"]).unwrap().max_depth(), None);
        assert_eq!(DepthRange::parse(["< 0"]).unwrap().max_depth(), Some(None));
    }
}
