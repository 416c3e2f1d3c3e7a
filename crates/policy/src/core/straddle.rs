//! Version-straddle evaluation.
//!
//! A declared SDK range can sit entirely on one side of a behavioural
//! change threshold, or span it. In the spanning case both behaviours are
//! simultaneously possible for the same application and both must be
//! reported; returning a single value would silently drop one of them.
//! `straddle` therefore returns [`Outcomes`], a one-or-two element
//! collection, and callers iterate it rather than pattern-match a scalar.

use crate::core::sdk::{ApiLevel, SdkRange};

/// Result of evaluating a range against one threshold: either a single
/// outcome (the range is entirely below, or entirely at-or-above), or both
/// (the range spans the threshold).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcomes<T> {
    Single(T),
    Both { below: T, at_or_above: T },
}

impl<T> Outcomes<T> {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Both { .. })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (first, second) = match self {
            Self::Single(one) => (one, None),
            Self::Both { below, at_or_above } => (below, Some(at_or_above)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(one) => vec![one],
            Self::Both { below, at_or_above } => vec![below, at_or_above],
        }
    }
}

/// Classifies `range` against `threshold` and dispatches to the matching
/// producer(s). Producers receive only the ambiguity flag; the threshold
/// itself stays the single source of truth at the call site.
///
/// - `range.max < threshold` — only `below` runs, unambiguous.
/// - `range.min >= threshold` — only `at_or_above` runs, unambiguous.
/// - otherwise the range spans the threshold: both producers run with
///   `ambiguous = true` and both outcomes are returned, below first.
pub fn straddle<T>(
    range: SdkRange,
    threshold: ApiLevel,
    below: impl FnOnce(bool) -> T,
    at_or_above: impl FnOnce(bool) -> T,
) -> Outcomes<T> {
    if range.max() < threshold {
        Outcomes::Single(below(false))
    } else if range.min() >= threshold {
        Outcomes::Single(at_or_above(false))
    } else {
        Outcomes::Both {
            below: below(true),
            at_or_above: at_or_above(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: ApiLevel, max: ApiLevel) -> SdkRange {
        SdkRange::new(min, max).unwrap()
    }

    #[derive(Debug, PartialEq)]
    enum Side {
        Below(bool),
        AtOrAbove(bool),
    }

    fn run(range: SdkRange, threshold: ApiLevel) -> Outcomes<Side> {
        straddle(range, threshold, Side::Below, Side::AtOrAbove)
    }

    #[test]
    fn test_entirely_below_invokes_only_below_producer() {
        assert_eq!(run(range(1, 22), 23), Outcomes::Single(Side::Below(false)));
    }

    #[test]
    fn test_entirely_at_or_above_invokes_only_upper_producer() {
        assert_eq!(
            run(range(23, 30), 23),
            Outcomes::Single(Side::AtOrAbove(false))
        );
    }

    #[test]
    fn test_spanning_range_invokes_both_producers_as_ambiguous() {
        let outcomes = run(range(21, 30), 23);
        assert!(outcomes.is_ambiguous());
        assert_eq!(
            outcomes.into_vec(),
            vec![Side::Below(true), Side::AtOrAbove(true)]
        );
    }

    #[test]
    fn test_boundary_max_just_below() {
        // max == threshold - 1 is still entirely below
        assert!(!run(range(1, 30), 31).is_ambiguous());
        assert_eq!(run(range(1, 30), 31), Outcomes::Single(Side::Below(false)));
    }

    #[test]
    fn test_boundary_min_equals_threshold() {
        assert_eq!(
            run(range(31, 34), 31),
            Outcomes::Single(Side::AtOrAbove(false))
        );
    }

    #[test]
    fn test_iter_yields_both_in_order() {
        let outcomes = run(range(1, 36), 28);
        let sides: Vec<_> = outcomes.iter().collect();
        assert_eq!(sides.len(), 2);
        assert_eq!(*sides[0], Side::Below(true));
        assert_eq!(*sides[1], Side::AtOrAbove(true));
    }
}
