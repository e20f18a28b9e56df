//! # Optimize
//!
//! The optimization direction. All "better/worse" decisions in the engine,
//! the selectors and the limits go through [`Optimize::compare`].

use std::cmp::Ordering;
use std::fmt::Debug;

/// Types usable as fitness values.
///
/// Only a partial order is required so that `f64` works; values that are not
/// comparable with themselves (NaN) always rank worst.
pub trait Fitness: PartialOrd + Clone + Debug + Send + Sync + 'static {}

impl<T> Fitness for T where T: PartialOrd + Clone + Debug + Send + Sync + 'static {}

/// The optimization direction of an evolution.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optimize {
    /// Lower fitness is better.
    Minimum,
    /// Higher fitness is better.
    #[default]
    Maximum,
}

impl Optimize {
    /// Compares two fitness values: `Greater` means `a` is better than `b`.
    pub fn compare<C: PartialOrd>(&self, a: &C, b: &C) -> Ordering {
        match a.partial_cmp(b) {
            Some(ordering) => match self {
                Optimize::Maximum => ordering,
                Optimize::Minimum => ordering.reverse(),
            },
            None => {
                let a_unordered = a.partial_cmp(a).is_none();
                let b_unordered = b.partial_cmp(b).is_none();
                match (a_unordered, b_unordered) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            }
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better<C: PartialOrd>(&self, a: &C, b: &C) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    /// Returns the better of the two values, preferring `a` on ties.
    pub fn best<'a, C: PartialOrd>(&self, a: &'a C, b: &'a C) -> &'a C {
        if self.is_better(b, a) {
            b
        } else {
            a
        }
    }

    /// Returns the worse of the two values, preferring `a` on ties.
    pub fn worst<'a, C: PartialOrd>(&self, a: &'a C, b: &'a C) -> &'a C {
        if self.is_better(a, b) {
            b
        } else {
            a
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_direction() {
        assert_eq!(Optimize::Maximum.compare(&2.0, &1.0), Ordering::Greater);
        assert_eq!(Optimize::Minimum.compare(&2.0, &1.0), Ordering::Less);
        assert_eq!(Optimize::Minimum.compare(&1, &1), Ordering::Equal);
    }

    #[test]
    fn test_nan_is_always_worst() {
        for optimize in [Optimize::Maximum, Optimize::Minimum] {
            assert!(optimize.is_better(&0.0, &f64::NAN));
            assert!(!optimize.is_better(&f64::NAN, &0.0));
            assert_eq!(optimize.compare(&f64::NAN, &f64::NAN), Ordering::Equal);
        }
    }

    #[test]
    fn test_best_and_worst() {
        assert_eq!(*Optimize::Maximum.best(&3, &5), 5);
        assert_eq!(*Optimize::Minimum.best(&3, &5), 3);
        assert_eq!(*Optimize::Maximum.worst(&3, &5), 3);
        assert_eq!(*Optimize::Minimum.worst(&3, &5), 5);
    }

    #[test]
    fn test_default_is_maximum() {
        assert_eq!(Optimize::default(), Optimize::Maximum);
    }
}
