//! Exact rational sort keys.
//!
//! Items are ordered within their sibling group by an [`OrderKey`], a fraction
//! `numerator / denominator`. A new position between two neighbours is the
//! Stern–Brocot *mediant* of their keys, which always lies strictly between
//! them, so inserting or moving an item never rewrites any other key.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Largest value either component of a computed key may take.
///
/// Keys are persisted as two 32-bit halves, so mediants that would grow past
/// this bound are rejected and the sibling group gets renumbered instead.
pub const MAX_COMPONENT: u64 = u32::MAX as u64;

/// Rational sort key of an item inside its sibling group.
///
/// Equality and ordering compare the rational *value*, so `1/2 == 2/4`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderKey {
    numerator: u64,
    denominator: u64,
}

/// Raw fraction used for the virtual bounds `0/1` and `1/0`, which are not
/// valid keys themselves.
#[derive(Clone, Copy)]
struct Fraction(u64, u64);

const LOWER_BOUND: Fraction = Fraction(0, 1);
const UPPER_BOUND: Fraction = Fraction(1, 0);

impl OrderKey {
    /// Build a key from its components.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDenominator`] when `denominator` is zero.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ValidationError> {
        if denominator == 0 {
            return Err(ValidationError::ZeroDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The `n`-th slot of a freshly renumbered group: `n/1`.
    #[must_use]
    pub fn whole(n: u64) -> Self {
        Self {
            numerator: n,
            denominator: 1,
        }
    }

    #[must_use]
    pub fn numerator(self) -> u64 {
        self.numerator
    }

    #[must_use]
    pub fn denominator(self) -> u64 {
        self.denominator
    }

    /// Key strictly between `after` and `before`.
    ///
    /// A missing `after` stands for the virtual lower bound `0/1` and a missing
    /// `before` for the virtual upper bound `1/0`. Returns `None` when either
    /// component of the mediant would exceed [`MAX_COMPONENT`].
    #[must_use]
    pub fn between(after: Option<Self>, before: Option<Self>) -> Option<Self> {
        let Fraction(an, ad) = after.map_or(LOWER_BOUND, Self::fraction);
        let Fraction(bn, bd) = before.map_or(UPPER_BOUND, Self::fraction);
        let numerator = an.checked_add(bn)?;
        let denominator = ad.checked_add(bd)?;
        if numerator > MAX_COMPONENT || denominator > MAX_COMPONENT {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    /// Floating-point projection, for display and coarse SQL ordering only.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Recover a key from its floating-point projection.
    ///
    /// Used for rows that lost their exact pair. Walks the continued-fraction
    /// expansion of `value` and keeps the last convergent whose components fit
    /// within [`MAX_COMPONENT`]. Returns `None` for negative or non-finite
    /// input.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn approximate(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let (mut h_prev, mut h) = (0_u64, 1_u64);
        let (mut k_prev, mut k) = (1_u64, 0_u64);
        let mut x = value;
        loop {
            let whole = x.floor();
            if whole > MAX_COMPONENT as f64 {
                break;
            }
            let a = whole as u64;
            let Some(h_next) = a.checked_mul(h).and_then(|v| v.checked_add(h_prev)) else {
                break;
            };
            let Some(k_next) = a.checked_mul(k).and_then(|v| v.checked_add(k_prev)) else {
                break;
            };
            if h_next > MAX_COMPONENT || k_next > MAX_COMPONENT {
                break;
            }
            (h_prev, h) = (h, h_next);
            (k_prev, k) = (k, k_next);
            let rest = x - whole;
            if rest < 1e-12 {
                break;
            }
            x = 1.0 / rest;
        }
        Self::new(h, k).ok()
    }

    fn fraction(self) -> Fraction {
        Fraction(self.numerator, self.denominator)
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.numerator) * u128::from(other.denominator);
        let rhs = u128::from(other.numerator) * u128::from(self.denominator);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u64, d: u64) -> OrderKey {
        OrderKey::new(n, d).unwrap()
    }

    #[test]
    fn should_reject_zero_denominator() {
        assert_eq!(OrderKey::new(1, 0), Err(ValidationError::ZeroDenominator));
    }

    #[test]
    fn should_insert_mediant_between_two_keys() {
        let mid = OrderKey::between(Some(key(1, 1)), Some(key(2, 1))).unwrap();
        assert_eq!((mid.numerator(), mid.denominator()), (3, 2));
        assert!(key(1, 1) < mid && mid < key(2, 1));
    }

    #[test]
    fn should_use_virtual_lower_bound_when_after_missing() {
        let first = OrderKey::between(None, Some(key(1, 2))).unwrap();
        assert_eq!((first.numerator(), first.denominator()), (1, 3));
        assert!(first < key(1, 2));
    }

    #[test]
    fn should_use_virtual_upper_bound_when_before_missing() {
        let last = OrderKey::between(Some(key(3, 2)), None).unwrap();
        assert_eq!((last.numerator(), last.denominator()), (4, 2));
        assert!(last > key(3, 2));
    }

    #[test]
    fn should_start_at_one_when_group_is_empty() {
        let only = OrderKey::between(None, None).unwrap();
        assert_eq!(only, key(1, 1));
    }

    #[test]
    fn should_stay_strictly_between_under_repeated_head_insertion() {
        let mut head = key(1, 1);
        for _ in 0..1_000 {
            let next = OrderKey::between(None, Some(head)).unwrap();
            assert!(next < head);
            assert!(next > key(0, 1));
            head = next;
        }
        assert_eq!(head.denominator(), 1_001);
    }

    #[test]
    fn should_refuse_mediant_past_component_bound() {
        let big = key(MAX_COMPONENT, 1);
        assert!(OrderKey::between(Some(big), None).is_none());
    }

    #[test]
    fn should_compare_by_rational_value() {
        assert_eq!(key(1, 2), key(2, 4));
        assert!(key(2, 3) > key(3, 5));
        assert!(key(0, 1) < key(1, MAX_COMPONENT));
    }

    #[test]
    fn should_project_to_float() {
        assert!((key(3, 2).as_f64() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn should_recover_exact_key_from_projection() {
        let recovered = OrderKey::approximate(key(3, 2).as_f64()).unwrap();
        assert_eq!((recovered.numerator(), recovered.denominator()), (3, 2));

        let recovered = OrderKey::approximate(key(5, 13).as_f64()).unwrap();
        assert_eq!((recovered.numerator(), recovered.denominator()), (5, 13));
    }

    #[test]
    fn should_reject_negative_or_nan_projection() {
        assert!(OrderKey::approximate(-1.0).is_none());
        assert!(OrderKey::approximate(f64::NAN).is_none());
    }

    #[test]
    fn should_display_as_fraction() {
        assert_eq!(key(3, 2).to_string(), "3/2");
    }
}
