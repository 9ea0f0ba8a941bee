//! Dissimilarity cost accumulator.
//!
//! Every comparison builds up a `Weight` with two counters: `real` is the
//! cost under the currently active diff flags, `total` is the cost as if
//! every optional diff category were enabled. Sequence alignment uses
//! `total == 0` as its equality test so that toggling cosmetic flags never
//! changes which children are considered matching, only how loudly the
//! mismatch is reported.

use serde::Serialize;

use crate::error::{DiffError, Result};

/// Accumulated dissimilarity cost for a (sub)tree comparison.
///
/// Both counters start at zero and only increase. The accumulator itself
/// guarantees nothing about their relative order; the engines mirror every
/// flag-gated `real` addition with a `total` addition of the same penalty,
/// and `real == total` when every optional diff category is enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weight {
    real: f64,
    total: f64,
}

fn checked(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(DiffError::InvalidWeight { value: amount });
    }
    Ok(amount)
}

impl Weight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a penalty to both counters.
    pub fn add(&mut self, amount: f64) -> Result<&mut Self> {
        let amount = checked(amount)?;
        self.real += amount;
        self.total += amount;
        Ok(self)
    }

    /// Adds a penalty to `real` only. Used when an optional diff category is
    /// enabled and its penalty actually applies.
    pub fn add_real(&mut self, amount: f64) -> Result<&mut Self> {
        self.real += checked(amount)?;
        Ok(self)
    }

    /// Adds a penalty to `total` only. Used to count a penalty that an
    /// optional diff category has filtered out of `real`.
    pub fn add_total(&mut self, amount: f64) -> Result<&mut Self> {
        self.total += checked(amount)?;
        Ok(self)
    }

    /// Folds a child accumulator into this one, pointwise.
    pub fn merge(&mut self, other: &Weight) -> &mut Self {
        self.real += other.real;
        self.total += other.total;
        self
    }

    pub fn real(&self) -> f64 {
        self.real
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Flag-independent equality: the two trees are structurally identical.
    pub fn is_zero(&self) -> bool {
        self.total == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_increases_both_counters() {
        let mut weight = Weight::new();
        weight.add(3.0).unwrap().add(2.0).unwrap();
        assert_eq!(weight.real(), 5.0);
        assert_eq!(weight.total(), 5.0);
    }

    #[test]
    fn add_real_leaves_total_untouched() {
        let mut weight = Weight::new();
        weight.add_real(2.0).unwrap();
        assert_eq!(weight.real(), 2.0);
        assert_eq!(weight.total(), 0.0);
    }

    #[test]
    fn add_total_leaves_real_untouched() {
        let mut weight = Weight::new();
        weight.add_total(4.0).unwrap();
        assert_eq!(weight.real(), 0.0);
        assert_eq!(weight.total(), 4.0);
    }

    #[test]
    fn merge_adds_pointwise() {
        let mut parent = Weight::new();
        parent.add(1.0).unwrap();
        let mut child = Weight::new();
        child.add_real(2.0).unwrap().add_total(3.0).unwrap();
        parent.merge(&child);
        assert_eq!(parent.real(), 3.0);
        assert_eq!(parent.total(), 4.0);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut weight = Weight::new();
        assert!(matches!(
            weight.add(-1.0),
            Err(DiffError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        let mut weight = Weight::new();
        assert!(weight.add(f64::NAN).is_err());
        assert!(weight.add_real(f64::INFINITY).is_err());
    }

    #[test]
    fn is_zero_tracks_total_not_real() {
        let mut weight = Weight::new();
        weight.add_real(2.0).unwrap();
        // Real-only additions do not happen in practice without a matching
        // total addition, but is_zero is defined on total alone.
        assert!(weight.is_zero());
        weight.add_total(1.0).unwrap();
        assert!(!weight.is_zero());
    }
}
