//! Money type for representing monetary values.
//!
//! Prices arrive from the gateway as 64-bit integers in the smallest unit the
//! store charges in. Totals are widened to `u128` so `price × quantity` sums
//! can never overflow, however large the cart.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Symbol used when formatting amounts for shoppers.
pub const CURRENCY_SYMBOL: &str = "\u{20b9}";

/// A non-negative monetary amount in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    minor_units: u128,
}

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money { minor_units: 0 };

    /// Create a Money value from minor units.
    pub const fn new(minor_units: u128) -> Self {
        Self { minor_units }
    }

    /// Create a Money value from a catalog price.
    pub const fn from_price(price: u64) -> Self {
        Self::new(price as u128)
    }

    /// Total for `quantity` units at `price` each.
    pub const fn line_total(price: u64, quantity: u32) -> Self {
        Self::new(price as u128 * quantity as u128)
    }

    /// Get the amount in minor units.
    pub const fn minor_units(self) -> u128 {
        self.minor_units
    }

    /// Narrow to `u64`, if the amount fits.
    pub fn to_u64(self) -> Option<u64> {
        u64::try_from(self.minor_units).ok()
    }

    /// Check if this is zero.
    pub const fn is_zero(self) -> bool {
        self.minor_units == 0
    }

    /// Format as a display string with Indian digit grouping (e.g., "₹1,20,000").
    pub fn display(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.display_amount())
    }

    /// Format without the symbol (e.g., "1,20,000").
    ///
    /// The last three digits form one group; every group before that has two.
    pub fn display_amount(&self) -> String {
        let digits = self.minor_units.to_string();
        if digits.len() <= 3 {
            return digits;
        }

        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();

        format!("{},{}", groups.join(","), tail)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.minor_units.saturating_add(other.minor_units))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl From<u64> for Money {
    fn from(price: u64) -> Self {
        Money::from_price(price)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::new(0).display_amount(), "0");
        assert_eq!(Money::new(500).display_amount(), "500");
        assert_eq!(Money::new(1_000).display_amount(), "1,000");
        assert_eq!(Money::new(120_000).display_amount(), "1,20,000");
        assert_eq!(Money::new(1_234_567).display_amount(), "12,34,567");
        assert_eq!(Money::new(12_345_678).display_amount(), "1,23,45,678");
    }

    #[test]
    fn test_display_symbol() {
        assert_eq!(Money::new(220_000).display(), "\u{20b9}2,20,000");
    }

    #[test]
    fn test_line_total_beyond_u64() {
        let total = Money::line_total(u64::MAX, 3);
        assert_eq!(total.minor_units(), u64::MAX as u128 * 3);
        assert_eq!(total.to_u64(), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::line_total(50_000, 2), Money::line_total(120_000, 1)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(220_000));
    }
}
