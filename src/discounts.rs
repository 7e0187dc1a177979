//! Discounts

use std::fmt;

use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

/// Errors specific to discount table construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Factors must lie between zero and one inclusive.
    #[error("discount factor {factor} for set size {size} is outside 0..=1")]
    FactorOutOfRange {
        /// Set size the factor was given for
        size: usize,
        /// Rejected factor
        factor: Decimal,
    },

    /// A size was listed more than once.
    #[error("discount factor for set size {0} is defined more than once")]
    DuplicateSize(usize),
}

/// Multiplier applied to the combined price of a discount set, by set size.
///
/// Sizes without an entry, including zero, pay full price.
#[derive(Clone, PartialEq, Eq)]
pub struct DiscountFactorTable {
    factors: SmallVec<[(usize, Decimal); 8]>,
}

impl DiscountFactorTable {
    /// Create a table from `(size, factor)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if a factor is outside `0..=1` or a size repeats.
    pub fn new(entries: impl IntoIterator<Item = (usize, Decimal)>) -> Result<Self, DiscountError> {
        let mut factors: SmallVec<[(usize, Decimal); 8]> = SmallVec::new();

        for (size, factor) in entries {
            if factor < Decimal::ZERO || factor > Decimal::ONE {
                return Err(DiscountError::FactorOutOfRange { size, factor });
            }

            if factors.iter().any(|&(existing, _)| existing == size) {
                return Err(DiscountError::DuplicateSize(size));
            }

            factors.push((size, factor));
        }

        factors.sort_unstable_by_key(|&(size, _)| size);

        Ok(DiscountFactorTable { factors })
    }

    /// Multiplier for a set of `size` distinct titles.
    pub fn factor(&self, size: usize) -> Decimal {
        self.factors
            .iter()
            .find(|&&(entry_size, _)| entry_size == size)
            .map_or(Decimal::ONE, |&(_, factor)| factor)
    }

    /// Iterate over the configured `(size, factor)` entries in size order.
    pub fn iter(&self) -> impl Iterator<Item = &(usize, Decimal)> {
        self.factors.iter()
    }
}

impl Default for DiscountFactorTable {
    /// Standard bundle discounts: 5% for two titles, 10% for three, 20% for
    /// four and 25% for five. Larger sets get no discount.
    fn default() -> Self {
        DiscountFactorTable {
            factors: smallvec![
                (1, Decimal::ONE),
                (2, Decimal::new(95, 2)),
                (3, Decimal::new(90, 2)),
                (4, Decimal::new(80, 2)),
                (5, Decimal::new(75, 2)),
            ],
        }
    }
}

impl fmt::Debug for DiscountFactorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.factors.iter().map(|(size, factor)| (size, factor)))
            .finish()
    }
}
