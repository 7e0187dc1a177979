//! Prices

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use serde::{Serialize, Serializer};

/// Number of fraction digits in a final price.
pub const PRICE_SCALE: u32 = 2;

/// A final, rounded price with exactly two fraction digits.
///
/// Serializes as a decimal string (`"51.20"`), never as a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Zero price
    pub const ZERO: Price = Price(Decimal::from_parts(0, 0, 0, false, PRICE_SCALE));

    /// Round an exact amount half-up to two fraction digits.
    pub fn round_half_up(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(PRICE_SCALE);

        Price(rounded)
    }

    /// The rounded amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// The price as money in `currency`, for display.
    pub fn to_money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_decimal(self.0, currency)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
