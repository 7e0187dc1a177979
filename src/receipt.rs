//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    discounts::DiscountFactorTable,
    optimizer::PriceCalculation,
    price::Price,
    pricing::{PricingError, set_price, set_subtotal},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing a discount set.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One discount set on the receipt.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    /// Titles in the set
    pub titles: Vec<String>,

    /// Price of the titles before the set discount
    pub subtotal: Decimal,

    /// Factor applied to the subtotal
    pub factor: Decimal,

    /// Discounted price of the set, unrounded
    pub price: Decimal,
}

impl ReceiptLine {
    /// Percentage taken off the subtotal, e.g. `25` for a factor of `0.75`.
    pub fn discount_percent(&self) -> Decimal {
        ((Decimal::ONE - self.factor) * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Breakdown of a price calculation, one line per discount set.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    subtotal: Decimal,
    total: Price,
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt from a calculation and the discount table it was run with.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a set can no longer be priced or the
    /// subtotal overflows.
    pub fn from_calculation(
        calculation: &PriceCalculation,
        discounts: &DiscountFactorTable,
    ) -> Result<Self, ReceiptError> {
        let catalog = &calculation.catalog;

        let lines = calculation
            .discount_sets
            .iter()
            .map(|set| {
                let subtotal = set_subtotal(set, catalog)?;
                let factor = discounts.factor(set.len());
                let price = set_price(set, catalog, discounts)?;

                let titles = set
                    .books()
                    .iter()
                    .map(|&book| {
                        catalog
                            .get(book)
                            .map_or_else(|| format!("#{book}"), |book| book.name.clone())
                    })
                    .collect();

                Ok(ReceiptLine {
                    titles,
                    subtotal,
                    factor,
                    price,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let subtotal = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.subtotal))
            .ok_or(PricingError::Overflow)?;

        Ok(Receipt {
            lines,
            subtotal,
            total: calculation.price,
            currency: calculation.currency(),
        })
    }

    /// Discount set lines
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total before set discounts
    pub fn subtotal(&self) -> Money<'static, Currency> {
        Price::round_half_up(self.subtotal).to_money(self.currency)
    }

    /// Amount payable
    pub fn total(&self) -> Money<'static, Currency> {
        self.total.to_money(self.currency)
    }

    /// Amount saved by bundling.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.subtotal().sub(self.total())
    }

    /// Write the receipt as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if writing fails.
    pub fn write_to(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Set", "Books", "Subtotal", "Discount", "Price"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.titles.join(", "),
                format!("{}", Price::round_half_up(line.subtotal).to_money(self.currency)),
                format!("{}%", line.discount_percent()),
                format!("{}", Price::round_half_up(line.price).to_money(self.currency)),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        let savings = self.savings()?;

        writeln!(out, " Subtotal: {}", self.subtotal()).map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Savings:  {savings}").map_err(|_err| ReceiptError::IO)?;
        writeln!(out, " Total:    {}", self.total()).map_err(|_err| ReceiptError::IO)?;

        Ok(())
    }
}
