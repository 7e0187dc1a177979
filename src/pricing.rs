//! Pricing

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    assignment::DiscountSet,
    catalog::{Catalog, CatalogError},
    discounts::DiscountFactorTable,
};

/// Errors that can occur while pricing discount sets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A set member is missing from the catalog snapshot.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Decimal arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// Price of a single discount set: the sum of its titles' prices times the
/// factor for its size.
///
/// # Errors
///
/// - [`PricingError::Catalog`]: A title in the set is not in the catalog.
/// - [`PricingError::Overflow`]: The sum or product does not fit in a `Decimal`.
pub fn set_price(
    set: &DiscountSet,
    catalog: &Catalog,
    table: &DiscountFactorTable,
) -> Result<Decimal, PricingError> {
    let subtotal = set_subtotal(set, catalog)?;

    subtotal
        .checked_mul(table.factor(set.len()))
        .ok_or(PricingError::Overflow)
}

/// Undiscounted price of a discount set.
///
/// # Errors
///
/// - [`PricingError::Catalog`]: A title in the set is not in the catalog.
/// - [`PricingError::Overflow`]: The sum does not fit in a `Decimal`.
pub fn set_subtotal(set: &DiscountSet, catalog: &Catalog) -> Result<Decimal, PricingError> {
    set.books().iter().try_fold(Decimal::ZERO, |acc, &book| {
        acc.checked_add(catalog.price(book)?)
            .ok_or(PricingError::Overflow)
    })
}

/// Total price of a list of discount sets, unrounded.
///
/// # Errors
///
/// - [`PricingError::Catalog`]: A title in a set is not in the catalog.
/// - [`PricingError::Overflow`]: The total does not fit in a `Decimal`.
pub fn total_price(
    sets: &[DiscountSet],
    catalog: &Catalog,
    table: &DiscountFactorTable,
) -> Result<Decimal, PricingError> {
    sets.iter().try_fold(Decimal::ZERO, |acc, set| {
        acc.checked_add(set_price(set, catalog, table)?)
            .ok_or(PricingError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use crate::books::{Book, BookId};

    use super::*;

    fn test_catalog() -> Result<Catalog, CatalogError> {
        Catalog::with_books(
            [
                Book::new(BookId::new(1), "Book 1", Decimal::new(800, 2)),
                Book::new(BookId::new(2), "Book 2", Decimal::new(800, 2)),
                Book::new(BookId::new(3), "Book 3", Decimal::new(1999, 2)),
            ],
            EUR,
        )
    }

    fn set(ids: &[u64]) -> DiscountSet {
        ids.iter().copied().map(BookId::new).collect()
    }

    #[test]
    fn pair_gets_five_percent_off() -> TestResult {
        let catalog = test_catalog()?;
        let table = DiscountFactorTable::default();

        assert_eq!(set_price(&set(&[1, 2]), &catalog, &table)?, Decimal::new(1520, 2));

        Ok(())
    }

    #[test]
    fn total_keeps_full_precision() -> TestResult {
        let catalog = test_catalog()?;
        let table = DiscountFactorTable::default();

        // (8.00 + 8.00 + 19.99) * 0.90 = 32.391
        let total = total_price(&[set(&[1, 2, 3])], &catalog, &table)?;

        assert_eq!(total, Decimal::new(32391, 3));

        Ok(())
    }

    #[test]
    fn total_sums_every_set() -> TestResult {
        let catalog = test_catalog()?;
        let table = DiscountFactorTable::default();

        let total = total_price(&[set(&[1, 2]), set(&[1]), set(&[3])], &catalog, &table)?;

        assert_eq!(total, Decimal::new(4319, 2));

        Ok(())
    }

    #[test]
    fn empty_set_costs_nothing() -> TestResult {
        let catalog = test_catalog()?;
        let table = DiscountFactorTable::default();

        assert_eq!(set_price(&DiscountSet::new(), &catalog, &table)?, Decimal::ZERO);
        assert_eq!(total_price(&[], &catalog, &table)?, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn unknown_member_is_an_error() -> TestResult {
        let catalog = test_catalog()?;
        let table = DiscountFactorTable::default();

        let result = total_price(&[set(&[1, 7])], &catalog, &table);

        assert_eq!(
            result,
            Err(PricingError::Catalog(CatalogError::UnknownBook(BookId::new(7))))
        );

        Ok(())
    }

    #[test]
    fn overflow_is_an_error() -> TestResult {
        let catalog = Catalog::with_books(
            [
                Book::new(BookId::new(1), "Huge 1", Decimal::MAX),
                Book::new(BookId::new(2), "Huge 2", Decimal::MAX),
            ],
            EUR,
        )?;

        let result = set_subtotal(&set(&[1, 2]), &catalog);

        assert_eq!(result, Err(PricingError::Overflow));

        Ok(())
    }
}
