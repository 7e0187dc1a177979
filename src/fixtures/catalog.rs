//! Catalog Fixtures

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;

use crate::{
    books::{Book, BookId},
    catalog::Catalog,
    fixtures::FixtureError,
};

/// Catalog file contents
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// ISO 4217 currency code shared by every price (e.g., "EUR")
    pub currency: String,

    /// Books in listing order
    pub books: Vec<BookFixture>,
}

/// Book Fixture
#[derive(Debug, Deserialize)]
pub struct BookFixture {
    /// Book ID
    pub id: u64,

    /// Book title
    pub name: String,

    /// Unit price as a decimal string (e.g., "8.00")
    pub price: String,
}

impl TryFrom<BookFixture> for Book {
    type Error = FixtureError;

    fn try_from(fixture: BookFixture) -> Result<Self, Self::Error> {
        let price = parse_price(&fixture.price)?;

        Ok(Book::new(BookId::new(fixture.id), fixture.name, price))
    }
}

impl TryFrom<CatalogFixture> for Catalog {
    type Error = FixtureError;

    fn try_from(fixture: CatalogFixture) -> Result<Self, Self::Error> {
        let currency = parse_currency(&fixture.currency)?;

        let books = fixture
            .books
            .into_iter()
            .map(Book::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::with_books(books, currency)?)
    }
}

/// Parse a price string (e.g., "8.00") into an exact decimal.
///
/// # Errors
///
/// Returns an error if the string is not a decimal number or is negative.
pub fn parse_price(s: &str) -> Result<Decimal, FixtureError> {
    let price = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if price < Decimal::ZERO {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(price)
}

/// Look up an ISO currency by its code.
///
/// # Errors
///
/// Returns an error if the currency code is not recognized.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    iso::find(code.trim()).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
}
