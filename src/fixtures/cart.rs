//! Cart Fixtures

use serde::Deserialize;

use crate::{
    books::BookId,
    cart::Cart,
    fixtures::FixtureError,
};

/// Cart file contents
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines in order
    pub lines: Vec<CartLineFixture>,
}

/// Cart Line Fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Book ID
    pub book: u64,

    /// Number of copies
    pub quantity: i64,
}

impl TryFrom<CartFixture> for Cart {
    type Error = FixtureError;

    fn try_from(fixture: CartFixture) -> Result<Self, Self::Error> {
        let lines = fixture
            .lines
            .into_iter()
            .map(|line| (BookId::new(line.book), line.quantity));

        Ok(Cart::with_lines(lines)?)
    }
}

/// Parse a `BOOK=QUANTITY` pair, as given on the command line.
///
/// # Errors
///
/// Returns an error if the pair is malformed or either side is not an integer.
pub fn parse_line(s: &str) -> Result<(BookId, i64), FixtureError> {
    let invalid = || FixtureError::InvalidCartLine(s.to_string());

    let (book, quantity) = s.split_once('=').ok_or_else(invalid)?;

    let book = book.trim().parse::<u64>().map_err(|_err| invalid())?;
    let quantity = quantity.trim().parse::<i64>().map_err(|_err| invalid())?;

    Ok((BookId::new(book), quantity))
}
