//! Cart

use smallvec::SmallVec;
use thiserror::Error;

use crate::books::BookId;

/// Errors related to cart construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A quantity is negative or too large to represent.
    #[error("Invalid quantity {quantity} for book {book}")]
    InvalidQuantity {
        /// Book the quantity was given for
        book: BookId,
        /// Rejected quantity
        quantity: i64,
    },

    /// The same book appears on more than one cart line.
    #[error("Book {0} appears on more than one cart line")]
    DuplicateBook(BookId),
}

/// A single cart line: a title and how many copies of it to buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine {
    book: BookId,
    quantity: u32,
}

impl CartLine {
    /// Book on this line
    pub fn book(&self) -> BookId {
        self.book
    }

    /// Number of copies
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Ordered list of cart lines.
///
/// Line order is the order copies are handed out to discount sets, so it is
/// kept exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Create a cart from `(book, quantity)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a quantity is negative or a book is repeated.
    pub fn with_lines(lines: impl IntoIterator<Item = (BookId, i64)>) -> Result<Self, CartError> {
        let mut cart = Cart::new();

        for (book, quantity) in lines {
            cart.add(book, quantity)?;
        }

        Ok(cart)
    }

    /// Append a line to the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the quantity is negative or the book is already in the cart.
    pub fn add(&mut self, book: BookId, quantity: i64) -> Result<&mut Self, CartError> {
        let quantity =
            u32::try_from(quantity).map_err(|_err| CartError::InvalidQuantity { book, quantity })?;

        if self.lines.iter().any(|line| line.book == book) {
            return Err(CartError::DuplicateBook(book));
        }

        self.lines.push(CartLine { book, quantity });

        Ok(self)
    }

    /// Iterate over every line, including zero-quantity ones.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Lines with at least one copy, in cart order.
    pub fn purchased(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|line| line.quantity > 0)
    }

    /// Every book referenced by the cart, in cart order.
    pub fn book_ids(&self) -> SmallVec<[BookId; 8]> {
        self.lines.iter().map(|line| line.book).collect()
    }

    /// Total number of copies across all lines.
    pub fn total_copies(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.quantity as usize)
            .sum()
    }

    /// Number of titles with at least one copy.
    pub fn distinct_titles(&self) -> usize {
        self.purchased().count()
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
