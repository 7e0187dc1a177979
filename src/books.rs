//! Books

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable identifier of a book title in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    /// Creates a new book identifier
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Book identifier
    pub id: BookId,

    /// Book title
    pub name: String,

    /// Unit price of a single copy
    pub price: Decimal,
}

impl Book {
    /// Creates a new book
    pub fn new(id: BookId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}
