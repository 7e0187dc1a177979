//! Catalog
//!
//! A [`Catalog`] is an immutable snapshot of book prices in a single
//! currency. Calculations never read from a live source directly: they
//! ask a [`CatalogLookup`] to resolve the identifiers in the cart, then
//! work against the returned snapshot.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::books::{Book, BookId};

/// Errors related to catalog construction or lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A requested book is not in the catalog.
    #[error("Unknown book ID: {0}")]
    UnknownBook(BookId),

    /// The same book ID was added to the catalog twice.
    #[error("Book {0} is listed more than once in the catalog")]
    DuplicateBook(BookId),

    /// A book has a price below zero.
    #[error("Book {id} has negative price {price}")]
    NegativePrice {
        /// Offending book
        id: BookId,
        /// Offending price
        price: Decimal,
    },
}

/// Resolves book identifiers into a catalog snapshot.
///
/// Resolution is total-or-fail: an implementation must either return a
/// snapshot containing every requested identifier, or an error. Callers
/// reject snapshots that come back short all the same.
pub trait CatalogLookup {
    /// Resolve the given identifiers into a price snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBook`] if any identifier cannot be resolved.
    fn resolve(&self, ids: &[BookId]) -> Result<Catalog, CatalogError>;
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn resolve(&self, ids: &[BookId]) -> Result<Catalog, CatalogError> {
        (**self).resolve(ids)
    }
}

/// Immutable book catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
    index: FxHashMap<BookId, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            books: Vec::new(),
            index: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from a list of books, keeping their order for listings.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a book ID is repeated or a price is negative.
    pub fn with_books(
        books: impl IntoIterator<Item = Book>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(currency);

        for book in books {
            if book.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    id: book.id,
                    price: book.price,
                });
            }

            if catalog.index.contains_key(&book.id) {
                return Err(CatalogError::DuplicateBook(book.id));
            }

            catalog.index.insert(book.id, catalog.books.len());
            catalog.books.push(book);
        }

        Ok(catalog)
    }

    /// Look up a book by ID.
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.index.get(&id).and_then(|&idx| self.books.get(idx))
    }

    /// Unit price of a book.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownBook`] if the book is not in the catalog.
    pub fn price(&self, id: BookId) -> Result<Decimal, CatalogError> {
        self.get(id)
            .map(|book| book.price)
            .ok_or(CatalogError::UnknownBook(id))
    }

    /// Check whether the catalog lists a book.
    pub fn contains(&self, id: BookId) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterate over the books in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    /// Number of books in the catalog.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Currency all prices are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl CatalogLookup for Catalog {
    fn resolve(&self, ids: &[BookId]) -> Result<Catalog, CatalogError> {
        let mut resolved = Catalog::new(self.currency);

        for &id in ids {
            if resolved.contains(id) {
                continue;
            }

            let book = self.get(id).ok_or(CatalogError::UnknownBook(id))?;

            resolved.index.insert(id, resolved.books.len());
            resolved.books.push(book.clone());
        }

        Ok(resolved)
    }
}

/// Verify a resolved snapshot covers every requested identifier.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownBook`] for the first identifier missing
/// from the snapshot.
pub fn ensure_resolved(requested: &[BookId], resolved: &Catalog) -> Result<(), CatalogError> {
    requested
        .iter()
        .find(|&&id| !resolved.contains(id))
        .map_or(Ok(()), |&id| Err(CatalogError::UnknownBook(id)))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{EUR, GBP};
    use testresult::TestResult;

    use super::*;

    fn test_books() -> [Book; 3] {
        [
            Book::new(BookId::new(1), "Clean Code", Decimal::new(800, 2)),
            Book::new(BookId::new(2), "The Clean Coder", Decimal::new(800, 2)),
            Book::new(BookId::new(3), "Clean Architecture", Decimal::new(1250, 2)),
        ]
    }

    #[test]
    fn with_books_keeps_insertion_order() -> TestResult {
        let catalog = Catalog::with_books(test_books(), EUR)?;

        let ids: Vec<u64> = catalog.iter().map(|book| book.id.get()).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.currency(), EUR);

        Ok(())
    }

    #[test]
    fn with_books_rejects_duplicates() {
        let mut books = test_books().to_vec();
        books.push(Book::new(BookId::new(2), "Again", Decimal::ONE));

        let result = Catalog::with_books(books, EUR);

        assert_eq!(result.err(), Some(CatalogError::DuplicateBook(BookId::new(2))));
    }

    #[test]
    fn with_books_rejects_negative_prices() {
        let books = [Book::new(BookId::new(9), "Refund", Decimal::new(-1, 2))];

        let result = Catalog::with_books(books, GBP);

        assert!(matches!(
            result,
            Err(CatalogError::NegativePrice { id, .. }) if id == BookId::new(9)
        ));
    }

    #[test]
    fn price_of_unknown_book_errors() -> TestResult {
        let catalog = Catalog::with_books(test_books(), EUR)?;

        assert_eq!(catalog.price(BookId::new(3))?, Decimal::new(1250, 2));
        assert_eq!(
            catalog.price(BookId::new(99)),
            Err(CatalogError::UnknownBook(BookId::new(99)))
        );

        Ok(())
    }

    #[test]
    fn resolve_returns_only_requested_books() -> TestResult {
        let catalog = Catalog::with_books(test_books(), EUR)?;

        let resolved = catalog.resolve(&[BookId::new(3), BookId::new(1), BookId::new(3)])?;

        assert_eq!(resolved.len(), 2);
        assert!(resolved.contains(BookId::new(1)));
        assert!(!resolved.contains(BookId::new(2)));
        assert_eq!(resolved.currency(), EUR);

        Ok(())
    }

    #[test]
    fn resolve_fails_on_unknown_id() -> TestResult {
        let catalog = Catalog::with_books(test_books(), EUR)?;

        let result = catalog.resolve(&[BookId::new(1), BookId::new(4)]);

        assert_eq!(result.err(), Some(CatalogError::UnknownBook(BookId::new(4))));

        Ok(())
    }

    #[test]
    fn ensure_resolved_detects_short_snapshot() -> TestResult {
        let catalog = Catalog::with_books(test_books(), EUR)?;
        let partial = catalog.resolve(&[BookId::new(1)])?;

        assert_eq!(ensure_resolved(&[BookId::new(1)], &partial), Ok(()));
        assert_eq!(
            ensure_resolved(&[BookId::new(1), BookId::new(2)], &partial),
            Err(CatalogError::UnknownBook(BookId::new(2)))
        );

        Ok(())
    }
}
