//! Discount set assignment
//!
//! Turns one grouping into concrete discount sets by handing out copies in
//! cart order. Each set takes at most one copy of any title. Copies left
//! over once every target size has been served become singleton sets.

use smallvec::SmallVec;

use crate::{
    books::BookId,
    cart::{Cart, CartLine},
};

/// A group of distinct titles priced together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountSet {
    books: SmallVec<[BookId; 5]>,
}

impl DiscountSet {
    /// Create an empty discount set.
    pub fn new() -> Self {
        DiscountSet::default()
    }

    /// Add a title to the set. Returns `false` if it was already present.
    pub fn insert(&mut self, book: BookId) -> bool {
        if self.books.contains(&book) {
            return false;
        }

        self.books.push(book);

        true
    }

    /// Check whether the set holds a title.
    pub fn contains(&self, book: BookId) -> bool {
        self.books.contains(&book)
    }

    /// Titles in the order they were added.
    pub fn books(&self) -> &[BookId] {
        &self.books
    }

    /// Number of distinct titles in the set.
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl FromIterator<BookId> for DiscountSet {
    fn from_iter<I: IntoIterator<Item = BookId>>(iter: I) -> Self {
        let mut set = DiscountSet::new();

        for book in iter {
            set.insert(book);
        }

        set
    }
}

/// Distribute the cart's copies into discount sets following `grouping`.
///
/// Sets are filled one target size at a time, taking one copy of each title
/// that still has copies left, in cart order. A set ends up smaller than its
/// target when the cart runs out of titles to give it.
pub fn assign(cart: &Cart, grouping: &[usize]) -> Vec<DiscountSet> {
    let books: SmallVec<[BookId; 8]> = cart.purchased().map(CartLine::book).collect();
    let mut remaining: SmallVec<[u32; 8]> = cart.purchased().map(CartLine::quantity).collect();

    let mut sets = Vec::with_capacity(grouping.len());

    for &target in grouping {
        sets.push(take_set(&books, &mut remaining, target));
    }

    while remaining.iter().any(|&quantity| quantity > 0) {
        for (book, quantity) in books.iter().zip(remaining.iter_mut()) {
            if *quantity > 0 {
                sets.push(DiscountSet::from_iter([*book]));
                *quantity -= 1;
            }
        }
    }

    sets
}

/// Open one set of up to `target` titles, taking a copy of each title in
/// `books` whose count in `remaining` is still positive.
///
/// `books` and `remaining` are parallel slices in cart order.
pub fn take_set(books: &[BookId], remaining: &mut [u32], target: usize) -> DiscountSet {
    let mut set = DiscountSet::new();

    for (book, quantity) in books.iter().zip(remaining.iter_mut()) {
        if set.len() == target {
            break;
        }

        if *quantity > 0 {
            set.insert(*book);
            *quantity -= 1;
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn id(n: u64) -> BookId {
        BookId::new(n)
    }

    fn books(sets: &[DiscountSet]) -> Vec<Vec<u64>> {
        sets.iter()
            .map(|set| set.books().iter().map(|book| book.get()).collect())
            .collect()
    }

    #[test]
    fn discount_set_rejects_repeated_title() {
        let mut set = DiscountSet::new();

        assert!(set.insert(id(1)));
        assert!(!set.insert(id(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn fills_sets_in_cart_order() -> TestResult {
        let cart = Cart::with_lines([(id(1), 2), (id(2), 2), (id(3), 2), (id(4), 1), (id(5), 1)])?;

        let sets = assign(&cart, &[4, 4]);

        assert_eq!(books(&sets), vec![vec![1, 2, 3, 4], vec![1, 2, 3, 5]]);

        Ok(())
    }

    #[test]
    fn leftovers_become_singletons() -> TestResult {
        let cart = Cart::with_lines([(id(1), 1), (id(2), 2)])?;

        let sets = assign(&cart, &[1, 2]);

        assert_eq!(books(&sets), vec![vec![1], vec![2], vec![2]]);

        Ok(())
    }

    #[test]
    fn leftovers_drain_round_robin() -> TestResult {
        let cart = Cart::with_lines([(id(1), 3), (id(2), 2)])?;

        let sets = assign(&cart, &[]);

        assert_eq!(
            books(&sets),
            vec![vec![1], vec![2], vec![1], vec![2], vec![1]]
        );

        Ok(())
    }

    #[test]
    fn target_larger_than_available_titles_underfills() -> TestResult {
        let cart = Cart::with_lines([(id(1), 2), (id(2), 1)])?;

        let sets = assign(&cart, &[2, 2]);

        assert_eq!(books(&sets), vec![vec![1, 2], vec![1]]);

        Ok(())
    }

    #[test]
    fn zero_quantity_lines_are_skipped() -> TestResult {
        let cart = Cart::with_lines([(id(1), 0), (id(2), 1), (id(3), 0)])?;

        let sets = assign(&cart, &[1]);

        assert_eq!(books(&sets), vec![vec![2]]);

        Ok(())
    }

    #[test]
    fn take_set_skips_exhausted_titles() {
        let books = [id(1), id(2), id(3)];
        let mut remaining = [0, 2, 1];

        let set = take_set(&books, &mut remaining, 2);

        assert_eq!(set.books(), &[id(2), id(3)]);
        assert_eq!(remaining, [0, 1, 0]);

        let set = take_set(&books, &mut remaining, 3);

        assert_eq!(set.books(), &[id(2)]);
        assert_eq!(remaining, [0, 0, 0]);
    }

    #[test]
    fn every_copy_is_assigned_exactly_once() -> TestResult {
        let cart = Cart::with_lines([(id(1), 3), (id(2), 1), (id(3), 2)])?;

        for grouping in [vec![3, 2, 1], vec![1, 1, 1, 1, 1, 1], vec![2, 2, 2], vec![3, 3]] {
            let sets = assign(&cart, &grouping);

            for line in cart.iter() {
                let copies = sets.iter().filter(|set| set.contains(line.book())).count();

                assert_eq!(copies, line.quantity() as usize, "{grouping:?}");
            }
        }

        Ok(())
    }
}
