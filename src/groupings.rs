//! Groupings
//!
//! A grouping is a sequence of target discount set sizes whose sum is the
//! number of copies in the cart, with no size larger than the number of
//! distinct titles. Sizes are served in order, so two orderings of the same
//! sizes can hand different copies to each set and price differently.
//!
//! [`Compositions`] yields every grouping lazily, in lexicographic order, so
//! callers can stop early once an evaluation limit is reached.

use std::iter;

use clap::ValueEnum;
use smallvec::SmallVec;

/// Target discount set sizes, in the order sets are filled.
pub type Grouping = SmallVec<[usize; 16]>;

/// How the optimizer walks the groupings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    /// Every grouping, with prefixes that leave the same copies behind
    /// priced once.
    #[default]
    Memoized,

    /// Every grouping priced on its own.
    Compositions,
}

/// Compositions of `total` into parts between one and `max_part`.
#[derive(Debug, Clone)]
pub struct Compositions {
    current: Option<Grouping>,
    max_part: usize,
}

impl Compositions {
    /// Create a composition iterator.
    pub fn new(total: usize, max_part: usize) -> Self {
        let current = (total > 0 && max_part > 0).then(|| iter::repeat_n(1, total).collect());

        Compositions { current, max_part }
    }
}

impl Iterator for Compositions {
    type Item = Grouping;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;

        // Lexicographic successor: bump the last part that can still grow and
        // still has something after it to borrow from, then reset the
        // remainder to ones.
        let bumpable = current
            .iter()
            .take(current.len().saturating_sub(1))
            .rposition(|&part| part < self.max_part);

        if let Some(pos) = bumpable {
            let remainder: usize = current.iter().skip(pos + 1).sum();
            let mut next: Grouping = current.iter().take(pos).copied().collect();

            next.push(current.get(pos).map_or(1, |&part| part + 1));
            next.extend(iter::repeat_n(1, remainder - 1));

            self.current = Some(next);
        }

        Some(current)
    }
}
