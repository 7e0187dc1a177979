//! Memoized grouping search
//!
//! Serving a grouping's sizes one at a time walks the cart through states of
//! copies still left. Groupings whose prefixes leave the same copies behind
//! share every continuation, so the cheapest grouping is a cheapest path
//! through those states. States are visited level by level, a level holding
//! every state reached after taking the same number of copies, and each
//! `(state, size)` step is priced once.
//!
//! Only sizes up to the number of titles still available are tried. A larger
//! size under-fills its set, which is the same step as the smaller size.

use std::iter;

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    assignment::take_set,
    books::BookId,
    cart::{Cart, CartLine},
    catalog::Catalog,
    discounts::DiscountFactorTable,
    groupings::Grouping,
    pricing::{PricingError, set_price},
};

/// Copies left per purchased title, in cart order.
type State = SmallVec<[u32; 8]>;

/// Level, node index and set size of a step.
type Step = (usize, usize, usize);

#[derive(Debug)]
struct Node {
    state: State,
    cost: Decimal,
    parent: Option<Step>,
}

#[derive(Debug, Default)]
struct Level {
    nodes: Vec<Node>,
    index: FxHashMap<State, usize>,
}

impl Level {
    /// Record a path into `state`, keeping the first of equally cheap paths.
    fn relax(&mut self, state: State, cost: Decimal, parent: Step) {
        match self.index.get(&state).and_then(|&idx| self.nodes.get_mut(idx)) {
            Some(node) => {
                if cost < node.cost {
                    node.cost = cost;
                    node.parent = Some(parent);
                }
            }
            None => {
                self.index.insert(state.clone(), self.nodes.len());
                self.nodes.push(Node {
                    state,
                    cost,
                    parent: Some(parent),
                });
            }
        }
    }
}

/// Cheapest grouping found by [`cheapest_grouping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cheapest {
    /// Unrounded total of the grouping's discount sets
    pub total: Decimal,

    /// Sizes along the cheapest path
    pub grouping: Grouping,

    /// Number of `(state, size)` steps priced
    pub steps: usize,
}

/// Find the cheapest grouping for `cart`.
///
/// `before_step` is called with the number of steps priced so far before
/// each new step, and can stop the search by returning an error.
///
/// Returns `None` when the cart has no copies.
///
/// # Errors
///
/// Returns the first error from `before_step`, or a [`PricingError`] if a
/// set cannot be priced.
pub fn cheapest_grouping<E>(
    cart: &Cart,
    catalog: &Catalog,
    table: &DiscountFactorTable,
    mut before_step: impl FnMut(usize) -> Result<(), E>,
) -> Result<Option<Cheapest>, E>
where
    E: From<PricingError>,
{
    let total_copies = cart.total_copies();

    if total_copies == 0 {
        return Ok(None);
    }

    let books: SmallVec<[BookId; 8]> = cart.purchased().map(CartLine::book).collect();

    let mut levels: Vec<Level> = iter::repeat_with(Level::default)
        .take(total_copies + 1)
        .collect();

    if let Some(first) = levels.first_mut() {
        first.nodes.push(Node {
            state: cart.purchased().map(CartLine::quantity).collect(),
            cost: Decimal::ZERO,
            parent: None,
        });
    }

    let mut steps = 0;

    for depth in 0..total_copies {
        let (done, ahead) = levels.split_at_mut(depth + 1);

        let Some(current) = done.last() else {
            continue;
        };

        for (idx, node) in current.nodes.iter().enumerate() {
            let available = node.state.iter().filter(|&&quantity| quantity > 0).count();

            for size in 1..=available {
                before_step(steps)?;
                steps += 1;

                let mut next = node.state.clone();
                let set = take_set(&books, &mut next, size);

                let cost = node
                    .cost
                    .checked_add(set_price(&set, catalog, table)?)
                    .ok_or(PricingError::Overflow)?;

                if let Some(level) = ahead.get_mut(size - 1) {
                    level.relax(next, cost, (depth, idx, size));
                }
            }
        }
    }

    let Some(end) = levels.last().and_then(|level| level.nodes.first()) else {
        return Ok(None);
    };

    let mut grouping = Grouping::new();
    let mut parent = end.parent;

    while let Some((depth, idx, size)) = parent {
        grouping.push(size);

        parent = levels
            .get(depth)
            .and_then(|level| level.nodes.get(idx))
            .and_then(|node| node.parent);
    }

    grouping.reverse();

    Ok(Some(Cheapest {
        total: end.cost,
        grouping,
        steps,
    }))
}
