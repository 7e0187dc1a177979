//! Price optimizer
//!
//! Searches every candidate grouping of the cart's copies, prices the
//! discount sets each one produces and keeps the cheapest. The default
//! search prices shared grouping prefixes once; the composition search
//! prices every grouping on its own and can spread them over the rayon
//! thread pool. Both are pure functions of the cart and the catalog
//! snapshot and find the same minimum.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    assignment::{DiscountSet, assign},
    books::BookId,
    cart::Cart,
    catalog::{Catalog, CatalogError, CatalogLookup, ensure_resolved},
    discounts::DiscountFactorTable,
    groupings::{Compositions, Grouping, SearchMode},
    memoized::cheapest_grouping,
    price::Price,
    pricing::{PricingError, total_price},
};

/// Default upper bound on the number of evaluations a single search may make.
pub const DEFAULT_MAX_EVALUATIONS: usize = 1_000_000;

/// Groupings handed to the thread pool at a time.
const PARALLEL_CHUNK: usize = 4096;

/// Optimizer Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizerError {
    /// A cart book could not be resolved in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The search needs more evaluations than the configured limit.
    #[error("computation too large: more than {limit} evaluations")]
    ComputationTooLarge {
        /// Configured evaluation limit
        limit: usize,
    },

    /// The search ran past its deadline.
    #[error("computation exceeded its deadline of {deadline:?}")]
    DeadlineExceeded {
        /// Configured deadline
        deadline: Duration,
    },

    /// Internal optimizer invariant was violated (this is a bug).
    #[error("optimizer invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Optimizer settings
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// How to walk the groupings
    pub search: SearchMode,

    /// Maximum number of evaluations, `None` for no limit. The composition
    /// search counts groupings, the memoized search counts priced steps.
    pub max_evaluations: Option<usize>,

    /// Maximum wall-clock time for one search, `None` for no limit
    pub deadline: Option<Duration>,

    /// Evaluate compositions on the rayon thread pool. The memoized search
    /// always runs on the calling thread.
    pub parallel: bool,

    /// Discount factors by set size
    pub discounts: DiscountFactorTable,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            search: SearchMode::default(),
            max_evaluations: Some(DEFAULT_MAX_EVALUATIONS),
            deadline: None,
            parallel: true,
            discounts: DiscountFactorTable::default(),
        }
    }
}

/// Outcome of a price calculation
#[derive(Debug, Clone)]
pub struct PriceCalculation {
    /// Final price, rounded half-up to two fraction digits
    pub price: Price,

    /// Unrounded minimum
    pub exact_price: Decimal,

    /// Grouping that produced the minimum, empty for an empty cart
    pub grouping: Grouping,

    /// Discount sets of the winning grouping
    pub discount_sets: Vec<DiscountSet>,

    /// Number of evaluations made
    pub evaluations: usize,

    /// Resolved catalog snapshot the calculation ran against
    pub catalog: Catalog,
}

impl PriceCalculation {
    /// Currency of the calculated price.
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }
}

/// A priced grouping
#[derive(Debug, Clone)]
struct Candidate {
    index: usize,
    total: Decimal,
    grouping: Grouping,
    sets: Vec<DiscountSet>,
}

impl Candidate {
    /// Keep the cheaper candidate, the earlier one on ties.
    fn cheaper(self, other: Candidate) -> Candidate {
        if (other.total, other.index) < (self.total, self.index) {
            other
        } else {
            self
        }
    }

    /// Fold a candidate into the running minimum.
    fn keep(best: Option<Candidate>, candidate: Candidate) -> Candidate {
        match best {
            Some(current) => current.cheaper(candidate),
            None => candidate,
        }
    }
}

/// Finds the cheapest way to bundle a cart into discount sets.
#[derive(Debug, Clone)]
pub struct PriceOptimizer<L> {
    lookup: L,
    config: OptimizerConfig,
}

impl<L: CatalogLookup + Sync> PriceOptimizer<L> {
    /// Create an optimizer with the default configuration.
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, OptimizerConfig::default())
    }

    /// Create an optimizer with a custom configuration.
    pub fn with_config(lookup: L, config: OptimizerConfig) -> Self {
        PriceOptimizer { lookup, config }
    }

    /// The optimizer's configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Minimum price payable for the cart.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimizerError`] if a cart book is unknown, the search
    /// exceeds its evaluation limit or deadline, or price arithmetic overflows.
    pub fn calculate_price(&self, cart: &Cart) -> Result<Price, OptimizerError> {
        self.calculate(cart).map(|calculation| calculation.price)
    }

    /// Minimum price payable for the cart, with the discount sets that achieve it.
    ///
    /// # Errors
    ///
    /// Returns an [`OptimizerError`] if a cart book is unknown, the search
    /// exceeds its evaluation limit or deadline, or price arithmetic overflows.
    pub fn calculate(&self, cart: &Cart) -> Result<PriceCalculation, OptimizerError> {
        let ids = cart.book_ids();
        let catalog = self.resolve(&ids)?;

        let total_copies = cart.total_copies();
        let distinct_titles = cart.distinct_titles();

        if total_copies == 0 {
            debug!("cart has no copies; skipping search");

            return Ok(PriceCalculation {
                price: Price::ZERO,
                exact_price: Decimal::ZERO,
                grouping: Grouping::new(),
                discount_sets: Vec::new(),
                evaluations: 0,
                catalog,
            });
        }

        debug!(
            total_copies,
            distinct_titles,
            search = ?self.config.search,
            parallel = self.config.parallel,
            "searching groupings"
        );

        let started = Instant::now();
        let compositions = || Compositions::new(total_copies, distinct_titles);

        let (best, evaluated) = match self.config.search {
            SearchMode::Memoized => self.search_memoized(cart, &catalog, started)?,
            SearchMode::Compositions if self.config.parallel => {
                self.search_parallel(cart, &catalog, compositions(), started)?
            }
            SearchMode::Compositions => {
                self.search_sequential(cart, &catalog, compositions(), started)?
            }
        };

        let best = best.ok_or(OptimizerError::InvariantViolation {
            message: "non-empty cart produced no groupings",
        })?;

        let price = Price::round_half_up(best.total);

        info!(
            %price,
            evaluations = evaluated,
            elapsed_ms = started.elapsed().as_millis(),
            "found cheapest grouping"
        );

        Ok(PriceCalculation {
            price,
            exact_price: best.total,
            grouping: best.grouping,
            discount_sets: best.sets,
            evaluations: evaluated,
            catalog,
        })
    }

    /// Resolve the cart's books, rejecting snapshots that come back short.
    fn resolve(&self, ids: &[BookId]) -> Result<Catalog, OptimizerError> {
        let catalog = self.lookup.resolve(ids).inspect_err(|err| {
            warn!(%err, "catalog lookup failed");
        })?;

        ensure_resolved(ids, &catalog)?;

        Ok(catalog)
    }

    fn search_memoized(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        started: Instant,
    ) -> Result<(Option<Candidate>, usize), OptimizerError> {
        let cheapest = cheapest_grouping(cart, catalog, &self.config.discounts, |steps| {
            self.check_budget(steps, started)
        })?;

        let Some(cheapest) = cheapest else {
            return Ok((None, 0));
        };

        let steps = cheapest.steps;
        let sets = assign(cart, &cheapest.grouping);

        let candidate = Candidate {
            index: 0,
            total: cheapest.total,
            grouping: cheapest.grouping,
            sets,
        };

        Ok((Some(candidate), steps))
    }

    fn search_sequential(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        groupings: Compositions,
        started: Instant,
    ) -> Result<(Option<Candidate>, usize), OptimizerError> {
        let mut best: Option<Candidate> = None;
        let mut evaluated = 0;

        for (index, grouping) in groupings.enumerate() {
            self.check_budget(index, started)?;

            let candidate = self.evaluate(cart, catalog, index, grouping)?;
            evaluated += 1;

            best = Some(Candidate::keep(best, candidate));
        }

        Ok((best, evaluated))
    }

    /// Evaluate compositions on the thread pool, a chunk at a time so that
    /// only [`PARALLEL_CHUNK`] groupings are held at once.
    fn search_parallel(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        groupings: Compositions,
        started: Instant,
    ) -> Result<(Option<Candidate>, usize), OptimizerError> {
        let mut groupings = groupings.enumerate();
        let mut best: Option<Candidate> = None;
        let mut evaluated = 0;

        loop {
            let chunk = groupings
                .by_ref()
                .take(PARALLEL_CHUNK)
                .map(|(index, grouping)| {
                    self.check_budget(index, started).map(|()| (index, grouping))
                })
                .collect::<Result<Vec<_>, _>>()?;

            if chunk.is_empty() {
                break;
            }

            evaluated += chunk.len();

            let chunk_best = chunk
                .into_par_iter()
                .map(|(index, grouping)| {
                    self.check_deadline(started)?;
                    self.evaluate(cart, catalog, index, grouping)
                })
                .try_reduce_with(|a, b| Ok(a.cheaper(b)))
                .transpose()?;

            if let Some(candidate) = chunk_best {
                best = Some(Candidate::keep(best, candidate));
            }
        }

        Ok((best, evaluated))
    }

    fn evaluate(
        &self,
        cart: &Cart,
        catalog: &Catalog,
        index: usize,
        grouping: Grouping,
    ) -> Result<Candidate, OptimizerError> {
        let sets = assign(cart, &grouping);
        let total = total_price(&sets, catalog, &self.config.discounts)?;

        Ok(Candidate {
            index,
            total,
            grouping,
            sets,
        })
    }

    /// Fail once `index` evaluations have been made and the limit is reached, or time is up.
    fn check_budget(&self, index: usize, started: Instant) -> Result<(), OptimizerError> {
        match self.config.max_evaluations {
            Some(limit) if index >= limit => {
                warn!(limit, "evaluation limit reached");

                Err(OptimizerError::ComputationTooLarge { limit })
            }
            _ => self.check_deadline(started),
        }
    }

    fn check_deadline(&self, started: Instant) -> Result<(), OptimizerError> {
        match self.config.deadline {
            Some(deadline) if started.elapsed() >= deadline => {
                warn!(?deadline, "search deadline exceeded");

                Err(OptimizerError::DeadlineExceeded { deadline })
            }
            _ => Ok(()),
        }
    }
}

/// Minimum price for a cart using the default optimizer configuration.
///
/// # Errors
///
/// Returns an [`OptimizerError`] if a cart book is unknown, the search
/// exceeds the default evaluation limit, or price arithmetic overflows.
pub fn calculate_price<L: CatalogLookup + Sync>(lookup: L, cart: &Cart) -> Result<Price, OptimizerError> {
    PriceOptimizer::new(lookup).calculate_price(cart)
}
