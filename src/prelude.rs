//! Book Discount prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    assignment::{DiscountSet, assign},
    books::{Book, BookId},
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError, CatalogLookup},
    discounts::{DiscountError, DiscountFactorTable},
    fixtures::{Fixture, FixtureError},
    groupings::{Compositions, Grouping, SearchMode},
    optimizer::{
        OptimizerConfig, OptimizerError, PriceCalculation, PriceOptimizer, calculate_price,
    },
    price::Price,
    pricing::{PricingError, total_price},
    receipt::{Receipt, ReceiptError},
};
