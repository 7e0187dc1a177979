//! Book Discount
//!
//! Finds the cheapest way to bundle a cart of books into discount sets,
//! where buying more distinct titles together earns a bigger discount.

pub mod assignment;
pub mod books;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod discounts;
pub mod fixtures;
pub mod groupings;
pub mod logging;
pub mod memoized;
pub mod optimizer;
pub mod prelude;
pub mod price;
pub mod pricing;
pub mod receipt;
