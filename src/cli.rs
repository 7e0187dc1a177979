//! Command line interface

use std::{io, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    cart::Cart,
    catalog::Catalog,
    discounts::DiscountFactorTable,
    fixtures::{FixtureError, cart::parse_line, load_cart},
    groupings::SearchMode,
    optimizer::{DEFAULT_MAX_EVALUATIONS, OptimizerConfig},
    price::Price,
};

/// Book bundle pricing
#[derive(Debug, Parser)]
#[command(name = "book-discount", about = "Cheapest bundle pricing for a cart of books", long_about = None)]
pub struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingArgs,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every book in a catalog
    Books {
        /// Catalog YAML file
        #[arg(short, long, env = "BOOK_DISCOUNT_CATALOG")]
        catalog: PathBuf,
    },

    /// Calculate the cheapest price for a cart
    Price(PriceArgs),
}

/// Arguments for the `price` command
#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Catalog YAML file
    #[arg(short, long, env = "BOOK_DISCOUNT_CATALOG")]
    pub catalog: PathBuf,

    /// Cart YAML file
    #[arg(long, conflicts_with = "lines")]
    pub cart: Option<PathBuf>,

    /// Cart line as BOOK=QUANTITY, repeatable, in cart order
    #[arg(short = 'l', long = "line", value_name = "BOOK=QUANTITY")]
    pub lines: Vec<String>,

    /// Print `{"price": "..."}` instead of a receipt
    #[arg(long)]
    pub json: bool,

    /// Search settings
    #[command(flatten)]
    pub search: SearchArgs,
}

impl PriceArgs {
    /// Build the cart from either the cart file or the `--line` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file or a line cannot be parsed into a valid cart.
    pub fn cart(&self) -> Result<Cart, FixtureError> {
        if let Some(path) = &self.cart {
            return load_cart(path);
        }

        let lines = self
            .lines
            .iter()
            .map(|line| parse_line(line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Cart::with_lines(lines)?)
    }
}

/// Optimizer search settings
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// How to walk the groupings
    #[arg(long, value_enum, default_value_t = SearchMode::Memoized, env = "BOOK_DISCOUNT_SEARCH")]
    pub search: SearchMode,

    /// Give up after this many evaluations (0 disables the limit)
    #[arg(long, default_value_t = DEFAULT_MAX_EVALUATIONS, env = "BOOK_DISCOUNT_MAX_EVALUATIONS")]
    pub max_evaluations: usize,

    /// Give up after this many milliseconds
    #[arg(long, env = "BOOK_DISCOUNT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Evaluate compositions on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl From<&SearchArgs> for OptimizerConfig {
    fn from(args: &SearchArgs) -> Self {
        OptimizerConfig {
            search: args.search,
            max_evaluations: (args.max_evaluations > 0).then_some(args.max_evaluations),
            deadline: args.timeout_ms.map(Duration::from_millis),
            parallel: !args.sequential,
            discounts: DiscountFactorTable::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable single-line output
    #[default]
    Compact,

    /// Structured JSON output
    Json,
}

/// Logging settings
#[derive(Debug, Args)]
pub struct LoggingArgs {
    /// Default log level, overridden by `RUST_LOG`
    #[arg(long, default_value = "warn", env = "BOOK_DISCOUNT_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, env = "BOOK_DISCOUNT_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,
}

/// JSON body returned by `price --json`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PriceResponse {
    /// Cheapest price, as a two-digit decimal string
    pub price: Price,
}

/// Write the catalog as a table of IDs, titles and prices.
///
/// # Errors
///
/// Returns an IO error if writing fails.
pub fn write_books(out: &mut impl io::Write, catalog: &Catalog) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Title", "Price"]);

    for book in catalog.iter() {
        builder.push_record([
            book.id.to_string(),
            book.name.clone(),
            format!("{}", Price::round_half_up(book.price).to_money(catalog.currency())),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), Alignment::right());

    writeln!(out, "{table}")
}
