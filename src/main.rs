//! Book Discount CLI
//!
//! `book-discount books` lists a catalog, `book-discount price` finds the
//! cheapest bundling of a cart and prints a receipt or a JSON price.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use book_discount::{
    cli::{Cli, Command, PriceArgs, PriceResponse, write_books},
    fixtures::load_catalog,
    logging::init_subscriber,
    optimizer::{OptimizerConfig, PriceOptimizer},
    receipt::Receipt,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_subscriber(&cli.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Books { catalog } => {
            let catalog = load_catalog(&catalog)?;

            write_books(&mut out, &catalog)?;
        }
        Command::Price(args) => price(&mut out, &args)?,
    }

    Ok(())
}

fn price(out: &mut impl Write, args: &PriceArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let cart = args.cart()?;

    let config = OptimizerConfig::from(&args.search);
    let optimizer = PriceOptimizer::with_config(&catalog, config);
    let calculation = optimizer.calculate(&cart)?;

    if args.json {
        let response = PriceResponse {
            price: calculation.price,
        };

        serde_json::to_writer(&mut *out, &response)?;
        writeln!(out)?;
    } else {
        Receipt::from_calculation(&calculation, &optimizer.config().discounts)?.write_to(out)?;
    }

    Ok(())
}
