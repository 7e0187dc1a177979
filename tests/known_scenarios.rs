//! Known price scenarios for the standard catalog of five titles at 8.00 each,
//! plus catalogs with mixed prices and with six titles.

use testresult::TestResult;

use book_discount::{
    books::BookId,
    cart::Cart,
    catalog::CatalogError,
    fixtures::Fixture,
    groupings::SearchMode,
    optimizer::{OptimizerConfig, OptimizerError, PriceOptimizer},
};

fn cart(lines: &[(u64, i64)]) -> Result<Cart, book_discount::cart::CartError> {
    Cart::with_lines(lines.iter().map(|&(book, quantity)| (BookId::new(book), quantity)))
}

fn configs() -> [OptimizerConfig; 3] {
    let compositions = |parallel| OptimizerConfig {
        search: SearchMode::Compositions,
        parallel,
        ..OptimizerConfig::default()
    };

    [
        OptimizerConfig::default(),
        compositions(false),
        compositions(true),
    ]
}

fn assert_prices(catalog_name: &str, cases: &[(&[(u64, i64)], &str)]) -> TestResult {
    let fixture = Fixture::from_set(catalog_name)?;
    let catalog = fixture.catalog()?;

    for config in configs() {
        let search = config.search;
        let optimizer = PriceOptimizer::with_config(catalog, config);

        for &(lines, expected) in cases {
            let price = optimizer.calculate_price(&cart(lines)?)?;

            assert_eq!(
                price.to_string(),
                expected,
                "cart {lines:?} with {search:?} search"
            );
        }
    }

    Ok(())
}

#[test]
fn standard_bundle_discounts() -> TestResult {
    assert_prices(
        "books",
        &[
            (&[(1, 1)], "8.00"),
            (&[(1, 1), (2, 1)], "15.20"),
            (&[(1, 1), (2, 1), (3, 1)], "21.60"),
            (&[(1, 1), (2, 1), (3, 1), (4, 1)], "25.60"),
            (&[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)], "30.00"),
            (&[(1, 2), (2, 2), (3, 2), (4, 1), (5, 1)], "51.20"),
        ],
    )
}

#[test]
fn repeated_titles() -> TestResult {
    assert_prices(
        "books",
        &[
            (&[(1, 1), (2, 2)], "23.20"),
            (&[(1, 2)], "16.00"),
            (&[(1, 3), (2, 3), (3, 3), (4, 2), (5, 2)], "81.20"),
            (&[(1, 4), (2, 4), (3, 4), (4, 3), (5, 3)], "111.20"),
        ],
    )
}

#[test]
fn zero_quantities_and_empty_carts() -> TestResult {
    assert_prices(
        "books",
        &[
            (&[], "0.00"),
            (&[(1, 0)], "0.00"),
            (&[(1, 0), (2, 0), (3, 0)], "0.00"),
            (&[(1, 0), (2, 1), (3, 0), (4, 0), (5, 0)], "8.00"),
        ],
    )
}

#[test]
fn mixed_prices() -> TestResult {
    assert_prices(
        "mixed",
        &[
            (&[(10, 1)], "42.00"),
            (&[(10, 1), (11, 1)], "58.89"),
            (&[(10, 2), (11, 1), (12, 1)], "100.94"),
            (&[(13, 3), (14, 1), (10, 1), (11, 2)], "81.20"),
            (&[(10, 1), (11, 1), (12, 1), (13, 1), (14, 1)], "59.12"),
            (&[(12, 2), (13, 2), (14, 2), (10, 1)], "62.23"),
        ],
    )
}

#[test]
fn six_titles_at_the_same_price() -> TestResult {
    // A set of six earns nothing, so five go together and one pays full price.
    assert_prices(
        "series",
        &[
            (&[(31, 1), (32, 1), (33, 1), (34, 1), (35, 1), (36, 1)], "38.00"),
            (&[(31, 2), (32, 2), (33, 2), (34, 2), (35, 2), (36, 2)], "76.00"),
            (&[(31, 2), (32, 2), (33, 1), (34, 1), (35, 1), (36, 1)], "51.20"),
        ],
    )
}

#[test]
fn six_titles_at_mixed_prices() -> TestResult {
    // Serving the single first leaves the cheap first title out of the
    // set of five: 1.00 + (42.00 + 8.00 + 3.50 + 19.99 + 12.34) * 0.75.
    assert_prices(
        "shelf",
        &[
            (&[(21, 1), (22, 1), (23, 1), (24, 1), (25, 1), (26, 1)], "65.37"),
            (&[(21, 2), (22, 1), (23, 1), (24, 1), (25, 1), (26, 1)], "66.37"),
            (&[(21, 2), (22, 2), (23, 2), (24, 1), (25, 1), (26, 1)], "106.10"),
            (&[(21, 2), (22, 1), (23, 2), (24, 0), (25, 1), (26, 1)], "71.05"),
            (&[(21, 1), (22, 1), (23, 1), (24, 1), (25, 1)], "55.87"),
        ],
    )
}

#[test]
fn largest_scenario_with_memoized_search() -> TestResult {
    // Compositions of 23 copies are too many to search by default.
    let fixture = Fixture::from_set("books")?;
    let optimizer = PriceOptimizer::new(fixture.catalog()?);

    let cart = fixture.cart("large")?;

    assert_eq!(optimizer.calculate_price(&cart)?.to_string(), "141.20");

    Ok(())
}

#[test]
fn unknown_book_fails() -> TestResult {
    let fixture = Fixture::from_set("books")?;
    let optimizer = PriceOptimizer::new(fixture.catalog()?);

    let result = optimizer.calculate_price(&fixture.cart("unknown")?);

    assert_eq!(
        result,
        Err(OptimizerError::Catalog(CatalogError::UnknownBook(
            BookId::new(99)
        )))
    );

    Ok(())
}

#[test]
fn unknown_book_with_zero_quantity_still_fails() -> TestResult {
    let fixture = Fixture::from_set("books")?;
    let optimizer = PriceOptimizer::new(fixture.catalog()?);

    let result = optimizer.calculate_price(&cart(&[(1, 1), (42, 0)])?);

    assert!(matches!(
        result,
        Err(OptimizerError::Catalog(CatalogError::UnknownBook(id))) if id == BookId::new(42)
    ));

    Ok(())
}
