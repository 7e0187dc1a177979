//! Fixtures
//!
//! Catalogs and carts stored as YAML files. A fixture directory holds a
//! `catalogs/` and a `carts/` folder; sets are addressed by file stem.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{cart::CartFixture, catalog::CatalogFixture},
};

pub mod cart;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid `BOOK=QUANTITY` pair
    #[error("Invalid cart line, expected BOOK=QUANTITY: {0}")]
    InvalidCartLine(String),

    /// No catalog loaded yet
    #[error("No catalog loaded")]
    NoCatalog,

    /// Catalog construction error
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error("Invalid cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalog
    catalog: Option<Catalog>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
        }
    }

    /// Load a catalog from `catalogs/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or describes an invalid catalog.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let path = self.base_path.join("catalogs").join(format!("{name}.yml"));

        self.catalog = Some(load_catalog(&path)?);

        Ok(self)
    }

    /// Load a fixture set by catalog name
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCatalog`] if no catalog has been loaded.
    pub fn catalog(&self) -> Result<&Catalog, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Load a cart from `carts/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or describes an invalid cart.
    pub fn cart(&self, name: &str) -> Result<Cart, FixtureError> {
        load_cart(&self.base_path.join("carts").join(format!("{name}.yml")))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or describes an invalid catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, FixtureError> {
    let fixture: CatalogFixture = serde_norway::from_str(&read(path)?)?;
    let catalog = Catalog::try_from(fixture)?;

    debug!(path = %path.display(), books = catalog.len(), "loaded catalog");

    Ok(catalog)
}

/// Load a cart from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or describes an invalid cart.
pub fn load_cart(path: &Path) -> Result<Cart, FixtureError> {
    let fixture: CartFixture = serde_norway::from_str(&read(path)?)?;

    Cart::try_from(fixture)
}

fn read(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })
}
