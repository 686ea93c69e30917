use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{strip_whitespace, ConfigError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub products: Vec<CatalogProduct>,
}

/// The canonical product list, in report row order.
///
/// Loaded once and shared read-only by every pipeline run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
    /// Whitespace-stripped names, parallel to `products`.
    compact: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from names already known to be valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty or duplicate names.
    pub fn from_names<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let products = names
            .into_iter()
            .map(|n| CatalogProduct { name: n.into() })
            .collect();
        Self::from_products(products)
    }

    fn from_products(products: Vec<CatalogProduct>) -> Result<Self, ConfigError> {
        validate_products(&products)?;

        let compact = products.iter().map(|p| strip_whitespace(&p.name)).collect();
        let positions = products
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.clone(), idx))
            .collect();

        Ok(Self {
            products,
            compact,
            positions,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Report row index of `name`, if it is a canonical name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.name.as_str())
    }

    /// `(canonical name, whitespace-stripped name)` pairs in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.products
            .iter()
            .zip(&self.compact)
            .map(|(p, c)| (p.name.as_str(), c.as_str()))
    }
}

/// Load and validate the canonical catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CatalogFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CatalogFileParse)?;

    Catalog::from_products(file.products)
}

fn validate_products(products: &[CatalogProduct]) -> Result<(), ConfigError> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for product in products {
        let compact = strip_whitespace(&product.name);
        if compact.is_empty() {
            return Err(ConfigError::Validation(
                "catalog product name must be non-empty".to_string(),
            ));
        }

        if let Some(previous) = seen.insert(compact, &product.name) {
            return Err(ConfigError::Validation(format!(
                "duplicate catalog product: '{}' (collides with '{previous}')",
                product.name
            )));
        }
    }

    Ok(())
}
