//! Static product dataset and categories.

use crate::domain::{CategoryFilter, Product, ProductId};
use crate::error::CatalogError;
use crate::favorites::FavoritesStore;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

const BUNDLED_DATASET: &str = include_str!("../data/products.json");

#[derive(Debug, Clone, Deserialize)]
struct Dataset {
    products: Vec<Product>,
    categories: Vec<String>,
}

/// Read-only source of products, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl ProductRepository {
    /// The dataset compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_DATASET)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Dataset(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let dataset: Dataset =
            serde_json::from_str(content).map_err(|e| CatalogError::Dataset(e.to_string()))?;
        Self::new(dataset.products, dataset.categories)
    }

    /// Validates ids are unique and prices are sane.
    pub fn new(products: Vec<Product>, categories: Vec<String>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(CatalogError::Dataset(format!(
                    "product {} has invalid price {}",
                    product.id, product.price
                )));
            }
            if let Some(original) = product.original_price {
                if original.is_nan() || original < product.price {
                    return Err(CatalogError::Dataset(format!(
                        "product {} has original price {} below price {}",
                        product.id, original, product.price
                    )));
                }
            }
        }

        info!(products = products.len(), categories = categories.len(), "Dataset loaded");
        Ok(Self { products, categories })
    }

    /// Products in dataset order with `is_favorite` read from the store now.
    pub fn load_catalog(&self, favorites: &FavoritesStore) -> Vec<Product> {
        let saved = favorites.read();
        debug!(favorites = saved.len(), "Decorating catalog with favorites");
        self.products
            .iter()
            .cloned()
            .map(|mut product| {
                product.is_favorite = saved.contains(product.id);
                product
            })
            .collect()
    }

    /// The "all" sentinel followed by the dataset categories.
    pub fn categories(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(self.categories.iter().map(|name| CategoryFilter::Only(name.clone())))
            .collect()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStore;

    #[test]
    fn test_bundled_dataset_is_valid() {
        let repository = ProductRepository::bundled().unwrap();
        assert!(!repository.is_empty());
        assert_eq!(repository.categories()[0], CategoryFilter::All);

        let known: Vec<String> = repository.categories().iter().skip(1).map(|c| c.to_string()).collect();
        for id in 1..=repository.len() as u64 {
            let product = repository.get(ProductId(id)).unwrap();
            assert!(known.contains(&product.category), "unknown category {}", product.category);
        }
    }

    #[test]
    fn test_load_catalog_marks_favorites() {
        let repository = ProductRepository::new(
            vec![Product::new(1, "Mouse", "Periféricos", 50.0, 3), Product::new(2, "Teclado", "Periféricos", 150.0, 0)],
            vec!["Periféricos".into()],
        )
        .unwrap();
        let mut favorites = FavoritesStore::new(MemoryStore::new());
        favorites.add(ProductId(2)).unwrap();

        let products = repository.load_catalog(&favorites);
        assert!(!products[0].is_favorite);
        assert!(products[1].is_favorite);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = ProductRepository::new(
            vec![Product::new(1, "A", "X", 1.0, 1), Product::new(1, "B", "X", 2.0, 1)],
            vec![],
        );
        assert_eq!(result.unwrap_err(), CatalogError::DuplicateProduct(ProductId(1)));
    }

    #[test]
    fn test_rejects_original_price_below_price() {
        let result = ProductRepository::new(
            vec![Product::new(1, "A", "X", 10.0, 1).with_original_price(5.0)],
            vec![],
        );
        assert!(matches!(result, Err(CatalogError::Dataset(_))));
    }

    #[test]
    fn test_malformed_json_is_a_dataset_error() {
        assert!(matches!(ProductRepository::from_json("{"), Err(CatalogError::Dataset(_))));
    }
}
