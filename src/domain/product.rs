use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents an item in the catalog.
///
/// `is_favorite` is never read from the dataset. It is recomputed from the
/// favorites store every time the catalog is loaded or a favorite changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub stock: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_deserializing)]
    pub is_favorite: bool,
}

impl Product {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock: u32,
    ) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            category: category.into(),
            price,
            original_price: None,
            stock,
            image: None,
            description: None,
            features: Vec::new(),
            is_favorite: false,
        }
    }

    pub fn with_original_price(mut self, original_price: f64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Percentage saved against `original_price`, rounded down.
    pub fn discount_percent(&self) -> Option<u32> {
        match self.original_price {
            Some(original) if original > self.price && original > 0.0 => {
                Some((((original - self.price) / original) * 100.0).floor() as u32)
            }
            _ => None,
        }
    }
}
