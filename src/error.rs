use crate::domain::ProductId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("Storage read error: {0}")]
    Read(String),
    #[error("Storage write error: {0}")]
    Write(String),
    #[error("Corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },
    #[error("Invalid dataset: {0}")]
    Dataset(String),
    #[error("Duplicate product id in dataset: {0}")]
    DuplicateProduct(ProductId),
    #[error(transparent)]
    Column(#[from] ColumnError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ColumnError {
    #[error("Unknown column key: {0}")]
    UnknownField(String),
    #[error("Column is not sortable: {0}")]
    NotSortable(String),
    #[error("Unknown badge variant: {0}")]
    UnknownBadge(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Could not determine data directory: no HOME or XDG data directory found")]
    NoDataDir,
}
