//! Filter, sort and pagination criteria controlling which products are visible.

use super::Product;
use crate::error::ColumnError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Label of the synthetic category meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parses a category label; the sentinel `"all"` (any case) means no filter.
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Only(label.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(name) => f.write_str(name),
        }
    }
}

/// Inclusive price bounds. Negative or NaN inputs are clamped, `min > max` is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_nan() { 0.0 } else { min.max(0.0) };
        let max = if max.is_nan() { f64::INFINITY } else { max.max(0.0) };
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    /// True when the range differs from the default `[0, +inf)`.
    pub fn is_restricted(&self) -> bool {
        self.min > 0.0 || self.max.is_finite()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.0, max: f64::INFINITY }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub query: String,
    pub category: CategoryFilter,
    pub price: PriceRange,
    pub in_stock_only: bool,
}

impl FilterCriteria {
    /// The trimmed query, or `None` when it is empty or whitespace-only.
    pub fn effective_query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn is_default(&self) -> bool {
        self.effective_query().is_none()
            && self.category == CategoryFilter::All
            && !self.price.is_restricted()
            && !self.in_stock_only
    }
}

/// Product attributes addressable by column configuration and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Category,
    Price,
    OriginalPrice,
    Stock,
    IsFavorite,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::Name,
        Field::Category,
        Field::Price,
        Field::OriginalPrice,
        Field::Stock,
        Field::IsFavorite,
    ];

    /// Key used in the dataset and in column configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Category => "category",
            Field::Price => "price",
            Field::OriginalPrice => "originalPrice",
            Field::Stock => "stock",
            Field::IsFavorite => "isFavorite",
        }
    }

    pub fn sortable(&self) -> bool {
        !matches!(self, Field::IsFavorite)
    }

    pub fn extract<'a>(&self, product: &'a Product) -> FieldValue<'a> {
        match self {
            Field::Id => FieldValue::Id(product.id.0),
            Field::Name => FieldValue::Text(&product.name),
            Field::Category => FieldValue::Text(&product.category),
            Field::Price => FieldValue::Amount(product.price),
            Field::OriginalPrice => FieldValue::OptionalAmount(product.original_price),
            Field::Stock => FieldValue::Count(product.stock),
            Field::IsFavorite => FieldValue::Flag(product.is_favorite),
        }
    }
}

impl FromStr for Field {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| ColumnError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Typed value of a [`Field`] for one product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Id(u64),
    Text(&'a str),
    Amount(f64),
    OptionalAmount(Option<f64>),
    Count(u32),
    Flag(bool),
}

impl FieldValue<'_> {
    /// Natural ordering: numeric for numbers, lexicographic for text, absent before present.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Id(a), Id(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Amount(a), Amount(b)) => a.total_cmp(b),
            (OptionalAmount(a), OptionalAmount(b)) => match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            },
            (Count(a), Count(b)) => a.cmp(b),
            (Flag(a), Flag(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// `key: None` keeps insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortCriteria {
    pub key: Option<Field>,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn by(key: Field, direction: SortDirection) -> Self {
        Self { key: Some(key), direction }
    }

    /// Re-selecting the current key flips the direction; a new key starts ascending.
    pub fn select(self, key: Field) -> Self {
        match self.key {
            Some(current) if current == key => Self::by(key, self.direction.flipped()),
            _ => Self::by(key, SortDirection::Ascending),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current_page: usize,
}

impl Pagination {
    pub const DEFAULT_PAGE_SIZE: usize = 12;

    /// Zero values are raised to 1.
    pub fn new(page_size: usize, current_page: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: current_page.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn with_page(self, page: usize) -> Self {
        Self::new(self.page_size, page)
    }

    pub fn clamped(self, total_pages: usize) -> Self {
        self.with_page(self.current_page.min(total_pages.max(1)))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_SIZE, 1)
    }
}
