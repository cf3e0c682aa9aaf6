//! Presentation helpers: typed columns, status badges, price text and page numbers.
//!
//! Nothing here decides what is visible; it only turns products and pages into
//! display values.

use crate::domain::{Field, FieldValue, Product};
use crate::error::ColumnError;
use std::fmt;
use std::str::FromStr;

/// A table column bound to a product field.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub field: Field,
    pub sortable: bool,
}

impl Column {
    pub fn new(header: impl Into<String>, field: Field) -> Self {
        Self { header: header.into(), field, sortable: field.sortable() }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// The sort key for a click on this column's header.
    pub fn sort_key(&self) -> Result<Field, ColumnError> {
        if self.sortable {
            Ok(self.field)
        } else {
            Err(ColumnError::NotSortable(self.field.key().to_string()))
        }
    }

    pub fn render(&self, product: &Product) -> String {
        match (self.field, self.field.extract(product)) {
            (Field::Stock, FieldValue::Count(0)) => "Out of stock".to_string(),
            (Field::Stock, FieldValue::Count(units)) => format!("{units} units"),
            (Field::IsFavorite, _) => status_badges(product)
                .iter()
                .map(|badge| badge.label.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            (_, FieldValue::Id(id)) => id.to_string(),
            (_, FieldValue::Text(text)) => text.to_string(),
            (_, FieldValue::Amount(amount)) => format_price(amount),
            (_, FieldValue::OptionalAmount(Some(amount))) => format_price(amount),
            (_, FieldValue::OptionalAmount(None)) => "-".to_string(),
            (_, FieldValue::Count(count)) => count.to_string(),
            (_, FieldValue::Flag(flag)) => (if flag { "yes" } else { "no" }).to_string(),
        }
    }
}

/// Ordered column configuration. Built only from known field keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Builds columns from `(header, key)` pairs, failing on the first unknown key.
    pub fn from_keys(pairs: &[(&str, &str)]) -> Result<Self, ColumnError> {
        let columns = pairs
            .iter()
            .map(|(header, key)| Ok(Column::new(*header, key.parse::<Field>()?)))
            .collect::<Result<Vec<_>, ColumnError>>()?;
        Ok(Self { columns })
    }

    /// Product, price, stock and status columns.
    pub fn catalog() -> Self {
        Self {
            columns: vec![
                Column::new("Product", Field::Name),
                Column::new("Category", Field::Category),
                Column::new("Price", Field::Price),
                Column::new("Stock", Field::Stock),
                Column::new("Status", Field::IsFavorite).unsortable(),
            ],
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn find(&self, key: &str) -> Result<&Column, ColumnError> {
        let field: Field = key.parse()?;
        self.columns
            .iter()
            .find(|column| column.field == field)
            .ok_or_else(|| ColumnError::UnknownField(key.to_string()))
    }

    pub fn render_row(&self, product: &Product) -> Vec<String> {
        self.columns.iter().map(|column| column.render(product)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeVariant {
    #[default]
    Default,
    Brand,
    Success,
    Warning,
    Error,
}

impl FromStr for BadgeVariant {
    type Err = ColumnError;

    /// `danger` is accepted as a spelling of `error`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "brand" => Ok(Self::Brand),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" | "danger" => Ok(Self::Error),
            other => Err(ColumnError::UnknownBadge(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub variant: BadgeVariant,
}

impl Badge {
    pub fn new(label: impl Into<String>, variant: BadgeVariant) -> Self {
        Self { label: label.into(), variant }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label)
    }
}

pub fn status_badges(product: &Product) -> Vec<Badge> {
    let mut badges = Vec::new();
    if product.is_favorite {
        badges.push(Badge::new("Favorite", BadgeVariant::Brand));
    }
    if !product.in_stock() {
        badges.push(Badge::new("Unavailable", BadgeVariant::Error));
    }
    if let Some(discount) = product.discount_percent() {
        badges.push(Badge::new(format!("-{discount}%"), BadgeVariant::Success));
    }
    badges
}

/// `R$` with two decimals and a decimal comma, e.g. `R$ 149,90`.
pub fn format_price(amount: f64) -> String {
    format!("R$ {:.2}", amount).replace('.', ",")
}

const LOW_STOCK_THRESHOLD: u32 = 5;

/// Stock level shown in the detail view: sold out, running low, or available.
pub fn stock_badge(product: &Product) -> Badge {
    match product.stock {
        0 => Badge::new("Out of stock", BadgeVariant::Error),
        units if units <= LOW_STOCK_THRESHOLD => Badge::new(format!("{units} units"), BadgeVariant::Warning),
        _ => Badge::new("Available", BadgeVariant::Success),
    }
}

pub const NO_IMAGE: &str = "(no image)";
pub const NO_DESCRIPTION: &str = "No description available.";

/// Text lines for a product's detail view. Missing optional fields render as
/// placeholders; an empty feature list is left out.
pub fn detail_lines(product: &Product) -> Vec<String> {
    let mut title = format!("{} ({})", product.name, product.category);
    if product.is_favorite {
        title.push_str(" [Favorite]");
    }

    let mut price = format!("Price: {}", format_price(product.price));
    if let Some(original) = product.original_price.filter(|original| *original > product.price) {
        price.push_str(&format!(" (was {})", format_price(original)));
    }

    let mut lines = vec![
        title,
        format!("Image: {}", product.image.as_deref().unwrap_or(NO_IMAGE)),
        price,
        format!("Stock: {}", stock_badge(product)),
        String::new(),
        product.description.clone().unwrap_or_else(|| NO_DESCRIPTION.to_string()),
    ];

    if !product.features.is_empty() {
        lines.push(String::new());
        lines.push("Features:".to_string());
        lines.extend(product.features.iter().map(|feature| format!("  - {feature}")));
    }
    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Gap,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(page) => write!(f, "{page}"),
            PageItem::Gap => f.write_str("..."),
        }
    }
}

const MAX_VISIBLE_PAGES: usize = 5;

/// Page buttons to show: every page when there are few, otherwise the first,
/// the last and the neighbours of `current`, with gaps between.
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total.max(1)).map(PageItem::Page).collect();
    }

    let mut items = vec![PageItem::Page(1)];
    if current > 3 {
        items.push(PageItem::Gap);
    }

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    items.extend((start..=end).map(PageItem::Page));

    if current + 2 < total {
        items.push(PageItem::Gap);
    }
    items.push(PageItem::Page(total));
    items
}
