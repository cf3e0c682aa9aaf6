use crate::domain::{
    Cart, CartLine, CategoryFilter, Field, FilterCriteria, Pagination, PriceRange, Product,
    ProductId, SortCriteria,
};
use crate::error::{CatalogError, ColumnError};
use crate::favorites::FavoriteSet;
use crate::pipeline::{self, CatalogPage};
use std::fmt;

/// Transient notification. A newer message replaces the current one and gets a
/// new generation, so only the newest timer can dismiss it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Toast {
    #[default]
    Idle,
    Showing { message: String, generation: u64 },
}

impl Toast {
    pub fn message(&self) -> Option<&str> {
        match self {
            Toast::Idle => None,
            Toast::Showing { message, .. } => Some(message),
        }
    }
}

/// Label for an active, non-default filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChip {
    Category(String),
    Query(String),
    Price,
    InStock,
}

impl fmt::Display for FilterChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterChip::Category(name) => f.write_str(name),
            FilterChip::Query(query) => write!(f, "\"{query}\""),
            FilterChip::Price => f.write_str("Price"),
            FilterChip::InStock => f.write_str("In stock"),
        }
    }
}

/// Everything a renderer needs, computed from [`CatalogState`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub page: CatalogPage,
    pub result_count: usize,
    pub filter: FilterCriteria,
    pub sort: SortCriteria,
    pub categories: Vec<CategoryFilter>,
    pub active_filters: Vec<FilterChip>,
    pub cart: Vec<CartLine>,
    pub cart_item_count: u32,
    pub cart_pending: usize,
    pub selected: Option<Product>,
    pub toast: Option<String>,
    pub searching: bool,
    pub paging: bool,
}

/// All mutable catalog UI state, owned by the catalog actor.
#[derive(Debug, Clone)]
pub struct CatalogState {
    products: Vec<Product>,
    categories: Vec<CategoryFilter>,
    filter: FilterCriteria,
    sort: SortCriteria,
    pagination: Pagination,
    selected: Option<ProductId>,
    cart: Cart,
    cart_pending: usize,
    toast: Toast,
    toast_generation: u64,
    searching: bool,
    paging: bool,
}

impl CatalogState {
    pub fn new(products: Vec<Product>, categories: Vec<CategoryFilter>, page_size: usize) -> Self {
        Self {
            products,
            categories,
            filter: FilterCriteria::default(),
            sort: SortCriteria::default(),
            pagination: Pagination::new(page_size, 1),
            selected: None,
            cart: Cart::new(),
            cart_pending: 0,
            toast: Toast::Idle,
            toast_generation: 0,
            searching: false,
            paging: false,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    // --- Filters: every change returns to the first page ---

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.reset_page();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
        self.reset_page();
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.filter.price = PriceRange::new(min, max);
        self.reset_page();
    }

    pub fn set_in_stock_only(&mut self, in_stock_only: bool) {
        self.filter.in_stock_only = in_stock_only;
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterCriteria::default();
        self.reset_page();
    }

    fn reset_page(&mut self) {
        self.pagination = self.pagination.with_page(1);
    }

    /// Fields without a natural order (the favorite flag) are rejected and
    /// leave the current sort untouched.
    pub fn set_sort(&mut self, key: Field) -> Result<SortCriteria, ColumnError> {
        if !key.sortable() {
            return Err(ColumnError::NotSortable(key.key().to_string()));
        }
        self.sort = self.sort.select(key);
        Ok(self.sort)
    }

    pub fn total_pages(&self) -> usize {
        let matched = pipeline::apply_filters(&self.products, &self.filter).len();
        pipeline::total_pages(matched, self.pagination.page_size())
    }

    pub fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }

    /// Returns the page actually selected after clamping.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let page = self.clamp_page(page);
        self.pagination = self.pagination.with_page(page);
        page
    }

    pub fn set_searching(&mut self, searching: bool) {
        self.searching = searching;
    }

    pub fn set_paging(&mut self, paging: bool) {
        self.paging = paging;
    }

    // --- Products, cart and favorites ---

    pub fn product(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Fails when the product is unknown or one more unit would exceed its stock.
    pub fn check_can_add(&self, id: ProductId) -> Result<(), CatalogError> {
        let product = self.product(id)?;
        let requested = self.cart.quantity_of(id) + 1;
        if requested > product.stock {
            return Err(CatalogError::InsufficientStock {
                product_id: id,
                requested,
                available: product.stock,
            });
        }
        Ok(())
    }

    pub fn add_to_cart(&mut self, id: ProductId) -> Result<CartLine, CatalogError> {
        self.check_can_add(id)?;
        Ok(self.cart.add(id).clone())
    }

    pub fn begin_cart_add(&mut self) {
        self.cart_pending += 1;
    }

    pub fn end_cart_add(&mut self) {
        self.cart_pending = self.cart_pending.saturating_sub(1);
    }

    /// Recomputes every `is_favorite` flag from the persisted set.
    pub fn apply_favorites(&mut self, favorites: &FavoriteSet) {
        for product in &mut self.products {
            product.is_favorite = favorites.contains(product.id);
        }
    }

    pub fn select_product(&mut self, id: Option<ProductId>) -> Result<Option<Product>, CatalogError> {
        let selected = id.map(|id| self.product(id).cloned()).transpose()?;
        self.selected = id;
        Ok(selected)
    }

    // --- Toast ---

    /// Shows `message` and returns the generation its expiry timer must present.
    pub fn show_toast(&mut self, message: impl Into<String>) -> u64 {
        self.toast_generation += 1;
        self.toast = Toast::Showing {
            message: message.into(),
            generation: self.toast_generation,
        };
        self.toast_generation
    }

    /// Returns to idle only if `generation` is still the one showing.
    pub fn expire_toast(&mut self, generation: u64) -> bool {
        match &self.toast {
            Toast::Showing { generation: current, .. } if *current == generation => {
                self.toast = Toast::Idle;
                true
            }
            _ => false,
        }
    }

    // --- Derived view ---

    pub fn active_filters(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if let CategoryFilter::Only(name) = &self.filter.category {
            chips.push(FilterChip::Category(name.clone()));
        }
        if let Some(query) = self.filter.effective_query() {
            chips.push(FilterChip::Query(query.to_string()));
        }
        if self.filter.price.is_restricted() {
            chips.push(FilterChip::Price);
        }
        if self.filter.in_stock_only {
            chips.push(FilterChip::InStock);
        }
        chips
    }

    pub fn view(&self) -> CatalogView {
        let matched = pipeline::filter_and_sort(&self.products, &self.filter, &self.sort);
        let total_pages = pipeline::total_pages(matched.len(), self.pagination.page_size());
        let page = pipeline::paginate(&matched, &self.pagination.clamped(total_pages));

        CatalogView {
            result_count: page.total_matched,
            page,
            filter: self.filter.clone(),
            sort: self.sort,
            categories: self.categories.clone(),
            active_filters: self.active_filters(),
            cart: self.cart.lines().to_vec(),
            cart_item_count: self.cart.item_count(),
            cart_pending: self.cart_pending,
            selected: self.selected.and_then(|id| self.product(id).ok().cloned()),
            toast: self.toast.message().map(str::to_string),
            searching: self.searching,
            paging: self.paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortDirection;

    fn state(page_size: usize) -> CatalogState {
        CatalogState::new(
            vec![
                Product::new(1, "Mouse", "Periféricos", 50.0, 3),
                Product::new(2, "Teclado", "Periféricos", 150.0, 0),
                Product::new(3, "Monitor", "Telas", 900.0, 5),
            ],
            vec![CategoryFilter::All, CategoryFilter::Only("Periféricos".into()), CategoryFilter::Only("Telas".into())],
            page_size,
        )
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = state(1);
        assert_eq!(state.go_to_page(3), 3);

        state.set_in_stock_only(true);
        assert_eq!(state.current_page(), 1);

        state.go_to_page(2);
        state.set_category(CategoryFilter::from_label("Telas"));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut state = state(2);
        assert_eq!(state.go_to_page(0), 1);
        assert_eq!(state.go_to_page(99), 2);
    }

    #[test]
    fn test_view_reclamps_when_matches_shrink() {
        let mut state = state(1);
        state.go_to_page(3);
        // Bypass the setter so the stored page is stale.
        state.filter.in_stock_only = true;
        let view = state.view();
        assert_eq!(view.page.current_page, 2);
        assert_eq!(view.page.visible.len(), 1);
    }

    #[test]
    fn test_active_filter_chips() {
        let mut state = state(12);
        assert!(state.active_filters().is_empty());

        state.set_category(CategoryFilter::from_label("Telas"));
        state.set_search_query(" mon ");
        state.set_price_range(10.0, f64::INFINITY);
        state.set_in_stock_only(true);

        let labels: Vec<String> = state.active_filters().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Telas", "\"mon\"", "Price", "In stock"]);

        state.clear_filters();
        assert!(state.active_filters().is_empty());
        assert!(state.filter().is_default());
    }

    #[test]
    fn test_cart_respects_stock() {
        let mut state = state(12);
        assert_eq!(
            state.add_to_cart(ProductId(2)),
            Err(CatalogError::InsufficientStock { product_id: ProductId(2), requested: 1, available: 0 })
        );
        assert_eq!(state.add_to_cart(ProductId(9)), Err(CatalogError::NotFound(ProductId(9))));

        for _ in 0..3 {
            state.add_to_cart(ProductId(1)).unwrap();
        }
        assert!(state.add_to_cart(ProductId(1)).is_err());
        state.add_to_cart(ProductId(3)).unwrap();
        assert_eq!(state.view().cart_item_count, 4);
    }

    #[test]
    fn test_toast_generations() {
        let mut state = state(12);
        let first = state.show_toast("first");
        let second = state.show_toast("second");

        assert!(!state.expire_toast(first));
        assert_eq!(state.toast().message(), Some("second"));
        assert!(state.expire_toast(second));
        assert_eq!(*state.toast(), Toast::Idle);
    }

    #[test]
    fn test_selection_tracks_favorite_flags() {
        let mut state = state(12);
        let selected = state.select_product(Some(ProductId(3))).unwrap().unwrap();
        assert!(!selected.is_favorite);

        state.apply_favorites(&[ProductId(3)].into_iter().collect());
        assert!(state.view().selected.unwrap().is_favorite);

        assert_eq!(state.select_product(None).unwrap(), None);
        assert!(state.view().selected.is_none());
        assert!(state.select_product(Some(ProductId(42))).is_err());
    }

    #[test]
    fn test_set_sort_rejects_favorite_flag() {
        let mut state = state(12);
        let current = state.set_sort(Field::Name).unwrap();

        assert_eq!(
            state.set_sort(Field::IsFavorite),
            Err(ColumnError::NotSortable("isFavorite".to_string()))
        );
        assert_eq!(state.sort(), current);
    }

    #[test]
    fn test_set_sort_toggles() {
        let mut state = state(12);
        state.set_sort(Field::Price).unwrap();
        assert_eq!(state.set_sort(Field::Price).unwrap().direction, SortDirection::Descending);
        let names: Vec<String> = state.view().page.visible.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Monitor", "Teclado", "Mouse"]);
    }
}
