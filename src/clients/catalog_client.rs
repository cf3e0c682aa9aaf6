use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::catalog_actor::CatalogView;
use crate::domain::{CartLine, CategoryFilter, Field, Product, ProductId, SortCriteria};
use crate::error::CatalogError;
use crate::messages::CatalogRequest;

/// Cloneable handle to the catalog actor.
#[derive(Clone, Debug)]
pub struct CatalogClient {
    sender: mpsc::Sender<CatalogRequest>,
}

impl CatalogClient {
    pub fn new(sender: mpsc::Sender<CatalogRequest>) -> Self {
        Self { sender }
    }

    /// Requests the page after the current one. Returns `None` on the last page.
    #[instrument(skip(self))]
    pub async fn next_page(&self) -> Result<Option<usize>, CatalogError> {
        let page = self.view().await?.page;
        if !page.has_next() {
            debug!(current_page = page.current_page, "Already on the last page");
            return Ok(None);
        }
        self.go_to_page(page.current_page + 1).await.map(Some)
    }

    /// Requests the page before the current one. Returns `None` on the first page.
    #[instrument(skip(self))]
    pub async fn prev_page(&self) -> Result<Option<usize>, CatalogError> {
        let page = self.view().await?.page;
        if !page.has_prev() {
            return Ok(None);
        }
        self.go_to_page(page.current_page - 1).await.map(Some)
    }
}

client_method!(CatalogClient => fn view() -> CatalogView as CatalogRequest::View);
client_method!(CatalogClient => fn set_search_query(query: String) -> () as CatalogRequest::SetSearchQuery);
client_method!(CatalogClient => fn search_input(query: String) -> () as CatalogRequest::SearchInput);
client_method!(CatalogClient => fn set_category(category: CategoryFilter) -> () as CatalogRequest::SetCategory);
client_method!(CatalogClient => fn set_price_range(min: f64, max: f64) -> () as CatalogRequest::SetPriceRange);
client_method!(CatalogClient => fn set_in_stock_only(in_stock_only: bool) -> () as CatalogRequest::SetInStockOnly);
client_method!(CatalogClient => fn clear_filters() -> () as CatalogRequest::ClearFilters);
client_method!(CatalogClient => fn set_sort(key: Field) -> SortCriteria as CatalogRequest::SetSort);
client_method!(CatalogClient => fn go_to_page(page: usize) -> usize as CatalogRequest::GoToPage);
client_method!(CatalogClient => fn add_to_cart(product_id: ProductId) -> CartLine as CatalogRequest::AddToCart);
client_method!(CatalogClient => fn toggle_favorite(product_id: ProductId) -> bool as CatalogRequest::ToggleFavorite);
client_method!(CatalogClient => fn select_product(product_id: Option<ProductId>) -> Option<Product> as CatalogRequest::SelectProduct);
client_method!(CatalogClient => fn refresh_favorites() -> () as CatalogRequest::RefreshFavorites);
client_method!(CatalogClient => fn shutdown() -> () as CatalogRequest::Shutdown);
