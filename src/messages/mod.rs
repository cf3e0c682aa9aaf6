use tokio::sync::oneshot;
use crate::catalog_actor::CatalogView;
use crate::domain::{CartLine, CategoryFilter, Field, Product, ProductId, SortCriteria};
use crate::error::CatalogError;

/// Reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, CatalogError>>;

/// Typed messages for the catalog actor. Each variant carries its parameters
/// and a oneshot channel for the reply.
#[derive(Debug)]
pub enum CatalogRequest {
    View {
        respond_to: Response<CatalogView>,
    },
    /// Applies a query immediately, cancelling any pending search input.
    SetSearchQuery {
        query: String,
        respond_to: Response<()>,
    },
    /// Applies a query after the search delay unless superseded.
    SearchInput {
        query: String,
        respond_to: Response<()>,
    },
    SetCategory {
        category: CategoryFilter,
        respond_to: Response<()>,
    },
    SetPriceRange {
        min: f64,
        max: f64,
        respond_to: Response<()>,
    },
    SetInStockOnly {
        in_stock_only: bool,
        respond_to: Response<()>,
    },
    ClearFilters {
        respond_to: Response<()>,
    },
    SetSort {
        key: Field,
        respond_to: Response<SortCriteria>,
    },
    /// Replies with the clamped target page; the page itself changes after the page delay.
    GoToPage {
        page: usize,
        respond_to: Response<usize>,
    },
    /// Replies once the simulated add has completed.
    AddToCart {
        product_id: ProductId,
        respond_to: Response<CartLine>,
    },
    ToggleFavorite {
        product_id: ProductId,
        respond_to: Response<bool>,
    },
    SelectProduct {
        product_id: Option<ProductId>,
        respond_to: Response<Option<Product>>,
    },
    RefreshFavorites {
        respond_to: Response<()>,
    },
    Shutdown {
        respond_to: Response<()>,
    },
}
