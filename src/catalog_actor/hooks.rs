use crate::domain::{CartLine, Product, ProductId};

/// Optional observers of catalog events.
///
/// Every method defaults to doing nothing, so an implementation only overrides
/// the events it cares about. [`NoHooks`] is the explicit "no handler" choice.
pub trait CatalogHooks: Send + 'static {
    fn on_toast(&mut self, _message: &str) {}

    fn on_cart_changed(&mut self, _line: &CartLine, _item_count: u32) {}

    fn on_favorite_changed(&mut self, _product_id: ProductId, _is_favorite: bool) {}

    fn on_selection_changed(&mut self, _product: Option<&Product>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl CatalogHooks for NoHooks {}
