use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::hooks::CatalogHooks;
use super::state::CatalogState;
use crate::clients::CatalogClient;
use crate::config::DelayConfig;
use crate::domain::{CartLine, ProductId};
use crate::error::CatalogError;
use crate::favorites::FavoritesStore;
use crate::messages::{CatalogRequest, Response};

/// Completions posted back to the actor by its own timer tasks.
#[derive(Debug)]
enum Settled {
    Search { ticket: u64, query: String },
    Page { ticket: u64, page: usize },
    Cart { product_id: ProductId, respond_to: Response<CartLine> },
    ToastExpired { generation: u64 },
}

/// A delayed change that a newer request of the same kind supersedes.
#[derive(Debug, Default)]
struct Pending {
    ticket: u64,
    handle: Option<JoinHandle<()>>,
}

impl Pending {
    /// Cancels the in-flight timer and returns the ticket for the next one.
    fn supersede(&mut self) -> u64 {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.ticket += 1;
        self.ticket
    }

    fn settle(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket {
            return false;
        }
        self.handle = None;
        true
    }

    fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

/// The catalog controller. Owns all UI state and processes one request at a
/// time; simulated latency runs in spawned timers that report back through
/// the `settled` channel.
pub struct CatalogService {
    receiver: mpsc::Receiver<CatalogRequest>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    state: CatalogState,
    favorites: FavoritesStore,
    hooks: Box<dyn CatalogHooks>,
    delays: DelayConfig,
    search: Pending,
    page: Pending,
    toast_timer: Option<JoinHandle<()>>,
}

impl CatalogService {
    pub fn new(
        buffer_size: usize,
        state: CatalogState,
        favorites: FavoritesStore,
        delays: DelayConfig,
        hooks: impl CatalogHooks,
    ) -> (Self, CatalogClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        let service = Self {
            receiver,
            settled_tx,
            settled_rx,
            state,
            favorites,
            hooks: Box::new(hooks),
            delays,
            search: Pending::default(),
            page: Pending::default(),
            toast_timer: None,
        };
        (service, CatalogClient::new(sender))
    }

    #[instrument(name = "catalog_service", skip(self))]
    pub async fn run(mut self) {
        info!(products = self.state.products().len(), "CatalogService starting");
        loop {
            tokio::select! {
                request = self.receiver.recv() => match request {
                    Some(request) => {
                        if self.handle_request(request).is_break() {
                            break;
                        }
                    }
                    None => break,
                },
                Some(settled) = self.settled_rx.recv() => self.handle_settled(settled),
            }
        }

        self.search.supersede();
        self.page.supersede();
        if let Some(timer) = self.toast_timer.take() {
            timer.abort();
        }
        info!("CatalogService stopped");
    }

    fn handle_request(&mut self, request: CatalogRequest) -> ControlFlow<()> {
        match request {
            CatalogRequest::View { respond_to } => {
                let _ = respond_to.send(Ok(self.state.view()));
            }
            CatalogRequest::SetSearchQuery { query, respond_to } => {
                self.handle_set_search_query(query);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::SearchInput { query, respond_to } => {
                self.handle_search_input(query);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::SetCategory { category, respond_to } => {
                debug!(category = %category, "Setting category");
                self.discard_pending_page();
                self.state.set_category(category);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::SetPriceRange { min, max, respond_to } => {
                debug!(min, max, "Setting price range");
                self.discard_pending_page();
                self.state.set_price_range(min, max);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::SetInStockOnly { in_stock_only, respond_to } => {
                debug!(in_stock_only, "Setting stock filter");
                self.discard_pending_page();
                self.state.set_in_stock_only(in_stock_only);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::ClearFilters { respond_to } => {
                debug!("Clearing filters");
                self.search.supersede();
                self.state.set_searching(false);
                self.discard_pending_page();
                self.state.clear_filters();
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::SetSort { key, respond_to } => {
                let result = self.state.set_sort(key).map_err(CatalogError::from);
                match &result {
                    Ok(sort) => debug!(key = %key, direction = ?sort.direction, "Sort changed"),
                    Err(e) => warn!(error = %e, "Rejected sort key"),
                }
                let _ = respond_to.send(result);
            }
            CatalogRequest::GoToPage { page, respond_to } => {
                let target = self.handle_go_to_page(page);
                let _ = respond_to.send(Ok(target));
            }
            CatalogRequest::AddToCart { product_id, respond_to } => {
                self.handle_add_to_cart(product_id, respond_to);
            }
            CatalogRequest::ToggleFavorite { product_id, respond_to } => {
                let _ = respond_to.send(self.handle_toggle_favorite(product_id));
            }
            CatalogRequest::SelectProduct { product_id, respond_to } => {
                let result = self.state.select_product(product_id);
                if let Ok(selected) = &result {
                    self.hooks.on_selection_changed(selected.as_ref());
                }
                let _ = respond_to.send(result);
            }
            CatalogRequest::RefreshFavorites { respond_to } => {
                let favorites = self.favorites.read();
                self.state.apply_favorites(&favorites);
                let _ = respond_to.send(Ok(()));
            }
            CatalogRequest::Shutdown { respond_to } => {
                info!("CatalogService shutting down");
                let _ = respond_to.send(Ok(()));
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn handle_settled(&mut self, settled: Settled) {
        match settled {
            Settled::Search { ticket, query } => {
                if !self.search.settle(ticket) {
                    debug!(ticket, "Discarding stale search input");
                    return;
                }
                self.discard_pending_page();
                self.state.set_search_query(query);
                self.state.set_searching(false);
            }
            Settled::Page { ticket, page } => {
                if !self.page.settle(ticket) {
                    debug!(ticket, page, "Discarding stale page change");
                    return;
                }
                let page = self.state.go_to_page(page);
                self.state.set_paging(false);
                debug!(page, "Page changed");
            }
            Settled::Cart { product_id, respond_to } => {
                self.state.end_cart_add();
                let _ = respond_to.send(self.complete_add_to_cart(product_id));
            }
            Settled::ToastExpired { generation } => {
                if self.state.expire_toast(generation) {
                    debug!(generation, "Toast dismissed");
                }
            }
        }
    }

    #[instrument(skip(self))]
    fn handle_set_search_query(&mut self, query: String) {
        self.search.supersede();
        self.state.set_searching(false);
        self.discard_pending_page();
        self.state.set_search_query(query);
    }

    #[instrument(skip(self))]
    fn handle_search_input(&mut self, query: String) {
        let ticket = self.search.supersede();
        self.state.set_searching(true);
        let delay = self.delays.search();
        self.search.handle = Some(self.schedule(delay, Settled::Search { ticket, query }));
    }

    /// Returns the clamped target. Re-selecting the current page applies at once.
    #[instrument(skip(self))]
    fn handle_go_to_page(&mut self, page: usize) -> usize {
        let target = self.state.clamp_page(page);
        let ticket = self.page.supersede();

        if target == self.state.current_page() {
            self.state.set_paging(false);
            return target;
        }

        self.state.set_paging(true);
        let delay = self.delays.page();
        self.page.handle = Some(self.schedule(delay, Settled::Page { ticket, page: target }));
        target
    }

    fn discard_pending_page(&mut self) {
        if self.page.is_pending() {
            debug!("Discarding pending page change");
        }
        self.page.supersede();
        self.state.set_paging(false);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_add_to_cart(&mut self, product_id: ProductId, respond_to: Response<CartLine>) {
        if let Err(e) = self.state.check_can_add(product_id) {
            warn!(error = %e, "Rejected add to cart");
            let _ = respond_to.send(Err(e));
            return;
        }

        debug!("Processing add_to_cart request");
        self.state.begin_cart_add();
        let delay = self.delays.cart();
        // Every add counts, so cart timers are never superseded.
        self.schedule(delay, Settled::Cart { product_id, respond_to });
    }

    fn complete_add_to_cart(&mut self, product_id: ProductId) -> Result<CartLine, CatalogError> {
        let line = self.state.add_to_cart(product_id).inspect_err(|e| {
            warn!(product_id = %product_id, error = %e, "Add to cart failed on completion");
        })?;

        let item_count = self.state.cart().item_count();
        info!(product_id = %product_id, quantity = line.quantity, item_count, "Added to cart");
        self.hooks.on_cart_changed(&line, item_count);

        let name = self.state.product(product_id)?.name.clone();
        self.show_toast(format!("{name} added to cart!"));
        Ok(line)
    }

    /// On a storage write failure the flag stays as it was and the caller gets
    /// the unchanged state back.
    #[instrument(fields(product_id = %product_id), skip(self))]
    fn handle_toggle_favorite(&mut self, product_id: ProductId) -> Result<bool, CatalogError> {
        let product = self.state.product(product_id)?;
        let was_favorite = product.is_favorite;
        let name = product.name.clone();

        let favorites = match self.favorites.toggle(product_id) {
            Ok(favorites) => favorites,
            Err(e) => {
                warn!(error = %e, "Favorite not saved, keeping previous state");
                return Ok(was_favorite);
            }
        };

        self.state.apply_favorites(&favorites);
        let is_favorite = favorites.contains(product_id);
        info!(is_favorite, "Favorite toggled");
        self.hooks.on_favorite_changed(product_id, is_favorite);

        let message = if is_favorite {
            format!("{name} added to favorites")
        } else {
            format!("{name} removed from favorites")
        };
        self.show_toast(message);
        Ok(is_favorite)
    }

    /// Shows a toast and restarts the dismiss timer.
    fn show_toast(&mut self, message: String) {
        self.hooks.on_toast(&message);
        let generation = self.state.show_toast(message);
        if let Some(timer) = self.toast_timer.take() {
            timer.abort();
        }
        let delay = self.delays.toast();
        self.toast_timer = Some(self.schedule(delay, Settled::ToastExpired { generation }));
    }

    fn schedule(&self, delay: Duration, settled: Settled) -> JoinHandle<()> {
        let settled_tx = self.settled_tx.clone();
        spawn_after(delay, async move {
            let _ = settled_tx.send(settled);
        })
    }
}

fn spawn_after<F>(delay: Duration, work: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        work.await;
    })
}
