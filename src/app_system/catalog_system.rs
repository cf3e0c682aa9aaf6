use tracing::{error, info, instrument};
use crate::catalog_actor::{CatalogHooks, CatalogService, CatalogState, NoHooks};
use crate::clients::CatalogClient;
use crate::config::{CatalogConfig, DelayConfig};
use crate::error::CatalogError;
use crate::favorites::{FavoritesStore, FileStore};
use crate::repository::ProductRepository;

const REQUEST_BUFFER: usize = 64;

/// Builds the stores, starts the catalog actor and owns its task handle.
pub struct CatalogSystem {
    pub client: CatalogClient,
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Starts from configuration: favorites in the data directory, products
    /// from `dataset_path` or the bundled dataset.
    #[instrument(name = "catalog_system", skip(config))]
    pub fn start(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let data_dir = config
            .data_dir()
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        info!(data_dir = %data_dir.display(), "Starting catalog system");

        let repository = match &config.dataset_path {
            Some(path) => ProductRepository::from_path(path)?,
            None => ProductRepository::bundled()?,
        };
        let favorites = FavoritesStore::with_key(FileStore::new(data_dir), config.favorites_key.clone());

        Ok(Self::with_parts(repository, favorites, config.page_size, config.delays, NoHooks))
    }

    pub fn with_parts(
        repository: ProductRepository,
        favorites: FavoritesStore,
        page_size: usize,
        delays: DelayConfig,
        hooks: impl CatalogHooks,
    ) -> Self {
        let state = CatalogState::new(
            repository.load_catalog(&favorites),
            repository.categories(),
            page_size,
        );
        let (service, client) = CatalogService::new(REQUEST_BUFFER, state, favorites, delays, hooks);
        let handle = tokio::spawn(service.run());

        info!("Catalog system started successfully");
        Self { client, handle }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), CatalogError> {
        info!("Shutting down catalog system");
        self.client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Catalog service task failed");
            return Err(CatalogError::ActorCommunication(format!("Catalog task failed: {e}")));
        }

        info!("Catalog system shutdown complete");
        Ok(())
    }
}
