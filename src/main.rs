use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Instrument};

use storefront::app_system::{setup_tracing, CatalogSystem};
use storefront::catalog_actor::CatalogView;
use storefront::clients::CatalogClient;
use storefront::config::CatalogConfig;
use storefront::domain::{CategoryFilter, Field, ProductId};
use storefront::view::{detail_lines, page_window, ColumnSet, PageItem};

const PAGE_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse the product catalog from the terminal")]
struct Cli {
    /// Config file (defaults to config.toml in the data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where favorites are stored
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Product dataset to load instead of the bundled one
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Case-insensitive match on name or category
    #[arg(short, long)]
    query: Option<String>,

    /// Category name, or "all"
    #[arg(short, long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Hide products with no stock
    #[arg(long)]
    in_stock: bool,

    /// Sort key (name, category, price, originalPrice, stock, id). The
    /// isFavorite column is not sortable.
    /// Repeating a key flips its direction.
    #[arg(short, long)]
    sort: Vec<Field>,

    #[arg(short, long, default_value_t = 1)]
    page: usize,

    #[arg(long)]
    page_size: Option<usize>,

    /// Toggle a product's favorite flag
    #[arg(long)]
    favorite: Vec<u64>,

    /// Add one unit of a product to the cart
    #[arg(long)]
    add: Vec<u64>,

    /// Open a product's detail view
    #[arg(long)]
    show: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CatalogConfig::load_in(cli.data_dir.as_deref()).context("Failed to load config")?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(dataset) = &cli.dataset {
        config.dataset_path = Some(dataset.clone());
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }

    let system = CatalogSystem::start(&config).context("Failed to start catalog")?;

    let span = tracing::info_span!("catalog_session");
    let view = run_session(&system.client, &cli).instrument(span).await;

    system.shutdown().await?;
    let view = view?;
    render(&view);

    info!("Session complete");
    Ok(())
}

async fn run_session(client: &CatalogClient, cli: &Cli) -> Result<CatalogView> {
    for id in &cli.favorite {
        let is_favorite = client.toggle_favorite(ProductId(*id)).await?;
        info!(product_id = id, is_favorite, "Favorite toggled");
    }

    for id in &cli.add {
        match client.add_to_cart(ProductId(*id)).await {
            Ok(line) => info!(product_id = id, quantity = line.quantity, "Added to cart"),
            Err(e) => warn!(product_id = id, error = %e, "Could not add to cart"),
        }
    }

    if let Some(query) = &cli.query {
        client.set_search_query(query.clone()).await?;
    }
    if let Some(category) = &cli.category {
        client.set_category(CategoryFilter::from_label(category)).await?;
    }
    if cli.min_price.is_some() || cli.max_price.is_some() {
        let min = cli.min_price.unwrap_or(0.0);
        let max = cli.max_price.unwrap_or(f64::INFINITY);
        client.set_price_range(min, max).await?;
    }
    if cli.in_stock {
        client.set_in_stock_only(true).await?;
    }
    for key in &cli.sort {
        client
            .set_sort(*key)
            .await
            .with_context(|| format!("Cannot sort by {key}"))?;
    }

    if let Some(id) = cli.show {
        client.select_product(Some(ProductId(id))).await?;
    }

    client.go_to_page(cli.page).await?;
    settled_view(client).await
}

/// Polls until no page change is in flight.
async fn settled_view(client: &CatalogClient) -> Result<CatalogView> {
    loop {
        let view = client.view().await?;
        if !view.paging {
            return Ok(view);
        }
        tokio::time::sleep(PAGE_POLL_INTERVAL).await;
    }
}

fn render(view: &CatalogView) {
    let columns = ColumnSet::catalog();
    let header: Vec<String> = columns.columns().iter().map(|column| column.header.clone()).collect();
    let rows: Vec<Vec<String>> = view.page.visible.iter().map(|product| columns.render_row(product)).collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    print_row(&header, &widths);
    for row in &rows {
        print_row(row, &widths);
    }

    let (start, end) = view.page.display_range();
    println!();
    println!("Showing {start}-{end} of {} products", view.result_count);

    let pages: Vec<String> = page_window(view.page.current_page, view.page.total_pages)
        .into_iter()
        .map(|item| match item {
            PageItem::Page(page) if page == view.page.current_page => format!("[{page}]"),
            other => other.to_string(),
        })
        .collect();
    println!("Pages: {}", pages.join(" "));

    if !view.active_filters.is_empty() {
        let chips: Vec<String> = view.active_filters.iter().map(ToString::to_string).collect();
        println!("Filters: {}", chips.join(", "));
    }
    if let Some(key) = view.sort.key {
        println!("Sorted by {key} ({:?})", view.sort.direction);
    }
    if view.cart_item_count > 0 {
        println!("Cart: {} items", view.cart_item_count);
    }
    if let Some(product) = &view.selected {
        println!();
        for line in detail_lines(product) {
            println!("{line}");
        }
    }
    if let Some(message) = &view.toast {
        println!();
        println!("> {message}");
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  "));
}
