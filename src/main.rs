use clap::Parser;
use dotenvy::dotenv;
use inventory_buddy::{
    catalog::ProductCatalogView,
    config::{self, StoreBackend},
    console::ConsoleInput,
    errors::Result,
    store, ui,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Inventory catalog with manual and voice product entry
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Store backend to use: http or sqlite
    #[arg(long)]
    store: Option<String>,

    /// Base URL of the product service
    #[arg(long)]
    api_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    let args = Args::parse();

    // 2. Load configuration: file, then environment, then command line
    let mut app_config = config::load_config(&args.config)?;
    app_config.apply_env_overrides()?;
    if let Some(backend) = &args.store {
        app_config.store.backend = backend.parse::<StoreBackend>()?;
    }
    if let Some(url) = args.api_url {
        app_config.store.base_url = url;
    }

    // 3. Initialize tracing on stderr so it stays out of the console UI
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
    info!("Loaded configuration from {:?}", args.config);

    // 4. Connect the store and load the catalog; a failed first load only sets the banner
    let product_store = store::connect(&app_config.store).await?;
    let catalog = ProductCatalogView::new(product_store);
    if let Err(e) = catalog.refresh().await {
        warn!("Initial catalog load failed: {}", e);
    }

    // 5. Run the console UI
    let input = ConsoleInput::stdin();
    ui::run(&catalog, &input).await?;

    info!("Bye.");
    Ok(())
}
