use std::sync::Arc;

use common::FilesystemMediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use yatube::cache::PageCache;
use yatube::config::AppConfig;
use yatube::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let db = yatube::database::init_db(&config.database.url).await?;
    yatube::seed::seed_groups(&db, &config.groups).await?;
    yatube::seed::ensure_indexes(&db).await?;

    let media =
        FilesystemMediaStore::new(config.media.root.clone(), config.media.max_upload_size).await?;
    info!("Serving media from {}", config.media.root.display());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        media: Arc::new(media),
        cache: PageCache::from_config(&config.cache),
        config,
    };

    let app = yatube::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Yatube listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
