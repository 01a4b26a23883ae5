pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::domain::catalogue::CatalogueService;
use crate::shared::app_state::AppState;
use crate::shared::data::CatalogueStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let store = shared::data::open_store(&config).await?;

    // Битые ссылки и дубли id не мешают запуску, но о них стоит знать
    match store.read().await {
        Ok(snapshot) => {
            let issues = snapshot.document.integrity_issues();
            for issue in &issues {
                tracing::warn!("Catalogue integrity: {}", issue);
            }
            tracing::info!(
                "Catalogue loaded: {} categories, {} sites",
                snapshot.document.categories.len(),
                snapshot.document.sites.len()
            );
        }
        Err(e) => tracing::error!("Catalogue is not readable at startup: {}", e),
    }

    let static_dir = shared::config::resolve_path(&config.server.static_dir)?;
    let state = AppState::new(CatalogueService::new(store));
    let app = routes::configure_routes(state, &static_dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server address: {}", e))?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Set SITEDIR_PORT or [server].port to another value.",
                    addr.port()
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
