//! Server binary: loads settings from the environment (and `.env`), connects the
//! store client, and serves every route.
//!
//! Run from repo root: `cargo run -p pollos-server`

use pollos_api::{app, connect_store, AppState, ProviderRegistry, ProviderSelection, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pollos_api=info,pollos_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        e
    })?;
    let providers = ProviderSelection::new(ProviderRegistry::builtin(), &settings.provider)?;
    let provider = providers.get_config()?.clone();
    tracing::info!(provider = %provider.provider_id, table = %provider.table_name, "provider selected");

    let store = connect_store(&settings).await.map_err(|e| {
        tracing::error!(error = %e, "could not build store client");
        e
    })?;

    let state = AppState::new(store, providers).with_legacy_list_errors(settings.legacy_list_errors);
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
