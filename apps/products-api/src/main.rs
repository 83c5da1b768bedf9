//! Products API - REST server over MongoDB or an in-memory store

use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, StoreConfig};
use state::{AppState, Store};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let store = match &config.store {
        StoreConfig::Mongo(mongo) => {
            let client = database::mongodb::connect_from_config_with_retry(mongo, None).await?;
            let db = client.database(mongo.database());
            info!(database = %mongo.database(), "Using MongoDB product store");
            Store::Mongo { client, db }
        }
        StoreConfig::Memory => {
            info!("Using in-memory product store");
            Store::Memory
        }
    };

    let state = AppState {
        config: config.clone(),
        store,
    };

    api::init_indexes(&state).await?;

    let api_routes = api::routes(&state).merge(health_router(config.app));
    let router = create_router::<openapi::ApiDoc>(api_routes, &config.server)?;
    api::products::log_routes();

    info!(
        name = config.app.name,
        version = config.app.version,
        port = config.server.port,
        "Starting Products API"
    );

    create_production_app(router, &config.server, config.shutdown_timeout, async move {
        if let Store::Mongo { client, .. } = state.store {
            info!("Closing MongoDB connections");
            client.shutdown().await;
        }
    })
    .await?;

    info!("Products API shutdown complete");
    Ok(())
}
