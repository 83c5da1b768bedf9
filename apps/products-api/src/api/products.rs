//! Products API routes

use axum::Router;
use domain_products::{
    handlers, InMemoryProductRepository, MongoProductRepository, ProductService,
};
use tracing::info;

use super::PRODUCTS_PATH;
use crate::state::{AppState, Store};

/// Create products router over the configured store
pub fn router(state: &AppState) -> Router {
    let timeouts = state.config.timeouts;
    match &state.store {
        Store::Mongo { db, .. } => {
            let repository = MongoProductRepository::new(db).with_timeouts(timeouts);
            handlers::router(ProductService::new(repository))
        }
        Store::Memory => {
            let repository = InMemoryProductRepository::new().with_timeouts(timeouts);
            handlers::router(ProductService::new(repository))
        }
    }
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    if let Store::Mongo { db, .. } = &state.store {
        MongoProductRepository::new(db).init_indexes().await?;
    }
    Ok(())
}

/// Full paths of the products routes, e.g. `GET /products/{id}`
pub fn route_table() -> Vec<String> {
    handlers::ROUTES
        .iter()
        .map(|(method, path)| {
            let path = path.trim_end_matches('/');
            format!("{:<6} {}{}", method, PRODUCTS_PATH, path)
        })
        .collect()
}

/// Log every registered products route
pub fn log_routes() {
    for route in route_table() {
        info!(route = %route, "Registered route");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table() {
        let table = route_table();
        assert_eq!(table.len(), handlers::ROUTES.len());
        assert_eq!(table[0], "GET    /products");
        assert!(table.contains(&"GET    /products/search".to_string()));
        assert!(table.contains(&"DELETE /products/{id}".to_string()));
    }
}
