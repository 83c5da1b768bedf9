//! In-process implementation of ProductRepository.
//!
//! Insertion order is the natural order. Used for local development and for
//! exercising the HTTP layer without a database.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};
use crate::query::ProductQuery;
use crate::repository::{ProductRepository, RepositoryTimeouts, with_timeout};
use crate::update::{ProductPatch, ProductUpdate};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
    timeouts: RepositoryTimeouts,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            timeouts: RepositoryTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: RepositoryTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    async fn modify<F>(&self, operation: &'static str, id: Uuid, change: F) -> ProductResult<()>
    where
        F: FnOnce(&mut Product),
    {
        with_timeout(operation, self.timeouts.short, async {
            let mut products = self.products.write().await;
            match products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    change(product);
                    Ok(())
                }
                None => Err(ProductError::NotFound(id)),
            }
        })
        .await
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        with_timeout("get_all", self.timeouts.long, async {
            Ok(self.products.read().await.clone())
        })
        .await
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let product = Product::new(input);
        with_timeout("create", self.timeouts.long, async {
            self.products.write().await.push(product.clone());
            Ok(())
        })
        .await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Product> {
        with_timeout("get_by_id", self.timeouts.short, async {
            self.products
                .read()
                .await
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(ProductError::NotFound(id))
        })
        .await
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: ProductUpdate) -> ProductResult<()> {
        self.modify("update", id, |product| update.apply_to(product))
            .await?;
        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn patch(&self, id: Uuid, patch: ProductPatch) -> ProductResult<()> {
        self.modify("patch", id, |product| patch.apply_to(product))
            .await?;
        tracing::info!(product_id = %id, "Product patched successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<()> {
        with_timeout("delete", self.timeouts.short, async {
            let mut products = self.products.write().await;
            products
                .iter()
                .position(|p| p.id == id)
                .map(|index| {
                    products.remove(index);
                })
                .ok_or(ProductError::NotFound(id))
        })
        .await?;

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }

    async fn search(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        with_timeout("search", self.timeouts.long, async {
            let mut found: Vec<Product> = self
                .products
                .read()
                .await
                .iter()
                .filter(|p| query.matches(p))
                .cloned()
                .collect();
            query.apply_order(&mut found);
            Ok(found)
        })
        .await
    }
}
