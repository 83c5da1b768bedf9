//! Product Service - validation in front of the repository

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductInput, SearchParams};
use crate::query::ProductQuery;
use crate::repository::ProductRepository;
use crate::update::{ProductPatch, ProductUpdate};

/// Product service.
///
/// Turns request input into validated builder output and hands it to the
/// repository. Invalid input never reaches the store.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.get_all().await
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: ProductInput) -> ProductResult<Product> {
        input.check()?;
        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository.get_by_id(id).await
    }

    /// Overwrite name, description and price of an existing product
    #[instrument(skip(self, input))]
    pub async fn replace_product(&self, id: Uuid, input: ProductInput) -> ProductResult<()> {
        let update = ProductUpdate::replace(input)?;
        self.repository.update(id, update).await
    }

    /// Set the given subset of fields on an existing product
    #[instrument(skip(self, fields))]
    pub async fn patch_product(&self, id: Uuid, fields: Map<String, Value>) -> ProductResult<()> {
        let patch = ProductPatch::from_map(fields)?;
        self.repository.patch(id, patch).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        self.repository.delete(id).await
    }

    #[instrument(skip(self))]
    pub async fn search_products(&self, params: &SearchParams) -> ProductResult<Vec<Product>> {
        let query = ProductQuery::from_params(params)?;
        self.repository.search(query).await
    }
}
