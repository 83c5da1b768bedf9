//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
    options::IndexOptions,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput};
use crate::query::ProductQuery;
use crate::repository::{ProductRepository, RepositoryTimeouts, with_timeout};
use crate::update::{ProductPatch, ProductUpdate};

/// Default collection name
pub const COLLECTION: &str = "products";

/// Stored shape of a product: the id lives in `_id` as a binary UUID
/// (subtype 4), whichever serializer writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
    created_at: DateTime<Utc>,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: bson::Uuid::from_bytes(product.id.into_bytes()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            created_at: product.created_at,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: Uuid::from_bytes(doc.id.bytes()),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            created_at: doc.created_at,
        }
    }
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
    timeouts: RepositoryTimeouts,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
            timeouts: RepositoryTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: RepositoryTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Create the `price` index used by range filters and sorting
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "price": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_price".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": bson::Uuid::from_bytes(id.into_bytes()) }
    }

    async fn find_many(&self, filter: Document, sort: Option<Document>) -> ProductResult<Vec<Product>> {
        let mut find = self.collection.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }

        let cursor = find.await?;
        let docs: Vec<ProductDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        with_timeout("get_all", self.timeouts.long, self.find_many(doc! {}, None)).await
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: ProductInput) -> ProductResult<Product> {
        let product = Product::new(input);
        let document = ProductDocument::from(&product);

        with_timeout("create", self.timeouts.long, async {
            self.collection
                .insert_one(&document)
                .await
                .map(|_| ())
                .map_err(ProductError::from)
        })
        .await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Product> {
        let filter = Self::id_filter(id);
        let found = with_timeout("get_by_id", self.timeouts.short, async {
            self.collection
                .find_one(filter)
                .await
                .map_err(ProductError::from)
        })
        .await?;

        found.map(Product::from).ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, update))]
    async fn update(&self, id: Uuid, update: ProductUpdate) -> ProductResult<()> {
        let filter = Self::id_filter(id);
        let result = with_timeout("update", self.timeouts.short, async {
            self.collection
                .update_one(filter, update.to_set_document())
                .await
                .map_err(ProductError::from)
        })
        .await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(())
    }

    #[instrument(skip(self, patch))]
    async fn patch(&self, id: Uuid, patch: ProductPatch) -> ProductResult<()> {
        let filter = Self::id_filter(id);
        let result = with_timeout("patch", self.timeouts.short, async {
            self.collection
                .update_one(filter, patch.to_set_document())
                .await
                .map_err(ProductError::from)
        })
        .await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product patched successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<()> {
        let filter = Self::id_filter(id);
        let result = with_timeout("delete", self.timeouts.short, async {
            self.collection
                .delete_one(filter)
                .await
                .map_err(ProductError::from)
        })
        .await?;

        if result.deleted_count == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn search(&self, query: ProductQuery) -> ProductResult<Vec<Product>> {
        with_timeout(
            "search",
            self.timeouts.long,
            self.find_many(query.filter_document(), query.sort_document()),
        )
        .await
    }
}
