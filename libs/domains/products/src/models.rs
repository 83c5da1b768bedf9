use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier, assigned at creation
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Always greater than zero
    pub price: f64,
    /// Creation timestamp, never modified afterwards
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new record from validated input, assigning id and timestamp.
    pub fn new(input: ProductInput) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            created_at: Utc::now(),
        }
    }
}

/// Body for creating a product or replacing all of its editable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "price must be greater than 0"))]
    pub price: f64,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    /// Runs field validation, reporting the first problem as
    /// [`ProductError::Validation`].
    pub fn check(&self) -> ProductResult<()> {
        self.validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;
        check_price(self.price)
    }
}

pub(crate) fn check_price(price: f64) -> ProductResult<()> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ProductError::Validation(
            "price must be greater than 0".to_string(),
        ))
    }
}

/// Result ordering for search
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    /// Whatever order the store returns
    #[default]
    Natural,
    /// Ascending by price
    Asc,
    /// Descending by price
    Desc,
}

impl SortOrder {
    /// `"asc"` and `"desc"` select a price ordering; anything else means
    /// natural order.
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

/// Raw search query string.
///
/// Bounds are kept as text so a malformed number can be reported as a
/// validation error instead of a generic query rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Inclusive lower price bound; 0 means no bound
    #[serde(rename = "minPrice")]
    #[param(value_type = Option<f64>)]
    pub min_price: Option<String>,
    /// Inclusive upper price bound; 0 means no bound
    #[serde(rename = "maxPrice")]
    #[param(value_type = Option<f64>)]
    pub max_price: Option<String>,
    /// `asc` or `desc` by price
    pub sort: Option<String>,
}

/// Body of successful update, patch and delete responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
