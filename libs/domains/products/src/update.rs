//! Full-replace and partial updates of a stored product.
//!
//! Both are validated on construction, so a value of either type is always
//! safe to hand to a repository.

use mongodb::bson::{Document, doc};
use serde_json::{Map, Value};

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput, check_price};

/// Overwrites name, description and price of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    name: String,
    description: String,
    price: f64,
}

impl ProductUpdate {
    pub fn replace(input: ProductInput) -> ProductResult<Self> {
        input.check()?;
        Ok(Self {
            name: input.name,
            description: input.description,
            price: input.price,
        })
    }

    pub fn to_set_document(&self) -> Document {
        doc! {
            "$set": {
                "name": &self.name,
                "description": &self.description,
                "price": self.price,
            }
        }
    }

    pub fn apply_to(&self, product: &mut Product) {
        product.name.clone_from(&self.name);
        product.description.clone_from(&self.description);
        product.price = self.price;
    }
}

/// Sets any non-empty subset of name, description and price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
}

impl ProductPatch {
    /// Validates an arbitrary JSON object into a patch.
    ///
    /// Only `name`, `description` and `price` are accepted. Any other key, a
    /// wrongly typed value or an empty object fails the whole patch.
    pub fn from_map(fields: Map<String, Value>) -> ProductResult<Self> {
        if fields.is_empty() {
            return Err(ProductError::Validation(
                "patch must set at least one of name, description, price".to_string(),
            ));
        }

        let mut patch = Self::default();
        for (key, value) in fields {
            match key.as_str() {
                "name" => match value {
                    Value::String(name) if !name.is_empty() => patch.name = Some(name),
                    _ => return Err(invalid("name must be a non-empty string")),
                },
                "description" => match value {
                    Value::String(description) => patch.description = Some(description),
                    _ => return Err(invalid("description must be a string")),
                },
                "price" => {
                    let price = value
                        .as_f64()
                        .ok_or_else(|| invalid("price must be a number"))?;
                    check_price(price)?;
                    patch.price = Some(price);
                }
                other => {
                    return Err(ProductError::Validation(format!(
                        "field '{other}' cannot be patched"
                    )));
                }
            }
        }

        Ok(patch)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(ref name) = self.name {
            set.insert("name", name);
        }
        if let Some(ref description) = self.description {
            set.insert("description", description);
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        doc! { "$set": set }
    }

    pub fn apply_to(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name.clone_from(name);
        }
        if let Some(ref description) = self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}

fn invalid(message: &str) -> ProductError {
    ProductError::Validation(message.to_string())
}
