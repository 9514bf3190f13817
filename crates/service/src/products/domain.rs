use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ProductError;
use super::lifecycle::Availability;

/// Catalog entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn availability(&self) -> Availability {
        Availability::from_flag(self.available)
    }
}

/// Create payload. Unknown fields are rejected, so `id` and `available`
/// cannot be supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProductInput {
    pub name: String,
    pub price: f64,
}

impl CreateProductInput {
    pub fn validate(&self) -> Result<(), ProductError> {
        models::product::validate_name(&self.name)?;
        models::product::validate_price(self.price)?;
        Ok(())
    }
}

/// Partial update payload. `id` is accepted on the wire but never written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProductInput {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl UpdateProductInput {
    pub fn validate(&self) -> Result<(), ProductError> {
        if let Some(name) = &self.name { models::product::validate_name(name)?; }
        if let Some(price) = self.price { models::product::validate_price(price)?; }
        Ok(())
    }

    /// Store-level changes with the identity field stripped.
    pub fn into_changes(self) -> ProductChanges {
        let UpdateProductInput { id: _, name, price } = self;
        ProductChanges { name, price, available: None }
    }
}

/// Insert shape handed to a store. Stores default `available` to true.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

impl From<CreateProductInput> for NewProduct {
    fn from(input: CreateProductInput) -> Self {
        NewProduct { name: input.name, price: input.price }
    }
}

/// Field-level update handed to a store; `None` leaves the column alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
}

impl ProductChanges {
    pub fn availability(next: Availability) -> Self {
        ProductChanges { available: Some(next.flag()), ..Default::default() }
    }

    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name { product.name = name.clone(); }
        if let Some(price) = self.price { product.price = price; }
        if let Some(available) = self.available { product.available = available; }
    }
}

/// Row filter understood by every store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub id: Option<i32>,
    pub available: Option<bool>,
}

impl ProductFilter {
    pub fn active() -> Self {
        ProductFilter { id: None, available: Some(true) }
    }

    pub fn active_with_id(id: i32) -> Self {
        ProductFilter { id: Some(id), available: Some(true) }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.id.map_or(true, |id| product.id == id)
            && self.available.map_or(true, |a| product.available == a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    #[serde(rename = "lastPage")]
    pub last_page: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
