use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub available: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name should not be empty".into()));
    }
    if name.chars().count() > 255 {
        return Err(errors::ModelError::Validation("name must be at most 255 characters".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() {
        return Err(errors::ModelError::Validation("price must be a number".into()));
    }
    if price < 0.0 {
        return Err(errors::ModelError::Validation("price must not be less than 0".into()));
    }
    Ok(())
}
