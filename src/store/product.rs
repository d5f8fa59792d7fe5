//! # Product Documents
//!
//! The single entity held by the catalog collection, plus the two write
//! shapes the validator produces for it.
//!
//! ## Invariants
//! - `price` is never negative
//! - `category` is stored lower-cased
//! - `name` and `description` carry no surrounding whitespace
//! - `created_at` is fixed at insert; `updated_at` never moves backwards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a fresh document from a validated create payload
    pub fn create(new: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            in_stock: new.in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a validated partial update in place.
    ///
    /// Only the fields present in the patch change. `updated_at` is set to
    /// `now`, or left alone if the clock reads earlier than the last write.
    pub fn apply(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(in_stock) = patch.in_stock {
            self.in_stock = in_stock;
        }
        self.updated_at = self.updated_at.max(now);
    }

    /// Look up a field by its wire name, for filter evaluation
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "name" => Some(Value::String(self.name.clone())),
            "description" => Some(Value::String(self.description.clone())),
            "price" => serde_json::Number::from_f64(self.price).map(Value::Number),
            "category" => Some(Value::String(self.category.clone())),
            "inStock" => Some(Value::Bool(self.in_stock)),
            "createdAt" => Some(Value::String(self.created_at.to_rfc3339())),
            "updatedAt" => Some(Value::String(self.updated_at.to_rfc3339())),
            _ => None,
        }
    }
}

/// A fully validated, normalized create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl NewProduct {
    /// Normalize raw field values the way the collection stores them
    pub fn new(
        name: &str,
        description: Option<&str>,
        price: f64,
        category: &str,
        in_stock: Option<bool>,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.map(str::trim).unwrap_or_default().to_string(),
            price,
            category: normalize_category(category),
            in_stock: in_stock.unwrap_or(true),
        }
    }
}

/// A validated partial update; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

/// Categories are matched and stored trimmed and lower-cased
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}
