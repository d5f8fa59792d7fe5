//! # Response Formatting
//!
//! Success bodies for the catalog API. Every one carries `success: true`.

use serde::Serialize;

use crate::store::{CategoryStats, Product};

/// Paginated list response
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub page: usize,
    pub limit: usize,
    pub total: u64,
    pub items: Vec<Product>,
}

impl ListResponse {
    pub fn new(items: Vec<Product>, page: usize, limit: usize, total: u64) -> Self {
        Self {
            success: true,
            page,
            limit,
            total,
            items,
        }
    }
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub items: Vec<Product>,
}

impl SearchResponse {
    pub fn new(items: Vec<Product>) -> Self {
        Self {
            success: true,
            count: items.len(),
            items,
        }
    }
}

/// Category aggregation response
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Vec<CategoryStats>,
}

impl StatsResponse {
    pub fn new(stats: Vec<CategoryStats>) -> Self {
        Self {
            success: true,
            stats,
        }
    }
}

/// Single product response
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

impl ProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            success: true,
            product,
        }
    }
}

/// Plain message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
