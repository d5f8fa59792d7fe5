//! # Filter Expression AST
//!
//! Predicates, sort orders and text searches evaluated by the store.
//! The REST layer builds these from query strings; the store only reads them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::Product;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,

    /// Greater than or equal
    Gte,

    /// Less than or equal
    Lte,
}

/// A filter expression
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    /// Create a new filter expression
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }

    /// Create a lower-bound filter
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Gte, value)
    }

    /// Create an upper-bound filter
    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOperator::Lte, value)
    }

    /// Check if a product matches this filter
    pub fn matches(&self, product: &Product) -> bool {
        let field_value = match product.field(&self.field) {
            Some(v) => v,
            None => return false,
        };

        match self.operator {
            FilterOperator::Eq => field_value == self.value,
            FilterOperator::Gte => {
                compare_json_values(&field_value, &self.value)
                    .is_some_and(|ord| ord != Ordering::Less)
            }
            FilterOperator::Lte => {
                compare_json_values(&field_value, &self.value)
                    .is_some_and(|ord| ord != Ordering::Greater)
            }
        }
    }
}

/// Compare two JSON values for ordering; `None` when they are not comparable
fn compare_json_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A set of filters combined with AND logic.
///
/// Built once from validated input and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[FilterExpr] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check if a product matches all filters
    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }
}

impl FromIterator<FilterExpr> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterExpr>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}

/// Sort order for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first by creation time
    CreatedAtDesc,
}

impl SortOrder {
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::CreatedAtDesc => b.created_at.cmp(&a.created_at),
        }
    }
}

/// A full-text search over `name` and `description`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    terms: Vec<String>,
}

impl TextSearch {
    /// Build a search from raw text; terms are lower-cased words
    pub fn new(text: &str) -> Self {
        let mut terms: Vec<String> = Vec::new();
        for term in tokenize(text) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of distinct search terms found in the product's text index.
    /// Zero means the product does not match.
    pub fn score(&self, product: &Product) -> usize {
        let words: Vec<String> = tokenize(&product.name)
            .chain(tokenize(&product.description))
            .collect();
        self.terms
            .iter()
            .filter(|term| words.iter().any(|w| w == *term))
            .count()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

/// Per-category aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub count: u64,
    pub avg_price: f64,
}
