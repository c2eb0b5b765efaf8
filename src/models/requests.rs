//! Request DTOs: product list queries and admin inputs.

use serde::{Deserialize, Serialize};

/// Filter and search state for the product list (GET /products).
///
/// Unset fields are left out of the upstream query and the cache key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query pairs for the set fields. Blank strings count as unset.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let mut push_text = |name: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((name, v.to_string()));
            }
        };
        push_text("category", &self.category);
        push_text("search", &self.search);
        push_text("brand", &self.brand);
        push_text("sort", &self.sort);

        if let Some(v) = self.min_price {
            params.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price {
            params.push(("max_price", v.to_string()));
        }
        if let Some(v) = self.page {
            params.push(("page", v.to_string()));
        }
        if let Some(v) = self.limit {
            params.push(("limit", v.to_string()));
        }
        params
    }

    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Some("min_price cannot exceed max_price".to_string());
            }
        }
        if self.min_price.is_some_and(|v| v < 0.0) || self.max_price.is_some_and(|v| v < 0.0) {
            return Some("Prices cannot be negative".to_string());
        }
        if self.limit == Some(0) {
            return Some("limit must be at least 1".to_string());
        }
        None
    }
}

/// Body for creating or updating a category (admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CategoryInput {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Category name cannot be empty".to_string());
        }
        None
    }
}

/// Body for creating or updating a product (admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default)]
    pub featured: bool,
}

impl ProductInput {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Product name cannot be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Some("Product price must be a non-negative number".to_string());
        }
        None
    }
}
