//! Catalogue payloads for `/api/products`.

use serde::{Deserialize, Deserializer, Serialize};

/// Product as listed by the catalogue endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Catalogue category slug.
    pub category: String,
    /// Image URL, when one was uploaded.
    #[serde(default)]
    pub image: Option<String>,
    /// One-line teaser.
    #[serde(default)]
    pub short_description: String,
    /// Long-form description.
    #[serde(default)]
    pub full_description: String,
    /// Highlighted features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Selling price.
    pub price: f64,
    /// List price before discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Discount percentage.
    #[serde(default)]
    pub discount: f64,
    /// Whether the product can be ordered.
    #[serde(default)]
    pub in_stock: bool,
    /// Offered sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Offered colours.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Material description.
    #[serde(default)]
    pub material: String,
    /// Care instructions.
    #[serde(default)]
    pub care_instructions: Vec<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Average review rating.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: u32,
}

/// Body of `GET /api/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListResponse {
    /// Listed products; absent is treated as empty.
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Create/update body for `POST /api/products` and `PUT /api/products/{id}`.
///
/// List fields accept either a JSON array or a comma-separated string, the
/// way the admin form collects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Catalogue category slug.
    pub category: String,
    /// One-line teaser.
    #[serde(default)]
    pub short_description: String,
    /// Long-form description.
    #[serde(default)]
    pub full_description: String,
    /// Highlighted features.
    #[serde(default, deserialize_with = "list_field")]
    pub features: Vec<String>,
    /// Selling price.
    pub price: f64,
    /// List price before discount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Discount percentage.
    #[serde(default)]
    pub discount: f64,
    /// Whether the product can be ordered.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Offered sizes.
    #[serde(default, deserialize_with = "list_field")]
    pub sizes: Vec<String>,
    /// Offered colours.
    #[serde(default, deserialize_with = "list_field")]
    pub colors: Vec<String>,
    /// Material description.
    #[serde(default)]
    pub material: String,
    /// Care instructions.
    #[serde(default, deserialize_with = "list_field")]
    pub care_instructions: Vec<String>,
    /// Free-form tags.
    #[serde(default, deserialize_with = "list_field")]
    pub tags: Vec<String>,
}

impl ProductDraft {
    /// Check the fields the backend would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns the name of the first invalid field and a static reason.
    pub fn validate(&self) -> Result<(), (&'static str, &'static str)> {
        if self.name.trim().is_empty() {
            return Err(("name", "must not be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(("category", "must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(("price", "must be a non-negative number"));
        }
        if !(0.0..=100.0).contains(&self.discount) {
            return Err(("discount", "must be between 0 and 100"));
        }
        if self
            .original_price
            .is_some_and(|original| !original.is_finite() || original < self.price)
        {
            return Err(("originalPrice", "must not be below price"));
        }
        Ok(())
    }
}

const fn default_in_stock() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Joined(String),
}

fn list_field<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match ListInput::deserialize(deserializer)? {
        ListInput::Items(items) => items
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        ListInput::Joined(joined) => split_list(&joined),
    };
    Ok(items)
}

/// Split a comma-separated form value into trimmed, non-empty entries.
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
