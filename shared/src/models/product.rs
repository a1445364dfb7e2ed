//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned identifier (opaque)
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Public URL of the uploaded media asset
    #[serde(rename = "product_image_url")]
    pub image_url: String,
}

/// Create/update product payload
///
/// Updates are full-record replacement; the same body shape is used
/// for POST and PUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "product_image_url")]
    pub image_url: String,
}

/// One page of the product listing
///
/// `total_records` reflects whatever filter produced the page (plain
/// listing or keyword search), not the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    pub products: Vec<Product>,
    #[serde(rename = "totalRecords")]
    pub total_records: u64,
}
