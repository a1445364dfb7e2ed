//! Data models
//!
//! Wire shapes follow the backend REST API: snake_case except where
//! the backend uses its own names (`product_image_url`,
//! `totalRecords`).

pub mod product;

// Re-exports
pub use product::*;
