//! Shared types for the catalog console
//!
//! Wire-format types exchanged with the catalog backend, shared
//! between the client library and the console binary.

pub mod models;
pub mod page;

// Re-exports
pub use models::{ListResponse, Product, ProductPayload};
pub use page::{DEFAULT_PAGE_SIZE, total_pages};
pub use serde::{Deserialize, Serialize};
