//! Catalog client - gateways and controllers for the catalog console
//!
//! The two gateways (`api`, `upload`) own all remote I/O: plain
//! request/response round-trips against the catalog backend and
//! direct put-object calls against the blob store. The two
//! controllers (`controller::list`, `controller::form`) own the view
//! state the console renders and drive the gateways.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod track;
pub mod upload;

pub use api::{ApiGateway, ApiRequest, ApiTransport, HttpTransport, Method};
pub use config::{ClientConfig, StorageConfig};
pub use controller::form::{FieldErrors, FormMode, FormPhase, ProductForm};
pub use controller::list::{FetchTicket, ListQuery, ProductList};
pub use error::{ClientError, ClientResult};
pub use track::{InFlight, RequestTracker};
pub use upload::{ALLOWED_MEDIA_TYPES, AssetFile, AssetStore, S3Store, UploadGateway};

// Re-export shared types for convenience
pub use shared::{ListResponse, Product, ProductPayload};
