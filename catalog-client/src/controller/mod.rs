//! View-state controllers
//!
//! Both controllers are synchronous state machines with `begin_*` /
//! `apply_*` transition pairs, so an event loop can run the remote
//! work in spawned tasks and feed the settled results back. The
//! `async` convenience methods combine the two for callers that are
//! happy to await in place.

pub mod form;
pub mod list;

pub use form::{FieldErrors, FormMode, FormPhase, ProductForm};
pub use list::{FetchTicket, ListQuery, ProductList};
