//! Typed HTTP client and a predictable state container that mirrors what
//! the server holds for the signed-in user.
//!
//! Actions flow through [`store::reduce`], which is pure. [`effects::run`]
//! performs the I/O a request action asks for and yields follow-up actions.
//! [`selectors`] derive views from the resulting state.

pub mod api;
pub mod effects;
pub mod selectors;
pub mod store;

pub use api::{ApiClient, ClientError};
pub use store::{reduce, Action, ClientState, Store};
