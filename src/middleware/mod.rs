pub mod auth;
pub mod panic;

pub use auth::{auth_middleware, AuthUser};
pub use panic::handle_panic;
