pub mod config;
pub mod endpoints;
pub mod error;
pub mod model;
pub mod pii;
pub mod storefront;

pub use self::config::RunConfig;
pub use endpoints::Endpoints;
pub use error::{CallError, CallResult};
pub use pii::Sensitive;
pub use storefront::Storefront;
