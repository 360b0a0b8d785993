//! HTTP adapter: handlers, session plumbing, request validation, and the
//! mapping from domain errors to JSON responses.

pub mod accounts;
pub mod error;
pub mod reviews;
pub mod session;
pub mod state;
pub(crate) mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;
pub use session::SessionContext;
pub use state::HttpState;
