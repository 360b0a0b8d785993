//! Core domain model: value types, aggregates, ports, and application
//! services. No HTTP or persistence concerns live here.

pub mod accounts;
pub mod authorization;
pub mod crypto;
pub mod error;
pub mod ports;
pub mod review;
pub mod reviews;
pub mod user;
pub mod validation;

pub use accounts::AccountService;
pub use authorization::{Actor, can_mutate};
pub use error::{Error, ErrorCode};
pub use reviews::{DeleteOutcome, EnrichmentOffer, ReviewLifecycleService};
pub use user::{Password, Role, User, Username};
pub use validation::ValidationMode;
