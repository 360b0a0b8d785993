//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel models and
//! domain types; no business logic resides here. Row structs (`models.rs`)
//! and table definitions (`schema.rs`) stay internal to this module.
//! Connections come from a `bb8` pool with async support through
//! `diesel-async`.

mod diesel_review_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
