//! Game review backend.
//!
//! The crate follows a hexagonal layout: `domain` holds the value types,
//! ports, and services; `inbound` adapts HTTP requests onto the services;
//! `outbound` adapts the services onto PostgreSQL and the external game
//! catalogue; `server` wires the pieces together.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
