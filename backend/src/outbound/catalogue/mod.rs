//! Reqwest-backed game catalogue adapter.

mod dto;
mod http_source;

pub use http_source::CatalogueHttpSource;
