//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they depend
//! only on application services and remain testable without real I/O.

use crate::domain::{AccountService, ReviewLifecycleService, ValidationMode};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login.
    pub accounts: AccountService,
    /// Review CRUD, listing, search, and enrichment.
    pub reviews: ReviewLifecycleService,
    /// Field-validation mode applied to request payloads.
    pub validation_mode: ValidationMode,
}

impl HttpState {
    /// Assemble the handler state.
    #[must_use]
    pub const fn new(
        accounts: AccountService,
        reviews: ReviewLifecycleService,
        validation_mode: ValidationMode,
    ) -> Self {
        Self {
            accounts,
            reviews,
            validation_mode,
        }
    }
}
