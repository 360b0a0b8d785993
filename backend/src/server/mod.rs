//! HTTP server wiring: route registration and session middleware.

pub mod config;

pub use config::{Cli, ValidationModeArg};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use crate::inbound::http::{accounts, reviews};

const SESSION_COOKIE_NAME: &str = "session";

/// Register every `/api/v1` route.
///
/// `search_reviews` and `commit_artwork` are registered ahead of the
/// `{id}` routes so their literal path segments win over the UUID capture.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(accounts::register)
            .service(accounts::login)
            .service(accounts::logout)
            .service(reviews::search_reviews)
            .service(reviews::commit_artwork)
            .service(reviews::list_reviews)
            .service(reviews::create_review)
            .service(reviews::get_review)
            .service(reviews::edit_review)
            .service(reviews::delete_review),
    );
}

/// Build the cookie session middleware used by the server.
#[must_use]
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(cookie_secure)
        .build()
}
