//! Test helpers for inbound HTTP components.
//!
//! Provides in-memory implementations of the persistence and catalogue
//! ports plus an app factory wired the same way as the production server,
//! minus the database.

use std::collections::HashMap;
use std::sync::Mutex;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;
use async_trait::async_trait;

use crate::domain::ports::{
    CatalogueSource, CatalogueSourceError, ReviewPage, ReviewPersistenceError, ReviewRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::review::{
    Artwork, ArtworkCandidate, GameName, PendingToken, Review, ReviewId,
};
use crate::domain::{AccountService, ReviewLifecycleService, User, Username, ValidationMode};
use crate::inbound::http::state::HttpState;
use std::sync::Arc;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub(crate) fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory credential store.
#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    rows: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut rows = self.rows.lock().expect("user store lock");
        let key = user.username().as_ref().to_owned();
        if rows.contains_key(&key) {
            return Err(UserPersistenceError::duplicate_username(key));
        }
        rows.insert(key, user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("user store lock")
            .get(username.as_ref())
            .cloned())
    }
}

/// In-memory review store mirroring the document-store semantics: newest
/// first, case-insensitive search, single-document writes.
#[derive(Default)]
pub(crate) struct InMemoryReviewRepository {
    rows: Mutex<HashMap<ReviewId, Review>>,
}

impl InMemoryReviewRepository {
    fn sorted(&self, filter: impl Fn(&Review) -> bool) -> Vec<Review> {
        let rows = self.rows.lock().expect("review store lock");
        let mut matching: Vec<_> = rows.values().filter(|r| filter(r)).cloned().collect();
        matching.sort_by_key(|review| std::cmp::Reverse(review.created_at()));
        matching
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        self.rows
            .lock()
            .expect("review store lock")
            .insert(*review.id(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(self.rows.lock().expect("review store lock").get(id).cloned())
    }

    async fn find_by_pending_token(
        &self,
        token: &PendingToken,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(self
            .sorted(|review| review.pending_token() == token)
            .into_iter()
            .next())
    }

    async fn list_page(
        &self,
        created_by: Option<&Username>,
        offset: i64,
        limit: i64,
    ) -> Result<ReviewPage, ReviewPersistenceError> {
        let matching =
            self.sorted(|review| created_by.is_none_or(|owner| review.created_by() == owner));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(offset).expect("non-negative offset"))
            .take(usize::try_from(limit).expect("non-negative limit"))
            .collect();
        Ok(ReviewPage { items, total })
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewPersistenceError> {
        let mut rows = self.rows.lock().expect("review store lock");
        if rows.contains_key(review.id()) {
            rows.insert(*review.id(), review.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn set_artwork(
        &self,
        id: &ReviewId,
        artwork: &Artwork,
    ) -> Result<bool, ReviewPersistenceError> {
        let mut rows = self.rows.lock().expect("review store lock");
        match rows.get_mut(id) {
            Some(review) => {
                review.set_artwork(artwork.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("review store lock")
            .remove(id)
            .is_some())
    }

    async fn text_search(&self, query: &str) -> Result<Vec<Review>, ReviewPersistenceError> {
        let needle = query.to_lowercase();
        Ok(self.sorted(|review| {
            review.game_name().as_ref().to_lowercase().contains(&needle)
                || review.review_text().as_ref().to_lowercase().contains(&needle)
        }))
    }
}

/// Catalogue stub returning a fixed candidate list for every search.
pub(crate) struct StubCatalogueSource {
    candidates: Vec<ArtworkCandidate>,
}

impl StubCatalogueSource {
    pub(crate) fn new(candidates: Vec<ArtworkCandidate>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl CatalogueSource for StubCatalogueSource {
    async fn search(
        &self,
        _game_name: &GameName,
    ) -> Result<Vec<ArtworkCandidate>, CatalogueSourceError> {
        Ok(self.candidates.clone())
    }
}

/// Handler state over in-memory ports.
pub(crate) fn test_state(candidates: Vec<ArtworkCandidate>) -> HttpState {
    HttpState::new(
        AccountService::new(Arc::new(InMemoryUserRepository::default())),
        ReviewLifecycleService::new(
            Arc::new(InMemoryReviewRepository::default()),
            Arc::new(StubCatalogueSource::new(candidates)),
        ),
        ValidationMode::Legacy,
    )
}

/// Full application wired over in-memory ports, without candidates.
pub(crate) fn test_app() -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app_with_candidates(Vec::new())
}

/// Full application wired over in-memory ports, with the catalogue stub
/// returning `candidates` for every search.
pub(crate) fn test_app_with_candidates(
    candidates: Vec<ArtworkCandidate>,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(test_state(candidates)))
        .configure(crate::server::configure_api)
}
