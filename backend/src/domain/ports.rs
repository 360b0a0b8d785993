//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the document store and the external game catalogue). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning stringly results.

use async_trait::async_trait;
use thiserror::Error;

use super::review::{Artwork, ArtworkCandidate, GameName, PendingToken, Review, ReviewId};
use super::user::{User, Username};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
    /// The username is already registered.
    #[error("username {username} is already taken")]
    DuplicateUsername {
        /// The conflicting name.
        username: String,
    },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-constraint violations.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }
}

/// Credential store port: user records keyed by case-normalised username.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Usernames are unique; inserting a taken name
    /// yields [`UserPersistenceError::DuplicateUsername`].
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;
}

/// Persistence errors raised by [`ReviewRepository`] adapters.
///
/// There is no retry or backoff policy: the lifecycle service maps
/// `Connection` to a service-unavailable response and `Query` to an internal
/// error rather than recovering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewPersistenceError {
    /// Repository connection could not be established.
    #[error("review repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("review repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl ReviewPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// One page of reviews plus the filtered collection's total size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPage {
    /// Reviews on this page, newest first.
    pub items: Vec<Review>,
    /// Total matching reviews across all pages.
    pub total: u64,
}

/// Document-store port for review documents.
///
/// All operations are single-document atomic; no review references another,
/// so no multi-document transactions are needed. Reads reflect prior writes
/// from the same process.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a new review document.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Fetch a review by id.
    async fn find_by_id(&self, id: &ReviewId)
    -> Result<Option<Review>, ReviewPersistenceError>;

    /// Fetch the review currently carrying `token`. Tokens may be reused
    /// across unrelated reviews sequentially; when several match, the most
    /// recently created wins.
    async fn find_by_pending_token(
        &self,
        token: &PendingToken,
    ) -> Result<Option<Review>, ReviewPersistenceError>;

    /// List one page of reviews, newest first, optionally filtered by owner.
    async fn list_page(
        &self,
        created_by: Option<&Username>,
        offset: i64,
        limit: i64,
    ) -> Result<ReviewPage, ReviewPersistenceError>;

    /// Replace the core fields of an existing review. Returns `false` when
    /// no document matches; the caller must re-check rather than assume the
    /// write landed.
    async fn update(&self, review: &Review) -> Result<bool, ReviewPersistenceError>;

    /// Attach artwork to a review. Returns `false` when no document matches.
    async fn set_artwork(
        &self,
        id: &ReviewId,
        artwork: &Artwork,
    ) -> Result<bool, ReviewPersistenceError>;

    /// Delete a review by id. Returns `false` when it was already gone.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError>;

    /// Case-insensitive text search over game name and review text, newest
    /// first. Zero hits is an empty list, never an error.
    async fn text_search(&self, query: &str) -> Result<Vec<Review>, ReviewPersistenceError>;
}

/// Errors surfaced by the catalogue adapter.
///
/// All variants are non-fatal to the review being enriched: the lifecycle
/// service degrades to an empty candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogueSourceError {
    /// Network-level failure reaching the catalogue.
    #[error("catalogue transport failed: {message}")]
    Transport {
        /// Adapter-level failure description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("catalogue request timed out: {message}")]
    Timeout {
        /// Adapter-level failure description.
        message: String,
    },
    /// The catalogue throttled the request.
    #[error("catalogue rate limited the request: {message}")]
    RateLimited {
        /// Adapter-level failure description.
        message: String,
    },
    /// The catalogue rejected the request as malformed.
    #[error("catalogue rejected the request: {message}")]
    InvalidRequest {
        /// Adapter-level failure description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("catalogue response could not be decoded: {message}")]
    Decode {
        /// Adapter-level failure description.
        message: String,
    },
}

impl CatalogueSourceError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for throttling responses.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Helper for malformed-request rejections.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Helper for body decode failures.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// External game-catalogue port: free-text search returning artwork and
/// release-date candidates.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    /// Search the catalogue by game name.
    async fn search(
        &self,
        game_name: &GameName,
    ) -> Result<Vec<ArtworkCandidate>, CatalogueSourceError>;
}
