//! Review lifecycle: create, enrich, edit, list, search, delete.

use std::sync::Arc;

use pagination::{Page, PageRequest};
use tracing::warn;

use super::authorization::{self, Actor};
use super::error::Error;
use super::ports::{CatalogueSource, ReviewPersistenceError, ReviewRepository};
use super::review::{ArtworkCandidate, PendingToken, Review, ReviewDraft, ReviewId};
use super::user::Username;

/// Result of creating or editing a review: the stored document plus
/// catalogue candidates the client may commit in a follow-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOffer {
    /// The review as stored.
    pub review: Review,
    /// Catalogue hits matching the game name; empty when the catalogue had
    /// no matches or was unavailable.
    pub candidates: Vec<ArtworkCandidate>,
}

/// Outcome of a delete request. Deleting an already-absent review succeeds
/// without complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The review existed and was removed.
    Deleted,
    /// No review with that id existed.
    AlreadyDeleted,
}

/// Application service orchestrating the review store and the external
/// game catalogue.
#[derive(Clone)]
pub struct ReviewLifecycleService {
    reviews: Arc<dyn ReviewRepository>,
    catalogue: Arc<dyn CatalogueSource>,
}

impl ReviewLifecycleService {
    /// Build the service over its driven ports.
    pub fn new(reviews: Arc<dyn ReviewRepository>, catalogue: Arc<dyn CatalogueSource>) -> Self {
        Self { reviews, catalogue }
    }

    /// Create a review owned by `actor` and offer enrichment candidates.
    ///
    /// Catalogue failures never fail the create: the review is stored and
    /// the candidate list degrades to empty.
    pub async fn create(
        &self,
        actor: &Actor,
        draft: ReviewDraft,
    ) -> Result<EnrichmentOffer, Error> {
        let review = Review::create(actor.username().clone(), draft);
        self.reviews
            .insert(&review)
            .await
            .map_err(review_store_failure)?;
        let candidates = self.lookup_candidates(&review).await;
        Ok(EnrichmentOffer { review, candidates })
    }

    /// Attach a chosen candidate to the review carrying `token`.
    ///
    /// The token was issued by the immediately preceding create or edit;
    /// a stale or unknown token is a not-found, and only the review's owner
    /// or an administrator may commit. Committing without a candidate is
    /// allowed and leaves the review as it was.
    pub async fn commit_artwork(
        &self,
        actor: &Actor,
        token: PendingToken,
        candidate: Option<ArtworkCandidate>,
    ) -> Result<Review, Error> {
        let Some(mut review) = self
            .reviews
            .find_by_pending_token(&token)
            .await
            .map_err(review_store_failure)?
        else {
            return Err(Error::not_found("no pending review matches this token"));
        };
        self.authorize_mutation(actor, &review)?;
        let Some(candidate) = candidate else {
            return Ok(review);
        };
        review.set_artwork(candidate.into());
        let updated = self
            .reviews
            .set_artwork(review.id(), review.artwork().ok_or_else(|| {
                Error::internal("artwork missing immediately after set")
            })?)
            .await
            .map_err(review_store_failure)?;
        if !updated {
            return Err(Error::not_found("review disappeared before commit"));
        }
        Ok(review)
    }

    /// Replace the core fields of an existing review and offer fresh
    /// enrichment candidates.
    ///
    /// Authorization is checked against the stored review's owner, never
    /// against anything the client supplies.
    pub async fn edit(
        &self,
        actor: &Actor,
        id: ReviewId,
        draft: ReviewDraft,
    ) -> Result<EnrichmentOffer, Error> {
        let mut review = self.fetch(&id).await?;
        self.authorize_mutation(actor, &review)?;
        review.apply_edit(draft);
        let updated = self
            .reviews
            .update(&review)
            .await
            .map_err(review_store_failure)?;
        if !updated {
            return Err(Error::not_found("review no longer exists"));
        }
        let candidates = self.lookup_candidates(&review).await;
        Ok(EnrichmentOffer { review, candidates })
    }

    /// Delete a review. Deleting a review that is already gone reports
    /// [`DeleteOutcome::AlreadyDeleted`] rather than failing.
    pub async fn delete(&self, actor: &Actor, id: ReviewId) -> Result<DeleteOutcome, Error> {
        let Some(review) = self
            .reviews
            .find_by_id(&id)
            .await
            .map_err(review_store_failure)?
        else {
            return Ok(DeleteOutcome::AlreadyDeleted);
        };
        self.authorize_mutation(actor, &review)?;
        let removed = self
            .reviews
            .delete(&id)
            .await
            .map_err(review_store_failure)?;
        Ok(if removed {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::AlreadyDeleted
        })
    }

    /// Fetch a single review.
    pub async fn get(&self, id: &ReviewId) -> Result<Review, Error> {
        self.fetch(id).await
    }

    /// List one page of reviews, newest first, optionally restricted to one
    /// author's reviews.
    pub async fn list(
        &self,
        created_by: Option<&Username>,
        request: &PageRequest,
    ) -> Result<Page<Review>, Error> {
        let page = self
            .reviews
            .list_page(created_by, request.offset(), request.limit())
            .await
            .map_err(review_store_failure)?;
        Ok(Page::new(page.items, page.total, request))
    }

    /// Case-insensitive search over game names and review text. A blank
    /// query short-circuits to an empty list without touching the store;
    /// zero hits is a success, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<Review>, Error> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.reviews
            .text_search(query)
            .await
            .map_err(review_store_failure)
    }

    async fn fetch(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(review_store_failure)?
            .ok_or_else(|| Error::not_found("review not found"))
    }

    fn authorize_mutation(&self, actor: &Actor, review: &Review) -> Result<(), Error> {
        if authorization::can_mutate(actor, review.created_by()) {
            Ok(())
        } else {
            Err(Error::forbidden("you may only modify your own reviews"))
        }
    }

    async fn lookup_candidates(&self, review: &Review) -> Vec<ArtworkCandidate> {
        match self.catalogue.search(review.game_name()).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(
                    game_name = %review.game_name(),
                    error = %err,
                    "catalogue lookup failed; offering no candidates"
                );
                Vec::new()
            }
        }
    }
}

fn review_store_failure(err: ReviewPersistenceError) -> Error {
    match err {
        ReviewPersistenceError::Connection { message } => {
            warn!(error = %message, "review store unreachable");
            Error::service_unavailable("review store is unavailable")
        }
        ReviewPersistenceError::Query { message } => {
            warn!(error = %message, "review store query failed");
            Error::internal("review store query failed")
        }
    }
}
