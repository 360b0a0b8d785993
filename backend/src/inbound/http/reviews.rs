//! Review API handlers.
//!
//! ```text
//! GET    /api/v1/reviews?page=2&per_page=6&created_by=alice
//! GET    /api/v1/reviews/search?q=celeste
//! GET    /api/v1/reviews/{id}
//! POST   /api/v1/reviews {"gameName":"Celeste","rating":"5","reviewText":"..."}
//! PUT    /api/v1/reviews/{id}
//! DELETE /api/v1/reviews/{id}
//! POST   /api/v1/reviews/artwork {"pendingToken":"...","backgroundImage":"...","released":"..."}
//! ```
//!
//! Create and edit respond with the stored review, its pending token, and
//! the catalogue candidates found for the game name. The client commits one
//! candidate by echoing the token to the artwork endpoint; skipping the
//! commit leaves the review without artwork, which is valid.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageRequest, PageRequestError};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::review::{ArtworkCandidate, PendingToken, Review, ReviewDraft, ReviewId};
use crate::domain::{DeleteOutcome, EnrichmentOffer, Error, ValidationMode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_game_name, parse_rating, parse_review_text, parse_username, parse_uuid,
};

const GAME_NAME_FIELD: FieldName = FieldName::new("gameName");
const RATING_FIELD: FieldName = FieldName::new("rating");
const REVIEW_TEXT_FIELD: FieldName = FieldName::new("reviewText");
const CREATED_BY_FIELD: FieldName = FieldName::new("created_by");
const ID_FIELD: FieldName = FieldName::new("id");
const PENDING_TOKEN_FIELD: FieldName = FieldName::new("pendingToken");

/// Request body for creating or editing a review. The rating arrives as a
/// string and must be exactly one digit.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBody {
    pub game_name: String,
    pub rating: String,
    pub review_text: String,
}

impl ReviewBody {
    fn into_draft(self, mode: ValidationMode) -> Result<ReviewDraft, Error> {
        Ok(ReviewDraft {
            game_name: parse_game_name(&self.game_name, GAME_NAME_FIELD, mode)?,
            rating: parse_rating(&self.rating, RATING_FIELD)?,
            review_text: parse_review_text(&self.review_text, REVIEW_TEXT_FIELD)?,
        })
    }
}

/// Artwork fields embedded in review responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkResponse {
    pub background_image: String,
    pub released: Option<String>,
}

/// Review representation returned by all read endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub game_name: String,
    pub rating: u8,
    pub review_text: String,
    pub created_by: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork: Option<ArtworkResponse>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id().to_string(),
            game_name: review.game_name().as_ref().to_owned(),
            rating: review.rating().value(),
            review_text: review.review_text().as_ref().to_owned(),
            created_by: review.created_by().as_ref().to_owned(),
            created_at: review.created_at().to_rfc3339(),
            artwork: review.artwork().map(|artwork| ArtworkResponse {
                background_image: artwork.background_image.clone(),
                released: artwork.released.clone(),
            }),
        }
    }
}

/// Response to create and edit: the review, the token to echo back when
/// committing artwork, and the available candidates.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentOfferResponse {
    pub review: ReviewResponse,
    pub pending_token: String,
    pub candidates: Vec<ArtworkCandidate>,
}

impl From<EnrichmentOffer> for EnrichmentOfferResponse {
    fn from(offer: EnrichmentOffer) -> Self {
        Self {
            pending_token: offer.review.pending_token().as_uuid().to_string(),
            review: ReviewResponse::from(&offer.review),
            candidates: offer.candidates,
        }
    }
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub created_by: Option<String>,
}

/// Query parameters accepted by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// Search response: the hits plus a coarse outcome flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub items: Vec<ReviewResponse>,
    pub outcome: &'static str,
}

/// Delete response carrying the outcome notice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub outcome: &'static str,
}

/// Request body for committing one catalogue candidate onto the review
/// holding `pending_token`. The candidate is optional: a token-only body
/// commits nothing and leaves the review bare.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkCommitRequest {
    pub pending_token: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub released: Option<String>,
}

fn page_request_from(params: &ListParams) -> Result<PageRequest, Error> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(pagination::DEFAULT_PER_PAGE);
    PageRequest::new(page, per_page).map_err(|error| {
        let field = match error {
            PageRequestError::ZeroPage => "page",
            PageRequestError::ZeroPerPage | PageRequestError::PerPageTooLarge { .. } => "per_page",
        };
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": field,
            "code": "out_of_range",
        }))
    })
}

/// List one page of reviews, newest first. Open to anonymous callers.
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Page<ReviewResponse>>> {
    let request = page_request_from(&params)?;
    let created_by = params
        .created_by
        .as_deref()
        .map(|raw| parse_username(raw, CREATED_BY_FIELD, state.validation_mode))
        .transpose()?;
    let page = state.reviews.list(created_by.as_ref(), &request).await?;
    Ok(web::Json(page.map(|review| ReviewResponse::from(&review))))
}

/// Case-insensitive text search over game names and review bodies. Zero
/// matches (or a blank query) is an empty list with a `no_match` outcome,
/// never an error.
#[get("/reviews/search")]
pub async fn search_reviews(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResponse>> {
    let hits = state.reviews.search(&params.q).await?;
    let outcome = if hits.is_empty() { "no_match" } else { "match" };
    Ok(web::Json(SearchResponse {
        items: hits.iter().map(ReviewResponse::from).collect(),
        outcome,
    }))
}

/// Fetch a single review.
#[get("/reviews/{id}")]
pub async fn get_review(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let id = ReviewId::from(parse_uuid(&path.into_inner(), ID_FIELD)?);
    let review = state.reviews.get(&id).await?;
    Ok(web::Json(ReviewResponse::from(&review)))
}

/// Create a review owned by the session user.
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReviewBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let draft = payload.into_inner().into_draft(state.validation_mode)?;
    let offer = state.reviews.create(&actor, draft).await?;
    Ok(HttpResponse::Created().json(EnrichmentOfferResponse::from(offer)))
}

/// Replace the core fields of an existing review. Only the owner or an
/// administrator may edit.
#[put("/reviews/{id}")]
pub async fn edit_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReviewBody>,
) -> ApiResult<web::Json<EnrichmentOfferResponse>> {
    let actor = session.require_actor()?;
    let id = ReviewId::from(parse_uuid(&path.into_inner(), ID_FIELD)?);
    let draft = payload.into_inner().into_draft(state.validation_mode)?;
    let offer = state.reviews.edit(&actor, id, draft).await?;
    Ok(web::Json(EnrichmentOfferResponse::from(offer)))
}

/// Delete a review. Responds 200 with an outcome notice whether or not the
/// review still existed.
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let actor = session.require_actor()?;
    let id = ReviewId::from(parse_uuid(&path.into_inner(), ID_FIELD)?);
    let outcome = match state.reviews.delete(&actor, id).await? {
        DeleteOutcome::Deleted => "deleted",
        DeleteOutcome::AlreadyDeleted => "already_deleted",
    };
    Ok(web::Json(DeleteResponse { outcome }))
}

/// Commit one catalogue candidate onto the review holding the echoed
/// pending token.
#[post("/reviews/artwork")]
pub async fn commit_artwork(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ArtworkCommitRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let actor = session.require_actor()?;
    let body = payload.into_inner();
    let token = PendingToken::from(parse_uuid(&body.pending_token, PENDING_TOKEN_FIELD)?);
    let candidate = body.background_image.map(|background_image| ArtworkCandidate {
        background_image,
        released: body.released,
    });
    let review = state.reviews.commit_artwork(&actor, token, candidate).await?;
    Ok(web::Json(ReviewResponse::from(&review)))
}
