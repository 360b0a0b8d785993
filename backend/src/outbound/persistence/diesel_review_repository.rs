//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! Listing and search order by `created_at` descending so the newest review
//! is always first. Search uses `ILIKE` with escaped wildcards, so user
//! input never behaves as a pattern.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{ReviewPage, ReviewPersistenceError, ReviewRepository};
use crate::domain::review::{
    Artwork, GameName, PendingToken, Rating, Review, ReviewId, ReviewText,
};
use crate::domain::{Username, ValidationMode};

use super::models::{ArtworkUpdate, NewReviewRow, ReviewRow, ReviewUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the `ReviewRepository` port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReviewPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ReviewPersistenceError::connection("database connection error")
        }
        _ => ReviewPersistenceError::query("database error"),
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', r"\\").replace('%', r"\%").replace('_', r"\_")
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewPersistenceError> {
    let invalid = |field: &str| {
        warn!(id = %row.id, field, "stored review field fails validation");
        ReviewPersistenceError::query(format!("stored review has an invalid {field}"))
    };

    let game_name =
        GameName::parse(&row.game_name, ValidationMode::Legacy).map_err(|_| invalid("game name"))?;
    let rating = u8::try_from(row.rating)
        .ok()
        .and_then(|value| Rating::new(value).ok())
        .ok_or_else(|| invalid("rating"))?;
    let review_text = ReviewText::parse(&row.review_text).map_err(|_| invalid("review text"))?;
    let created_by = Username::parse(&row.created_by, ValidationMode::Legacy)
        .map_err(|_| invalid("owner"))?;
    let artwork = row.background_image.map(|background_image| Artwork {
        background_image,
        released: row.released,
    });

    Ok(Review::from_storage(
        ReviewId::from(row.id),
        game_name,
        rating,
        review_text,
        created_by,
        PendingToken::from(row.pending_token),
        artwork,
        row.created_at,
    ))
}

fn rows_to_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>, ReviewPersistenceError> {
    rows.into_iter().map(row_to_review).collect()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewRow {
            id: *review.id().as_uuid(),
            game_name: review.game_name().as_ref(),
            rating: i16::from(review.rating().value()),
            review_text: review.review_text().as_ref(),
            created_by: review.created_by().as_ref(),
            pending_token: *review.pending_token().as_uuid(),
            created_at: review.created_at(),
        };

        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .find(id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_review).transpose()
    }

    async fn find_by_pending_token(
        &self,
        token: &PendingToken,
    ) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::pending_token.eq(token.as_uuid()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_review).transpose()
    }

    async fn list_page(
        &self,
        created_by: Option<&Username>,
        offset: i64,
        limit: i64,
    ) -> Result<ReviewPage, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = match created_by {
            Some(owner) => {
                reviews::table
                    .filter(reviews::created_by.eq(owner.as_ref()))
                    .count()
                    .get_result(&mut conn)
                    .await
            }
            None => reviews::table.count().get_result(&mut conn).await,
        }
        .map_err(map_diesel_error)?;

        let rows: Vec<ReviewRow> = match created_by {
            Some(owner) => {
                reviews::table
                    .filter(reviews::created_by.eq(owner.as_ref()))
                    .order(reviews::created_at.desc())
                    .offset(offset)
                    .limit(limit)
                    .select(ReviewRow::as_select())
                    .load(&mut conn)
                    .await
            }
            None => {
                reviews::table
                    .order(reviews::created_at.desc())
                    .offset(offset)
                    .limit(limit)
                    .select(ReviewRow::as_select())
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(ReviewPage {
            items: rows_to_reviews(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(&self, review: &Review) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ReviewUpdate {
            game_name: review.game_name().as_ref(),
            rating: i16::from(review.rating().value()),
            review_text: review.review_text().as_ref(),
            pending_token: *review.pending_token().as_uuid(),
        };

        let affected = diesel::update(reviews::table.find(review.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn set_artwork(
        &self,
        id: &ReviewId,
        artwork: &Artwork,
    ) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ArtworkUpdate {
            background_image: &artwork.background_image,
            released: artwork.released.as_deref(),
        };

        let affected = diesel::update(reviews::table.find(id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn text_search(&self, query: &str) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{}%", escape_like(query));

        let rows: Vec<ReviewRow> = reviews::table
            .filter(
                reviews::game_name
                    .ilike(&pattern)
                    .or(reviews::review_text.ilike(&pattern)),
            )
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_reviews(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("celeste", "celeste")]
    #[case("50%", r"50\%")]
    #[case("under_score", r"under\_score")]
    #[case(r"back\slash", r"back\\slash")]
    fn escapes_like_wildcards(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape_like(raw), expected);
    }
}
