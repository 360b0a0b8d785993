//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{reviews, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable struct for creating new user records. `created_at` defaults
/// server-side.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub game_name: String,
    pub rating: i16,
    pub review_text: String,
    pub created_by: String,
    pub pending_token: Uuid,
    pub background_image: Option<String>,
    pub released: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new review records. Artwork columns stay
/// NULL until an enrichment commit.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub game_name: &'a str,
    pub rating: i16,
    pub review_text: &'a str,
    pub created_by: &'a str,
    pub pending_token: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Changeset for edits: core fields plus the rotated pending token. Artwork
/// columns are untouched, so committed artwork survives an edit.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewUpdate<'a> {
    pub game_name: &'a str,
    pub rating: i16,
    pub review_text: &'a str,
    pub pending_token: Uuid,
}

/// Changeset for committing artwork. `treat_none_as_null` makes an absent
/// release date overwrite any previous value instead of skipping the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArtworkUpdate<'a> {
    pub background_image: &'a str,
    pub released: Option<&'a str>,
}
