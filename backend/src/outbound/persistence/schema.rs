//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered accounts, keyed by the case-normalised username.
    users (username) {
        /// Primary key: lowercase username, letters and hyphens only.
        username -> Varchar,
        /// Scrypt verifier in `salt:key` hex form.
        password_hash -> Text,
        /// Capability level: `member` or `admin`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Game reviews, one row per review document.
    reviews (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Name of the reviewed game (max 30 characters).
        game_name -> Varchar,
        /// Star rating, 0 to 5.
        rating -> Int2,
        /// Review body, 10 to 250 characters.
        review_text -> Text,
        /// Username of the review's owner.
        created_by -> Varchar,
        /// Enrichment correlation token, rotated on every edit.
        pending_token -> Uuid,
        /// Committed cover image URL, if any.
        background_image -> Nullable<Text>,
        /// Release date reported by the catalogue, if any.
        released -> Nullable<Varchar>,
        /// Record creation timestamp; listings order by it descending.
        created_at -> Timestamptz,
    }
}
