//! Review aggregate and its field types.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Username;
use super::validation::ValidationMode;

/// Maximum accepted game-name length in characters.
pub const GAME_NAME_MAX: usize = 30;
/// Minimum accepted review-text length in characters.
pub const REVIEW_TEXT_MIN: usize = 10;
/// Maximum accepted review-text length in characters.
pub const REVIEW_TEXT_MAX: usize = 250;
/// Highest accepted rating value.
pub const RATING_MAX: u8 = 5;

static GAME_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn game_name_regex() -> &'static Regex {
    GAME_NAME_RE.get_or_init(|| {
        // Anchored; `*` deliberately admits the empty string (legacy gap,
        // see `ValidationMode`). Length is enforced separately.
        let pattern = "^[A-Za-z- ]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("game name regex failed to compile: {error}"))
    })
}

/// Validation errors returned by [`GameName::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameNameValidationError {
    /// Rejected only under [`ValidationMode::Strict`].
    #[error("game name must not be empty")]
    Empty,
    /// Game name exceeds [`GAME_NAME_MAX`] characters.
    #[error("game name must be at most {max} characters")]
    TooLong {
        /// The enforced ceiling.
        max: usize,
    },
    /// Game name contains characters outside `[A-Za-z- ]`.
    #[error("game name may only contain letters, hyphens, and spaces")]
    InvalidCharacters,
}

/// Name of the game a review is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameName(String);

impl GameName {
    /// Validate a raw game name.
    ///
    /// # Errors
    ///
    /// Returns a [`GameNameValidationError`] when the input is over-long,
    /// contains disallowed characters, or is empty under strict mode.
    pub fn parse(
        raw: impl Into<String>,
        mode: ValidationMode,
    ) -> Result<Self, GameNameValidationError> {
        let raw = raw.into();
        if raw.is_empty() && mode.rejects_empty() {
            return Err(GameNameValidationError::Empty);
        }
        if raw.chars().count() > GAME_NAME_MAX {
            return Err(GameNameValidationError::TooLong { max: GAME_NAME_MAX });
        }
        if !game_name_regex().is_match(&raw) {
            return Err(GameNameValidationError::InvalidCharacters);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for GameName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Validation errors returned by [`Rating::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingValidationError {
    /// Input is not exactly one character in `'0'..='5'`.
    #[error("rating must be a single digit from 0 to 5")]
    NotASingleDigit,
    /// Numeric value above [`RATING_MAX`].
    #[error("rating must be at most {max}")]
    OutOfRange {
        /// The enforced ceiling.
        max: u8,
    },
}

/// Star rating between 0 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Accept exactly one character in `'0'..='5'`; longer input, partial
    /// matches, and anything non-numeric are rejected.
    ///
    /// # Errors
    ///
    /// Returns a [`RatingValidationError`] for any other input.
    pub fn parse(raw: &str) -> Result<Self, RatingValidationError> {
        let mut chars = raw.chars();
        let (Some(digit), None) = (chars.next(), chars.next()) else {
            return Err(RatingValidationError::NotASingleDigit);
        };
        match digit {
            '0'..='5' => Ok(Self(digit as u8 - b'0')),
            _ => Err(RatingValidationError::NotASingleDigit),
        }
    }

    /// Wrap an already-numeric rating.
    ///
    /// # Errors
    ///
    /// Returns [`RatingValidationError::OutOfRange`] above [`RATING_MAX`].
    pub const fn new(value: u8) -> Result<Self, RatingValidationError> {
        if value > RATING_MAX {
            return Err(RatingValidationError::OutOfRange { max: RATING_MAX });
        }
        Ok(Self(value))
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Validation errors returned by [`ReviewText::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewTextValidationError {
    /// Text shorter than [`REVIEW_TEXT_MIN`] characters.
    #[error("review text must be at least {min} characters")]
    TooShort {
        /// The enforced floor.
        min: usize,
    },
    /// Text exceeds [`REVIEW_TEXT_MAX`] characters.
    #[error("review text must be at most {max} characters")]
    TooLong {
        /// The enforced ceiling.
        max: usize,
    },
}

/// Body of a review. Any characters; only length is constrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewText(String);

impl ReviewText {
    /// Validate raw review text.
    ///
    /// # Errors
    ///
    /// Returns a [`ReviewTextValidationError`] when the length falls outside
    /// `REVIEW_TEXT_MIN..=REVIEW_TEXT_MAX`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ReviewTextValidationError> {
        let raw = raw.into();
        let length = raw.chars().count();
        if length < REVIEW_TEXT_MIN {
            return Err(ReviewTextValidationError::TooShort {
                min: REVIEW_TEXT_MIN,
            });
        }
        if length > REVIEW_TEXT_MAX {
            return Err(ReviewTextValidationError::TooLong {
                max: REVIEW_TEXT_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for ReviewText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Stable review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ReviewId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Short-lived correlation id linking a just-created or just-edited review
/// to a still-to-be-chosen enrichment candidate.
///
/// A fresh token is issued on every create and edit, stored on the review,
/// and echoed back by the client on the commit step. It is not a stable
/// identifier: the next edit replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingToken(Uuid);

impl PendingToken {
    /// Issue a fresh token.
    #[must_use]
    pub fn issue() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PendingToken {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Cover art and release date committed onto a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    /// Cover image URL.
    pub background_image: String,
    /// Release date as reported by the catalogue, if known.
    pub released: Option<String>,
}

/// One catalogue search hit offered to the user after create/edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkCandidate {
    /// Cover image URL.
    pub background_image: String,
    /// Release date as reported by the catalogue, if known.
    pub released: Option<String>,
}

impl From<ArtworkCandidate> for Artwork {
    fn from(candidate: ArtworkCandidate) -> Self {
        Self {
            background_image: candidate.background_image,
            released: candidate.released,
        }
    }
}

/// Validated field values for a new or edited review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Name of the reviewed game.
    pub game_name: GameName,
    /// Star rating.
    pub rating: Rating,
    /// Review body.
    pub review_text: ReviewText,
}

/// A user-submitted game review, optionally enriched with artwork.
///
/// ## Invariants
/// - `rating` is within `0..=5`.
/// - `review_text` is 10 to 250 characters.
/// - `created_by` names the session user at creation time and never changes.
/// - `artwork` is absent until an enrichment commit; the review is valid and
///   listable without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    game_name: GameName,
    rating: Rating,
    review_text: ReviewText,
    created_by: Username,
    pending_token: PendingToken,
    artwork: Option<Artwork>,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review from a validated draft, stamping the author and
    /// issuing a fresh pending token.
    #[must_use]
    pub fn create(author: Username, draft: ReviewDraft) -> Self {
        Self {
            id: ReviewId::random(),
            game_name: draft.game_name,
            rating: draft.rating,
            review_text: draft.review_text,
            created_by: author,
            pending_token: PendingToken::issue(),
            artwork: None,
            created_at: Utc::now(),
        }
    }

    /// Reassemble a review from storage. The adapter is responsible for
    /// having validated fields on the way in.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "storage boundary constructor")]
    pub const fn from_storage(
        id: ReviewId,
        game_name: GameName,
        rating: Rating,
        review_text: ReviewText,
        created_by: Username,
        pending_token: PendingToken,
        artwork: Option<Artwork>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            game_name,
            rating,
            review_text,
            created_by,
            pending_token,
            artwork,
            created_at,
        }
    }

    /// Replace the core fields with an edited draft and issue a fresh
    /// pending token. Existing artwork stays until a new commit overwrites
    /// it.
    pub fn apply_edit(&mut self, draft: ReviewDraft) {
        self.game_name = draft.game_name;
        self.rating = draft.rating;
        self.review_text = draft.review_text;
        self.pending_token = PendingToken::issue();
    }

    /// Attach committed artwork.
    pub fn set_artwork(&mut self, artwork: Artwork) {
        self.artwork = Some(artwork);
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &ReviewId {
        &self.id
    }

    /// Name of the reviewed game.
    #[must_use]
    pub const fn game_name(&self) -> &GameName {
        &self.game_name
    }

    /// Star rating.
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    /// Review body.
    #[must_use]
    pub const fn review_text(&self) -> &ReviewText {
        &self.review_text
    }

    /// Owning username.
    #[must_use]
    pub const fn created_by(&self) -> &Username {
        &self.created_by
    }

    /// Current enrichment correlation token.
    #[must_use]
    pub const fn pending_token(&self) -> &PendingToken {
        &self.pending_token
    }

    /// Committed artwork, if any.
    #[must_use]
    pub const fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Creation timestamp; listings order by it, newest first.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
