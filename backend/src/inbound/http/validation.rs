//! Shared validation helpers for inbound HTTP adapters.
//!
//! Each helper turns a raw request field into its domain type, mapping the
//! typed validation error to a 400 payload carrying the field name and a
//! stable machine-readable code.

use serde_json::json;
use uuid::Uuid;

use crate::domain::review::{
    GameName, GameNameValidationError, Rating, RatingValidationError, ReviewText,
    ReviewTextValidationError,
};
use crate::domain::user::{Password, PasswordValidationError, UsernameValidationError};
use crate::domain::{Error, Username, ValidationMode};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: &'static str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

fn username_code(error: &UsernameValidationError) -> &'static str {
    match error {
        UsernameValidationError::Empty => "empty",
        UsernameValidationError::TooLong { .. } => "too_long",
        UsernameValidationError::InvalidCharacters => "invalid_characters",
    }
}

pub(crate) fn parse_username(
    raw: &str,
    field: FieldName,
    mode: ValidationMode,
) -> Result<Username, Error> {
    Username::parse(raw, mode)
        .map_err(|error| field_error(field, username_code(&error), error.to_string()))
}

fn password_code(error: &PasswordValidationError) -> &'static str {
    match error {
        PasswordValidationError::TooShort { .. } => "too_short",
        PasswordValidationError::TooLong { .. } => "too_long",
    }
}

pub(crate) fn parse_password(raw: &str, field: FieldName) -> Result<Password, Error> {
    Password::parse(raw)
        .map_err(|error| field_error(field, password_code(&error), error.to_string()))
}

fn game_name_code(error: &GameNameValidationError) -> &'static str {
    match error {
        GameNameValidationError::Empty => "empty",
        GameNameValidationError::TooLong { .. } => "too_long",
        GameNameValidationError::InvalidCharacters => "invalid_characters",
    }
}

pub(crate) fn parse_game_name(
    raw: &str,
    field: FieldName,
    mode: ValidationMode,
) -> Result<GameName, Error> {
    GameName::parse(raw, mode)
        .map_err(|error| field_error(field, game_name_code(&error), error.to_string()))
}

fn rating_code(error: &RatingValidationError) -> &'static str {
    match error {
        RatingValidationError::NotASingleDigit => "not_a_single_digit",
        RatingValidationError::OutOfRange { .. } => "out_of_range",
    }
}

pub(crate) fn parse_rating(raw: &str, field: FieldName) -> Result<Rating, Error> {
    Rating::parse(raw).map_err(|error| field_error(field, rating_code(&error), error.to_string()))
}

fn review_text_code(error: &ReviewTextValidationError) -> &'static str {
    match error {
        ReviewTextValidationError::TooShort { .. } => "too_short",
        ReviewTextValidationError::TooLong { .. } => "too_long",
    }
}

pub(crate) fn parse_review_text(raw: &str, field: FieldName) -> Result<ReviewText, Error> {
    ReviewText::parse(raw)
        .map_err(|error| field_error(field, review_text_code(&error), error.to_string()))
}

pub(crate) fn parse_uuid(raw: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| {
        field_error(
            field,
            "invalid_uuid",
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}
