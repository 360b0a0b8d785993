//! User identity, role, and credential types.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::validation::ValidationMode;

/// Maximum accepted username length in characters.
pub const USERNAME_MAX: usize = 30;
/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 6;
/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 15;

/// Username reserved for the administrator account. Registering it grants
/// [`Role::Admin`], preserving the legacy data where the literal name was
/// the role.
pub const RESERVED_ADMIN_USERNAME: &str = "admin";

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Anchored; `*` deliberately admits the empty string (legacy gap,
        // see `ValidationMode`). Length is enforced separately.
        let pattern = "^[A-Za-z-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Validation errors returned by [`Username::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameValidationError {
    /// Rejected only under [`ValidationMode::Strict`].
    #[error("username must not be empty")]
    Empty,
    /// Username exceeds [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// The enforced ceiling.
        max: usize,
    },
    /// Username contains characters outside `[A-Za-z-]`.
    #[error("username may only contain letters and hyphens")]
    InvalidCharacters,
}

/// Case-normalised account name.
///
/// Validated against the raw input, then stored lowercase so lookups and
/// ownership comparisons are case-insensitive.
///
/// # Examples
/// ```
/// use replay_backend::domain::{Username, ValidationMode};
///
/// let name = Username::parse("Alice", ValidationMode::Strict).expect("valid username");
/// assert_eq!(name.as_ref(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate and normalise a raw username.
    ///
    /// # Errors
    ///
    /// Returns a [`UsernameValidationError`] when the input is over-long,
    /// contains disallowed characters, or is empty under strict mode.
    pub fn parse(
        raw: impl AsRef<str>,
        mode: ValidationMode,
    ) -> Result<Self, UsernameValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() && mode.rejects_empty() {
            return Err(UsernameValidationError::Empty);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UsernameValidationError::TooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(raw) {
            return Err(UsernameValidationError::InvalidCharacters);
        }
        Ok(Self(raw.to_lowercase()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Validation errors returned by [`Password::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// Password is shorter than [`PASSWORD_MIN`] characters.
    #[error("password must be at least {min} characters")]
    TooShort {
        /// The enforced floor.
        min: usize,
    },
    /// Password exceeds [`PASSWORD_MAX`] characters.
    #[error("password must be at most {max} characters")]
    TooLong {
        /// The enforced ceiling.
        max: usize,
    },
}

/// Plaintext password held only long enough to hash or verify.
///
/// Zeroed on drop; the `Debug` impl never prints the content.
pub struct Password(String);

impl Password {
    /// Validate a raw password. Any characters are allowed; only length is
    /// constrained.
    ///
    /// # Errors
    ///
    /// Returns a [`PasswordValidationError`] when the length falls outside
    /// `PASSWORD_MIN..=PASSWORD_MAX`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = raw.into();
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(PasswordValidationError::TooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(raw))
    }

    /// Borrow the plaintext for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Opaque one-way credential verifier stored against a user.
///
/// The format is owned by the crypto module (`salt:key`, hex-encoded); the
/// domain only carries it between the store and the verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordVerifier(String);

impl PasswordVerifier {
    /// Wrap an already-derived verifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the stored verifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordVerifier(<redacted>)")
    }
}

/// Capability level attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary account: may mutate only its own reviews.
    Member,
    /// May mutate any review.
    Admin,
}

impl Role {
    /// Role granted to a username at registration time.
    #[must_use]
    pub fn for_username(username: &Username) -> Self {
        if username.as_ref() == RESERVED_ADMIN_USERNAME {
            Self::Admin
        } else {
            Self::Member
        }
    }

    /// Stable storage/session representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }

    /// Parse the storage/session representation.
    #[must_use]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Registered account. Immutable after registration: there are no edit or
/// delete operations on users.
#[derive(Debug, Clone)]
pub struct User {
    username: Username,
    role: Role,
    verifier: PasswordVerifier,
}

impl User {
    /// Assemble a user from validated components.
    #[must_use]
    pub const fn new(username: Username, role: Role, verifier: PasswordVerifier) -> Self {
        Self {
            username,
            role,
            verifier,
        }
    }

    /// Unique, case-normalised account name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Capability level.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Opaque credential verifier.
    #[must_use]
    pub const fn verifier(&self) -> &PasswordVerifier {
        &self.verifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("Alice")]
    #[case("mary-jane")]
    #[case("ABCDEFGHIJKLMNOPQRSTUVWXYZ-abc")] // exactly 30
    fn accepts_valid_usernames(#[case] raw: &str) {
        let name = Username::parse(raw, ValidationMode::Strict).expect("valid username");
        assert_eq!(name.as_ref(), raw.to_lowercase());
    }

    #[rstest]
    #[case("alice smith", UsernameValidationError::InvalidCharacters)]
    #[case("alice1", UsernameValidationError::InvalidCharacters)]
    #[case("al!ce", UsernameValidationError::InvalidCharacters)]
    #[case(
        "abcdefghijklmnopqrstuvwxyz-abcd",
        UsernameValidationError::TooLong { max: USERNAME_MAX }
    )]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UsernameValidationError) {
        let err = Username::parse(raw, ValidationMode::Legacy).expect_err("must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn empty_username_is_a_legacy_gap() {
        // The anchored pattern matches zero characters; legacy mode keeps
        // that behaviour, strict mode closes it.
        assert!(Username::parse("", ValidationMode::Legacy).is_ok());
        assert_eq!(
            Username::parse("", ValidationMode::Strict).expect_err("strict rejects empty"),
            UsernameValidationError::Empty
        );
    }

    #[rstest]
    #[case("secret", true)]
    #[case("123456789012345", true)]
    #[case("short", false)]
    #[case("1234567890123456", false)]
    fn password_length_bounds(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(Password::parse(raw).is_ok(), accepted);
    }

    #[rstest]
    fn admin_username_gets_admin_role() {
        let admin = Username::parse("Admin", ValidationMode::Strict).expect("valid username");
        assert_eq!(Role::for_username(&admin), Role::Admin);
        let member = Username::parse("alice", ValidationMode::Strict).expect("valid username");
        assert_eq!(Role::for_username(&member), Role::Member);
    }

    #[rstest]
    fn role_storage_round_trip() {
        assert_eq!(Role::from_str(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::from_str(Role::Member.as_str()), Some(Role::Member));
        assert_eq!(Role::from_str("root"), None);
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = Password::parse("hunter2-long").expect("valid password");
        assert_eq!(format!("{password:?}"), "Password(<redacted>)");
    }
}
