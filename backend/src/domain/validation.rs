//! Validation mode selecting legacy or strict field acceptance.
//!
//! The original field patterns for usernames and game names anchor start and
//! end but permit a zero-length match, so the empty string passes. That gap
//! is almost certainly unintended, but tightening it silently would change
//! observable behaviour, so the mode is configurable: [`ValidationMode::Legacy`]
//! reproduces the original patterns exactly and is the default, while
//! [`ValidationMode::Strict`] rejects empty usernames and game names.

/// Field validation behaviour for usernames and game names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reproduce the original patterns, including the empty-string gap.
    #[default]
    Legacy,
    /// Additionally reject empty usernames and game names.
    Strict,
}

impl ValidationMode {
    /// Whether a zero-length value should be rejected.
    #[must_use]
    pub const fn rejects_empty(self) -> bool {
        matches!(self, Self::Strict)
    }
}
