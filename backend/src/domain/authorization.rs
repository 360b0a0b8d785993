//! Ownership and capability checks for review mutation.
//!
//! One reusable predicate, applied before every edit and delete, instead of
//! re-deriving the check in each handler.

use serde::{Deserialize, Serialize};

use super::user::{Role, User, Username};

/// The authenticated identity acting in a request, as reconstructed from the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    username: Username,
    role: Role,
}

impl Actor {
    /// Assemble an actor from session data.
    #[must_use]
    pub const fn new(username: Username, role: Role) -> Self {
        Self { username, role }
    }

    /// Account name the session was established for.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Capability level carried by the session.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.username().clone(), user.role())
    }
}

/// Whether `actor` may edit or delete a review owned by `owner`.
///
/// True iff the actor is the owner or holds [`Role::Admin`].
///
/// # Examples
/// ```
/// use replay_backend::domain::{can_mutate, Actor, Role, Username, ValidationMode};
///
/// let alice = Username::parse("alice", ValidationMode::Strict).expect("valid");
/// let bob = Username::parse("bob", ValidationMode::Strict).expect("valid");
/// let actor = Actor::new(alice.clone(), Role::Member);
/// assert!(can_mutate(&actor, &alice));
/// assert!(!can_mutate(&actor, &bob));
/// ```
#[must_use]
pub fn can_mutate(actor: &Actor, owner: &Username) -> bool {
    actor.role() == Role::Admin || actor.username() == owner
}
