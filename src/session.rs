//! Authenticated identity and session handling.
//!
//! The storefront does not perform authentication itself; it consumes an
//! opaque identity from the auth provider. Services switch between
//! anonymous (local-store backed) and authenticated (database backed)
//! modes when handed a new identity via their `set_identity` methods.

use serde::{Deserialize, Serialize};

/// An authenticated shopper as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque provider-issued id
    pub id: String,
    /// Email address on record
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
}

/// Holds the identity for the current session, if any.
///
/// The session is plain data; after `sign_in`/`sign_out` the caller is
/// responsible for pushing the new identity into each service so they
/// reload from the matching source of truth.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Identity>,
}

impl Session {
    /// Creates an anonymous session.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Records a sign-in from the auth provider.
    pub fn sign_in(&mut self, identity: Identity) {
        self.current = Some(identity);
    }

    /// Clears the current identity.
    pub fn sign_out(&mut self) {
        self.current = None;
    }

    /// The signed-in shopper, or `None` for an anonymous session.
    #[must_use]
    pub fn user(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Whether a shopper is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());

        session.sign_in(Identity {
            id: "user-1".to_string(),
            email: "shopper@example.com".to_string(),
            display_name: None,
        });
        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("user-1"));

        session.sign_out();
        assert!(!session.is_authenticated());
    }
}
