//! Security token (nonce) trait definition.

use benefactor_types::donor::UserId;

/// What a nonce is tied to besides its action name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonceBinding {
    /// `None` for anonymous visitors.
    pub user: Option<UserId>,
    /// Session token of the visitor; empty when there is none.
    pub session: String,
}

impl NonceBinding {
    pub fn new(user: Option<UserId>, session: impl Into<String>) -> Self {
        Self {
            user,
            session: session.into(),
        }
    }
}

/// Result of checking a nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceValidity {
    /// Issued during the current half of the nonce lifetime.
    Fresh,
    /// Issued during the previous half; still accepted.
    Aging,
    Invalid,
}

impl NonceValidity {
    pub fn is_valid(&self) -> bool {
        !matches!(self, NonceValidity::Invalid)
    }
}

/// Issues and verifies one-time form tokens bound to an action name.
pub trait NonceIssuer: Send + Sync {
    fn create(&self, action: &str, binding: &NonceBinding) -> String;

    fn verify(&self, nonce: &str, action: &str, binding: &NonceBinding) -> NonceValidity;
}
