//! Account credential types.
//!
//! The marketplace keeps credentials in plaintext in local storage; this
//! wrapper only keeps them out of logs and debug output.

use serde::{Deserialize, Serialize};

/// A plaintext account password.
///
/// `Debug` is redacted. Comparison is exact and case-sensitive.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Exact comparison against raw user input.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        self.0 == input
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
