//! # Demo Login
//!
//! A single configured username/password pair checked by plain comparison.
//! This is a demo affordance, not a security boundary: it protects nothing
//! and no other operation consults it.

use serde::{Deserialize, Serialize};

/// Username accepted when none is configured.
pub const DEMO_USERNAME: &str = "admin";

/// Password accepted when none is configured.
pub const DEMO_PASSWORD: &str = "password";

/// The one credential pair the demo login accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoCredentials {
    pub username: String,
    pub password: String,
}

impl Default for DemoCredentials {
    fn default() -> Self {
        DemoCredentials {
            username: DEMO_USERNAME.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }
}

impl DemoCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        DemoCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact, case-sensitive match on both fields.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
