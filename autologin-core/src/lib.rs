pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod expiry;
pub mod generator;
pub mod router;
mod utils;

pub use auth::{Autologin, AutologinBuilder};
pub use config::AutologinConfig;
pub use database::{NewToken, TokenStore};
pub use errors::{AutologinError, CreateTokenError, DatabaseError, RouteError};
pub use expiry::{Clock, ExpiryPolicy, ManualClock, SystemClock};
pub use generator::TokenGenerator;
pub use router::{Router, UrlRouter};

use chrono::{DateTime, Utc};
use std::fmt;

/// A persisted autologin token.
///
/// Records are immutable once created, except for `count`.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    /// Assigned by the storage backend.
    pub id: TokenId,
    pub user_id: UserId,
    pub token: String,
    /// Where to send the user after redemption. `None` means the default destination.
    pub path: Option<String>,
    pub count: u64,
    pub created_at: DateTime<Utc>,
}

impl Token {
    #[must_use]
    pub fn destination<'a>(&'a self, default: &'a str) -> &'a str {
        self.path.as_deref().unwrap_or(default)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .field("path", &self.path)
            .field("count", &self.count)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of the user a token logs in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(user_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Anything that can be logged in through an autologin link.
pub trait Authenticatable {
    fn auth_identifier(&self) -> UserId;
}

impl Authenticatable for UserId {
    fn auth_identifier(&self) -> UserId {
        self.clone()
    }
}
