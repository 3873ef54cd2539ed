use crate::{
    errors::{CreateTokenError, DatabaseError},
    Token, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage backend for autologin tokens.
///
/// Implementations must enforce uniqueness of `token` themselves: `create` has to
/// fail with [`CreateTokenError::TokenAlreadyExists`] when another record already
/// holds the value. The existence check done before `create` is not enough once
/// several issuers run concurrently.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DatabaseError>;

    async fn create(&self, token: NewToken) -> Result<Token, CreateTokenError>;

    /// Deletes every record created strictly before `cutoff` and returns how many were removed.
    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError>;

    /// Atomically adds one to the usage counter of `token`.
    ///
    /// Returns `None` when the record no longer exists, e.g. because a sweep removed it.
    async fn increment_count(&self, token: &Token) -> Result<Option<Token>, DatabaseError>;

    /// Returns whether a record was removed.
    async fn delete(&self, token: &str) -> Result<bool, DatabaseError>;

    async fn exists(&self, token: &str) -> Result<bool, DatabaseError> {
        Ok(self.find_by_token(token).await?.is_some())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewToken {
    pub user_id: UserId,
    pub token: String,
    pub path: Option<String>,
    pub created_at: DateTime<Utc>,
}
