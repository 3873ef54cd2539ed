use async_trait::async_trait;
use autologin_core::{
    database::{NewToken, TokenStore},
    errors::{CreateTokenError, DatabaseError},
    Token, TokenId, UserId,
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process [`TokenStore`].
///
/// Records are keyed by token value, which doubles as the uniqueness constraint.
/// Clones share the same underlying map.
#[derive(Clone, Debug, Default)]
pub struct MemoryAdapter {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    pub async fn tokens_for_user(&self, user_id: &UserId) -> Vec<Token> {
        self.tokens
            .read()
            .await
            .values()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TokenStore for MemoryAdapter {
    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DatabaseError> {
        Ok(self.tokens.read().await.get(token).cloned())
    }

    async fn create(&self, token: NewToken) -> Result<Token, CreateTokenError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.token) {
            return Err(CreateTokenError::TokenAlreadyExists);
        }
        let record = Token {
            id: TokenId::new(Uuid::new_v4().to_string()),
            user_id: token.user_id,
            token: token.token,
            path: token.path,
            count: 0,
            created_at: token.created_at,
        };
        tokens.insert(record.token.clone(), record.clone());
        Ok(record)
    }

    async fn delete_expired(&self, cutoff: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| record.created_at >= cutoff);
        Ok((before - tokens.len()) as u64)
    }

    async fn increment_count(&self, token: &Token) -> Result<Option<Token>, DatabaseError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens
            .get_mut(&token.token)
            .filter(|record| record.id == token.id)
            .map(|record| {
                record.count += 1;
                record.clone()
            }))
    }

    async fn delete(&self, token: &str) -> Result<bool, DatabaseError> {
        Ok(self.tokens.write().await.remove(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_token(token: &str, created_at: DateTime<Utc>) -> NewToken {
        NewToken {
            user_id: UserId::from(1u64),
            token: token.to_string(),
            path: None,
            created_at,
        }
    }

    #[tokio::test]
    async fn create_enforces_unique_token() {
        let store = MemoryAdapter::new();
        let now = Utc::now();
        store.create(new_token("abc", now)).await.unwrap();
        let res = store.create(new_token("abc", now)).await;
        assert!(matches!(res, Err(CreateTokenError::TokenAlreadyExists)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_expired_removes_strictly_older_records() {
        let store = MemoryAdapter::new();
        let cutoff = Utc::now();
        store
            .create(new_token("old", cutoff - Duration::seconds(1)))
            .await
            .unwrap();
        store.create(new_token("edge", cutoff)).await.unwrap();
        store
            .create(new_token("new", cutoff + Duration::seconds(1)))
            .await
            .unwrap();

        assert_eq!(store.delete_expired(cutoff).await.unwrap(), 1);
        assert!(!store.exists("old").await.unwrap());
        assert!(store.exists("edge").await.unwrap());
        assert!(store.exists("new").await.unwrap());
    }

    #[tokio::test]
    async fn increment_count_skips_missing_and_replaced_records() {
        let store = MemoryAdapter::new();
        let record = store.create(new_token("abc", Utc::now())).await.unwrap();

        let updated = store.increment_count(&record).await.unwrap().unwrap();
        assert_eq!(updated.count, 1);

        store.delete("abc").await.unwrap();
        assert!(store.increment_count(&record).await.unwrap().is_none());

        store.create(new_token("abc", Utc::now())).await.unwrap();
        assert!(store.increment_count(&record).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn tokens_for_user_filters_by_owner() {
        let store = MemoryAdapter::new();
        store.create(new_token("a", Utc::now())).await.unwrap();
        store
            .create(NewToken {
                user_id: UserId::from(2u64),
                ..new_token("b", Utc::now())
            })
            .await
            .unwrap();
        let tokens = store.tokens_for_user(&UserId::from(2u64)).await;
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, "b");
    }
}
