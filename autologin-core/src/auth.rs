use crate::{
    config::AutologinConfig,
    database::{NewToken, TokenStore},
    errors::{AutologinError, CreateTokenError},
    expiry::{Clock, ExpiryPolicy, SystemClock},
    generator::TokenGenerator,
    router::Router,
    utils, Authenticatable, Token, UserId,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AutologinBuilder<S, R> {
    store: S,
    router: R,
    config: AutologinConfig,
    clock: Arc<dyn Clock>,
    generate_custom_token: fn(usize) -> String,
}

impl<S, R> AutologinBuilder<S, R> {
    pub fn new(store: S, router: R) -> Self {
        Self {
            store,
            router,
            config: AutologinConfig::default(),
            clock: Arc::new(SystemClock),
            generate_custom_token: utils::random_alphanumeric,
        }
    }

    pub fn set_config(self, config: AutologinConfig) -> Self {
        Self { config, ..self }
    }

    pub fn set_clock(self, clock: impl Clock + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            ..self
        }
    }

    /// The function receives the configured token length.
    pub fn set_token_generator(self, function: fn(usize) -> String) -> Self {
        Self {
            generate_custom_token: function,
            ..self
        }
    }

    /// Fails if the configuration is invalid or the redemption route does not resolve, so
    /// `issue` never stores a token it cannot link to.
    pub fn build(self) -> Result<Autologin<S, R>, AutologinError>
    where
        R: Router,
    {
        self.config.validate()?;
        let sample = "0".repeat(self.config.length);
        self.router
            .route(&self.config.route_name, &[sample.as_str()], true)?;
        let generator = TokenGenerator::new(self.config.length, self.config.max_attempts)?
            .set_token_generator(self.generate_custom_token);
        Ok(Autologin {
            expiry: ExpiryPolicy::new(self.config.lifetime),
            store: self.store,
            router: self.router,
            config: self.config,
            clock: self.clock,
            generator,
        })
    }
}

/// Issues and redeems autologin links.
///
/// Holds no state besides its collaborators, so a single instance can serve any number
/// of concurrent requests.
pub struct Autologin<S, R> {
    store: S,
    router: R,
    config: AutologinConfig,
    clock: Arc<dyn Clock>,
    generator: TokenGenerator,
    expiry: ExpiryPolicy,
}

impl<S, R> Autologin<S, R>
where
    S: TokenStore,
    R: Router,
{
    /// Link that logs `user` in and sends them to the default destination.
    pub async fn user(&self, user: &impl Authenticatable) -> Result<String, AutologinError> {
        self.issue(user.auth_identifier(), None).await
    }

    /// Link that logs `user` in and redirects to `path`, resolved through the router.
    pub async fn to(
        &self,
        user: &impl Authenticatable,
        path: &str,
        extra: &[&str],
        secure: Option<bool>,
    ) -> Result<String, AutologinError> {
        let path = self.router.to(path, extra, secure)?;
        self.issue(user.auth_identifier(), Some(path)).await
    }

    /// Link that logs `user` in and redirects to the named route.
    pub async fn route(
        &self,
        user: &impl Authenticatable,
        name: &str,
        parameters: &[&str],
        absolute: bool,
    ) -> Result<String, AutologinError> {
        let path = self.router.route(name, parameters, absolute)?;
        self.issue(user.auth_identifier(), Some(path)).await
    }

    /// Stores a new token for `user_id` and returns its redemption URL.
    pub async fn issue(
        &self,
        user_id: UserId,
        path: Option<String>,
    ) -> Result<String, AutologinError> {
        let token = self.issue_token(user_id, path).await?;
        Ok(self
            .router
            .route(&self.config.route_name, &[token.token.as_str()], true)?)
    }

    /// Stores a new token for `user_id` and returns the record, without building a link.
    pub async fn issue_token(
        &self,
        user_id: UserId,
        path: Option<String>,
    ) -> Result<Token, AutologinError> {
        if self.config.remove_expired {
            self.sweep().await?;
        }
        let store = &self.store;
        for attempt in 1..=self.generator.max_attempts() {
            let token = self
                .generator
                .generate(|candidate| async move { store.exists(&candidate).await })
                .await?;
            let res = store
                .create(NewToken {
                    user_id: user_id.clone(),
                    token,
                    path: path.clone(),
                    created_at: self.clock.now(),
                })
                .await;
            match res {
                Ok(token) => {
                    debug!(
                        user_id = %token.user_id,
                        has_path = token.path.is_some(),
                        "issued autologin token"
                    );
                    return Ok(token);
                }
                Err(CreateTokenError::TokenAlreadyExists) => {
                    debug!(attempt, "token taken by a concurrent issue, regenerating");
                }
                Err(CreateTokenError::DatabaseError(err)) => return Err(err.into()),
            }
        }
        Err(self.generator.exhausted())
    }

    /// Looks up a token for redemption.
    ///
    /// Returns `None` for tokens that were never issued, were swept, or were revoked,
    /// without telling these cases apart. Tokens are not consumed.
    pub async fn validate(&self, token: &str) -> Result<Option<Token>, AutologinError> {
        let Some(record) = self.store.find_by_token(token).await? else {
            debug!("autologin token not found");
            return Ok(None);
        };
        let now = self.clock.now();
        if self.config.strict_expiry && self.expiry.is_expired(record.created_at, now) {
            debug!(user_id = %record.user_id, "autologin token past its lifetime");
            return Ok(None);
        }
        if self.config.count {
            // A concurrent sweep may have removed the record since the lookup.
            return Ok(self.store.increment_count(&record).await?);
        }
        Ok(Some(record))
    }

    /// Deletes every token older than the configured lifetime.
    pub async fn sweep(&self) -> Result<u64, AutologinError> {
        let cutoff = self.expiry.cutoff(self.clock.now());
        let removed = self.store.delete_expired(cutoff).await?;
        if removed > 0 {
            info!(removed, %cutoff, "removed expired autologin tokens");
        }
        Ok(removed)
    }

    /// Removes a token regardless of its age. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> Result<bool, AutologinError> {
        Ok(self.store.delete(token).await?)
    }

    pub fn config(&self) -> &AutologinConfig {
        &self.config
    }

    pub fn expiry(&self) -> &ExpiryPolicy {
        &self.expiry
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
