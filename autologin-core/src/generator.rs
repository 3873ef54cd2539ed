use crate::{
    errors::{AutologinError, DatabaseError},
    utils,
};
use std::future::Future;
use tracing::debug;

/// Produces random tokens that do not collide with any stored token.
#[derive(Clone, Debug)]
pub struct TokenGenerator {
    length: usize,
    max_attempts: u32,
    generate_custom_token: fn(usize) -> String,
}

impl TokenGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Result<Self, AutologinError> {
        if length == 0 {
            return Err(AutologinError::InvalidConfiguration(
                "token length must be positive".to_string(),
            ));
        }
        if max_attempts == 0 {
            return Err(AutologinError::InvalidConfiguration(
                "max attempts must be positive".to_string(),
            ));
        }
        Ok(Self {
            length,
            max_attempts,
            generate_custom_token: utils::random_alphanumeric,
        })
    }

    /// Replaces the default alphanumeric generator. The function receives the configured length.
    pub fn set_token_generator(self, function: fn(usize) -> String) -> Self {
        Self {
            generate_custom_token: function,
            ..self
        }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// A fresh candidate, without any collision check.
    #[must_use]
    pub fn candidate(&self) -> String {
        (self.generate_custom_token)(self.length)
    }

    /// Draws candidates until `exists` reports one as unused.
    ///
    /// Gives up with [`AutologinError::InvalidConfiguration`] after `max_attempts`
    /// collisions, which only happens when the token length is too small for the
    /// number of stored tokens.
    pub async fn generate<F, Fut>(&self, mut exists: F) -> Result<String, AutologinError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, DatabaseError>>,
    {
        for attempt in 1..=self.max_attempts {
            let token = self.candidate();
            if !exists(token.clone()).await? {
                return Ok(token);
            }
            debug!(attempt, "generated token collides with a stored token");
        }
        Err(self.exhausted())
    }

    pub(crate) fn exhausted(&self) -> AutologinError {
        AutologinError::InvalidConfiguration(format!(
            "no unique token of length {} after {} attempts",
            self.length, self.max_attempts
        ))
    }
}
