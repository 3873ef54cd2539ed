use crate::errors::AutologinError;
use serde::{Deserialize, Serialize};

/// Settings read by [`Autologin`](crate::Autologin) on every call.
///
/// Field names follow the usual `autologin.*` configuration keys, so the struct can be
/// deserialized straight out of a host application's config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutologinConfig {
    /// Number of characters in a generated token.
    pub length: usize,

    /// Token lifetime in minutes.
    pub lifetime: u32,

    /// Sweep expired tokens before every issue.
    pub remove_expired: bool,

    /// Increment the usage counter on every successful redemption.
    pub count: bool,

    /// Route used to build redemption links. Receives the token as its only parameter.
    pub route_name: String,

    /// Upper bound on token generation attempts per issue.
    pub max_attempts: u32,

    /// Reject tokens past their lifetime on redemption, even if no sweep has removed them yet.
    pub strict_expiry: bool,
}

impl Default for AutologinConfig {
    fn default() -> Self {
        Self {
            length: 50,
            lifetime: 60 * 24 * 7,
            remove_expired: true,
            count: true,
            route_name: "autologin".to_string(),
            max_attempts: 16,
            strict_expiry: false,
        }
    }
}

impl AutologinConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_lifetime(mut self, minutes: u32) -> Self {
        self.lifetime = minutes;
        self
    }

    pub fn with_remove_expired(mut self, enable: bool) -> Self {
        self.remove_expired = enable;
        self
    }

    pub fn with_count(mut self, enable: bool) -> Self {
        self.count = enable;
        self
    }

    pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = name.into();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_strict_expiry(mut self, enable: bool) -> Self {
        self.strict_expiry = enable;
        self
    }

    pub fn validate(&self) -> Result<(), AutologinError> {
        if self.length == 0 {
            return Err(invalid("length must be positive"));
        }
        if self.lifetime == 0 {
            return Err(invalid("lifetime must be positive"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be positive"));
        }
        if self.route_name.trim().is_empty() {
            return Err(invalid("route_name must not be empty"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> AutologinError {
    AutologinError::InvalidConfiguration(message.to_string())
}
