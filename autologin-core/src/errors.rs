use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutologinError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("route error: {0}")]
    RouteError(#[from] RouteError),
}

/// Failure reported by a storage backend.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct DatabaseError(Box<dyn Error + Send + Sync + 'static>);

impl DatabaseError {
    pub fn new(err: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }
}

#[derive(Error, Debug)]
pub enum CreateTokenError {
    /// Another record already holds this token value.
    #[error("token already exists")]
    TokenAlreadyExists,

    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("route [{0}] not defined")]
    UnknownRoute(String),

    #[error("missing parameter [{parameter}] for route [{route}]")]
    MissingParameter { route: String, parameter: String },

    #[error("cannot switch url to scheme [{0}]")]
    InvalidScheme(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
