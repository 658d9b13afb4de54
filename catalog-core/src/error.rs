use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Failure of a favorites mutation. `Toggle` displays the server message verbatim.
#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("{0}")]
    Toggle(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("login response did not include a userId")]
    MissingUserId,
    #[error("failed to reach the server, please try again")]
    Connection(#[source] reqwest::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("no name was provided")]
    MissingName,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to locate the configuration directory")]
    NoConfigDir,
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("login required")]
    NotLoggedIn,
    #[error("the current user has no userId")]
    MissingUserId,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Favorite(#[from] FavoriteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
