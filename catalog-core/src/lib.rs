pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod session;
pub mod storage;

pub use auth::{login, signup, SignupOutcome, User};
pub use catalog::{paginate, sample_artifacts, Artifact, ArtifactFilter, Page};
pub use client::ApiClient;
pub use config::AppConfig;
pub use detail::{fetch_artist, fetch_gallery, Artist, Gallery};
pub use error::{
    ApiError, AuthError, ConfigError, DetailError, FavoriteError, SessionError, StorageError,
};
pub use favorites::{normalize_favorites, FavoriteEntry, Favorites, FavoritesCache, UserId};
pub use session::Session;
pub use storage::SessionStore;
