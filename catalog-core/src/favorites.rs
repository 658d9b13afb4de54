use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{error_message, lenient_string, optional_object, ApiClient};
use crate::error::{ApiError, FavoriteError};

pub const TOGGLE_FAILED: &str = "Failed to toggle favorite.";

/// Backend user identifier. The API expects an integer; ids read back from
/// storage or forms may be numeric strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn get(self) -> i64 {
        self.0
    }

    /// Zero is treated like a missing id.
    pub fn is_present(self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Self(n)),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LikedArt {
    #[serde(
        rename = "artId",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub art_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

/// One liked artifact. The server sends either `{artId}` or `{art: {artId, ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FavoriteEntry {
    #[serde(
        rename = "artId",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub art_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub art: Option<LikedArt>,
}

impl FavoriteEntry {
    pub fn new(art_id: impl Into<String>) -> Self {
        Self {
            art_id: Some(art_id.into()),
            art: None,
        }
    }

    pub fn matches(&self, art_id: &str) -> bool {
        self.art_id.as_deref() == Some(art_id)
            || self
                .art
                .as_ref()
                .and_then(|art| art.art_id.as_deref())
                == Some(art_id)
    }

    /// Flat id if present, else the nested one.
    pub fn resolved_art_id(&self) -> Option<&str> {
        self.art_id
            .as_deref()
            .or_else(|| self.art.as_ref().and_then(|art| art.art_id.as_deref()))
    }
}

/// Accepts a bare array or an object carrying the array under `content` or `data`.
/// Anything else yields no entries.
pub fn normalize_favorites(body: Value) -> Vec<FavoriteEntry> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match (map.remove("content"), map.remove("data")) {
            (Some(Value::Array(items)), _) => items,
            (_, Some(Value::Array(items))) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<FavoriteEntry>(item).ok())
        .collect()
}

/// Local mirror of one user's server-side favorites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesCache {
    entries: Vec<FavoriteEntry>,
    owner: Option<UserId>,
}

impl FavoritesCache {
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn contains(&self, art_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.matches(art_id))
    }

    pub fn replace(&mut self, owner: UserId, entries: Vec<FavoriteEntry>) {
        self.entries = entries;
        self.owner = Some(owner);
    }

    pub fn insert(&mut self, art_id: &str) {
        if !self.contains(art_id) {
            self.entries.push(FavoriteEntry::new(art_id));
        }
    }

    pub fn remove(&mut self, art_id: &str) {
        self.entries.retain(|entry| !entry.matches(art_id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.owner = None;
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleRequest<'a> {
    user_id: i64,
    art_id: &'a str,
}

/// Favorites synchronizer: network operations against `/api/liked` plus a
/// cache that can be queried without awaiting.
///
/// The cache is best effort. Refreshes are not ordered against each other, so
/// whichever response lands last wins.
#[derive(Debug, Clone)]
pub struct Favorites {
    client: ApiClient,
    cache: Arc<RwLock<FavoritesCache>>,
}

impl Favorites {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(FavoritesCache::default())),
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, FavoritesCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, FavoritesCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// `GET /api/liked/{userId}` with the failure kept visible to the caller.
    pub async fn try_fetch(&self, user_id: UserId) -> Result<Vec<FavoriteEntry>, ApiError> {
        let url = self
            .client
            .endpoint(&["api", "liked", &user_id.to_string()])?;
        let response = self.client.http().get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(normalize_favorites(body))
    }

    /// Like [`Favorites::try_fetch`] but any failure becomes an empty list.
    pub async fn fetch(&self, user_id: UserId) -> Vec<FavoriteEntry> {
        match self.try_fetch(user_id).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to fetch favorites");
                Vec::new()
            }
        }
    }

    /// Replaces the cache with the server's list for `user_id`. No-op without a user.
    pub async fn refresh(&self, user_id: Option<UserId>) {
        let Some(user_id) = user_id.filter(|id| id.is_present()) else {
            debug!("no user id; favorites cache left untouched");
            return;
        };
        let entries = self.fetch(user_id).await;
        debug!(user_id = %user_id, count = entries.len(), "favorites cache replaced");
        self.write_cache().replace(user_id, entries);
    }

    pub fn is_favorite(&self, art_id: &str) -> bool {
        self.read_cache().contains(art_id)
    }

    /// Membership check that refuses to answer from another user's cache.
    pub fn is_favorite_for(&self, user_id: UserId, art_id: &str) -> bool {
        let cache = self.read_cache();
        cache.owner() == Some(user_id) && cache.contains(art_id)
    }

    /// `POST /api/liked`. The server flips membership; the cache is not touched.
    pub async fn toggle(&self, user_id: UserId, art_id: &str) -> Result<(), FavoriteError> {
        let url = self.client.endpoint(&["api", "liked"])?;
        let response = self
            .client
            .http()
            .post(url)
            .json(&ToggleRequest {
                user_id: user_id.get(),
                art_id,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, TOGGLE_FAILED).await;
            warn!(
                user_id = %user_id,
                art_id,
                status = status.as_u16(),
                %message,
                "favorite toggle rejected"
            );
            return Err(FavoriteError::Toggle(message));
        }
        Ok(())
    }

    /// Toggles, then records `art_id` locally if the cache does not have it yet.
    ///
    /// The server only knows "toggle": if `art_id` was already a favorite it is
    /// now removed server-side while the cache still lists it, until the next refresh.
    pub async fn add(&self, user_id: UserId, art_id: &str) -> Result<(), FavoriteError> {
        self.toggle(user_id, art_id).await?;
        self.write_cache().insert(art_id);
        Ok(())
    }

    /// Toggles, then drops every cached entry matching `art_id`.
    pub async fn remove(&self, user_id: UserId, art_id: &str) -> Result<(), FavoriteError> {
        self.toggle(user_id, art_id).await?;
        self.write_cache().remove(art_id);
        Ok(())
    }

    /// Toggles and then re-reads the server list, so the cache never carries a guess.
    pub async fn toggle_and_resync(
        &self,
        user_id: UserId,
        art_id: &str,
    ) -> Result<bool, FavoriteError> {
        self.toggle(user_id, art_id).await?;
        self.refresh(Some(user_id)).await;
        Ok(self.is_favorite_for(user_id, art_id))
    }

    pub fn entries(&self) -> Vec<FavoriteEntry> {
        self.read_cache().entries().to_vec()
    }

    pub fn owner(&self) -> Option<UserId> {
        self.read_cache().owner()
    }

    pub fn clear(&self) {
        self.write_cache().clear();
    }
}
