use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{lenient_string, ApiClient};
use crate::error::{ApiError, DetailError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Artist,
    Gallery,
}

impl DetailKind {
    fn collection(self) -> &'static str {
        match self {
            DetailKind::Artist => "artists",
            DetailKind::Gallery => "galleries",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(default, deserialize_with = "lenient_string")]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    #[serde(default, deserialize_with = "lenient_string")]
    pub gallery_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub closed_time: Option<String>,
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// `{ message, count, data: [...] }`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct SearchResponse<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
}

async fn search_first<T: DeserializeOwned>(
    client: &ApiClient,
    kind: DetailKind,
    name: &str,
) -> Result<Option<T>, DetailError> {
    if name.trim().is_empty() {
        return Err(DetailError::MissingName);
    }
    let mut url = client.endpoint(&["api", kind.collection(), "search"])?;
    url.query_pairs_mut().append_pair("keyword", name);

    let response = client
        .http()
        .get(url)
        .send()
        .await
        .map_err(ApiError::from)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()).into());
    }
    let bytes = response.bytes().await.map_err(ApiError::from)?;
    let result: SearchResponse<T> = serde_json::from_slice(&bytes).map_err(ApiError::from)?;
    let hits = result.data.unwrap_or_default();
    debug!(?kind, name, hits = hits.len(), "detail search");
    Ok(hits.into_iter().next())
}

pub async fn fetch_artist(client: &ApiClient, name: &str) -> Result<Option<Artist>, DetailError> {
    search_first(client, DetailKind::Artist, name).await
}

pub async fn fetch_gallery(client: &ApiClient, name: &str) -> Result<Option<Gallery>, DetailError> {
    search_first(client, DetailKind::Gallery, name).await
}
