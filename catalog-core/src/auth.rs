use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{message_of, null_as_default, ApiClient};
use crate::error::{ApiError, AuthError};
use crate::favorites::UserId;

pub const LOGIN_FAILED: &str = "Login failed.";
pub const SIGNUP_FAILED: &str = "Sign-up failed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl User {
    /// First letter of the name, uppercased, for avatars. `U` when unnamed.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub user: User,
    pub token: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<&'a str>,
}

/// Sends `body` and decodes the JSON reply. A body that is not JSON counts as
/// a connection failure, like a dropped request.
async fn post_json<B: Serialize>(
    client: &ApiClient,
    segments: &[&str],
    body: &B,
) -> Result<(reqwest::StatusCode, Value), AuthError> {
    let url = client.endpoint(segments)?;
    let response = client
        .http()
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(AuthError::Connection)?;
    let status = response.status();
    let body = response
        .json::<Value>()
        .await
        .map_err(AuthError::Connection)?;
    Ok((status, body))
}

/// `POST /api/users/login`. The reply must carry a `userId`.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<User, AuthError> {
    let (status, body) =
        post_json(client, &["api", "users", "login"], &LoginRequest { email, password }).await?;
    if !status.is_success() {
        let message = message_of(&body).unwrap_or_else(|| LOGIN_FAILED.to_string());
        warn!(status = status.as_u16(), %message, "login rejected");
        return Err(AuthError::Rejected(message));
    }
    let has_user_id = body.get("userId").is_some_and(|id| !id.is_null());
    if !has_user_id {
        return Err(AuthError::MissingUserId);
    }
    let user: User = serde_json::from_value(body).map_err(ApiError::from)?;
    info!(user_id = ?user.user_id, "logged in");
    Ok(user)
}

/// `POST /api/users`. The created user may be wrapped under `user` or `data`,
/// and a token may come back as `token` or `accessToken`.
pub async fn signup(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
    birth_date: Option<&str>,
) -> Result<SignupOutcome, AuthError> {
    let request = SignupRequest {
        email,
        password,
        name,
        birth_date,
    };
    let (status, body) = post_json(client, &["api", "users"], &request).await?;
    if !status.is_success() {
        let message = message_of(&body).unwrap_or_else(|| SIGNUP_FAILED.to_string());
        warn!(status = status.as_u16(), %message, "sign-up rejected");
        return Err(AuthError::Rejected(message));
    }

    let token = ["token", "accessToken"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(ToOwned::to_owned);
    let user_value = created_user(body);
    let user: User = serde_json::from_value(user_value).unwrap_or_else(|e| {
        warn!(error = %e, "sign-up reply had an unexpected user shape");
        User {
            email: email.to_string(),
            name: name.to_string(),
            birth_date: birth_date.map(ToOwned::to_owned),
            ..User::default()
        }
    });
    info!(user_id = ?user.user_id, "signed up");
    Ok(SignupOutcome { user, token })
}

fn created_user(body: Value) -> Value {
    if let Value::Object(map) = &body {
        for key in ["user", "data"] {
            if let Some(user) = map.get(key).filter(|v| !v.is_null()) {
                return user.clone();
            }
        }
    }
    body
}
