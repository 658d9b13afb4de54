use chrono::{DateTime, Utc};
use tracing::info;

use crate::auth::{self, User};
use crate::client::ApiClient;
use crate::error::SessionError;
use crate::favorites::{FavoriteEntry, Favorites, UserId};
use crate::storage::{SessionStore, LOGGED_IN_AT_KEY, TOKEN_KEY, USER_KEY};

/// Application-level context: the logged-in user and the favorites cache that
/// belongs to them. Views borrow it instead of reaching for shared globals.
///
/// Every login, sign-up and logout resets the favorites cache, and favorite
/// lookups only answer for the cache owner.
#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    favorites: Favorites,
    store: SessionStore,
    user: Option<User>,
}

impl Session {
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Self {
            favorites: Favorites::new(client.clone()),
            client,
            store,
            user: None,
        }
    }

    /// Picks up a user saved by an earlier run and loads their favorites.
    pub async fn restore(client: ApiClient, store: SessionStore) -> Self {
        let mut session = Self::new(client, store);
        session.user = session.store.get_json::<User>(USER_KEY).await;
        if let Some(user) = &session.user {
            info!(user_id = ?user.user_id, "session restored");
        }
        session.favorites.refresh(session.user_id()).await;
        session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().and_then(|user| user.user_id)
    }

    pub async fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.store.get(LOGGED_IN_AT_KEY).await?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, SessionError> {
        let user = auth::login(&self.client, email, password).await?;
        self.establish(user, None).await
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        birth_date: Option<&str>,
    ) -> Result<&User, SessionError> {
        let outcome = auth::signup(&self.client, name, email, password, birth_date).await?;
        self.establish(outcome.user, outcome.token).await
    }

    async fn establish(
        &mut self,
        user: User,
        token: Option<String>,
    ) -> Result<&User, SessionError> {
        self.store.set_json(USER_KEY, &user).await?;
        match token {
            Some(token) => self.store.set(TOKEN_KEY, token).await?,
            None => self.store.remove(TOKEN_KEY).await?,
        }
        self.store
            .set(LOGGED_IN_AT_KEY, Utc::now().to_rfc3339())
            .await?;

        self.favorites.clear();
        self.favorites.refresh(user.user_id).await;
        Ok(&*self.user.insert(user))
    }

    pub async fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(user) = self.user.take() {
            info!(user_id = ?user.user_id, "logged out");
        }
        self.favorites.clear();
        self.store.remove(USER_KEY).await?;
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(LOGGED_IN_AT_KEY).await?;
        Ok(())
    }

    fn require_user_id(&self) -> Result<UserId, SessionError> {
        let user = self.user.as_ref().ok_or(SessionError::NotLoggedIn)?;
        user.user_id.ok_or(SessionError::MissingUserId)
    }

    /// False when logged out or when the cache belongs to someone else.
    pub fn is_favorite(&self, art_id: &str) -> bool {
        self.user_id()
            .is_some_and(|user_id| self.favorites.is_favorite_for(user_id, art_id))
    }

    /// Flips `art_id` on the server and re-reads the list. Returns the new membership.
    pub async fn toggle_favorite(&self, art_id: &str) -> Result<bool, SessionError> {
        let user_id = self.require_user_id()?;
        Ok(self.favorites.toggle_and_resync(user_id, art_id).await?)
    }

    pub async fn add_favorite(&self, art_id: &str) -> Result<(), SessionError> {
        let user_id = self.require_user_id()?;
        Ok(self.favorites.add(user_id, art_id).await?)
    }

    pub async fn remove_favorite(&self, art_id: &str) -> Result<(), SessionError> {
        let user_id = self.require_user_id()?;
        Ok(self.favorites.remove(user_id, art_id).await?)
    }

    /// Forces a resync for the logged-in user.
    pub async fn refresh_favorites(&self) -> Result<Vec<FavoriteEntry>, SessionError> {
        let user_id = self.require_user_id()?;
        self.favorites.refresh(Some(user_id)).await;
        Ok(self.favorites.entries())
    }
}
