//! Identity service: who is logged in.
//!
//! The tracker only needs a stable user id from here. [`AccountClient`]
//! talks to the account REST API; the logged-in session is kept in the
//! local blob store so later runs can reuse it.

use reqwest::header::{HeaderMap, SET_COOKIE};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::error::{DatabaseError, ServiceError};
use crate::service::{check, ServiceClient};
use crate::storage::BlobStore;

const SESSION_KEY: &str = "session:current";

/// Account as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Operations the tracker needs from an identity provider.
#[allow(async_fn_in_trait)]
pub trait Identity {
    /// The logged-in user; fails when there is no valid session.
    async fn current_user(&self) -> Result<User, ServiceError>;

    /// Register. HTTP 409 (email taken) surfaces as `ServiceError::Conflict`.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ServiceError>;

    async fn create_session(&mut self, email: &str, password: &str) -> Result<(), ServiceError>;

    /// End the session. Local session state is cleared even on failure.
    async fn delete_session(&mut self) -> Result<(), ServiceError>;
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(default)]
    secret: String,
}

/// REST client for the account API.
pub struct AccountClient {
    client: ServiceClient,
}

impl AccountClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// Session secret after a successful login, if any.
    pub fn session_secret(&self) -> Option<&str> {
        self.client.session()
    }
}

/// Pull `a_session_<project>` out of `Set-Cookie` headers.
fn secret_from_cookies(headers: &HeaderMap, project_id: &str) -> Option<String> {
    let wanted = format!("a_session_{project_id}");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let (name, value) = cookie.split(';').next()?.trim().split_once('=')?;
            name.eq_ignore_ascii_case(&wanted).then(|| value.to_string())
        })
        .filter(|secret| !secret.is_empty())
}

impl Identity for AccountClient {
    async fn current_user(&self) -> Result<User, ServiceError> {
        if self.client.session().is_none() {
            return Err(ServiceError::NotAuthenticated);
        }
        let resp = self.client.request(Method::GET, "/account").send().await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ServiceError> {
        let body = json!({
            "userId": "unique()",
            "email": email,
            "password": password,
            "name": name,
        });
        let resp = self
            .client
            .request(Method::POST, "/account")
            .json(&body)
            .send()
            .await?;
        let user: User = check(resp).await?.json().await?;
        info!(user_id = %user.id, "account created");
        Ok(user)
    }

    async fn create_session(&mut self, email: &str, password: &str) -> Result<(), ServiceError> {
        let resp = self
            .client
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let resp = check(resp).await?;

        let cookie_secret = secret_from_cookies(resp.headers(), self.client.project_id());
        let body: SessionResponse = resp.json().await?;
        let secret = Some(body.secret)
            .filter(|s| !s.is_empty())
            .or(cookie_secret)
            .ok_or_else(|| ServiceError::InvalidResponse("session has no secret".into()))?;

        self.client.set_session(Some(secret));
        debug!("session created");
        Ok(())
    }

    async fn delete_session(&mut self) -> Result<(), ServiceError> {
        let result = match self.client.session() {
            Some(_) => match self
                .client
                .request(Method::DELETE, "/account/sessions/current")
                .send()
                .await
            {
                Ok(resp) => check(resp).await.map(|_| ()),
                Err(e) => Err(e.into()),
            },
            None => Ok(()),
        };
        self.client.set_session(None);
        result
    }
}

/// Session persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    pub secret: String,
}

pub fn save_session(store: &impl BlobStore, session: &StoredSession) -> Result<(), DatabaseError> {
    let blob = serde_json::to_string(session)
        .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
    store.put(SESSION_KEY, &blob)
}

/// Stored session, or `None` when absent or unreadable.
pub fn load_session(store: &impl BlobStore) -> Option<StoredSession> {
    let raw = store.get(SESSION_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

pub fn clear_session(store: &impl BlobStore) -> Result<(), DatabaseError> {
    store.remove(SESSION_KEY)
}
