//! HTTP plumbing shared by the identity and feed clients.
//!
//! The backend speaks an Appwrite-style REST dialect: every request carries
//! the project id header, authenticated requests add the session secret,
//! and errors come back as `{ "message": ..., "code": ... }`.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::error::{ConfigError, ServiceError};
use crate::storage::ServiceConfig;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const SESSION_HEADER: &str = "X-Appwrite-Session";

/// Base URL, project and optional session for one backend.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    endpoint: String,
    project_id: String,
    session: Option<String>,
}

impl ServiceClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;
        Ok(Self {
            http: Client::new(),
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            session: None,
        })
    }

    pub fn with_session(mut self, secret: Option<String>) -> Self {
        self.session = secret.filter(|s| !s.is_empty());
        self
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn set_session(&mut self, secret: Option<String>) {
        self.session = secret.filter(|s| !s.is_empty());
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{path}", self.endpoint))
            .header(PROJECT_HEADER, &self.project_id);
        match &self.session {
            Some(secret) => builder.header(SESSION_HEADER, secret),
            None => builder,
        }
    }
}

/// Turn non-2xx responses into [`ServiceError`]s; 409 becomes `Conflict`.
pub(crate) async fn check(resp: Response) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    if status == StatusCode::CONFLICT {
        Err(ServiceError::Conflict(message))
    } else {
        Err(ServiceError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> ServiceConfig {
        ServiceConfig {
            endpoint: endpoint.into(),
            project_id: "proj".into(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn empty_session_is_treated_as_none() {
        let client = ServiceClient::new(&config("https://example.com/v1"))
            .unwrap()
            .with_session(Some(String::new()));
        assert!(client.session().is_none());
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(ServiceClient::new(&config("::nope")).is_err());
    }

    #[tokio::test]
    async fn error_message_is_taken_from_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/account")
            .with_status(401)
            .with_body(r#"{"message":"User (role: guests) missing scope","code":401}"#)
            .create_async()
            .await;

        let client = ServiceClient::new(&config(&server.url())).unwrap();
        let resp = client.request(Method::GET, "/account").send().await.unwrap();
        match check(resp).await {
            Err(ServiceError::Http { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "User (role: guests) missing scope");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn conflict_status_maps_to_conflict() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/account")
            .with_status(409)
            .with_body("already exists")
            .create_async()
            .await;

        let client = ServiceClient::new(&config(&server.url())).unwrap();
        let resp = client.request(Method::POST, "/account").send().await.unwrap();
        let err = check(resp).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn project_and_session_headers_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/account")
            .match_header("x-appwrite-project", "proj")
            .match_header("x-appwrite-session", "secret")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = ServiceClient::new(&config(&server.url()))
            .unwrap()
            .with_session(Some("secret".into()));
        let resp = client.request(Method::GET, "/account").send().await.unwrap();
        assert!(check(resp).await.is_ok());
        m.assert_async().await;
    }
}
