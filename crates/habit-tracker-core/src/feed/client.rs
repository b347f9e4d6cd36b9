//! FeedClient: feed documents over the databases REST API.

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::{DailySummary, FeedPost, FeedStore};
use crate::error::ServiceError;
use crate::service::{check, ServiceClient};
use crate::storage::ServiceConfig;

#[derive(Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<FeedPost>,
}

/// Feed collection client.
pub struct FeedClient {
    client: ServiceClient,
    database_id: String,
    collection_id: String,
}

impl FeedClient {
    /// Missing feed ids are logged, not rejected.
    pub fn new(client: ServiceClient, config: &ServiceConfig) -> Self {
        if !config.has_feed_ids() {
            warn!("missing database or feed collection id; set service.database_id and service.feed_collection_id");
        }
        Self {
            client,
            database_id: config.database_id.clone(),
            collection_id: config.feed_collection_id.clone(),
        }
    }

    fn documents_path(&self) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, self.collection_id
        )
    }
}

impl FeedStore for FeedClient {
    async fn create_document(
        &self,
        id: &str,
        summary: &DailySummary,
        permissions: &[String],
    ) -> Result<FeedPost, ServiceError> {
        let body = json!({
            "documentId": id,
            "data": summary,
            "permissions": permissions,
        });
        let resp = self
            .client
            .request(Method::POST, &self.documents_path())
            .json(&body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn update_document(
        &self,
        id: &str,
        summary: &DailySummary,
        permissions: &[String],
    ) -> Result<FeedPost, ServiceError> {
        let body = json!({
            "data": summary,
            "permissions": permissions,
        });
        let resp = self
            .client
            .request(Method::PATCH, &format!("{}/{id}", self.documents_path()))
            .json(&body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn list_documents(&self, limit: u32) -> Result<Vec<FeedPost>, ServiceError> {
        let order = json!({ "method": "orderDesc", "attribute": "$createdAt" }).to_string();
        let limit = json!({ "method": "limit", "values": [limit] }).to_string();
        let resp = self
            .client
            .request(Method::GET, &self.documents_path())
            .query(&[("queries[0]", order), ("queries[1]", limit)])
            .send()
            .await?;
        let list: DocumentList = check(resp).await?.json().await?;
        Ok(list.documents)
    }
}
