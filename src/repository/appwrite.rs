use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::models::config::StoreConfig;
use crate::models::document::StoreDocument;
use crate::repository::{DocumentListQuery, ProductReader, RepositoryError, RepositoryResult};

const PROJECT_HEADER: &str = "X-Appwrite-Project";

/// Repository backed by the Appwrite databases REST API.
///
/// `reqwest::Client` is reference counted internally, so cloning the
/// repository is cheap.
#[derive(Clone, Debug)]
pub struct AppwriteRepository {
    client: Client,
    config: StoreConfig,
}

/// Body of a `GET .../documents` response.
#[derive(Debug, Deserialize)]
struct DocumentList {
    total: usize,
    documents: Vec<StoreDocument>,
}

/// Body of an error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl AppwriteRepository {
    /// Create a repository for the configured project and database.
    pub fn new(config: StoreConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        log::info!(
            "Using document store at {} (project {})",
            config.endpoint,
            config.project_id
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// URL listing the documents of `collection_id`.
    fn documents_url(&self, collection_id: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id,
            collection_id
        )
    }

    /// Encode pagination as the store's JSON query strings.
    fn list_queries(query: &DocumentListQuery) -> Vec<(&'static str, String)> {
        match query.pagination {
            Some(pagination) => vec![
                (
                    "queries[]",
                    json!({ "method": "limit", "values": [pagination.limit] }).to_string(),
                ),
                (
                    "queries[]",
                    json!({ "method": "offset", "values": [pagination.offset] }).to_string(),
                ),
            ],
            None => Vec::new(),
        }
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        query: &DocumentListQuery,
    ) -> RepositoryResult<DocumentList> {
        let response = self
            .client
            .get(self.documents_url(collection_id))
            .header(PROJECT_HEADER, &self.config.project_id)
            .query(&Self::list_queries(query))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json::<DocumentList>().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RepositoryError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }
}

/// Extract the `message` of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "empty response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl ProductReader for AppwriteRepository {
    async fn list_products(
        &self,
        query: DocumentListQuery,
    ) -> RepositoryResult<(usize, Vec<StoreDocument>)> {
        let list = self
            .list_documents(&self.config.products_collection_id, &query)
            .await?;
        Ok((list.total, list.documents))
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> StoreConfig {
        StoreConfig {
            endpoint: "https://store.example.com/v1/".into(),
            project_id: "proj".into(),
            database_id: "db".into(),
            products_collection_id: "products".into(),
            users_collection_id: "users".into(),
            page_size: 50,
            timeout_secs: 5,
        }
    }

    #[test]
    fn builds_collection_documents_url() {
        let repo = AppwriteRepository::new(sample_config()).unwrap();

        assert_eq!(
            repo.documents_url("products"),
            "https://store.example.com/v1/databases/db/collections/products/documents"
        );
        assert_eq!(repo.page_size(), 50);
    }

    #[test]
    fn encodes_pagination_as_json_queries() {
        let queries =
            AppwriteRepository::list_queries(&DocumentListQuery::default().paginate(200, 100));

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].0, "queries[]");
        let limit: serde_json::Value = serde_json::from_str(&queries[0].1).unwrap();
        let offset: serde_json::Value = serde_json::from_str(&queries[1].1).unwrap();
        assert_eq!(limit, json!({ "method": "limit", "values": [100] }));
        assert_eq!(offset, json!({ "method": "offset", "values": [200] }));

        assert!(AppwriteRepository::list_queries(&DocumentListQuery::default()).is_empty());
    }

    #[test]
    fn decodes_document_list_body() {
        let body = json!({
            "total": 2,
            "documents": [
                { "$id": "a", "productId": "P1", "$collectionId": "products" },
                { "$id": "b", "productId": "P2", "price": 10 }
            ]
        });

        let list: DocumentList = serde_json::from_value(body).unwrap();

        assert_eq!(list.total, 2);
        assert_eq!(list.documents[1].product_code(), "P2");
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(
            error_message(r#"{"message":"Project not found","code":404,"type":"project_not_found"}"#),
            "Project not found"
        );
        assert_eq!(error_message("Bad gateway\n"), "Bad gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
