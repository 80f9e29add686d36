use async_trait::async_trait;
use thiserror::Error;

use crate::models::config::DEFAULT_PAGE_SIZE;
use crate::models::document::StoreDocument;

#[cfg(feature = "scanner")]
pub mod appwrite;

#[cfg(feature = "scanner")]
pub use appwrite::AppwriteRepository;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("store request failed: {0}")]
    Transport(String),
    /// The store answered with a non-success status.
    #[error("store responded with status {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not have the expected shape.
    #[error("failed to decode store response: {0}")]
    Decode(String),
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Offset-based window over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

/// Query parameters used when listing product documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentListQuery {
    /// Pagination parameters; `None` lets the store apply its own default.
    pub pagination: Option<Pagination>,
}

impl DocumentListQuery {
    pub fn paginate(mut self, offset: usize, limit: usize) -> Self {
        self.pagination = Some(Pagination { offset, limit });
        self
    }
}

/// Read-only access to the products collection.
#[async_trait]
pub trait ProductReader: Sync {
    /// List one page of product documents, returning the collection total
    /// alongside the page.
    async fn list_products(
        &self,
        query: DocumentListQuery,
    ) -> RepositoryResult<(usize, Vec<StoreDocument>)>;

    /// Number of documents requested per page by [`Self::list_all_products`].
    fn page_size(&self) -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Fetch the whole collection, walking pages until the reported total is
    /// reached or a short page arrives.
    async fn list_all_products(&self) -> RepositoryResult<Vec<StoreDocument>> {
        let limit = self.page_size().max(1);
        let mut documents = Vec::new();

        loop {
            let query = DocumentListQuery::default().paginate(documents.len(), limit);
            let (total, page) = self.list_products(query).await?;
            let received = page.len();
            documents.extend(page);

            log::debug!(
                "Fetched {received} product documents ({}/{total})",
                documents.len()
            );

            if received < limit || documents.len() >= total {
                break;
            }
        }

        Ok(documents)
    }
}
