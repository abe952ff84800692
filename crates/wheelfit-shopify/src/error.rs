use thiserror::Error;

/// Errors returned by the Shopify Admin API client.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429; the platform has asked us to back off.
    #[error("rate limited by Shopify (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {resource}: exceeded {max_pages} pages")]
    PaginationLimit { resource: String, max_pages: usize },

    #[error("invalid shop domain \"{domain}\": {reason}")]
    InvalidShopDomain { domain: String, reason: String },
}
