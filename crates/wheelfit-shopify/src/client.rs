//! HTTP client for the Shopify Admin REST API.
//!
//! Wraps `reqwest` with access-token auth, typed response deserialization,
//! `Link`-header cursor pagination, and retry on transient failures. Listing
//! endpoints return [`CatalogItem`]s ready for the fitment filter.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use wheelfit_core::{AppConfig, CatalogItem};

use crate::error::ShopifyError;
use crate::pagination::next_page_cursor;
use crate::retry::retry_with_backoff;
use crate::source::{CatalogKind, CatalogSource, OrderRelay};
use crate::types::{
    DraftOrder, DraftOrderEnvelope, DraftOrderRequest, ProductsResponse, SmartCollectionsResponse,
};

const API_VERSION: &str = "2024-01";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
const MAX_PAGES: usize = 200;

/// Tuning knobs for [`ShopifyAdminClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure; `0` disables retries.
    pub max_retries: u32,
    /// Base delay for exponential backoff between retries.
    pub backoff_base_secs: u64,
    /// Page size for listing endpoints (Shopify caps this at 250).
    pub page_limit: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "wheelfit/0.1 (fitment-relay)".to_owned(),
            max_retries: 3,
            backoff_base_secs: 2,
            page_limit: 250,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
            page_limit: config.page_limit,
        }
    }
}

/// Client for the Shopify Admin REST API.
///
/// Use [`ShopifyAdminClient::new`] with the shop's `*.myshopify.com` domain
/// for production, or [`ShopifyAdminClient::with_base_url`] to point at a
/// mock server in tests.
pub struct ShopifyAdminClient {
    client: Client,
    /// Versioned API root, always ending in `/`,
    /// e.g. `https://shop.myshopify.com/admin/api/2024-01/`.
    base_url: Url,
    access_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
    page_limit: u32,
}

impl ShopifyAdminClient {
    /// Creates a client for the given shop domain (e.g.
    /// `"capital-wheels.myshopify.com"`).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] if the domain does not
    /// form a valid URL, or [`ShopifyError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        shop_domain: &str,
        access_token: &str,
        options: &ClientOptions,
    ) -> Result<Self, ShopifyError> {
        let domain = shop_domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self::with_base_url(&format!("https://{domain}"), access_token, options)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShopDomain`] if `base_url` is not a
    /// valid URL, or [`ShopifyError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        options: &ClientOptions,
    ) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.clone())
            .build()?;

        // Normalise to exactly one trailing slash so Url::join appends the
        // resource name instead of replacing the last path segment.
        let root = format!(
            "{}/admin/api/{API_VERSION}/",
            base_url.trim_end_matches('/')
        );
        let base_url = Url::parse(&root).map_err(|e| ShopifyError::InvalidShopDomain {
            domain: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            access_token: access_token.to_owned(),
            max_retries: options.max_retries,
            backoff_base_secs: options.backoff_base_secs,
            page_limit: options.page_limit,
        })
    }

    /// Fetches all products, following `Link` cursors across pages.
    ///
    /// `fields` narrows the response to the named attributes (e.g.
    /// `["id", "title", "tags"]`); `None` returns the full resource.
    ///
    /// # Errors
    ///
    /// Propagates any page-level [`ShopifyError`]; returns
    /// [`ShopifyError::PaginationLimit`] beyond [`MAX_PAGES`] pages. On any
    /// failure, items from earlier pages are discarded; a partial catalog
    /// would silently under-report matches.
    pub async fn list_products(
        &self,
        fields: Option<&[&str]>,
    ) -> Result<Vec<CatalogItem>, ShopifyError> {
        self.list_catalog::<ProductsResponse>("products.json", fields, |page| page.products)
            .await
    }

    /// Fetches all smart collections, following `Link` cursors across pages.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::list_products`].
    pub async fn list_smart_collections(
        &self,
        fields: Option<&[&str]>,
    ) -> Result<Vec<CatalogItem>, ShopifyError> {
        self.list_catalog::<SmartCollectionsResponse>(
            "smart_collections.json",
            fields,
            |page| page.smart_collections,
        )
        .await
    }

    /// Creates a draft order from the given line items.
    ///
    /// Deliberately not retried: draft-order creation is not idempotent and
    /// a replayed POST could duplicate the customer's order.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`]: HTTP 429.
    /// - [`ShopifyError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ShopifyError::Http`]: network or TLS failure.
    /// - [`ShopifyError::Deserialize`]: response body shape mismatch.
    pub async fn create_draft_order(
        &self,
        request: &DraftOrderRequest,
    ) -> Result<DraftOrder, ShopifyError> {
        let url = self.endpoint_url("draft_orders.json", &[])?;

        let response = self
            .client
            .post(url.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&DraftOrderEnvelope {
                draft_order: request,
            })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ShopifyError::RateLimited {
                retry_after_secs: retry_after_secs(&response),
            });
        }
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: DraftOrderEnvelope<DraftOrder> =
            serde_json::from_str(&body).map_err(|e| ShopifyError::Deserialize {
                context: "draft order creation response".to_owned(),
                source: e,
            })?;
        Ok(envelope.draft_order)
    }

    /// Drives the page loop for a listing endpoint, extracting items from
    /// each envelope with `unwrap_page`.
    async fn list_catalog<T>(
        &self,
        resource: &str,
        fields: Option<&[&str]>,
        unwrap_page: impl Fn(T) -> Vec<CatalogItem>,
    ) -> Result<Vec<CatalogItem>, ShopifyError>
    where
        T: DeserializeOwned,
    {
        let mut items: Vec<CatalogItem> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    resource: resource.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let (page, link_header) = self
                .fetch_page::<T>(resource, fields, cursor.as_deref())
                .await?;
            items.extend(unwrap_page(page));

            cursor = next_page_cursor(link_header.as_deref());
            if cursor.is_none() {
                break;
            }
        }

        tracing::debug!(resource, count = items.len(), pages = page_count, "catalog fetch complete");
        Ok(items)
    }

    /// Fetches one page of a listing endpoint, with automatic retry on
    /// transient errors, returning the parsed envelope and the raw `Link`
    /// header.
    async fn fetch_page<T>(
        &self,
        resource: &str,
        fields: Option<&[&str]>,
        page_info: Option<&str>,
    ) -> Result<(T, Option<String>), ShopifyError>
    where
        T: DeserializeOwned,
    {
        let mut params: Vec<(&str, String)> = vec![("limit", self.page_limit.to_string())];
        if let Some(fields) = fields {
            params.push(("fields", fields.join(",")));
        }
        if let Some(cursor) = page_info {
            params.push(("page_info", cursor.to_owned()));
        }
        let borrowed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.endpoint_url(resource, &borrowed)?;
        let resource = resource.to_owned();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let resource = resource.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(ACCESS_TOKEN_HEADER, &self.access_token)
                    .send()
                    .await?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(ShopifyError::RateLimited {
                        retry_after_secs: retry_after_secs(&response),
                    });
                }
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ShopifyError::NotFound {
                        url: url.to_string(),
                    });
                }
                if !status.is_success() {
                    return Err(ShopifyError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                // Take the Link header before consuming the body.
                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let page = serde_json::from_str::<T>(&body).map_err(|e| {
                    ShopifyError::Deserialize {
                        context: format!("{resource} page"),
                        source: e,
                    }
                })?;

                Ok((page, link_header))
            }
        })
        .await
    }

    /// Builds the full request URL for `resource` with percent-encoded query
    /// parameters.
    fn endpoint_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, ShopifyError> {
        let mut url =
            self.base_url
                .join(resource)
                .map_err(|e| ShopifyError::InvalidShopDomain {
                    domain: self.base_url.to_string(),
                    reason: e.to_string(),
                })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CatalogSource for ShopifyAdminClient {
    async fn fetch_items(
        &self,
        kind: CatalogKind,
        fields: Option<&[&str]>,
    ) -> Result<Vec<CatalogItem>, ShopifyError> {
        match kind {
            CatalogKind::Products => self.list_products(fields).await,
            CatalogKind::Collections => self.list_smart_collections(fields).await,
        }
    }
}

#[async_trait::async_trait]
impl OrderRelay for ShopifyAdminClient {
    async fn create_draft_order(
        &self,
        request: &DraftOrderRequest,
    ) -> Result<DraftOrder, ShopifyError> {
        ShopifyAdminClient::create_draft_order(self, request).await
    }
}

/// Reads the `Retry-After` header, defaulting to 60 seconds when absent or
/// unparseable.
fn retry_after_secs(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60)
}
