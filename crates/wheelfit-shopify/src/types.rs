//! Request and response shapes for the Admin REST API.
//!
//! Listing endpoints wrap their payload in a resource-named envelope
//! (`{"products": [...]}`, `{"smart_collections": [...]}`). Both payloads
//! deserialize straight into [`CatalogItem`]: the Admin API returns `tags`
//! as a comma-separated string, which is exactly the shape the fitment
//! filter consumes, and `#[serde(default)]` on the optional fields absorbs
//! `fields=`-narrowed responses.

use serde::{Deserialize, Serialize};
use wheelfit_core::CatalogItem;

/// Envelope for `GET products.json`.
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<CatalogItem>,
}

/// Envelope for `GET smart_collections.json`.
#[derive(Debug, Deserialize)]
pub struct SmartCollectionsResponse {
    pub smart_collections: Vec<CatalogItem>,
}

/// Body for `POST draft_orders.json`, sent inside a `{"draft_order": ...}`
/// envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderRequest {
    pub line_items: Vec<LineItem>,

    /// Platform-side tax exemption flag. Omitted entirely when unset so the
    /// store default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_exempt: Option<bool>,
}

/// One purchasable line of a draft order.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub variant_id: i64,
    pub quantity: u32,

    /// Free-form name/value pairs shown on the order; the relay flattens
    /// non-reserved form fields into this list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<LineItemProperty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemProperty {
    pub name: String,
    pub value: String,
}

/// The created draft order, reduced to the fields the storefront needs to
/// send the customer onward to checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrder {
    pub id: i64,

    /// Order name, e.g. `"#D1"`.
    #[serde(default)]
    pub name: Option<String>,

    /// Lifecycle status, e.g. `"open"`.
    #[serde(default)]
    pub status: Option<String>,

    /// Checkout URL the customer completes payment at.
    #[serde(default)]
    pub invoice_url: Option<String>,

    /// Total as a decimal string, Shopify's money-on-the-wire convention.
    #[serde(default)]
    pub total_price: Option<String>,
}

/// Envelope for draft-order requests and responses.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DraftOrderEnvelope<T> {
    pub draft_order: T,
}
