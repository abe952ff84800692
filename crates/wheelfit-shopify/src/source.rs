//! The catalog-source capability the HTTP boundary consumes.
//!
//! Abstracting the platform client behind one trait lets the server's route
//! tests run entirely against in-memory fixtures, with no mock HTTP server.

use std::str::FromStr;

use async_trait::async_trait;
use wheelfit_core::CatalogItem;

use crate::error::ShopifyError;
use crate::types::{DraftOrder, DraftOrderRequest};

/// Which upstream listing a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Products,
    Collections,
}

impl CatalogKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Products => "products",
            CatalogKind::Collections => "collections",
        }
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(CatalogKind::Products),
            "collections" => Ok(CatalogKind::Collections),
            other => Err(format!(
                "\"{other}\" is not a catalog kind (expected \"products\" or \"collections\")"
            )),
        }
    }
}

/// Supplies raw catalog items for the fitment filter.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every item of `kind`, optionally narrowing the returned
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] when the upstream platform is unreachable or
    /// responds with an error.
    async fn fetch_items(
        &self,
        kind: CatalogKind,
        fields: Option<&[&str]>,
    ) -> Result<Vec<CatalogItem>, ShopifyError>;
}

/// Forwards a submitted order to the commerce platform as a draft order.
#[async_trait]
pub trait OrderRelay: Send + Sync {
    /// Creates a draft order upstream and returns its representation.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError`] when the upstream platform rejects the order
    /// or is unreachable.
    async fn create_draft_order(
        &self,
        request: &DraftOrderRequest,
    ) -> Result<DraftOrder, ShopifyError>;
}
