use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use wheelfit_core::{filter_catalog, CatalogItem, FilterCriteria};
use wheelfit_shopify::CatalogKind;

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

/// Only the attributes the filter and response need; keeps upstream payloads
/// small on stores with large catalogs.
const CATALOG_FIELDS: &[&str] = &["id", "title", "tags"];

#[derive(Debug, Deserialize)]
pub(super) struct FitmentQuery {
    /// Exact-match bolt pattern, e.g. `5X112`.
    pub bolt_pattern: Option<String>,
    /// Minimum central bore in millimeters.
    pub central_bore: Option<String>,
    /// Comma-separated maximum offsets in millimeters.
    pub offset: Option<String>,
    /// `products` or `collections`; defaults to `collections`.
    pub kind: Option<String>,
}

/// `GET /`: fetches the catalog, applies the fitment filter, and returns
/// the matching items as a bare JSON array.
pub(super) async fn search_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FitmentQuery>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    let criteria = FilterCriteria::from_raw(
        query.bolt_pattern.as_deref(),
        query.central_bore.as_deref(),
        query.offset.as_deref(),
    )
    .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let kind = match query.kind.as_deref() {
        None => CatalogKind::Collections,
        Some(raw) => raw
            .parse::<CatalogKind>()
            .map_err(|reason| ApiError::new(req_id.0.clone(), "validation_error", reason))?,
    };

    let items = state
        .source
        .fetch_items(kind, Some(CATALOG_FIELDS))
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    let fetched = items.len();
    let matches = filter_catalog(items, &criteria);
    tracing::debug!(
        kind = kind.as_str(),
        fetched,
        matched = matches.len(),
        "fitment query served"
    );

    Ok(Json(matches))
}
