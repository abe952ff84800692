use std::collections::HashMap;

use axum::{extract::State, Extension, Form, Json};
use wheelfit_core::ValidationError;
use wheelfit_shopify::{DraftOrder, DraftOrderRequest, LineItem, LineItemProperty};

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

/// Form keys consumed structurally; everything else flattens into the line
/// item's properties list.
const RESERVED_FIELDS: [&str; 3] = ["variant_id", "quantity", "tax_exempt"];

/// `POST /order`: reshapes the submitted form into a single-line draft
/// order and forwards it to the platform.
pub(super) async fn create_order(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<DraftOrder>, ApiError> {
    let request = build_draft_order(&form)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let order = state
        .orders
        .create_draft_order(&request)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    tracing::info!(order_id = order.id, "draft order created");
    Ok(Json(order))
}

/// Flattens the submitted form into a draft-order request: `variant_id`
/// (required) and `quantity` (default 1) form the line item, `tax_exempt`
/// maps to the order flag, and every remaining field becomes a line-item
/// property.
fn build_draft_order(form: &HashMap<String, String>) -> Result<DraftOrderRequest, ValidationError> {
    let variant_id = form
        .get("variant_id")
        .ok_or_else(|| ValidationError {
            field: "variant_id",
            reason: "is required".to_owned(),
        })?
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError {
            field: "variant_id",
            reason: "must be a numeric variant id".to_owned(),
        })?;

    let quantity = match form.get("quantity") {
        None => 1,
        Some(raw) => raw.trim().parse::<u32>().map_err(|_| ValidationError {
            field: "quantity",
            reason: "must be a positive integer".to_owned(),
        })?,
    };
    if quantity == 0 {
        return Err(ValidationError {
            field: "quantity",
            reason: "must be at least 1".to_owned(),
        });
    }

    let tax_exempt = form
        .get("tax_exempt")
        .map(|raw| match raw.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ValidationError {
                field: "tax_exempt",
                reason: "must be true or false".to_owned(),
            }),
        })
        .transpose()?;

    let mut properties: Vec<LineItemProperty> = form
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| LineItemProperty {
            name: key.clone(),
            value: value.clone(),
        })
        .collect();
    // HashMap iteration order is unstable; keep the wire format deterministic.
    properties.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(DraftOrderRequest {
        line_items: vec![LineItem {
            variant_id,
            quantity,
            properties,
        }],
        tax_exempt,
    })
}
