pub mod client;
pub mod error;
pub mod pagination;
pub mod source;
pub mod types;

mod retry;

pub use client::{ClientOptions, ShopifyAdminClient};
pub use error::ShopifyError;
pub use source::{CatalogKind, CatalogSource, OrderRelay};
pub use types::{DraftOrder, DraftOrderRequest, LineItem, LineItemProperty};
