//! Catalog and sales data access: HTTP client, fallback data and the
//! caching repository the views talk to.

pub mod api;
pub mod api_types;
pub mod client;
pub mod error;
pub mod fallback;
pub mod repository;
pub mod types;

pub use client::RemoteClient;
pub use repository::{PurchaseOutcome, Repository, Storefront};
pub use types::{Product, Sale, SalesStats};
