//! Serde types matching the catalog API's response envelopes.
//!
//! List endpoints answer either with a bare JSON array or with an object that
//! wraps the array (`{"products": [...], "total": ..}`, `{"sales": [...], "stats": ..}`).
//! Both shapes decode into an untagged envelope enum and are normalized to a plain `Vec`
//! before leaving the client.

use serde::{Deserialize, Serialize};

use super::types::{Product, Sale};

/// A product list in either of the shapes the API produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductsEnvelope {
  Bare(Vec<Product>),
  /// `{"products": [...], "total": .., "page": ..}` from list and search
  Wrapped { products: Vec<Product> },
}

impl ProductsEnvelope {
  pub fn into_vec(self) -> Vec<Product> {
    match self {
      Self::Bare(products) | Self::Wrapped { products } => products,
    }
  }
}

/// A sales list in either of the shapes the API produces.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SalesEnvelope {
  Bare(Vec<Sale>),
  /// `{"sales": [...], "stats": {...}}`
  Wrapped { sales: Vec<Sale> },
}

impl SalesEnvelope {
  pub fn into_vec(self) -> Vec<Sale> {
    match self {
      Self::Bare(sales) | Self::Wrapped { sales } => sales,
    }
  }
}

/// Body for `POST /sales`
#[derive(Debug, Serialize)]
pub struct CreateSaleRequest {
  pub product_id: u64,
  pub quantity: u32,
}
