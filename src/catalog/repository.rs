//! Caching, fallback-aware access to the catalog and sales.
//!
//! Every operation tries the API first. Any [`ClientError`] is logged and
//! answered from the built-in fallback data instead, so callers only ever see
//! data, an empty result, or a not-found / failed signal.
//!
//! Sales cache policy: the cache holds a snapshot of whatever list was loaded.
//! Purchases recorded locally go to the fallback log and invalidate the cache,
//! so the next `get_sales` rebuilds it.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::{CacheSlot, Origin};

use super::api::CatalogApi;
use super::client::RemoteClient;
use super::error::ClientError;
use super::fallback;
use super::types::{Page, Product, Sale, SalesStats};

/// Results per search request
const SEARCH_PER_PAGE: u32 = 10;

/// How a purchase was recorded
#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
  /// The API accepted the sale
  Recorded,
  /// API unreachable, sale appended to the local log
  RecordedOffline(Sale),
  /// No such product in either source; nothing recorded
  ProductNotFound,
  /// Quantity was zero; nothing sent, nothing recorded
  InvalidQuantity,
}

impl PurchaseOutcome {
  pub fn succeeded(&self) -> bool {
    matches!(
      self,
      PurchaseOutcome::Recorded | PurchaseOutcome::RecordedOffline(_)
    )
  }
}

/// Repository backed by the HTTP client
pub type Storefront = Repository<RemoteClient>;

pub struct Repository<A> {
  api: A,
  fallback_products: Arc<Vec<Product>>,
  products: CacheSlot<Vec<Product>>,
  sales: CacheSlot<Vec<Sale>>,
  fallback_sales: Mutex<Vec<Sale>>,
}

impl<A: CatalogApi> Repository<A> {
  pub fn new(api: A) -> Self {
    Self {
      api,
      fallback_products: Arc::new(fallback::products()),
      products: CacheSlot::new(),
      sales: CacheSlot::new(),
      fallback_sales: Mutex::new(fallback::seed_sales()),
    }
  }

  /// Products matching `query`. An empty query matches nothing and makes no request.
  pub async fn search_products(&self, query: &str) -> Vec<Product> {
    if query.is_empty() {
      return Vec::new();
    }

    match self.api.search_products(query, 1, SEARCH_PER_PAGE).await {
      Ok(products) => products,
      Err(e) => {
        log_fallback("search_products", &e);
        let needle = query.to_lowercase();
        self
          .fallback_products
          .iter()
          .filter(|p| p.matches(&needle))
          .cloned()
          .collect()
      }
    }
  }

  pub async fn get_product_by_id(&self, id: u64) -> Option<Product> {
    match self.api.get_product(id).await {
      Ok(product) => Some(product),
      Err(e) => {
        log_fallback("get_product_by_id", &e);
        self.fallback_products.iter().find(|p| p.id == id).cloned()
      }
    }
  }

  /// Look up a product from a textual id (e.g. typed by the user).
  pub async fn find_product(&self, raw_id: &str) -> Option<Product> {
    match parse_id(raw_id) {
      Some(id) => self.get_product_by_id(id).await,
      None => {
        warn!(raw_id, "not a product id");
        None
      }
    }
  }

  /// Full catalog. Loaded once, then served from cache for the repository's lifetime.
  pub async fn get_products(&self) -> Arc<Vec<Product>> {
    self
      .products
      .get_or_load(|| async {
        match self.api.list_products(Page::default()).await {
          Ok(products) => (Arc::new(products), Origin::Remote),
          Err(e) => {
            log_fallback("get_products", &e);
            (Arc::clone(&self.fallback_products), Origin::Fallback)
          }
        }
      })
      .await
      .data
  }

  /// Products in `category`. Not cached.
  pub async fn get_products_by_category(&self, category: &str) -> Vec<Product> {
    if category.is_empty() {
      return Vec::new();
    }

    match self
      .api
      .list_products_by_category(category, Page::default())
      .await
    {
      Ok(products) => products,
      Err(e) => {
        log_fallback("get_products_by_category", &e);
        self
          .fallback_products
          .iter()
          .filter(|p| p.category.eq_ignore_ascii_case(category))
          .cloned()
          .collect()
      }
    }
  }

  /// Record a purchase of `quantity` units. A zero quantity is refused up front.
  pub async fn add_sale(&self, product_id: u64, quantity: u32) -> PurchaseOutcome {
    if quantity == 0 {
      warn!(product_id, "purchase rejected, zero quantity");
      return PurchaseOutcome::InvalidQuantity;
    }

    match self.api.create_sale(product_id, quantity).await {
      Ok(sale) => {
        info!(sale_id = ?sale.map(|s| s.id), product_id, quantity, "sale recorded");
        self.sales.invalidate().await;
        PurchaseOutcome::Recorded
      }
      Err(e) => {
        log_fallback("add_sale", &e);

        let Some(product) = self.get_product_by_id(product_id).await else {
          warn!(product_id, "purchase rejected, unknown product");
          return PurchaseOutcome::ProductNotFound;
        };

        let sale = {
          let mut log = self.fallback_sales.lock().await;
          let sale = Sale::snapshot(log.len() as u64 + 1, &product, quantity, Utc::now());
          log.push(sale.clone());
          sale
        };
        self.sales.invalidate().await;

        info!(sale_id = sale.id, product_id, quantity, total = sale.total, "sale recorded offline");
        PurchaseOutcome::RecordedOffline(sale)
      }
    }
  }

  /// All sales. Cached until the next purchase.
  pub async fn get_sales(&self) -> Arc<Vec<Sale>> {
    self
      .sales
      .get_or_load(|| async {
        match self.api.list_sales(Page::default()).await {
          Ok(sales) => (Arc::new(sales), Origin::Remote),
          Err(e) => {
            log_fallback("get_sales", &e);
            let snapshot = self.fallback_sales.lock().await.clone();
            (Arc::new(snapshot), Origin::Fallback)
          }
        }
      })
      .await
      .data
  }

  pub async fn get_sales_stats(&self) -> SalesStats {
    match self.api.sales_stats().await {
      Ok(stats) => stats,
      Err(e) => {
        log_fallback("get_sales_stats", &e);
        SalesStats::from_sales(&self.fallback_sales.lock().await)
      }
    }
  }

  pub async fn get_sale(&self, id: u64) -> Option<Sale> {
    match self.api.get_sale(id).await {
      Ok(sale) => Some(sale),
      Err(e) => {
        log_fallback("get_sale", &e);
        self
          .fallback_sales
          .lock()
          .await
          .iter()
          .find(|s| s.id == id)
          .cloned()
      }
    }
  }

  /// Look up a sale from a textual id, coerced like [`Self::find_product`].
  pub async fn find_sale(&self, raw_id: &str) -> Option<Sale> {
    match parse_id(raw_id) {
      Some(id) => self.get_sale(id).await,
      None => {
        warn!(raw_id, "not a sale id");
        None
      }
    }
  }

  /// Which source filled the catalog cache, if it is filled and not mid-load.
  pub fn catalog_origin(&self) -> Option<Origin> {
    self.products.try_peek().map(|cached| cached.origin)
  }
}

fn log_fallback(operation: &'static str, error: &ClientError) {
  warn!(
    operation,
    transport = error.is_transport(),
    status = ?error.status(),
    error = %error,
    "catalog API failed, using fallback data"
  );
}

/// Integer coercion for textual ids: optional surrounding whitespace and sign,
/// then leading decimal digits; anything after the digits is ignored.
pub fn parse_id(raw: &str) -> Option<u64> {
  let trimmed = raw.trim_start();
  let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
  let digits_end = unsigned
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(unsigned.len());
  unsigned[..digits_end].parse().ok()
}
