use async_trait::async_trait;

use super::error::ClientResult;
use super::types::{Page, Product, Sale, SalesStats};

/// Remote catalog and sales operations.
///
/// Implemented by [`RemoteClient`](super::client::RemoteClient). The repository
/// only sees this trait, so tests can stand in a double.
#[async_trait]
pub trait CatalogApi: Send + Sync {
  async fn list_products(&self, page: Page) -> ClientResult<Vec<Product>>;

  async fn search_products(&self, query: &str, page: u32, per_page: u32)
    -> ClientResult<Vec<Product>>;

  async fn get_product(&self, id: u64) -> ClientResult<Product>;

  async fn list_products_by_category(&self, category: &str, page: Page)
    -> ClientResult<Vec<Product>>;

  async fn list_sales(&self, page: Page) -> ClientResult<Vec<Sale>>;

  async fn sales_stats(&self) -> ClientResult<SalesStats>;

  /// Any 2xx JSON answer means the sale was stored. The created sale is
  /// `None` when the body does not read as a [`Sale`].
  async fn create_sale(&self, product_id: u64, quantity: u32) -> ClientResult<Option<Sale>>;

  async fn get_sale(&self, id: u64) -> ClientResult<Sale>;
}
