use crate::catalog::api::CatalogApi;
use crate::catalog::api_types::{CreateSaleRequest, ProductsEnvelope, SalesEnvelope};
use crate::catalog::error::{ClientError, ClientResult};
use crate::catalog::types::{Page, Product, Sale, SalesStats};
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Per-call overrides for [`RemoteClient::request`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
  method: Method,
  query: Vec<(&'static str, String)>,
  headers: HeaderMap,
  body: Option<Vec<u8>>,
}

impl RequestOptions {
  pub fn get() -> Self {
    Self::default()
  }

  /// POST with a JSON body
  pub fn post(body: &impl Serialize) -> ClientResult<Self> {
    Ok(Self {
      method: Method::POST,
      body: Some(serde_json::to_vec(body)?),
      ..Self::default()
    })
  }

  pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
    self.query.push((key, value.to_string()));
    self
  }

  /// Caller headers replace the defaults with the same name
  pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
    self.headers.insert(name, value);
    self
  }

  fn paged(self, page: Page) -> Self {
    self.query("skip", page.skip).query("limit", page.limit)
  }
}

/// HTTP client for the catalog/sales API
#[derive(Debug, Clone)]
pub struct RemoteClient {
  http: reqwest::Client,
  base_url: String,
}

impl RemoteClient {
  pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
    // Validate once so per-request failures are about the path, not the base
    Url::parse(base_url)?;

    let http = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  pub fn from_config(config: &ApiConfig) -> ClientResult<Self> {
    Self::new(&config.base_url(), config.timeout())
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// One round trip to `base_url + path`, decoding the JSON body.
  ///
  /// Non-2xx responses become [`ClientError::Remote`]. No retries.
  pub async fn request<T: DeserializeOwned>(
    &self,
    path: &str,
    options: RequestOptions,
  ) -> ClientResult<T> {
    let url = Url::parse(&format!("{}{}", self.base_url, path))?;
    self.send(url, options).await
  }

  /// Like `request`, but percent-encodes each path segment.
  async fn request_segments<T: DeserializeOwned>(
    &self,
    segments: &[&str],
    options: RequestOptions,
  ) -> ClientResult<T> {
    let mut url = Url::parse(&self.base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
      .pop_if_empty()
      .extend(segments);
    self.send(url, options).await
  }

  async fn send<T: DeserializeOwned>(&self, mut url: Url, options: RequestOptions) -> ClientResult<T> {
    if !options.query.is_empty() {
      url
        .query_pairs_mut()
        .extend_pairs(options.query.iter().map(|(k, v)| (*k, v.as_str())));
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in options.headers.iter() {
      headers.insert(name.clone(), value.clone());
    }

    debug!(method = %options.method, url = %url, "catalog request");

    let mut request = self.http.request(options.method, url).headers(headers);
    if let Some(body) = options.body {
      request = request.body(body);
    }

    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ClientError::Remote {
        status: status.as_u16(),
        body,
      });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }
}

#[async_trait]
impl CatalogApi for RemoteClient {
  async fn list_products(&self, page: Page) -> ClientResult<Vec<Product>> {
    let envelope: ProductsEnvelope = self
      .request("/products", RequestOptions::get().paged(page))
      .await?;
    Ok(envelope.into_vec())
  }

  async fn search_products(
    &self,
    query: &str,
    page: u32,
    per_page: u32,
  ) -> ClientResult<Vec<Product>> {
    let options = RequestOptions::get()
      .query("q", query)
      .query("page", page)
      .query("per_page", per_page);
    let envelope: ProductsEnvelope = self.request("/products/search", options).await?;
    Ok(envelope.into_vec())
  }

  async fn get_product(&self, id: u64) -> ClientResult<Product> {
    self
      .request(&format!("/products/{}", id), RequestOptions::get())
      .await
  }

  async fn list_products_by_category(
    &self,
    category: &str,
    page: Page,
  ) -> ClientResult<Vec<Product>> {
    let envelope: ProductsEnvelope = self
      .request_segments(
        &["products", "category", category],
        RequestOptions::get().paged(page),
      )
      .await?;
    Ok(envelope.into_vec())
  }

  async fn list_sales(&self, page: Page) -> ClientResult<Vec<Sale>> {
    let envelope: SalesEnvelope = self
      .request("/sales", RequestOptions::get().paged(page))
      .await?;
    Ok(envelope.into_vec())
  }

  async fn sales_stats(&self) -> ClientResult<SalesStats> {
    self.request("/sales/stats", RequestOptions::get()).await
  }

  async fn create_sale(&self, product_id: u64, quantity: u32) -> ClientResult<Option<Sale>> {
    let body = CreateSaleRequest {
      product_id,
      quantity,
    };
    // Stored once the API answers 2xx, whatever the body looks like
    let created: serde_json::Value = self.request("/sales", RequestOptions::post(&body)?).await?;
    match serde_json::from_value(created) {
      Ok(sale) => Ok(Some(sale)),
      Err(e) => {
        debug!(error = %e, "created sale has an unexpected shape");
        Ok(None)
      }
    }
  }

  async fn get_sale(&self, id: u64) -> ClientResult<Sale> {
    self
      .request(&format!("/sales/{}", id), RequestOptions::get())
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::repository::{PurchaseOutcome, Repository};
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::{TcpListener, TcpStream};
  use tokio::task::JoinHandle;

  const IPHONE: &str = r#"{"id": 1, "title": "iPhone X", "price": 10200, "category": "Smartphone",
    "brand": "Apple", "stock": 15, "rating": 4.5, "images": ["a.jpg"], "features": []}"#;

  /// Serve exactly one canned response, returning the raw request text.
  async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let request = read_request(&mut socket).await;
      let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      let _ = socket.shutdown().await;
      request
    });

    (format!("http://{}/api/v1", addr), handle)
  }

  async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
      let n = socket.read(&mut chunk).await.unwrap();
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);

      let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        continue;
      };
      let head = String::from_utf8_lossy(&buf[..head_end]).to_lowercase();
      let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
      if buf.len() >= head_end + 4 + content_length {
        break;
      }
    }
    String::from_utf8_lossy(&buf).into_owned()
  }

  fn client(base: &str) -> RemoteClient {
    RemoteClient::new(base, Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn test_list_products_bare_array() {
    let (base, server) = serve_once("200 OK", format!("[{}]", IPHONE)).await;

    let products = client(&base).list_products(Page::default()).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "iPhone X");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/products?skip=0&limit=100 HTTP/1.1"));
    assert!(request.to_lowercase().contains("content-type: application/json"));
  }

  #[tokio::test]
  async fn test_search_wrapped_envelope_and_encoding() {
    let body = format!(
      r#"{{"products": [{}], "total": 1, "page": 1, "per_page": 10, "total_pages": 1}}"#,
      IPHONE
    );
    let (base, server) = serve_once("200 OK", body).await;

    let products = client(&base)
      .search_products("iphone x", 1, 10)
      .await
      .unwrap();
    assert_eq!(products.len(), 1);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/products/search?q=iphone+x&page=1&per_page=10 "));
  }

  #[tokio::test]
  async fn test_category_path_segment_is_encoded() {
    let (base, server) = serve_once("200 OK", "[]".to_string()).await;

    let products = client(&base)
      .list_products_by_category("Home & Garden", Page { skip: 5, limit: 10 })
      .await
      .unwrap();
    assert!(products.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/v1/products/category/Home%20&%20Garden?skip=5&limit=10 "));
  }

  #[tokio::test]
  async fn test_create_sale_posts_json_body() {
    let sale = r#"{"id": 12, "product_id": 3, "product_title": "MacBook Pro 13'",
      "quantity": 2, "price": 25000, "total": 50000, "status": "Completada",
      "date": "2024-11-04T10:00:00"}"#;
    let (base, server) = serve_once("200 OK", sale.to_string()).await;

    let created = client(&base).create_sale(3, 2).await.unwrap().unwrap();
    assert_eq!(created.id, 12);
    assert_eq!(created.total, 50000.0);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/v1/sales HTTP/1.1"));
    assert!(request.ends_with(r#"{"product_id":3,"quantity":2}"#));
  }

  const PENDING_SALE: &str = r#"{"id": 12, "product_id": 1, "product_title": "iPhone X",
    "quantity": 2, "price": 10200, "total": 20400, "status": "Pendiente",
    "date": "04/11/2024 10:00"}"#;

  #[tokio::test]
  async fn test_create_sale_accepts_unfamiliar_body() {
    let (base, _server) = serve_once("201 Created", PENDING_SALE.to_string()).await;

    let created = client(&base).create_sale(1, 2).await.unwrap();
    assert_eq!(created, None);
  }

  #[tokio::test]
  async fn test_accepted_sale_is_not_recorded_offline() {
    let (base, server) = serve_once("201 Created", PENDING_SALE.to_string()).await;

    let repo = Repository::new(client(&base));
    assert_eq!(repo.add_sale(1, 2).await, PurchaseOutcome::Recorded);
    assert!(server.await.unwrap().starts_with("POST /api/v1/sales "));
  }

  #[tokio::test]
  async fn test_hanging_server_times_out_as_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
      let (socket, _) = listener.accept().await.unwrap();
      tokio::time::sleep(Duration::from_secs(5)).await;
      drop(socket);
    });

    let slow = RemoteClient::new(&format!("http://{}/api/v1", addr), Duration::from_millis(100)).unwrap();
    let started = std::time::Instant::now();
    let err = slow.list_products(Page::default()).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
  }

  #[tokio::test]
  async fn test_non_success_status_is_remote_error() {
    let (base, _server) = serve_once("404 Not Found", r#"{"detail": "Product not found"}"#.to_string()).await;

    let err = client(&base).get_product(9999).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_transport());
  }

  #[tokio::test]
  async fn test_invalid_json_is_decode_error() {
    let (base, _server) = serve_once("200 OK", "<html>oops</html>".to_string()).await;

    let err = client(&base).sales_stats().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert!(err.is_transport());
  }

  #[tokio::test]
  async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/api/v1", addr))
      .list_sales(Page::default())
      .await
      .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
  }

  #[tokio::test]
  async fn test_caller_header_overrides_default() {
    let (base, server) = serve_once("200 OK", "{}".to_string()).await;

    let options = RequestOptions::get().header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    let _: serde_json::Value = client(&base).request("/ping", options).await.unwrap();

    let request = server.await.unwrap().to_lowercase();
    assert!(request.contains("content-type: text/plain"));
    assert!(!request.contains("content-type: application/json"));
  }

  #[test]
  fn test_invalid_base_url_rejected() {
    assert!(matches!(
      RemoteClient::new("not a url", Duration::from_secs(1)),
      Err(ClientError::InvalidUrl(_))
    ));
  }

  #[test]
  fn test_trailing_slash_trimmed() {
    let c = client("http://localhost:8000/api/v1/");
    assert_eq!(c.base_url(), "http://localhost:8000/api/v1");
  }
}
