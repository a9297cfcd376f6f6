use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: u64,
  pub title: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub description: String,
  pub price: f64,
  #[serde(default)]
  pub category: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub brand: String,
  #[serde(default, deserialize_with = "null_as_default")]
  pub stock: u32,
  #[serde(default, deserialize_with = "null_as_default")]
  pub rating: f64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub images: Vec<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub features: Vec<String>,
}

impl Product {
  /// First image URL, used as the sale snapshot image
  pub fn cover_image(&self) -> Option<&str> {
    self.images.first().map(String::as_str)
  }

  /// Case-insensitive substring match over title, description, category and brand.
  /// `needle` must already be lowercased.
  pub fn matches(&self, needle: &str) -> bool {
    [&self.title, &self.description, &self.category, &self.brand]
      .iter()
      .any(|field| field.to_lowercase().contains(needle))
  }
}

/// Sale lifecycle state. The API only ever produces completed sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleStatus {
  #[default]
  #[serde(alias = "Completada", alias = "completed")]
  Completed,
}

impl SaleStatus {
  pub fn label(&self) -> &'static str {
    match self {
      SaleStatus::Completed => "Completed",
    }
  }
}

/// A recorded purchase. Product fields are a snapshot taken at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
  pub id: u64,
  pub product_id: u64,
  pub product_title: String,
  #[serde(default)]
  pub product_image: Option<String>,
  /// Unit price at purchase time
  pub price: f64,
  pub quantity: u32,
  pub total: f64,
  #[serde(default)]
  pub status: SaleStatus,
  #[serde(rename = "date", deserialize_with = "deserialize_utc")]
  pub created_at: DateTime<Utc>,
}

impl Sale {
  /// Snapshot a product into a new completed sale.
  pub fn snapshot(id: u64, product: &Product, quantity: u32, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      product_id: product.id,
      product_title: product.title.clone(),
      product_image: product.cover_image().map(String::from),
      price: product.price,
      quantity,
      total: product.price * f64::from(quantity),
      status: SaleStatus::Completed,
      created_at,
    }
  }
}

/// Aggregate figures over all sales
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesStats {
  pub total_sales: u64,
  pub total_items: u64,
  pub total_amount: f64,
}

impl SalesStats {
  pub fn from_sales(sales: &[Sale]) -> Self {
    sales.iter().fold(Self::default(), |mut acc, sale| {
      acc.total_sales += 1;
      acc.total_items += u64::from(sale.quantity);
      acc.total_amount += sale.total;
      acc
    })
  }
}

/// Skip/limit paging parameters for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub skip: u32,
  pub limit: u32,
}

impl Default for Page {
  fn default() -> Self {
    Self { skip: 0, limit: 100 }
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept RFC 3339 timestamps as well as offset-less ones, which are taken as UTC.
fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse_utc(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn phone() -> Product {
    Product {
      id: 7,
      title: "Pixel 8".to_string(),
      description: "Tensor G3, 128GB".to_string(),
      price: 9999.5,
      category: "Smartphone".to_string(),
      brand: "Google".to_string(),
      stock: 4,
      rating: 4.4,
      images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
      features: vec![],
    }
  }

  #[test]
  fn test_product_decodes_sparse_remote_payload() {
    let json = r#"{"id": 3, "title": "Cable", "price": 12.0, "category": "Audio",
      "description": null, "brand": null, "created_at": "2024-01-01T00:00:00"}"#;
    let product: Product = serde_json::from_str(json).unwrap();
    assert_eq!(product.id, 3);
    assert_eq!(product.description, "");
    assert_eq!(product.brand, "");
    assert_eq!(product.stock, 0);
    assert!(product.images.is_empty());
  }

  #[test]
  fn test_matches_any_text_field() {
    let p = phone();
    assert!(p.matches("pixel"));
    assert!(p.matches("tensor"));
    assert!(p.matches("smart"));
    assert!(p.matches("goo"));
    assert!(!p.matches("apple"));
  }

  #[test]
  fn test_snapshot_copies_product_fields() {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let sale = Sale::snapshot(4, &phone(), 3, at);
    assert_eq!(sale.product_id, 7);
    assert_eq!(sale.product_title, "Pixel 8");
    assert_eq!(sale.product_image.as_deref(), Some("a.jpg"));
    assert_eq!(sale.total, 9999.5 * 3.0);
    assert_eq!(sale.status, SaleStatus::Completed);
    assert_eq!(sale.created_at, at);
  }

  #[test]
  fn test_sale_decodes_backend_status_and_naive_date() {
    let json = r#"{"id": 9, "product_id": 2, "product_title": "Galaxy", "product_image": null,
      "quantity": 2, "price": 8500.0, "total": 17000.0, "status": "Completada",
      "date": "2024-11-05T08:00:00.123456"}"#;
    let sale: Sale = serde_json::from_str(json).unwrap();
    assert_eq!(sale.status, SaleStatus::Completed);
    assert_eq!(sale.product_image, None);
    assert_eq!(sale.created_at.date_naive().to_string(), "2024-11-05");
  }

  #[test]
  fn test_parse_utc_rejects_garbage() {
    assert!(parse_utc("yesterday").is_none());
    assert!(parse_utc("2024-11-01T10:30:00Z").is_some());
  }

  #[test]
  fn test_stats_from_sales() {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let sales = vec![Sale::snapshot(1, &phone(), 2, at), Sale::snapshot(2, &phone(), 1, at)];
    let stats = SalesStats::from_sales(&sales);
    assert_eq!(stats.total_sales, 2);
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.total_amount, 9999.5 * 3.0);
  }
}
