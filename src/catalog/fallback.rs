//! Built-in catalog and seed sales served while the API is unreachable.

use chrono::{DateTime, TimeZone, Utc};

use super::types::{Product, Sale, SaleStatus};

#[allow(clippy::too_many_arguments)]
fn product(
  id: u64,
  title: &str,
  description: &str,
  price: f64,
  category: &str,
  brand: &str,
  stock: u32,
  rating: f64,
  images: &[&str],
  features: &[&str],
) -> Product {
  Product {
    id,
    title: title.to_string(),
    description: description.to_string(),
    price,
    category: category.to_string(),
    brand: brand.to_string(),
    stock,
    rating,
    images: images.iter().map(|s| unsplash(s)).collect(),
    features: features.iter().map(|s| s.to_string()).collect(),
  }
}

fn unsplash(photo: &str) -> String {
  format!(
    "https://images.unsplash.com/photo-{}?w=400&h=400&fit=crop",
    photo
  )
}

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2024, 11, day, hour, minute, 0)
    .single()
    .unwrap_or_default()
}

/// The ten-product fallback catalog, in display order.
pub fn products() -> Vec<Product> {
  vec![
    product(
      1,
      "iPhone X",
      "SIM-Free, Model A1901 6.5' Super Retina HD display with OLED technology A12 Bionic chip",
      10200.0,
      "Smartphone",
      "Apple",
      15,
      4.5,
      &[
        "1512499617640-c74ae3a79d37",
        "1511707171634-5f897ff02aa9",
        "1510557880182-3d4d3cba35a5",
      ],
      &[
        "6.5' Super Retina HD display",
        "OLED technology",
        "A12 Bionic chip",
        "Face ID",
        "Wireless charging",
      ],
    ),
    product(
      2,
      "Samsung Galaxy S21",
      "128GB, 8GB RAM, Triple Camera, 6.2' Dynamic AMOLED display",
      8500.0,
      "Smartphone",
      "Samsung",
      8,
      4.3,
      &["1610945265064-0e34e5519bbf", "1592750475338-74b7b21085ab"],
      &[
        "6.2' Dynamic AMOLED display",
        "Triple camera system",
        "8GB RAM",
        "128GB storage",
        "5G connectivity",
      ],
    ),
    product(
      3,
      "MacBook Pro 13'",
      "Apple M1 chip, 8GB RAM, 256GB SSD, 13.3' Retina display",
      25000.0,
      "Laptop",
      "Apple",
      5,
      4.8,
      &["1541807084-5c52b6b3adef", "1517336714731-489689fd1ca8"],
      &[
        "Apple M1 chip",
        "8GB unified memory",
        "256GB SSD storage",
        "13.3' Retina display",
        "Up to 17 hours battery life",
      ],
    ),
    product(
      4,
      "Sony WH-1000XM4",
      "Wireless Noise Canceling Headphones, 30-hour battery life",
      3500.0,
      "Audio",
      "Sony",
      12,
      4.6,
      &["1505740420928-5e560c06d30e", "1484704849700-f032a568e944"],
      &[
        "Industry-leading noise canceling",
        "30-hour battery life",
        "Touch sensor controls",
        "Quick attention mode",
        "Wireless charging",
      ],
    ),
    product(
      5,
      "Dell XPS 13",
      "11th Gen Intel Core i7, 16GB RAM, 512GB SSD, 13.4' InfinityEdge display",
      22000.0,
      "Laptop",
      "Dell",
      7,
      4.4,
      &["1593642632559-0c6d3fc62b89", "1496181133206-80ce9b88a853"],
      &[
        "11th Gen Intel Core i7",
        "16GB LPDDR4x RAM",
        "512GB NVMe SSD",
        "13.4' InfinityEdge display",
        "Thunderbolt 4 ports",
      ],
    ),
    product(
      6,
      "Nintendo Switch",
      "Gaming console with Joy-Con controllers, 32GB internal storage",
      7500.0,
      "Gaming",
      "Nintendo",
      20,
      4.7,
      &["1578662996442-48f60103fc96", "1606144042614-b2417e99c4e3"],
      &[
        "Portable gaming",
        "Joy-Con controllers",
        "32GB internal storage",
        "6.2' capacitive touchscreen",
        "Dock for TV gaming",
      ],
    ),
    product(
      7,
      "iPad Pro 11'",
      "Apple M1 chip, 128GB, Wi-Fi, Liquid Retina display",
      18000.0,
      "Tablet",
      "Apple",
      10,
      4.6,
      &["1544244015-0df4b3ffc6b0", "1561154464-82e9adf32764"],
      &[
        "Apple M1 chip",
        "11' Liquid Retina display",
        "128GB storage",
        "12MP cameras",
        "Apple Pencil compatible",
      ],
    ),
    product(
      8,
      "AirPods Pro",
      "Active Noise Cancellation, Transparency mode, Spatial audio",
      4500.0,
      "Audio",
      "Apple",
      25,
      4.5,
      &["1606220588913-b3aacb4d2f46", "1603351154351-5e2d2e50ee21"],
      &[
        "Active Noise Cancellation",
        "Transparency mode",
        "Spatial audio",
        "Adaptive EQ",
        "Lightning charging case",
      ],
    ),
    product(
      9,
      "HP Pavilion 15",
      "AMD Ryzen 5, 8GB RAM, 512GB SSD, 15.6' Full HD display",
      15000.0,
      "Laptop",
      "HP",
      9,
      4.2,
      &["1588872657578-7efd1f1555ed", "1484788984921-03950022c9ef"],
      &[
        "AMD Ryzen 5 processor",
        "8GB DDR4 RAM",
        "512GB SSD storage",
        "15.6' Full HD display",
        "Backlit keyboard",
      ],
    ),
    product(
      10,
      "PlayStation 5",
      "Next-gen gaming console with 825GB SSD and DualSense controller",
      12000.0,
      "Gaming",
      "Sony",
      3,
      4.9,
      &["1606813907291-d86efa9b94db", "1607853202273-797f1c22a38e"],
      &[
        "Custom AMD Zen 2 CPU",
        "825GB SSD storage",
        "DualSense controller",
        "Ray tracing support",
        "4K gaming capability",
      ],
    ),
  ]
}

/// The three sales the fallback log starts with.
pub fn seed_sales() -> Vec<Sale> {
  let seed = |id, product_id, title: &str, photo: &str, price: f64, created_at| Sale {
    id,
    product_id,
    product_title: title.to_string(),
    product_image: Some(unsplash(photo)),
    price,
    quantity: 1,
    total: price,
    status: SaleStatus::Completed,
    created_at,
  };

  vec![
    seed(1, 1, "iPhone X", "1512499617640-c74ae3a79d37", 10200.0, at(1, 10, 30)),
    seed(2, 4, "Sony WH-1000XM4", "1505740420928-5e560c06d30e", 3500.0, at(2, 14, 15)),
    seed(3, 6, "Nintendo Switch", "1578662996442-48f60103fc96", 7500.0, at(3, 9, 45)),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn test_catalog_shape() {
    let catalog = products();
    assert_eq!(catalog.len(), 10);

    let ids: HashSet<u64> = catalog.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), 10);

    for p in &catalog {
      assert!(!p.images.is_empty(), "{} has no images", p.title);
      assert!((0.0..=5.0).contains(&p.rating));
      assert!(p.price >= 0.0);
    }
  }

  #[test]
  fn test_iphone_fixture() {
    let iphone = &products()[0];
    assert_eq!(iphone.id, 1);
    assert_eq!(iphone.title, "iPhone X");
    assert_eq!(iphone.price, 10200.0);
    assert_eq!(
      iphone.cover_image(),
      Some("https://images.unsplash.com/photo-1512499617640-c74ae3a79d37?w=400&h=400&fit=crop")
    );
  }

  #[test]
  fn test_seed_sales_match_catalog_snapshot() {
    let catalog = products();
    let sales = seed_sales();
    assert_eq!(sales.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2, 3]);

    for sale in &sales {
      let product = catalog.iter().find(|p| p.id == sale.product_id).unwrap();
      assert_eq!(sale.product_title, product.title);
      assert_eq!(sale.product_image.as_deref(), product.cover_image());
      assert_eq!(sale.total, sale.price * f64::from(sale.quantity));
    }
    assert_eq!(sales[0].created_at.to_rfc3339(), "2024-11-01T10:30:00+00:00");
  }
}
