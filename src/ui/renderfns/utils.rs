use chrono::{DateTime, Local, Utc};
use ratatui::prelude::Color;

/// Truncate to at most `max_len` chars, ending in "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    return s.to_string();
  }
  let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
  format!("{}...", kept)
}

/// "$10,200.00"
pub fn format_price(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = (cents / 100).to_string();

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, digit) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Five-slot star bar; a fractional rating shows a half star.
pub fn rating_stars(rating: f64) -> String {
  let rating = rating.clamp(0.0, 5.0);
  let full = rating.floor() as usize;
  let half = usize::from(rating.fract() > 0.0);
  let empty = 5 - full - half;
  format!("{}{}{}", "★".repeat(full), "½".repeat(half), "☆".repeat(empty))
}

pub fn stock_color(stock: u32) -> Color {
  match stock {
    0 => Color::Red,
    1..=5 => Color::Yellow,
    _ => Color::Green,
  }
}

pub fn stock_label(stock: u32) -> String {
  if stock == 0 {
    "sold out".to_string()
  } else {
    format!("{} in stock", stock)
  }
}

/// Sale timestamps are stored in UTC and shown in local time
pub fn format_date(at: &DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("iPad Air", 10), "iPad Air");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("Sony WH-1000XM4", 8), "Sony ...");
  }

  #[test]
  fn test_truncate_multibyte() {
    assert_eq!(truncate("Cámara réflex digital", 9), "Cámara...");
  }

  #[test]
  fn test_format_price() {
    assert_eq!(format_price(5100.0), "$5,100.00");
    assert_eq!(format_price(20400.0), "$20,400.00");
    assert_eq!(format_price(999.5), "$999.50");
    assert_eq!(format_price(0.0), "$0.00");
    assert_eq!(format_price(1234567.891), "$1,234,567.89");
  }

  #[test]
  fn test_rating_stars() {
    assert_eq!(rating_stars(4.0), "★★★★☆");
    assert_eq!(rating_stars(4.5), "★★★★½");
    assert_eq!(rating_stars(0.0), "☆☆☆☆☆");
    assert_eq!(rating_stars(7.0), "★★★★★");
  }

  #[test]
  fn test_stock_color() {
    assert_eq!(stock_color(0), Color::Red);
    assert_eq!(stock_color(3), Color::Yellow);
    assert_eq!(stock_color(25), Color::Green);
  }
}
