use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

/// Purchase quantity, kept within [1, stock].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantitySelector {
  value: u32,
  stock: u32,
}

impl QuantitySelector {
  pub fn new(stock: u32) -> Self {
    Self { value: 1, stock }
  }

  pub fn value(&self) -> u32 {
    self.value
  }

  /// Nothing can be bought when the product is sold out.
  pub fn is_available(&self) -> bool {
    self.stock > 0
  }

  pub fn increment(&mut self) -> bool {
    if self.value < self.stock {
      self.value += 1;
      true
    } else {
      false
    }
  }

  pub fn decrement(&mut self) -> bool {
    if self.value > 1 {
      self.value -= 1;
      true
    } else {
      false
    }
  }

  /// `+`/`-` adjust the value; emits the new value when it changed.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<u32> {
    let changed = match key.code {
      KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => self.increment(),
      KeyCode::Char('-') | KeyCode::Left => self.decrement(),
      _ => return KeyResult::NotHandled,
    };
    if changed {
      KeyResult::Event(self.value)
    } else {
      KeyResult::Handled
    }
  }

  pub fn line(&self) -> Line<'static> {
    if !self.is_available() {
      return Line::from(Span::styled("Sold out", Style::default().fg(Color::Red)));
    }
    let dim = Style::default().fg(Color::DarkGray);
    Line::from(vec![
      Span::styled("Quantity: ", dim),
      Span::styled("[-] ", Style::default().fg(Color::Cyan)),
      Span::styled(self.value.to_string(), Style::default().bold()),
      Span::styled(" [+]", Style::default().fg(Color::Cyan)),
      Span::styled(format!("  of {}", self.stock), dim),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  #[test]
  fn test_starts_at_one() {
    let quantity = QuantitySelector::new(15);
    assert_eq!(quantity.value(), 1);
    assert!(quantity.is_available());
  }

  #[test]
  fn test_clamped_to_stock() {
    let mut quantity = QuantitySelector::new(2);
    assert_eq!(quantity.handle_key(key('+')), KeyResult::Event(2));
    assert_eq!(quantity.handle_key(key('+')), KeyResult::Handled);
    assert_eq!(quantity.value(), 2);
  }

  #[test]
  fn test_never_below_one() {
    let mut quantity = QuantitySelector::new(5);
    assert_eq!(quantity.handle_key(key('-')), KeyResult::Handled);
    assert_eq!(quantity.value(), 1);
  }

  #[test]
  fn test_sold_out() {
    let mut quantity = QuantitySelector::new(0);
    assert!(!quantity.is_available());
    assert!(!quantity.increment());
    assert_eq!(quantity.value(), 1);
  }

  #[test]
  fn test_other_keys_pass_through() {
    let mut quantity = QuantitySelector::new(5);
    assert_eq!(quantity.handle_key(key('b')), KeyResult::NotHandled);
  }
}
