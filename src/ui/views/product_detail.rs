use crate::catalog::{Product, PurchaseOutcome, Storefront};
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, QuantitySelector};
use crate::ui::renderfns::{format_price, rating_stars, stock_color, stock_label};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::sync::Arc;

/// One product with quantity selection and purchase
pub struct ProductDetailView {
  store: Arc<Storefront>,
  label: String,
  query: Query<Option<Product>>,
  quantity: QuantitySelector,
  purchase: Option<PendingPurchase>,
  status: Option<String>,
}

/// A submitted purchase and the quantity it was submitted with
struct PendingPurchase {
  quantity: u32,
  query: Query<PurchaseOutcome>,
}

/// Footer text for a settled purchase
fn purchase_message(title: &str, quantity: u32, outcome: &PurchaseOutcome) -> String {
  match outcome {
    PurchaseOutcome::Recorded => format!("Purchased {} x {}", quantity, title),
    PurchaseOutcome::RecordedOffline(sale) => {
      format!("Sale #{} saved offline: {}", sale.id, format_price(sale.total))
    }
    PurchaseOutcome::ProductNotFound => "Purchase failed: product not available".to_string(),
    PurchaseOutcome::InvalidQuantity => "Purchase failed: quantity must be at least 1".to_string(),
  }
}

impl ProductDetailView {
  pub fn new(store: Arc<Storefront>, id: u64) -> Self {
    let for_query = Arc::clone(&store);
    let query = Query::new(move || {
      let store = Arc::clone(&for_query);
      async move { Ok(store.get_product_by_id(id).await) }
    });
    Self::with_query(store, format!("#{}", id), query)
  }

  /// Open from user-typed text, e.g. `:product 3`
  pub fn from_raw(store: Arc<Storefront>, raw_id: String) -> Self {
    let for_query = Arc::clone(&store);
    let label = format!("#{}", raw_id.trim());
    let query = Query::new(move || {
      let store = Arc::clone(&for_query);
      let raw_id = raw_id.clone();
      async move { Ok(store.find_product(&raw_id).await) }
    });
    Self::with_query(store, label, query)
  }

  fn with_query(store: Arc<Storefront>, label: String, mut query: Query<Option<Product>>) -> Self {
    query.fetch();
    Self {
      store,
      label,
      query,
      quantity: QuantitySelector::new(0),
      purchase: None,
      status: None,
    }
  }

  fn product(&self) -> Option<&Product> {
    self.query.data().and_then(Option::as_ref)
  }

  fn purchase_pending(&self) -> bool {
    self
      .purchase
      .as_ref()
      .is_some_and(|pending| pending.query.is_loading())
  }

  fn buy(&mut self) {
    let product_id = match self.product() {
      Some(product) => product.id,
      None => return,
    };
    if !self.quantity.is_available() || self.purchase_pending() {
      return;
    }

    let store = Arc::clone(&self.store);
    let quantity = self.quantity.value();
    let mut query = Query::new(move || {
      let store = Arc::clone(&store);
      async move { Ok(store.add_sale(product_id, quantity).await) }
    });
    query.fetch();

    self.purchase = Some(PendingPurchase { quantity, query });
    self.status = Some("Processing purchase...".to_string());
  }

  fn render_product(&self, frame: &mut Frame, area: Rect, product: &Product) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
      Line::from(Span::styled(product.title.clone(), Style::default().bold())),
      Line::from(vec![
        Span::styled(product.brand.clone(), Style::default().fg(Color::Cyan)),
        Span::styled("  ·  ", dim),
        Span::styled(product.category.clone(), Style::default().fg(Color::Cyan)),
      ]),
      Line::from(""),
      Line::from(vec![
        Span::styled(
          format_price(product.price),
          Style::default().fg(Color::Green).bold(),
        ),
        Span::raw("   "),
        Span::styled(rating_stars(product.rating), Style::default().fg(Color::Yellow)),
        Span::styled(format!(" ({:.1})", product.rating), dim),
      ]),
      Line::from(Span::styled(
        stock_label(product.stock),
        Style::default().fg(stock_color(product.stock)),
      )),
      Line::from(""),
      self.quantity.line(),
      Line::from(""),
      Line::from(product.description.clone()),
    ];

    if !product.features.is_empty() {
      lines.push(Line::from(""));
      lines.push(Line::from(Span::styled("Features", dim)));
      for feature in &product.features {
        lines.push(Line::from(format!("  • {}", feature)));
      }
    }

    if let Some(image) = product.cover_image() {
      lines.push(Line::from(""));
      lines.push(Line::from(Span::styled(image.to_string(), dim)));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
  }
}

impl View for ProductDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.product().is_some() {
      match self.quantity.handle_key(key) {
        KeyResult::Event(_) | KeyResult::Handled => return ViewAction::None,
        KeyResult::NotHandled => {}
      }
    }

    match key.code {
      KeyCode::Char('b') => self.buy(),
      KeyCode::Char('r') => {
        self.status = None;
        self.query.refetch();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let title = match self.product() {
      Some(product) => format!(" {} ", product.title),
      None if self.query.is_loading() => format!(" {} (loading...) ", self.label),
      None => format!(" {} ", self.label),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = match self.query.state() {
      QueryState::Idle | QueryState::Loading => "Loading product...",
      QueryState::Error(_) => "Product unavailable. Press 'r' to retry.",
      QueryState::Success(None) => "Product not found.",
      QueryState::Success(Some(product)) => {
        self.render_product(frame, inner, product);
        return;
      }
    };
    frame.render_widget(
      Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
  }

  fn breadcrumb_label(&self) -> String {
    self.label.clone()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      let stock = self.product().map(|p| p.stock).unwrap_or(0);
      self.quantity = QuantitySelector::new(stock);
    }

    let settled = match self.purchase.as_mut() {
      Some(pending) => pending.query.poll(),
      None => false,
    };
    if settled {
      let title = self.product().map(|p| p.title.as_str()).unwrap_or("product");
      let settled_outcome = self
        .purchase
        .as_ref()
        .map(|pending| (pending.quantity, pending.query.state()));
      let message = match settled_outcome {
        Some((quantity, QueryState::Success(outcome))) => purchase_message(title, quantity, outcome),
        _ => "Purchase interrupted".to_string(),
      };
      tracing::info!(product = %self.label, %message, "purchase settled");
      self.status = Some(message);
    }
  }

  fn status(&self) -> Option<String> {
    self.status.clone()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("+/-", "quantity").with_priority(20),
      ShortcutInfo::new("b", "buy").with_priority(30),
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{fallback, Sale};
  use crate::ui::views::testing::{offline_store, tick_until};
  use chrono::Utc;
  use crossterm::event::KeyModifiers;

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  #[test]
  fn test_recorded_message_uses_submitted_quantity() {
    let message = purchase_message("iPhone X", 2, &PurchaseOutcome::Recorded);
    assert_eq!(message, "Purchased 2 x iPhone X");
  }

  #[test]
  fn test_failure_messages() {
    assert_eq!(
      purchase_message("iPhone X", 1, &PurchaseOutcome::ProductNotFound),
      "Purchase failed: product not available"
    );
    assert_eq!(
      purchase_message("iPhone X", 0, &PurchaseOutcome::InvalidQuantity),
      "Purchase failed: quantity must be at least 1"
    );
  }

  #[test]
  fn test_offline_message_shows_sale_total() {
    let sale = Sale::snapshot(4, &fallback::products()[0], 2, Utc::now());
    let message = purchase_message("iPhone X", 2, &PurchaseOutcome::RecordedOffline(sale));
    assert_eq!(message, "Sale #4 saved offline: $20,400.00");
  }

  #[tokio::test]
  async fn test_quantity_changes_after_buy_do_not_touch_submitted_quantity() {
    let mut view = ProductDetailView::new(offline_store(), 1);
    tick_until(&mut view, |v| v.product().is_some()).await;

    view.handle_key(key('+'));
    view.handle_key(key('b'));
    view.handle_key(key('+'));
    assert_eq!(view.quantity.value(), 3);
    assert_eq!(view.purchase.as_ref().map(|p| p.quantity), Some(2));

    tick_until(&mut view, |v| !v.purchase_pending()).await;
    let status = view.status().unwrap_or_default();
    assert!(status.starts_with("Sale #4 saved offline"), "{}", status);
  }
}
