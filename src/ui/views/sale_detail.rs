use crate::catalog::{Sale, Storefront};
use crate::query::{Query, QueryState};
use crate::ui::renderfns::{format_date, format_price};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ProductDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::sync::Arc;

/// One recorded sale, as stored at purchase time
pub struct SaleDetailView {
  store: Arc<Storefront>,
  label: String,
  query: Query<Option<Sale>>,
}

impl SaleDetailView {
  pub fn new(store: Arc<Storefront>, id: u64) -> Self {
    let for_query = Arc::clone(&store);
    let query = Query::new(move || {
      let store = Arc::clone(&for_query);
      async move { Ok(store.get_sale(id).await) }
    });
    Self::with_query(store, format!("Sale #{}", id), query)
  }

  /// Open from user-typed text, e.g. `:sale 2`
  pub fn from_raw(store: Arc<Storefront>, raw_id: String) -> Self {
    let for_query = Arc::clone(&store);
    let label = format!("Sale #{}", raw_id.trim());
    let query = Query::new(move || {
      let store = Arc::clone(&for_query);
      let raw_id = raw_id.clone();
      async move { Ok(store.find_sale(&raw_id).await) }
    });
    Self::with_query(store, label, query)
  }

  fn with_query(store: Arc<Storefront>, label: String, mut query: Query<Option<Sale>>) -> Self {
    query.fetch();
    Self {
      store,
      label,
      query,
    }
  }

  fn sale(&self) -> Option<&Sale> {
    self.query.data().and_then(Option::as_ref)
  }
}

fn sale_lines(sale: &Sale) -> Vec<Line<'static>> {
  let dim = Style::default().fg(Color::DarkGray);
  let field = |name: &'static str, value: Span<'static>| {
    Line::from(vec![Span::styled(format!("{:<10}", name), dim), value])
  };

  let mut lines = vec![
    Line::from(Span::styled(sale.product_title.clone(), Style::default().bold())),
    Line::from(""),
    field(
      "Date",
      Span::styled(format_date(&sale.created_at), Style::default().fg(Color::Cyan)),
    ),
    field("Product", Span::raw(format!("#{}", sale.product_id))),
    field("Price", Span::raw(format_price(sale.price))),
    field("Quantity", Span::raw(sale.quantity.to_string())),
    field(
      "Total",
      Span::styled(format_price(sale.total), Style::default().fg(Color::Green).bold()),
    ),
    field(
      "Status",
      Span::styled(sale.status.label(), Style::default().fg(Color::Green)),
    ),
  ];

  if let Some(image) = &sale.product_image {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(image.clone(), dim)));
  }
  lines
}

impl View for SaleDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Enter | KeyCode::Char('p') => {
        if let Some(sale) = self.sale() {
          return ViewAction::Push(Box::new(ProductDetailView::new(
            Arc::clone(&self.store),
            sale.product_id,
          )));
        }
      }
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.label))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = match self.query.state() {
      QueryState::Idle | QueryState::Loading => "Loading sale...",
      QueryState::Error(_) => "Sale unavailable. Press 'r' to retry.",
      QueryState::Success(None) => "Sale not found.",
      QueryState::Success(Some(sale)) => {
        frame.render_widget(
          Paragraph::new(sale_lines(sale)).wrap(Wrap { trim: false }),
          inner,
        );
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
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("p", "product").with_priority(20),
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
