use crate::catalog::{Sale, SalesStats, Storefront};
use crate::query::{Query, QueryState};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{format_date, format_price, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::SaleDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::sync::Arc;

/// Purchase history with aggregate stats on top
pub struct SalesView {
  store: Arc<Storefront>,
  sales: Query<Arc<Vec<Sale>>>,
  stats: Query<SalesStats>,
  list_state: ListState,
}

impl SalesView {
  pub fn new(store: Arc<Storefront>) -> Self {
    let for_sales = Arc::clone(&store);
    let mut sales = Query::new(move || {
      let store = Arc::clone(&for_sales);
      async move { Ok(store.get_sales().await) }
    });
    let for_stats = Arc::clone(&store);
    let mut stats = Query::new(move || {
      let store = Arc::clone(&for_stats);
      async move { Ok(store.get_sales_stats().await) }
    });
    sales.fetch();
    stats.fetch();

    Self {
      store,
      sales,
      stats,
      list_state: ListState::default(),
    }
  }

  fn rows(&self) -> &[Sale] {
    self.sales.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn render_stats(&self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(" Summary ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let dim = Style::default().fg(Color::DarkGray);
    let line = match self.stats.data() {
      Some(stats) => Line::from(vec![
        Span::styled("Sales ", dim),
        Span::styled(stats.total_sales.to_string(), Style::default().bold()),
        Span::styled("    Items ", dim),
        Span::styled(stats.total_items.to_string(), Style::default().bold()),
        Span::styled("    Revenue ", dim),
        Span::styled(
          format_price(stats.total_amount),
          Style::default().fg(Color::Green).bold(),
        ),
      ]),
      None if self.stats.is_loading() => Line::from(Span::styled("Loading...", dim)),
      None => Line::from(Span::styled("Stats unavailable", dim)),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.rows().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.sales.state() {
      QueryState::Idle | QueryState::Loading => " Sales (loading...) ".to_string(),
      _ => format!(" Sales ({}) ", len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 && !self.sales.is_loading() {
      let content = if self.sales.is_error() {
        "Sales unavailable. Press 'r' to retry."
      } else {
        "No purchases yet."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .rows()
      .iter()
      .map(|sale| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("#{:<5}", sale.id),
            Style::default().fg(Color::DarkGray),
          ),
          Span::styled(
            format!("{:<18}", format_date(&sale.created_at)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(format!("{:<30}", truncate(&sale.product_title, 30))),
          Span::raw(format!("{:>4} x ", sale.quantity)),
          Span::styled(
            format!("{:>14}", format_price(sale.total)),
            Style::default().fg(Color::Green),
          ),
          Span::raw("  "),
          Span::styled(sale.status.label(), Style::default().fg(Color::Green)),
        ]))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for SalesView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => {
        self.sales.refetch();
        self.stats.refetch();
      }
      KeyCode::Enter => {
        let selected = self.list_state.selected();
        if let Some(sale) = selected.and_then(|idx| self.rows().get(idx)) {
          return ViewAction::Push(Box::new(SaleDetailView::new(
            Arc::clone(&self.store),
            sale.id,
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(3), Constraint::Min(1)])
      .split(area);

    self.render_stats(frame, chunks[0]);
    self.render_list(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    "Sales".to_string()
  }

  fn tick(&mut self) {
    self.sales.poll();
    self.stats.poll();
  }

  /// A purchase may have happened in a view above this one
  fn on_resume(&mut self) {
    self.sales.refetch();
    self.stats.refetch();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("enter", "sale").with_priority(20),
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}
