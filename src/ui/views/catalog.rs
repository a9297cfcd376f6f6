use crate::catalog::{Product, Storefront};
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::draw_product_list;
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::{ProductDetailView, ProductResultsView};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::sync::Arc;

/// Root view: the full catalog.
pub struct CatalogView {
  store: Arc<Storefront>,
  query: Query<Arc<Vec<Product>>>,
  list_state: ListState,
  search: SearchInput,
}

impl CatalogView {
  pub fn new(store: Arc<Storefront>) -> Self {
    let for_query = Arc::clone(&store);
    let mut query = Query::new(move || {
      let store = Arc::clone(&for_query);
      async move { Ok(store.get_products().await) }
    });
    query.fetch();

    Self {
      store,
      query,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  fn products(&self) -> &[Product] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn selected(&self) -> Option<&Product> {
    self
      .list_state
      .selected()
      .and_then(|idx| self.products().get(idx))
  }
}

impl View for CatalogView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Submitted(query)) => {
        return ViewAction::Push(Box::new(ProductResultsView::search(
          Arc::clone(&self.store),
          query,
        )));
      }
      KeyResult::Event(SearchEvent::Cancelled) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(product) = self.selected() {
          return ViewAction::Push(Box::new(ProductDetailView::new(
            Arc::clone(&self.store),
            product.id,
          )));
        }
      }
      KeyCode::Char('c') => {
        if let Some(product) = self.selected() {
          return ViewAction::Push(Box::new(ProductResultsView::category(
            Arc::clone(&self.store),
            product.category.clone(),
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let (title, empty) = match self.query.state() {
      QueryState::Idle | QueryState::Loading => (" Catalog (loading...) ".to_string(), None),
      QueryState::Error(_) => (
        " Catalog ".to_string(),
        Some("Catalog unavailable. Press 'r' to retry."),
      ),
      QueryState::Success(products) => (
        format!(" Catalog ({}) ", products.len()),
        Some("The catalog is empty."),
      ),
    };

    let products = self.query.data().cloned().unwrap_or_default();
    draw_product_list(frame, area, title, &products, &mut self.list_state, empty);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Catalog".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("c", "category").with_priority(30),
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ]
  }
}
