use crate::catalog::{Product, Storefront};
use crate::query::{Query, QueryState};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::renderfns::{draw_product_list, truncate};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ProductDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use std::sync::Arc;

/// Where a result list comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsSource {
  Search(String),
  Category(String),
}

impl ResultsSource {
  fn label(&self) -> String {
    match self {
      ResultsSource::Search(query) => format!("\"{}\"", truncate(query, 24)),
      ResultsSource::Category(category) => truncate(category, 24),
    }
  }
}

/// Products matching a search query or belonging to one category
pub struct ProductResultsView {
  store: Arc<Storefront>,
  source: ResultsSource,
  query: Query<Vec<Product>>,
  list_state: ListState,
  search: SearchInput,
}

impl ProductResultsView {
  pub fn search(store: Arc<Storefront>, query: String) -> Self {
    Self::new(store, ResultsSource::Search(query))
  }

  pub fn category(store: Arc<Storefront>, category: String) -> Self {
    Self::new(store, ResultsSource::Category(category))
  }

  fn new(store: Arc<Storefront>, source: ResultsSource) -> Self {
    let for_query = Arc::clone(&store);
    let fetch_source = source.clone();
    let mut query = Query::new(move || {
      let store = Arc::clone(&for_query);
      let source = fetch_source.clone();
      async move {
        Ok(match source {
          ResultsSource::Search(q) => store.search_products(&q).await,
          ResultsSource::Category(c) => store.get_products_by_category(&c).await,
        })
      }
    });
    query.fetch();

    Self {
      store,
      source,
      query,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  fn products(&self) -> &[Product] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }
}

impl View for ProductResultsView {
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
        let selected = self.list_state.selected();
        if let Some(product) = selected.and_then(|idx| self.products().get(idx)) {
          return ViewAction::Push(Box::new(ProductDetailView::new(
            Arc::clone(&self.store),
            product.id,
          )));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let label = self.source.label();
    let (title, empty) = match self.query.state() {
      QueryState::Idle | QueryState::Loading => (format!(" {} (loading...) ", label), None),
      QueryState::Error(_) => (
        format!(" {} ", label),
        Some("Results unavailable. Press 'r' to retry."),
      ),
      QueryState::Success(products) => (
        format!(" {} ({}) ", label, products.len()),
        Some(match self.source {
          ResultsSource::Search(_) => "No products match this search.",
          ResultsSource::Category(_) => "No products in this category.",
        }),
      ),
    };

    let products = self.products().to_vec();
    draw_product_list(frame, area, title, &products, &mut self.list_state, empty);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match &self.source {
      ResultsSource::Search(_) => format!("Search {}", self.source.label()),
      ResultsSource::Category(_) => format!("Category {}", self.source.label()),
    }
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
      ShortcutInfo::new("r", "reload").with_priority(40),
      ShortcutInfo::new("q", "back").with_priority(90),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_source_labels() {
    assert_eq!(
      ResultsSource::Search("sony".to_string()).label(),
      "\"sony\""
    );
    assert_eq!(
      ResultsSource::Category("Electrónicos".to_string()).label(),
      "Electrónicos"
    );
  }
}
