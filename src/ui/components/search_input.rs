use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Enter pressed with a non-blank query
  Submitted(String),
  /// Search closed without a query
  Cancelled,
}

/// `/` search prompt
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
  }

  fn close(&mut self) {
    self.active = false;
    self.input.clear();
  }

  /// Call regardless of active state; `/` activates the prompt.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(query) => {
        self.close();
        let query = query.trim();
        if query.is_empty() {
          KeyResult::Event(SearchEvent::Cancelled)
        } else {
          KeyResult::Event(SearchEvent::Submitted(query.to_string()))
        }
      }
      InputResult::Cancelled => {
        self.close();
        KeyResult::Event(SearchEvent::Cancelled)
      }
      // Swallow everything else while the prompt is open
      InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3.min(area.height));

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search products ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    frame.render_widget(Paragraph::new(self.input.line("/")), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_ignores_keys() {
    let mut search = SearchInput::new();
    assert_eq!(search.handle_key(key(KeyCode::Char('j'))), KeyResult::NotHandled);
    assert!(!search.is_active());
  }

  #[test]
  fn test_submit_trims_query() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')));
    for c in " sony ".chars() {
      search.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Submitted("sony".to_string()))
    );
    assert!(!search.is_active());
    assert_eq!(search.query(), "");
  }

  #[test]
  fn test_blank_submit_cancels() {
    let mut search = SearchInput::new();
    search.handle_key(key(KeyCode::Char('/')));
    search.handle_key(key(KeyCode::Char(' ')));
    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Cancelled)
    );
  }

  #[test]
  fn test_active_swallows_navigation() {
    let mut search = SearchInput::new();
    search.activate();
    assert_eq!(search.handle_key(key(KeyCode::Tab)), KeyResult::Handled);
    assert!(search.is_active());
  }
}
