use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single-line text input. The cursor counts chars, not bytes, so
/// product names like "Café" edit correctly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  pub fn cursor_position(&self) -> usize {
    self.cursor
  }

  /// Prompt line with the cursor drawn where edits will land: the char
  /// under it is highlighted, or a `_` when it sits past the end.
  pub fn line(&self, prompt: &'static str) -> Line<'_> {
    let accent = Style::default().fg(Color::Yellow);
    let (before, after) = self.buffer.split_at(self.byte_index(self.cursor_position()));
    let mut rest = after.chars();
    let cursor = match rest.next() {
      Some(c) => Span::styled(c.to_string(), accent.add_modifier(Modifier::REVERSED)),
      None => Span::styled("_", accent),
    };

    Line::from(vec![
      Span::styled(prompt, accent),
      Span::raw(before),
      cursor,
      Span::raw(rest.as_str()),
    ])
  }

  fn char_len(&self) -> usize {
    self.buffer.chars().count()
  }

  fn byte_index(&self, char_pos: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(char_pos)
      .map(|(i, _)| i)
      .unwrap_or(self.buffer.len())
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let at = self.byte_index(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.char_len() {
          let at = self.byte_index(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Consumed
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.char_len());
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.char_len();
        InputResult::Consumed
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.char_len();
        InputResult::Consumed
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_index(self.cursor);
        self.buffer.drain(..at);
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        let end = self.byte_index(self.cursor);
        let start = self.buffer[..end]
          .trim_end()
          .rfind(' ')
          .map(|i| i + 1)
          .unwrap_or(0);
        self.buffer.drain(start..end);
        self.cursor = self.buffer[..start].chars().count();
        InputResult::Consumed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
  }

  fn typed(text: &str) -> TextInput {
    let mut input = TextInput::new();
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    input
  }

  #[test]
  fn test_submit_returns_buffer() {
    let mut input = typed("laptop");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      InputResult::Submitted("laptop".to_string())
    );
  }

  #[test]
  fn test_cancel() {
    let mut input = typed("x");
    assert_eq!(input.handle_key(key(KeyCode::Esc)), InputResult::Cancelled);
  }

  #[test]
  fn test_insert_in_middle() {
    let mut input = typed("ac");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('b')));
    assert_eq!(input.value(), "abc");
    assert_eq!(input.cursor_position(), 2);
  }

  fn rendered(input: &TextInput) -> Vec<String> {
    input
      .line("/")
      .spans
      .iter()
      .map(|span| span.content.to_string())
      .collect()
  }

  #[test]
  fn test_line_draws_cursor_where_it_is() {
    let mut input = typed("añejo");
    assert_eq!(rendered(&input), ["/", "añejo", "_", ""]);

    input.handle_key(key(KeyCode::Home));
    input.handle_key(key(KeyCode::Right));
    assert_eq!(rendered(&input), ["/", "a", "ñ", "ejo"]);
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = typed("café");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "caf");

    let mut input = typed("añejo");
    input.handle_key(key(KeyCode::Home));
    input.handle_key(key(KeyCode::Right));
    input.handle_key(key(KeyCode::Delete));
    assert_eq!(input.value(), "aejo");
  }

  #[test]
  fn test_ctrl_u_clear_before_cursor() {
    let mut input = typed("sony headphones");
    for _ in 0.."headphones".len() {
      input.handle_key(key(KeyCode::Left));
    }
    input.handle_key(ctrl_key(KeyCode::Char('u')));
    assert_eq!(input.value(), "headphones");
    assert_eq!(input.cursor_position(), 0);
  }

  #[test]
  fn test_ctrl_w_deletes_word() {
    let mut input = typed("nintendo switch");
    input.handle_key(ctrl_key(KeyCode::Char('w')));
    assert_eq!(input.value(), "nintendo ");
    assert_eq!(input.cursor_position(), 9);
  }

  #[test]
  fn test_other_ctrl_chars_not_inserted() {
    let mut input = TextInput::new();
    assert_eq!(
      input.handle_key(ctrl_key(KeyCode::Char('c'))),
      InputResult::NotHandled
    );
    assert!(input.is_empty());
  }
}
