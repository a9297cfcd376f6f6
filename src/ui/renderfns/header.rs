use crate::ui::view::ShortcutInfo;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Header bar: app name, API host, optional title, offline badge and the
/// active view's shortcuts.
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  api_url: &str,
  title: Option<&str>,
  offline: bool,
  shortcuts: &[ShortcutInfo],
) {
  let separator = Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(" bazar ", Style::default().fg(Color::Cyan).bold()),
    separator.clone(),
    Span::styled(
      format!(" {} ", extract_domain(api_url)),
      Style::default().fg(Color::White),
    ),
  ];

  if let Some(title) = title {
    spans.push(separator.clone());
    spans.push(Span::styled(
      format!(" {} ", title),
      Style::default().fg(Color::Yellow).bold(),
    ));
  }

  if offline {
    spans.push(separator);
    spans.push(Span::styled(
      " offline catalog ",
      Style::default().fg(Color::Black).bg(Color::Yellow),
    ));
  }

  spans.push(Span::raw("  "));

  let mut shortcuts = shortcuts.to_vec();
  shortcuts.sort_by_key(|s| s.priority);
  for (i, shortcut) in shortcuts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Host (and port) part of the API base URL
fn extract_domain(url: &str) -> &str {
  let rest = url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url);
  rest.split('/').next().unwrap_or(rest)
}
