use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Footer bar: view breadcrumb on the left, status message on the right
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String], status: Option<&str>) {
  let mut spans = vec![Span::raw(" ")];
  let last = breadcrumb.len().saturating_sub(1);

  for (i, part) in breadcrumb.iter().enumerate() {
    if i > 0 {
      spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
    }

    let style = if i == last {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::White)
    };

    spans.push(Span::styled(part.clone(), style));
  }

  let background = Style::default().bg(Color::Black);
  frame.render_widget(Paragraph::new(Line::from(spans)).style(background), area);

  if let Some(status) = status {
    let message = Paragraph::new(format!("{} ", status))
      .style(Style::default().fg(Color::Yellow))
      .alignment(Alignment::Right);
    frame.render_widget(message, area);
  }
}
