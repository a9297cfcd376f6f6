use super::utils::{format_price, stock_color, truncate};
use crate::catalog::Product;
use crate::ui::ensure_valid_selection;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Bordered product table shared by the catalog, search and category views.
/// `empty_message` is shown instead of the list when there is nothing to show.
pub fn draw_product_list(
  frame: &mut Frame,
  area: Rect,
  title: String,
  products: &[Product],
  list_state: &mut ListState,
  empty_message: Option<&str>,
) {
  ensure_valid_selection(list_state, products.len());

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if let Some(message) = empty_message.filter(|_| products.is_empty()) {
    let paragraph = Paragraph::new(message)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = products
    .iter()
    .map(|product| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:>4}", product.id),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::raw(format!("{:<34}", truncate(&product.title, 34))),
        Span::styled(
          format!("{:>14}", format_price(product.price)),
          Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
          format!("{:<16}", truncate(&product.category, 16)),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(
          format!("{:>4}", product.stock),
          Style::default().fg(stock_color(product.stock)),
        ),
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

  frame.render_stateful_widget(list, area, list_state);
}
