use crate::catalog::Storefront;
use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::renderfns::{draw_footer, draw_header};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{CatalogView, ProductDetailView, SaleDetailView, SalesView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// `:` prompt, drawn over whatever view is on top
  command: CommandInput,

  /// Feedback from the last command, cleared on the next key
  message: Option<String>,

  config: Config,
  api_url: String,
  store: Arc<Storefront>,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, store: Arc<Storefront>) -> Self {
    let api_url = config.api.base_url();
    let root: Box<dyn View> = Box::new(CatalogView::new(Arc::clone(&store)));

    Self {
      view_stack: vec![root],
      command: CommandInput::new(),
      message: None,
      config,
      api_url,
      store,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }

    tracing::info!("exiting");
    Ok(())
  }

  fn tick(&mut self) {
    // Views below the top keep loading so going back shows fresh data
    for view in &mut self.view_stack {
      view.tick();
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let view_has_focus = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());

    if !view_has_focus {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute_command(&line);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    self.message = None;

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => return,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => {
        tracing::debug!(view = %view.breadcrumb_label(), "push view");
        self.view_stack.push(view);
      }
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
          if let Some(view) = self.view_stack.last_mut() {
            view.on_resume();
          }
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, line: &str) {
    let invocation = match commands::parse(line) {
      Some(invocation) => invocation,
      None => {
        self.message = Some(format!("Unknown command: {}", line));
        return;
      }
    };
    tracing::debug!(command = invocation.name, arg = ?invocation.arg, "command");

    match invocation.name {
      "products" => self.reset_root(Box::new(CatalogView::new(Arc::clone(&self.store)))),
      "sales" => self.reset_root(Box::new(SalesView::new(Arc::clone(&self.store)))),
      "product" => match invocation.arg {
        Some(raw_id) => self.view_stack.push(Box::new(ProductDetailView::from_raw(
          Arc::clone(&self.store),
          raw_id,
        ))),
        None => self.message = Some("Usage: product <id>".to_string()),
      },
      "sale" => match invocation.arg {
        Some(raw_id) => self.view_stack.push(Box::new(SaleDetailView::from_raw(
          Arc::clone(&self.store),
          raw_id,
        ))),
        None => self.message = Some("Usage: sale <id>".to_string()),
      },
      "quit" => self.should_quit = true,
      _ => {}
    }
  }

  /// Replace the root view and drop everything above it
  fn reset_root(&mut self, root: Box<dyn View>) {
    self.view_stack.clear();
    self.view_stack.push(root);
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // View
        Constraint::Length(1), // Footer
      ])
      .split(frame.area());

    let offline = self
      .store
      .catalog_origin()
      .is_some_and(|origin| origin.is_fallback());
    let shortcuts = self
      .view_stack
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default();

    draw_header(
      frame,
      chunks[0],
      &self.api_url,
      self.config.title.as_deref(),
      offline,
      &shortcuts,
    );

    if let Some(view) = self.view_stack.last_mut() {
      view.render(frame, chunks[1]);
    }
    self.command.render_overlay(frame, chunks[1]);

    let breadcrumb: Vec<String> = self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect();
    let status = self
      .message
      .clone()
      .or_else(|| self.view_stack.last().and_then(|view| view.status()));

    draw_footer(frame, chunks[2], &breadcrumb, status.as_deref());
  }
}
