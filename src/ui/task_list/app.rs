use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::config::UiConfig;
use crate::controller::Controller;
use crate::error::Result;
use crate::storage::KvStore;

use super::model::{DisplayItem, Interaction};
use super::view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    Search,
    List,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Input => Focus::Search,
            Focus::Search => Focus::List,
            Focus::List => Focus::Input,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Input => Focus::List,
            Focus::Search => Focus::Input,
            Focus::List => Focus::Search,
        }
    }
}

/// Screen area that dispatches a click to a row interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HitRegion {
    pub(crate) area: Rect,
    pub(crate) index: usize,
    pub(crate) interaction: Interaction,
}

pub struct AppState<S: KvStore> {
    pub(crate) controller: Controller<S>,
    pub(crate) input: String,
    pub(crate) search: String,
    pub(crate) focus: Focus,
    pub(crate) selected: Option<usize>,
    pub(crate) hit_regions: Vec<HitRegion>,
    pub(crate) focus_regions: Vec<(Rect, Focus)>,
    pub(crate) config: UiConfig,
    status_message: Option<String>,
}

impl<S: KvStore> AppState<S> {
    pub fn new(controller: Controller<S>, config: UiConfig) -> Self {
        let search = controller.search().to_string();
        let mut app = Self {
            controller,
            input: String::new(),
            search,
            focus: Focus::Input,
            selected: None,
            hit_regions: Vec::new(),
            focus_regions: Vec::new(),
            config,
            status_message: None,
        };
        app.reselect(Some(0));
        app
    }

    pub(crate) fn selected_item(&self) -> Option<&DisplayItem> {
        self.selected
            .and_then(|idx| self.controller.items().get(idx))
            .filter(|item| item.visible)
    }

    pub(crate) fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub(crate) fn footer_hint(&self) -> String {
        match self.focus {
            Focus::Input => "type task  enter add  tab next  esc list  ctrl-c quit".to_string(),
            Focus::Search => "type to filter  esc clear  enter list  tab next".to_string(),
            Focus::List => {
                let delete = self
                    .selected_item()
                    .map(|item| item.delete_label().to_string())
                    .unwrap_or_else(|| "delete".to_string());
                format!("j/k move  space toggle  d {delete}  / search  a add  q quit")
            }
        }
    }

    pub(crate) fn is_filtering(&self) -> bool {
        !self.controller.search().trim().is_empty()
    }

    fn set_error(&mut self, message: String) {
        tracing::warn!(%message, "task list action failed");
        self.status_message = Some(message);
    }

    fn report(&mut self, result: Result<bool>) {
        match result {
            Ok(_) => self.status_message = None,
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn submit_input(&mut self) {
        let result = self.controller.submit(&mut self.input);
        if matches!(result, Ok(true)) {
            let last = self.controller.tasks().len().saturating_sub(1);
            self.reselect(Some(last));
        }
        self.report(result);
    }

    pub(crate) fn click(&mut self, index: usize, interaction: Interaction) {
        let result = self.controller.click(index, interaction);
        self.report(result);
        self.reselect(Some(index));
    }

    fn apply_search(&mut self) {
        self.controller.search_changed(&self.search);
        self.reselect(self.selected);
    }

    /// Keep the selection on a visible row, preferring `preferred` or the
    /// first visible row after it.
    fn reselect(&mut self, preferred: Option<usize>) {
        let visible = self.controller.visible_indices();
        let preferred = preferred.unwrap_or(0);
        self.selected = visible
            .iter()
            .copied()
            .find(|idx| *idx >= preferred)
            .or_else(|| visible.last().copied());
    }

    fn move_selection(&mut self, delta: isize) {
        let visible = self.controller.visible_indices();
        if visible.is_empty() {
            self.selected = None;
            return;
        }
        let current_pos = self
            .selected
            .and_then(|idx| visible.iter().position(|candidate| *candidate == idx))
            .unwrap_or(0);
        let max = visible.len().saturating_sub(1);
        let next = (current_pos as isize + delta).clamp(0, max as isize) as usize;
        self.selected = Some(visible[next]);
    }

    /// Handle a key press; returns true when the app should quit
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return false;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => {
                match key.code {
                    KeyCode::Enter => self.submit_input(),
                    KeyCode::Esc => self.focus = Focus::List,
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Char(ch) => {
                        if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                            self.input.push(ch);
                        }
                    }
                    _ => {}
                }
                false
            }
            Focus::Search => {
                match key.code {
                    KeyCode::Enter => self.focus = Focus::List,
                    KeyCode::Esc => {
                        self.search.clear();
                        self.apply_search();
                    }
                    KeyCode::Backspace => {
                        self.search.pop();
                        self.apply_search();
                    }
                    KeyCode::Char(ch) => {
                        if !key.modifiers.contains(KeyModifiers::CONTROL) && !ch.is_control() {
                            self.search.push(ch);
                            self.apply_search();
                        }
                    }
                    _ => {}
                }
                false
            }
            Focus::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => true,
                KeyCode::Char('j') | KeyCode::Down => {
                    self.move_selection(1);
                    false
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.move_selection(-1);
                    false
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(idx) = self.selected_item().and(self.selected) {
                        self.click(idx, Interaction::ToggleComplete);
                    }
                    false
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(idx) = self.selected_item().and(self.selected) {
                        self.click(idx, Interaction::Delete);
                    }
                    false
                }
                KeyCode::Char('/') => {
                    self.focus = Focus::Search;
                    false
                }
                KeyCode::Char('a') | KeyCode::Char('i') => {
                    self.focus = Focus::Input;
                    false
                }
                _ => false,
            },
        }
    }

    /// Dispatch a mouse event through the regions recorded by the last draw;
    /// returns true when anything changed
    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return false;
        }
        let (column, row) = (mouse.column, mouse.row);

        if let Some(hit) = self
            .hit_regions
            .iter()
            .copied()
            .find(|hit| contains(hit.area, column, row))
        {
            self.focus = Focus::List;
            self.selected = Some(hit.index);
            self.click(hit.index, hit.interaction);
            return true;
        }

        if let Some(focus) = self
            .focus_regions
            .iter()
            .find(|(area, _)| contains(*area, column, row))
            .map(|(_, focus)| *focus)
        {
            self.focus = focus;
            return true;
        }
        false
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

pub fn run<S: KvStore>(controller: Controller<S>, config: UiConfig) -> Result<()> {
    let mut app = AppState::new(controller, config);
    run_terminal(&mut app)
}

fn run_terminal<S: KvStore>(app: &mut AppState<S>) -> Result<()> {
    enable_raw_mode()?;
    with_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;
            run_loop(&mut terminal, app)
        },
        restore_terminal,
    )
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    Ok(())
}

/// Run `body`, then always run `restore`; the body's error wins
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn run_loop<S: KvStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let poll = Duration::from_millis(app.config.event_poll_ms);
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(poll)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Mouse(mouse) => {
                    if app.handle_mouse(mouse) {
                        dirty = true;
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
