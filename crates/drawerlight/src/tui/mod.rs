//! Terminal front end.
//!
//! A single-threaded loop: draw, block on the next terminal event, apply it
//! to the [`App`]. Operations that hold the serial line for a while (connecting
//! and the LED test) first redraw with a busy line so the screen does not
//! look frozen.

mod dialog;
mod ui;

use ratatui::{
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use tracing::{debug, info};
use tui_textarea::TextArea;

use crate::app::{App, Direction, Notice};
use crate::error::Result;
use crate::link::DeviceLink;

pub use dialog::{AddForm, Dialog, DialogAction};

/// Work that blocks the loop and gets a busy line drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blocking {
    Connect,
    ToggleConnection,
    TestAll,
}

impl Blocking {
    fn label(self) -> &'static str {
        match self {
            Self::Connect | Self::ToggleConnection => "Connecting...",
            Self::TestAll => "Testing LEDs...",
        }
    }
}

/// Run the terminal interface until the user quits.
///
/// The terminal is restored before returning, also on error. The [`App`] is
/// handed back so the caller can switch the LEDs off and close the link.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to or read from.
pub fn run<L: DeviceLink>(app: App<L>, auto_connect: bool) -> Result<App<L>> {
    let mut terminal = ratatui::try_init()?;
    let mut tui = Tui::new(app);
    let result = tui.run(&mut terminal, auto_connect);
    ratatui::restore();
    result.map(|()| tui.into_app())
}

/// Terminal state around an [`App`].
#[derive(Debug)]
pub struct Tui<L: DeviceLink> {
    app: App<L>,
    search: TextArea<'static>,
    dialog: Option<Dialog>,
    busy: Option<&'static str>,
    running: bool,
}

impl<L: DeviceLink> Tui<L> {
    /// Wrap `app` with an empty search box and no dialog.
    pub fn new(app: App<L>) -> Self {
        Self {
            app,
            search: ui::search_box(),
            dialog: None,
            busy: None,
            running: true,
        }
    }

    /// The wrapped application.
    pub fn app(&self) -> &App<L> {
        &self.app
    }

    /// The open dialog, if any.
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    /// Whether the loop should keep going.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Unwrap the application.
    pub fn into_app(self) -> App<L> {
        self.app
    }

    fn run(&mut self, terminal: &mut DefaultTerminal, auto_connect: bool) -> Result<()> {
        if auto_connect {
            self.run_blocking(terminal, Blocking::Connect)?;
        }

        while self.running {
            terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(work) = self.handle_key_event(key) {
                        self.run_blocking(terminal, work)?;
                    }
                }
                _ => {}
            }
        }
        info!("Leaving terminal interface");
        Ok(())
    }

    fn run_blocking(&mut self, terminal: &mut DefaultTerminal, work: Blocking) -> Result<()> {
        self.busy = Some(work.label());
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        self.perform(work);
        self.busy = None;
        Ok(())
    }

    fn perform(&mut self, work: Blocking) {
        let outcome = match work {
            Blocking::Connect => self.app.connect().map(|_| ()),
            Blocking::ToggleConnection => self.app.toggle_connection().map(|change| {
                debug!("Connection toggled: {change:?}");
            }),
            Blocking::TestAll => self.app.test_all().map(|_| ()),
        };
        if let Err(notice) = outcome {
            self.show(notice);
        }
    }

    fn show(&mut self, notice: Notice) {
        self.dialog = Some(Dialog::Notice(notice));
    }

    /// Apply a key press.
    ///
    /// Returns the blocking work the key asks for, which the loop performs
    /// after drawing a busy line.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Blocking> {
        if let Some(dialog) = self.dialog.as_mut() {
            let action = dialog.process_event(key);
            self.apply_dialog_action(action);
            return None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q' | 'c') if ctrl => self.running = false,
            KeyCode::Char('l') if ctrl => self.app.show_all(),
            KeyCode::Char('n') if ctrl => self.dialog = Some(Dialog::Add(AddForm::default())),
            KeyCode::Char('d') if ctrl => self.request_delete(),
            KeyCode::Char('t') if ctrl => return Some(Blocking::TestAll),
            KeyCode::Char('o') if ctrl => return Some(Blocking::ToggleConnection),
            KeyCode::Up => self.app.move_selection(Direction::Up),
            KeyCode::Down => self.app.move_selection(Direction::Down),
            KeyCode::Esc => {
                self.search = ui::search_box();
                self.app.clear_search();
            }
            // Single-line box.
            KeyCode::Enter => {}
            KeyCode::Char('m' | 'j') if ctrl => {}
            _ => {
                if self.search.input(key) {
                    let query = self.search.lines().first().cloned().unwrap_or_default();
                    if query != self.app.query() {
                        self.app.set_query(&query);
                    }
                }
            }
        }
        None
    }

    fn request_delete(&mut self) {
        match self.app.delete_candidate() {
            Ok(component) => {
                self.dialog = Some(Dialog::ConfirmDelete {
                    component,
                    yes: false,
                });
            }
            Err(notice) => self.show(notice),
        }
    }

    fn apply_dialog_action(&mut self, action: DialogAction) {
        match action {
            DialogAction::Keep => {}
            DialogAction::Close => self.dialog = None,
            DialogAction::Add { name, drawer } => match self.app.add_component(&name, &drawer) {
                Ok(component) => {
                    debug!("Added {} from the interface", component.name);
                    self.dialog = None;
                }
                Err(notice) => {
                    if let Some(Dialog::Add(form)) = self.dialog.as_mut() {
                        form.set_error(notice.message);
                    }
                }
            },
            DialogAction::Delete(component) => {
                self.dialog = None;
                if let Err(notice) = self.app.delete_component(&component) {
                    self.show(notice);
                }
            }
        }
    }
}
