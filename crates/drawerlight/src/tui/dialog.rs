//! Modal dialogs: notices, delete confirmation and the add form.

use ratatui::{
    buffer::Buffer,
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};
use tui_textarea::{CursorMove, TextArea};

use crate::app::{Notice, NoticeLevel};
use crate::component::Component;

/// A dialog on top of the main screen. Only one is shown at a time.
#[derive(Debug)]
pub enum Dialog {
    /// A message to acknowledge.
    Notice(Notice),
    /// Yes/no prompt before deleting a component.
    ConfirmDelete {
        /// The component to delete.
        component: Component,
        /// Whether "Yes" is highlighted.
        yes: bool,
    },
    /// Name and drawer form for a new component.
    Add(AddForm),
}

/// What the dialog asks the application to do after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum DialogAction {
    /// Keep the dialog open.
    Keep,
    /// Close the dialog without doing anything.
    Close,
    /// Add a component with this name and drawer.
    Add {
        /// Entered name.
        name: String,
        /// Entered drawer.
        drawer: String,
    },
    /// Delete the confirmed component.
    Delete(Component),
}

/// Which field of the add form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddField {
    Name,
    Drawer,
}

/// The add-component form.
#[derive(Debug)]
pub struct AddForm {
    name: TextArea<'static>,
    drawer: TextArea<'static>,
    focus: AddField,
    error: Option<String>,
}

impl Default for AddForm {
    fn default() -> Self {
        let mut form = Self {
            name: TextArea::default(),
            drawer: TextArea::default(),
            focus: AddField::Name,
            error: None,
        };
        form.style_fields();
        form
    }
}

impl AddForm {
    /// Show a validation error under the fields; the form stays open.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn style_fields(&mut self) {
        for (field, area, title) in [
            (AddField::Name, &mut self.name, "Name"),
            (AddField::Drawer, &mut self.drawer, "Drawer"),
        ] {
            let color = if field == self.focus {
                Color::LightGreen
            } else {
                Color::DarkGray
            };
            area.set_block(
                Block::bordered()
                    .title(title)
                    .border_style(color)
                    .border_type(BorderType::Rounded),
            );
            area.set_cursor_line_style(Style::default());
            area.move_cursor(CursorMove::End);
        }
    }

    fn focused(&mut self) -> &mut TextArea<'static> {
        match self.focus {
            AddField::Name => &mut self.name,
            AddField::Drawer => &mut self.drawer,
        }
    }

    fn process_event(&mut self, event: KeyEvent) -> DialogAction {
        match event.code {
            KeyCode::Esc => DialogAction::Close,
            KeyCode::Char('m' | 'j') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                DialogAction::Keep
            }
            KeyCode::Enter => DialogAction::Add {
                name: first_line(&self.name),
                drawer: first_line(&self.drawer),
            },
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    AddField::Name => AddField::Drawer,
                    AddField::Drawer => AddField::Name,
                };
                self.style_fields();
                DialogAction::Keep
            }
            _ => {
                self.focused().input(event);
                DialogAction::Keep
            }
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ]);
        let [name_area, drawer_area, info_area] = layout.areas(area);
        self.name.render(name_area, buf);
        self.drawer.render(drawer_area, buf);

        let info = match &self.error {
            Some(error) => Paragraph::new(error.as_str()).light_red(),
            None => Paragraph::new("Enter: add   Tab: next field   Esc: cancel").dark_gray(),
        };
        info.wrap(Wrap { trim: true }).render(info_area, buf);
    }
}

fn first_line(area: &TextArea<'_>) -> String {
    area.lines().first().cloned().unwrap_or_default()
}

impl Dialog {
    /// Handle a key press while the dialog is open.
    pub fn process_event(&mut self, event: KeyEvent) -> DialogAction {
        match self {
            Self::Notice(_) => match event.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => DialogAction::Close,
                _ => DialogAction::Keep,
            },
            Self::ConfirmDelete { component, yes } => match event.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    *yes = !*yes;
                    DialogAction::Keep
                }
                KeyCode::Char('y' | 'Y') => DialogAction::Delete(component.clone()),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => DialogAction::Close,
                KeyCode::Enter if *yes => DialogAction::Delete(component.clone()),
                KeyCode::Enter => DialogAction::Close,
                _ => DialogAction::Keep,
            },
            Self::Add(form) => form.process_event(event),
        }
    }

    fn title(&self) -> &str {
        match self {
            Self::Notice(notice) => &notice.title,
            Self::ConfirmDelete { .. } => "Confirm",
            Self::Add(_) => "Add component",
        }
    }

    fn border_color(&self) -> Color {
        match self {
            Self::Notice(notice) => match notice.level {
                NoticeLevel::Info => Color::LightBlue,
                NoticeLevel::Warning => Color::Yellow,
                NoticeLevel::Error => Color::LightRed,
            },
            Self::ConfirmDelete { .. } => Color::LightRed,
            Self::Add(_) => Color::LightGreen,
        }
    }

    fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
        let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);
        area
    }
}

impl Widget for &Dialog {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = match self {
            Dialog::Add(_) => 11,
            _ => 8,
        };
        let area = Dialog::popup_area(area, 50, height);
        Clear.render(area, buf);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.border_color())
            .title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        match self {
            Dialog::Notice(notice) => {
                let [text_area, button_area] =
                    Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(inner);
                Paragraph::new(notice.message.as_str())
                    .wrap(Wrap { trim: true })
                    .render(text_area, buf);
                let [button_area] = Layout::horizontal([Constraint::Length(10)])
                    .flex(Flex::Center)
                    .areas(button_area);
                Paragraph::new("Ok")
                    .on_white()
                    .black()
                    .centered()
                    .block(Block::bordered().border_type(BorderType::Rounded))
                    .render(button_area, buf);
            }
            Dialog::ConfirmDelete { component, yes } => {
                let [text_area, button_area] =
                    Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(inner);
                Paragraph::new(format!("Delete {}?", component.name))
                    .wrap(Wrap { trim: true })
                    .render(text_area, buf);
                let selected = Style::default().bg(Color::White).fg(Color::Black);
                let button = Block::bordered().border_type(BorderType::Rounded);
                let [yes_area, no_area] =
                    Layout::horizontal([Constraint::Length(10), Constraint::Length(10)])
                        .flex(Flex::Center)
                        .areas(button_area);
                Paragraph::new("Yes")
                    .style(if *yes { selected } else { Style::default() })
                    .centered()
                    .block(button.clone())
                    .render(yes_area, buf);
                Paragraph::new("No")
                    .style(if *yes { Style::default() } else { selected })
                    .centered()
                    .block(button)
                    .render(no_area, buf);
            }
            Dialog::Add(form) => form.render(inner, buf),
        }
    }
}
