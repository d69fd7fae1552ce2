use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListState, Paragraph, StatefulWidget, Widget},
};
use tui_textarea::TextArea;

use super::Tui;
use crate::app::ViewMode;
use crate::link::DeviceLink;

const HELP: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("Esc", "clear"),
    ("^L", "show all"),
    ("^N", "add"),
    ("^D", "delete"),
    ("^T", "test LEDs"),
    ("^O", "connect"),
    ("^Q", "quit"),
];

pub(super) fn search_box() -> TextArea<'static> {
    let mut search = TextArea::default();
    search.set_block(
        Block::bordered()
            .title("Search")
            .border_type(BorderType::Rounded),
    );
    search.set_cursor_line_style(Style::default());
    search.set_placeholder_text("Type part of a component name");
    search
}

impl<L: DeviceLink> Widget for &mut Tui<L> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min};

        let layout = Layout::vertical([Length(3), Length(3), Min(0), Length(3)]);
        let [header_area, search_area, list_area, footer_area] = layout.areas(area);

        self.render_header(header_area, buf);
        self.search.render(search_area, buf);
        self.render_list(list_area, buf);
        self.render_footer(footer_area, buf);

        if let Some(dialog) = &self.dialog {
            dialog.render(area, buf);
        }
    }
}

impl<L: DeviceLink> Tui<L> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let color = if self.app.link().is_connected() {
            Color::LightGreen
        } else {
            Color::LightRed
        };
        let status = Line::from(vec![
            Span::styled("●", Style::new().fg(color)),
            Span::raw(" "),
            Span::styled(self.app.status(), Style::new().bold().fg(color)),
        ]);

        Paragraph::new(status)
            .block(
                Block::bordered()
                    .title(Line::from("| drawerlight |").centered())
                    .border_type(BorderType::Rounded),
            )
            .render(area, buf);
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let title = match self.app.mode() {
            ViewMode::Empty => "Results".to_string(),
            ViewMode::Search => format!("Results ({})", self.app.view().len()),
            ViewMode::All => format!("All components ({})", self.app.store().len()),
        };
        let block = Block::bordered()
            .title(title)
            .title_alignment(Alignment::Left)
            .border_type(BorderType::Rounded);

        let list = List::new(self.app.rows())
            .block(block)
            .highlight_style(Style::new().bold().fg(Color::Black).bg(Color::LightYellow))
            .highlight_symbol("▶ ");

        let mut state = ListState::default().with_selected(self.app.selected());
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().border_type(BorderType::Rounded);

        let line = if let Some(busy) = self.busy {
            Line::from(Span::styled(busy, Style::new().bold().fg(Color::Yellow)))
        } else {
            let mut spans = Vec::with_capacity(HELP.len() * 3);
            for (key, action) in HELP {
                spans.push(Span::styled(*key, Style::new().bold().fg(Color::LightMagenta)));
                spans.push(Span::raw(format!(" {action}")));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        };

        Paragraph::new(line).block(block).render(area, buf);
    }
}
