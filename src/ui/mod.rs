//! User interface: the message list, its overlays and the status line.
//!
//! Every surface renders from `&self`; sizes are settled beforehand by a
//! layout pass (`App::draw`), which is also where scroll views re-wrap.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Stylize;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::app::{App, Surface};
use crate::render::theme;

pub mod detail;
pub mod layout;
pub mod messages;
pub mod preview;
pub mod scroll;
pub mod viewer;

/// Outer frame of the message list.
pub(crate) fn frame_block() -> Block<'static> {
    Block::bordered().title(Line::from(" answer-term ".bold()))
}

/// Frame shared by the modal overlays.
pub(crate) fn overlay_block(title: &str, hint: &str) -> Block<'static> {
    let mut block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(theme::dim());
    if !title.is_empty() {
        block = block.title(Line::from(format!(" {title} ")).style(theme::title()));
    }
    if !hint.is_empty() {
        block = block.title_bottom(Line::from(format!(" {hint} ")).style(theme::dim()).right_aligned());
    }
    block
}

fn surface_hints(surface: Surface) -> &'static str {
    match surface {
        Surface::Messages => "Tab next · Enter open · ↑↓ scroll · q quit",
        Surface::Preview => preview::HINTS,
        Surface::Detail => "Tab next · Enter open · Esc close",
        Surface::Viewer => "↑↓ scroll · Esc close",
    }
}

fn render_status(app: &App, area: Rect, buf: &mut Buffer) {
    let hints = surface_hints(app.top_surface());
    let hints_width = u16::try_from(hints.chars().count() + 1).unwrap_or(area.width);
    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width.min(area.width))]).areas(area);

    let message = match app.status() {
        Some(status) => Span::styled(format!(" {status}"), theme::warn()),
        None => Span::styled(
            app.focused_description()
                .map(|d| format!(" {d}"))
                .unwrap_or_default(),
            theme::dim(),
        ),
    };
    Paragraph::new(Line::from(message)).render(left, buf);
    Paragraph::new(Line::from(hints).style(theme::dim()).right_aligned()).render(right, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout();
        frame_block().render(layout.messages_area, buf);
        self.tui_messages.render(layout.messages_inner, buf);

        // Bottom to top: detail modal, preview, viewer.
        self.tui_detail.render(layout.detail_area, buf);
        self.tui_preview.render(layout.preview_area, buf);
        self.tui_viewer.render(layout.viewer_area, buf);

        render_status(self, layout.status_area, buf);
    }
}
