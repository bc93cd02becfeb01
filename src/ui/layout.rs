use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Screen regions, rebuilt whenever the terminal size changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppLayout {
    pub full_area: Rect,
    /// Framed message list.
    pub messages_area: Rect,
    /// Inside the message list frame.
    pub messages_inner: Rect,
    pub status_area: Rect,
    /// The preview covers the whole message area.
    pub preview_area: Rect,
    pub detail_area: Rect,
    pub viewer_area: Rect,
}

impl AppLayout {
    pub fn build(area: Rect) -> Self {
        let [messages_area, status_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let messages_inner = super::frame_block().inner(messages_area);
        Self {
            full_area: area,
            messages_area,
            messages_inner,
            status_area,
            preview_area: messages_area,
            detail_area: centered(messages_area, 80, 70),
            viewer_area: centered(messages_area, 84, 80),
        }
    }
}

/// A rectangle of `percent_x` by `percent_y` of `area`, centered in it.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
