//! Mouse event handling.
//!
//! - Scroll wheel scrolls whichever surface is on top
//! - Left click on a target focuses it and activates it
//!
//! Clicks outside the top surface's view are ignored.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

use crate::render::Activation;
use crate::ui::scroll::ScrollView;

/// Lines scrolled per wheel notch.
pub const WHEEL_LINES: isize = 3;

/// Apply `mouse` to `view`. Returns the activation of a clicked target.
pub fn handle_mouse_event(mouse: MouseEvent, view: &mut ScrollView) -> Option<Activation> {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            view.scroll_by(-WHEEL_LINES);
            None
        }
        MouseEventKind::ScrollDown => {
            view.scroll_by(WHEEL_LINES);
            None
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let index = view.target_at(mouse.column, mouse.row)?;
            trace!(index, col = mouse.column, row = mouse.row, "clicked target");
            view.set_focus(index);
            view.focused_activation().cloned()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    use super::*;
    use crate::render::Rendered;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn view() -> ScrollView {
        let mut content = Rendered::new();
        for i in 0..10 {
            content.push(format!("line {i}"));
        }
        content.push_target("link", Activation::Navigate("https://a.io".into()));
        let mut view = ScrollView::new(content);
        view.layout(Rect::new(1, 1, 30, 5));
        view
    }

    #[test]
    fn test_wheel_scrolls() {
        let mut view = view();
        assert_eq!(handle_mouse_event(mouse(MouseEventKind::ScrollDown, 2, 2), &mut view), None);
        assert_eq!(view.scroll(), 3);
        handle_mouse_event(mouse(MouseEventKind::ScrollUp, 2, 2), &mut view);
        assert_eq!(view.scroll(), 0);
    }

    #[test]
    fn test_click_on_target_activates() {
        let mut view = view();
        view.scroll_by(6);
        // Line 10 sits on the last visible row (y = 1 + 4).
        let clicked = handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 5), &mut view);
        assert_eq!(clicked, Some(Activation::Navigate("https://a.io".into())));
        assert_eq!(view.focus(), Some(0));

        let missed = handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 3, 4), &mut view);
        assert_eq!(missed, None);
    }
}
