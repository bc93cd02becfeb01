//! Key handling for the message list.

use crossterm::event::{KeyCode, KeyEvent};

use super::KeyAction;
use crate::ui::scroll::ScrollView;

pub fn handle_key_event(view: &mut ScrollView, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Tab | KeyCode::Char('j') => view.move_focus(1),
        KeyCode::BackTab | KeyCode::Char('k') => view.move_focus(-1),
        KeyCode::Enter => {
            return match view.focused_activation() {
                Some(activation) => KeyAction::Activate(activation.clone()),
                None => KeyAction::NotConsumed,
            };
        }
        KeyCode::Up => view.scroll_by(-1),
        KeyCode::Down => view.scroll_by(1),
        KeyCode::PageUp => view.page(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => view.page(1),
        KeyCode::Home | KeyCode::Char('g') => view.scroll_to_top(),
        KeyCode::End | KeyCode::Char('G') => view.scroll_to_bottom(),
        KeyCode::Char('q' | 'Q') => return KeyAction::Quit,
        _ => return KeyAction::NotConsumed,
    }
    KeyAction::Consumed
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    use super::*;
    use crate::render::{Activation, Rendered};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view() -> ScrollView {
        let mut content = Rendered::new();
        content.push("intro");
        content.push_target("first", Activation::Navigate("https://a.io".into()));
        content.push_target("second", Activation::OpenNote("n1".into()));
        let mut view = ScrollView::new(content);
        view.layout(Rect::new(0, 0, 20, 2));
        view
    }

    #[test]
    fn test_enter_without_focus_does_nothing() {
        let mut view = view();
        assert_eq!(handle_key_event(&mut view, press(KeyCode::Enter)), KeyAction::NotConsumed);
    }

    #[test]
    fn test_tab_then_enter_activates_in_order() {
        let mut view = view();
        assert_eq!(handle_key_event(&mut view, press(KeyCode::Tab)), KeyAction::Consumed);
        assert_eq!(handle_key_event(&mut view, press(KeyCode::Tab)), KeyAction::Consumed);
        assert_eq!(
            handle_key_event(&mut view, press(KeyCode::Enter)),
            KeyAction::Activate(Activation::OpenNote("n1".into()))
        );
        handle_key_event(&mut view, press(KeyCode::BackTab));
        assert_eq!(
            handle_key_event(&mut view, press(KeyCode::Enter)),
            KeyAction::Activate(Activation::Navigate("https://a.io".into()))
        );
    }

    #[test]
    fn test_scroll_and_quit() {
        let mut view = view();
        handle_key_event(&mut view, press(KeyCode::Down));
        assert_eq!(view.scroll(), 1);
        handle_key_event(&mut view, press(KeyCode::Home));
        assert_eq!(view.scroll(), 0);
        assert_eq!(handle_key_event(&mut view, press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handle_key_event(&mut view, press(KeyCode::Char('x'))), KeyAction::NotConsumed);
    }
}
