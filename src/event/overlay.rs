//! Key handling shared by the overlays (preview, detail modal, viewer).
//!
//! The handler only reports intent; whether `OpenPage` or `CopyUrl` mean
//! anything is up to the overlay the app routed the key to.

use crossterm::event::{KeyCode, KeyEvent};

use super::KeyAction;
use crate::ui::scroll::ScrollView;

pub fn handle_key_event(view: &mut ScrollView, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return KeyAction::Close,
        KeyCode::Char('o') => return KeyAction::OpenPage,
        KeyCode::Char('y') => return KeyAction::CopyUrl,
        KeyCode::Enter => {
            return match view.focused_activation() {
                Some(activation) => KeyAction::Activate(activation.clone()),
                None => KeyAction::NotConsumed,
            };
        }
        KeyCode::Tab | KeyCode::Char('j') => view.move_focus(1),
        KeyCode::BackTab | KeyCode::Char('k') => view.move_focus(-1),
        KeyCode::Up => view.scroll_by(-1),
        KeyCode::Down => view.scroll_by(1),
        KeyCode::PageUp => view.page(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => view.page(1),
        KeyCode::Home => view.scroll_to_top(),
        KeyCode::End => view.scroll_to_bottom(),
        _ => return KeyAction::NotConsumed,
    }
    KeyAction::Consumed
}
