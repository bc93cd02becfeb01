//! Event handling system for the application.
//!
//! User input is read on a dedicated thread so the UI loop never blocks on
//! the terminal. Background work (knowledgebase lookups) reports back over
//! the app event channel; preview results use the pipeline's own channel.
//!
//! # Submodules
//!
//! - `messages`: keys for the message list
//! - `overlay`: keys shared by the preview, the detail modal and the viewer
//! - `mouse`: wheel scrolling and click-to-activate

pub mod messages;
pub mod mouse;
pub mod overlay;

use std::io::Result;
use std::thread;

use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};

use crate::library::CorpusRecord;
use crate::render::Activation;

/// Input events from the terminal: keys, mouse, resize.
pub type UserEvent = crossterm::event::Event;

/// Spawn the input thread. It stops once the receiver is dropped.
pub fn init_user_event() -> Receiver<Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Low-frequency events from background tasks.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A knowledgebase lookup finished. `Err` carries a display message.
    CorpusLoaded {
        id: String,
        result: std::result::Result<Option<CorpusRecord>, String>,
    },
}

pub fn init_app_eventsource() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}

/// What a surface made of a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Handled inside the surface (scroll, focus).
    Consumed,
    NotConsumed,
    /// Activate a focused target.
    Activate(Activation),
    /// Close the surface.
    Close,
    /// Open the previewed page in the browser.
    OpenPage,
    /// Copy the previewed URL.
    CopyUrl,
    Quit,
}
