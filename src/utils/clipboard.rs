//! System clipboard access.

use arboard::Clipboard;
use tracing::{debug, error};

/// Copy `text` to the system clipboard. Failures are logged and reported as
/// `false`; a missing clipboard (headless session) is not an error worth
/// stopping for.
pub fn copy_to_clipboard(text: &str) -> bool {
    match Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(text) {
            Ok(()) => {
                debug!(chars = text.chars().count(), "copied to clipboard");
                true
            }
            Err(e) => {
                error!("Failed to copy to clipboard: {}", e);
                false
            }
        },
        Err(e) => {
            error!("Failed to access clipboard: {}", e);
            false
        }
    }
}
