//! Opening URLs outside the terminal.

use anyhow::Context as _;
use tracing::info;

pub trait Navigator: Send + Sync {
    /// Open `url` in a new browsing context.
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// The system web browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> anyhow::Result<()> {
        info!(url, "opening in browser");
        webbrowser::open(url).with_context(|| format!("Failed to open {url} in a browser"))
    }
}
