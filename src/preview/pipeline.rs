//! Per-selection preview state machine.
//!
//! Selecting a source resets the derived state, enters loading and spawns
//! one task that fetches and then summarizes. Every selection (and every
//! close) bumps a monotonic token. The task compares its token after the
//! fetch resolves and after the summary resolves, and [`PreviewPipeline::apply`]
//! compares it once more on the UI loop, so a superseded request can never
//! write state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, info, warn};

use super::{ContentFetcher, Summarizer};
use crate::model::{PreviewBlock, Source};
use crate::text::paragraph_fragment;

pub const FETCH_FAILED_MESSAGE: &str =
    "Unable to load preview. Use the open-page action (o) to view the source directly.";
pub const SUMMARIZE_FAILED_MESSAGE: &str = "Unable to summarize, showing raw preview.";
pub const NO_CONTENT_FRAGMENT: &str = "<p>No preview content available</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Idle,
    Loading,
    BlocksReady,
    HtmlReady,
    ErrorReady,
}

/// State exposed to the preview surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewState {
    pub source: Option<Source>,
    pub html: Option<String>,
    pub blocks: Vec<PreviewBlock>,
    /// Fetch failure message, or the summarize advisory shown with `html`.
    pub error: Option<String>,
    pub is_loading: bool,
}

impl PreviewState {
    fn loading(source: Source) -> Self {
        Self {
            source: Some(source),
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> PreviewPhase {
        if self.source.is_none() {
            PreviewPhase::Idle
        } else if self.is_loading {
            PreviewPhase::Loading
        } else if !self.blocks.is_empty() {
            PreviewPhase::BlocksReady
        } else if self.html.is_some() {
            PreviewPhase::HtmlReady
        } else if self.error.is_some() {
            PreviewPhase::ErrorReady
        } else {
            PreviewPhase::Idle
        }
    }
}

/// Result of one fetch-then-summarize run.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Blocks { html: String, blocks: Vec<PreviewBlock> },
    Html { html: String, advisory: Option<String> },
    Failed { message: String },
}

/// Fetch and summarize `url`. Returns `None` as soon as `is_current` reports
/// that the selection was superseded.
pub async fn run_preview<F>(
    fetcher: &dyn ContentFetcher,
    summarizer: &dyn Summarizer,
    url: &str,
    is_current: F,
) -> Option<PreviewOutcome>
where
    F: Fn() -> bool,
{
    let fetched = fetcher.fetch(url).await;
    if !is_current() {
        debug!(url, "discarding stale fetch result");
        return None;
    }
    let fetched = match fetched {
        Ok(fetched) => fetched,
        Err(err) => {
            warn!(url, error = %err, "preview fetch failed");
            return Some(PreviewOutcome::Failed {
                message: FETCH_FAILED_MESSAGE.to_string(),
            });
        }
    };

    let Some(html) = fetched.html.filter(|html| !html.trim().is_empty()) else {
        let html = fetched
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(paragraph_fragment)
            .unwrap_or_else(|| NO_CONTENT_FRAGMENT.to_string());
        return Some(PreviewOutcome::Html { html, advisory: None });
    };

    let summary = summarizer.summarize(&html).await;
    if !is_current() {
        debug!(url, "discarding stale summary");
        return None;
    }
    Some(match summary {
        Ok(blocks) => {
            let blocks: Vec<PreviewBlock> = blocks.into_iter().flatten().collect();
            if blocks.is_empty() {
                debug!(url, "summary had no blocks, showing raw markup");
                PreviewOutcome::Html { html, advisory: None }
            } else {
                PreviewOutcome::Blocks { html, blocks }
            }
        }
        Err(err) => {
            warn!(url, error = %err, "preview summarize failed");
            PreviewOutcome::Html {
                html,
                advisory: Some(SUMMARIZE_FAILED_MESSAGE.to_string()),
            }
        }
    })
}

/// A finished run, tagged with the selection it belongs to.
#[derive(Debug)]
pub struct PreviewUpdate {
    pub token: u64,
    pub outcome: PreviewOutcome,
}

/// Owner of the current selection's preview state.
pub struct PreviewPipeline {
    fetcher: Arc<dyn ContentFetcher>,
    summarizer: Arc<dyn Summarizer>,
    state: PreviewState,
    token: Arc<AtomicU64>,
    update_tx: Sender<PreviewUpdate>,
    update_rx: Receiver<PreviewUpdate>,
}

impl PreviewPipeline {
    const UPDATE_CHANNEL_BUFFER: usize = 16;

    pub fn new(fetcher: Arc<dyn ContentFetcher>, summarizer: Arc<dyn Summarizer>) -> Self {
        let (update_tx, update_rx) = mpsc::channel(Self::UPDATE_CHANNEL_BUFFER);
        Self {
            fetcher,
            summarizer,
            state: PreviewState::default(),
            token: Arc::new(AtomicU64::new(0)),
            update_tx,
            update_rx,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn current_token(&self) -> u64 {
        self.token.load(Ordering::SeqCst)
    }

    /// Start a preview for `source`. A source without a URL leaves the state
    /// untouched and returns `false`.
    pub fn select(&mut self, source: Source) -> bool {
        let Some(url) = source.actionable_url().map(str::to_string) else {
            debug!("ignoring preview of a source without url");
            return false;
        };
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        self.state = PreviewState::loading(source);
        info!(token, url = %url, "preview selected");

        let fetcher = Arc::clone(&self.fetcher);
        let summarizer = Arc::clone(&self.summarizer);
        let current = Arc::clone(&self.token);
        let tx = self.update_tx.clone();
        tokio::spawn(async move {
            let is_current = || current.load(Ordering::SeqCst) == token;
            let outcome = run_preview(fetcher.as_ref(), summarizer.as_ref(), &url, is_current).await;
            if let Some(outcome) = outcome
                && tx.send(PreviewUpdate { token, outcome }).await.is_err()
            {
                debug!(token, "preview receiver dropped");
            }
        });
        true
    }

    /// Drop the selection and invalidate its in-flight request.
    pub fn close(&mut self) {
        let token = self.token.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, "preview closed");
        self.state = PreviewState::default();
    }

    /// Apply a finished run. Returns `false` when it belongs to a superseded
    /// selection and was dropped.
    pub fn apply(&mut self, update: PreviewUpdate) -> bool {
        if update.token != self.current_token() || self.state.source.is_none() {
            debug!(token = update.token, "discarding stale preview update");
            return false;
        }
        self.state.is_loading = false;
        match update.outcome {
            PreviewOutcome::Blocks { html, blocks } => {
                self.state.html = Some(html);
                self.state.blocks = blocks;
            }
            PreviewOutcome::Html { html, advisory } => {
                self.state.html = Some(html);
                self.state.error = advisory;
            }
            PreviewOutcome::Failed { message } => {
                self.state.error = Some(message);
            }
        }
        debug!(token = update.token, phase = ?self.state.phase(), "preview updated");
        true
    }

    /// Next finished run. Never yields `None` while the pipeline is alive,
    /// since it holds a sender itself.
    pub async fn recv_update(&mut self) -> Option<PreviewUpdate> {
        self.update_rx.recv().await
    }
}
