//! answer-term: browse AI answers in the terminal and preview their sources.
//!
//! An AI turn is a list of loosely shaped answer sections. [`model`]
//! classifies each into a closed set of variants, [`render`] turns them into
//! styled lines with activatable citations, and [`preview`] fetches and
//! summarizes a cited page on demand, guarding against stale responses.
//!
//! # Example
//!
//! ```
//! use answer_term::model::AnswerSection;
//! use answer_term::policy::TrustedDomains;
//! use answer_term::render::{render_section, RenderContext};
//! use serde_json::json;
//!
//! let section = AnswerSection::classify(&json!({
//!     "type": "promoted",
//!     "heading": "Acme Corp - Sponsored",
//! }));
//! let trusted = TrustedDomains::default();
//! let rendered = render_section(&section, &RenderContext { trusted: &trusted });
//! assert!(!rendered.is_empty());
//! ```

pub mod app;
pub mod config;
pub mod event;
pub mod library;
pub mod model;
pub mod navigate;
pub mod policy;
pub mod preview;
pub mod render;
pub mod text;
pub mod transcript;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{App, Collaborators};
pub use config::{Cli, Config};
pub use event::{init_app_eventsource, init_user_event, AppEvent, UserEvent};
pub use model::{AnswerSection, Message, Source};
pub use preview::{PreviewPipeline, PreviewState};
