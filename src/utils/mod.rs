//! Shared helpers: logging setup, clipboard, and the terminal restore guard.

pub mod clipboard;
pub mod guard;
pub mod logger;
