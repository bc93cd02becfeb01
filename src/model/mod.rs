//! Payload model for answers, their sections and their citations.
//!
//! Everything here is built from `serde_json::Value` and never fails on
//! shape: missing or mistyped fields are simply absent.

pub mod citation;
pub mod message;
pub mod section;
pub mod source;
mod value;

pub use citation::{CorpusCitation, NoteCitation};
pub use message::{Message, MessageError, Role};
pub use section::{
    AnswerSection, EncyclopediaSection, GenericSection, InstantAnswerSection, OtherDetail,
    OtherResultItem, OtherResultsSection, PromotedSection, ResponseBody, Snippet,
};
pub use source::{BlockKind, PreviewBlock, Source};
