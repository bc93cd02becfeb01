//! Rendering of answers and preview blocks into styled terminal lines.
//!
//! Renderers produce a [`Rendered`]: the lines to draw plus the activatable
//! targets (citations, links, images) anchored to those lines. Surfaces keep
//! a focus index into the targets and turn Enter into an [`Activation`],
//! which is delivered to a [`CitationHandler`].

pub mod block;
pub mod dispatch;
pub mod markdown;
pub mod sections;
pub mod theme;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::model::{OtherDetail, Source};
use crate::policy::TrustedDomains;

pub use block::render_block;
pub use dispatch::render_section;

/// What activating a target does.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Select a source for preview.
    Preview(Source),
    /// Open a URL in the browser.
    Navigate(String),
    /// Show the detail modal of a miscellaneous hit.
    ShowDetail(OtherDetail),
    /// Open a cited note by id.
    OpenNote(String),
    /// Open a cited knowledgebase entry by id.
    OpenCorpus(String),
}

impl Activation {
    /// Route to the matching handler hook.
    pub fn dispatch<H: CitationHandler + ?Sized>(self, handler: &mut H) {
        match self {
            Activation::Preview(source) => handler.open_source(source),
            Activation::Navigate(url) => handler.navigate(&url),
            Activation::ShowDetail(detail) => handler.show_detail(detail),
            Activation::OpenNote(id) => handler.open_note(&id),
            Activation::OpenCorpus(id) => handler.open_corpus(&id),
        }
    }

    /// One-line description for the status bar.
    pub fn describe(&self) -> String {
        match self {
            Activation::Preview(source) => format!(
                "preview {}",
                source.actionable_url().unwrap_or_default()
            ),
            Activation::Navigate(url) => format!("open {url}"),
            Activation::ShowDetail(detail) => format!(
                "details of {}",
                detail.title.as_deref().unwrap_or("result")
            ),
            Activation::OpenNote(id) => format!("open note {id}"),
            Activation::OpenCorpus(id) => format!("open knowledgebase entry {id}"),
        }
    }
}

/// Citation-open hooks.
pub trait CitationHandler {
    fn open_source(&mut self, source: Source);
    fn open_note(&mut self, id: &str);
    fn open_corpus(&mut self, id: &str);
    fn navigate(&mut self, url: &str);
    fn show_detail(&mut self, detail: OtherDetail);
}

/// An activatable target anchored to a rendered line.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub line: usize,
    pub activation: Activation,
}

/// Lines plus the targets anchored to them.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub lines: Vec<Line<'static>>,
    pub targets: Vec<Target>,
}

impl Rendered {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn push(&mut self, line: impl Into<Line<'static>>) {
        self.lines.push(line.into());
    }

    /// Push a line that activates to `activation`.
    pub fn push_target(&mut self, line: impl Into<Line<'static>>, activation: Activation) {
        self.targets.push(Target {
            line: self.lines.len(),
            activation,
        });
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    /// Append another render below this one.
    pub fn append(&mut self, other: Rendered) {
        let offset = self.lines.len();
        self.lines.extend(other.lines);
        self.targets.extend(other.targets.into_iter().map(|t| Target {
            line: t.line + offset,
            activation: t.activation,
        }));
    }

    /// Prefix every line with `prefix` (quote bars, card gutters).
    pub fn indented(mut self, prefix: &str, style: Style) -> Self {
        for line in &mut self.lines {
            line.spans.insert(0, Span::styled(prefix.to_string(), style));
        }
        self
    }

    /// Re-flow to `width` columns, keeping targets on the first row of the
    /// line they were anchored to.
    pub fn wrapped(&self, width: usize) -> Rendered {
        let mut out = Rendered::new();
        let mut row_of_line = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            row_of_line.push(out.lines.len());
            out.lines.extend(wrap_line(line.clone(), width));
        }
        out.targets = self
            .targets
            .iter()
            .map(|t| Target {
                line: row_of_line.get(t.line).copied().unwrap_or(t.line),
                activation: t.activation.clone(),
            })
            .collect();
        out
    }

    /// Plain text of every line, for logging and tests.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines.iter().map(line_text).collect()
    }
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Inputs shared by the section renderers.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub trusted: &'a TrustedDomains,
}

/// Wrap one styled line at word boundaries; words wider than `width` are
/// split hard.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line];
    }

    let line_style = line.style;
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    let mut flush = |current: &mut Vec<Span<'static>>, current_width: &mut usize| {
        rows.push(Line::from(std::mem::take(current)).style(line_style));
        *current_width = 0;
    };

    for span in line.spans {
        let style = span.style;
        for word in span.content.split_inclusive(' ') {
            let word_width = word.width();
            if current_width + word_width > width && current_width > 0 {
                flush(&mut current, &mut current_width);
            }
            if word_width <= width {
                current.push(Span::styled(word.to_string(), style));
                current_width += word_width;
                continue;
            }
            // Hard split of an over-wide word.
            let mut piece = String::new();
            for ch in word.chars() {
                let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
                if current_width + ch_width > width && (current_width > 0 || !piece.is_empty()) {
                    current.push(Span::styled(std::mem::take(&mut piece), style));
                    flush(&mut current, &mut current_width);
                }
                piece.push(ch);
                current_width += ch_width;
            }
            if !piece.is_empty() {
                current.push(Span::styled(piece, style));
            }
        }
    }
    if !current.is_empty() {
        flush(&mut current, &mut current_width);
    }
    if rows.is_empty() {
        rows.push(Line::default());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl CitationHandler for Recorder {
        fn open_source(&mut self, source: Source) {
            self.calls.push(format!("source:{}", source.actionable_url().unwrap_or_default()));
        }
        fn open_note(&mut self, id: &str) {
            self.calls.push(format!("note:{id}"));
        }
        fn open_corpus(&mut self, id: &str) {
            self.calls.push(format!("corpus:{id}"));
        }
        fn navigate(&mut self, url: &str) {
            self.calls.push(format!("navigate:{url}"));
        }
        fn show_detail(&mut self, detail: OtherDetail) {
            self.calls.push(format!("detail:{}", detail.texts.len()));
        }
    }

    #[test]
    fn test_activation_dispatch() {
        let mut rec = Recorder::default();
        Activation::Preview(Source::from_url("https://a.io")).dispatch(&mut rec);
        Activation::OpenNote("n1".into()).dispatch(&mut rec);
        Activation::OpenCorpus("c1".into()).dispatch(&mut rec);
        Activation::Navigate("https://b.io".into()).dispatch(&mut rec);
        assert_eq!(
            rec.calls,
            vec!["source:https://a.io", "note:n1", "corpus:c1", "navigate:https://b.io"]
        );
    }

    #[test]
    fn test_append_offsets_targets() {
        let mut a = Rendered::new();
        a.push("one");
        a.push_target("two", Activation::Navigate("x".into()));
        let mut b = Rendered::new();
        b.push_target("three", Activation::Navigate("y".into()));
        a.append(b);
        assert_eq!(a.targets.iter().map(|t| t.line).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_wrap_line_words_and_hard_split() {
        let rows = wrap_line(Line::from("alpha beta gamma"), 11);
        let text: Vec<_> = rows.iter().map(line_text).collect();
        assert_eq!(text, vec!["alpha beta ", "gamma"]);

        let rows = wrap_line(Line::from("abcdefghij"), 4);
        let text: Vec<_> = rows.iter().map(line_text).collect();
        assert_eq!(text, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrapped_remaps_targets() {
        let mut r = Rendered::new();
        r.push("a long line that will wrap around");
        r.push_target("target", Activation::Navigate("u".into()));
        let wrapped = r.wrapped(10);
        let line = wrapped.targets[0].line;
        assert_eq!(line_text(&wrapped.lines[line]), "target");
    }
}
