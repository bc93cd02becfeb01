//! Read-only viewer for an opened note or knowledgebase entry.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Widget};

use super::overlay_block;
use super::scroll::ScrollView;
use crate::library::{CorpusRecord, Note};
use crate::preview::markup::markup_to_text;
use crate::render::{theme, Rendered};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Note(Note),
    Corpus(CorpusRecord),
}

impl Document {
    pub fn title(&self) -> &str {
        let title = match self {
            Document::Note(note) => note.title.as_deref(),
            Document::Corpus(record) => record.title.as_deref(),
        };
        title.map(str::trim).filter(|t| !t.is_empty()).unwrap_or("Untitled")
    }

    fn body(&self) -> &str {
        match self {
            Document::Note(note) => &note.body,
            Document::Corpus(record) => &record.body,
        }
    }
}

fn render_document(doc: &Document) -> Rendered {
    let mut out = Rendered::new();
    if let Document::Corpus(record) = doc {
        let mut meta = Vec::new();
        if let Some(name) = &record.knowledgebase_name {
            meta.push(Span::styled(name.clone(), theme::dim().add_modifier(Modifier::BOLD)));
        }
        for keyword in &record.keywords {
            meta.push(Span::raw(" "));
            meta.push(Span::styled(format!(" {keyword} "), theme::inline_code()));
        }
        if !meta.is_empty() {
            out.push(Line::from(meta));
            out.blank();
        }
    }
    let lines = markup_to_text(doc.body());
    if lines.is_empty() {
        out.push(Line::styled("No content", theme::dim()));
    }
    for line in lines {
        out.push(Line::styled(line, theme::text()));
    }
    out
}

#[derive(Default)]
pub struct TuiViewer {
    document: Option<Document>,
    view: ScrollView,
}

impl TuiViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn open(&mut self, document: Document) {
        self.view.set_content(render_document(&document));
        self.document = Some(document);
    }

    pub fn close(&mut self) {
        self.document = None;
        self.view.set_content(Rendered::new());
    }

    pub fn view(&self) -> &ScrollView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ScrollView {
        &mut self.view
    }

    pub fn layout(&mut self, area: Rect) {
        self.view.layout(overlay_block("", "").inner(area));
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(document) = &self.document else {
            return;
        };
        let block = overlay_block(document.title(), "Esc close");
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        self.view.render(inner, buf);
    }
}
