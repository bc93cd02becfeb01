//! The message list: every turn of the transcript, top to bottom.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use tracing::debug;

use super::scroll::ScrollView;
use crate::model::{Message, Source};
use crate::policy::TrustedDomains;
use crate::render::dispatch::render_sections;
use crate::render::{theme, RenderContext, Rendered};

const GUTTER: &str = "  ";

fn header(text: &str, color: ratatui::style::Color) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Render every message in order. Human turns are plain text; AI turns expand
/// their sections through the dispatcher.
pub fn render_transcript(messages: &[Message], ctx: &RenderContext<'_>) -> Rendered {
    let mut out = Rendered::new();
    for message in messages {
        if !out.is_empty() {
            out.blank();
        }
        match message {
            Message::Human(text) => {
                out.push(header("You", theme::HUMAN));
                let mut body = Rendered::new();
                for line in text.lines() {
                    body.push(Line::styled(line.to_string(), theme::text()));
                }
                out.append(body.indented(GUTTER, Style::default()));
            }
            Message::Ai(sections) => {
                out.push(header("Assistant", theme::AI));
                let body = render_sections(sections, ctx);
                if body.is_empty() {
                    out.push(Line::styled(format!("{GUTTER}(no displayable content)"), theme::dim()));
                } else {
                    out.append(body.indented(GUTTER, Style::default()));
                }
            }
        }
    }
    out
}

pub struct TuiMessages {
    messages: Vec<Message>,
    trusted: TrustedDomains,
    view: ScrollView,
    /// The source currently shown in the preview.
    selected_source: Option<Source>,
}

impl TuiMessages {
    pub fn new(messages: Vec<Message>, trusted: TrustedDomains) -> Self {
        let mut list = Self {
            messages,
            trusted,
            view: ScrollView::default(),
            selected_source: None,
        };
        list.rerender();
        list
    }

    fn rerender(&mut self) {
        let ctx = RenderContext {
            trusted: &self.trusted,
        };
        let rendered = render_transcript(&self.messages, &ctx);
        debug!(
            messages = self.messages.len(),
            lines = rendered.len(),
            targets = rendered.targets.len(),
            "rendered transcript"
        );
        self.view.set_content(rendered);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append a turn and follow it.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.rerender();
        self.view.scroll_to_bottom();
    }

    /// Record `source` as the previewed one. Returns `true` when the
    /// selection changed to a different URL.
    pub fn select_source(&mut self, source: &Source) -> bool {
        let Some(url) = source.actionable_url() else {
            return false;
        };
        let unchanged = self
            .selected_source
            .as_ref()
            .and_then(Source::actionable_url)
            .is_some_and(|current| current == url);
        if unchanged {
            return false;
        }
        self.selected_source = Some(source.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_source = None;
    }

    pub fn selected_source(&self) -> Option<&Source> {
        self.selected_source.as_ref()
    }

    pub fn view(&self) -> &ScrollView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ScrollView {
        &mut self.view
    }

    pub fn layout(&mut self, area: Rect) {
        self.view.layout(area);
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        self.view.render(area, buf);
    }
}
