//! Source preview overlay.
//!
//! A header (title, url, key hints) over a body that shows exactly one of
//! four presentations, picked from the pipeline state:
//!
//! 1. loading, which short-circuits everything else
//! 2. the summarized block list
//! 3. a centered failure message when there is no markup to fall back to
//! 4. the raw markup, as extracted text inside its own frame
//!
//! The markup is never interpreted beyond text extraction. A summarize
//! advisory is shown as a banner above the markup frame.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Widget};

use super::scroll::ScrollView;
use crate::model::Source;
use crate::preview::markup::markup_to_text;
use crate::preview::PreviewState;
use crate::render::{render_block, theme, wrap_line, Rendered};

pub const LOADING_TEXT: &str = "Loading preview…";
pub const HINTS: &str = "o open page · y copy url · Tab/Enter links · Esc close";

/// Which body presentation is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Hidden,
    Loading,
    Blocks,
    Error(String),
    Markup { advisory: Option<String> },
}

impl Presentation {
    pub fn of(state: &PreviewState) -> Self {
        if state.source.is_none() {
            Presentation::Hidden
        } else if state.is_loading {
            Presentation::Loading
        } else if !state.blocks.is_empty() {
            Presentation::Blocks
        } else if let (Some(error), None) = (&state.error, &state.html) {
            Presentation::Error(error.clone())
        } else if state.html.is_some() {
            Presentation::Markup {
                advisory: state.error.clone(),
            }
        } else {
            Presentation::Hidden
        }
    }
}

struct Regions {
    header: Rect,
    banner: Option<Rect>,
    frame: Option<Rect>,
    body: Rect,
}

#[derive(Default)]
pub struct TuiPreview {
    state: PreviewState,
    body: ScrollView,
}

impl TuiPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.source.is_some()
    }

    pub fn source(&self) -> Option<&Source> {
        self.state.source.as_ref()
    }

    pub fn presentation(&self) -> Presentation {
        Presentation::of(&self.state)
    }

    /// Mirror the pipeline state. The body is rebuilt only when the state
    /// actually changed, so scroll position and focus survive redraws.
    pub fn sync(&mut self, state: &PreviewState) {
        if &self.state == state {
            return;
        }
        self.state = state.clone();
        let content = match self.presentation() {
            Presentation::Blocks => self.block_body(),
            Presentation::Markup { .. } => self.markup_body(),
            _ => Rendered::new(),
        };
        self.body.set_content(content);
    }

    fn block_body(&self) -> Rendered {
        let base = self.state.source.as_ref().and_then(Source::actionable_url);
        let mut out = Rendered::new();
        for block in &self.state.blocks {
            let rendered = render_block(block, base);
            if rendered.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.blank();
            }
            out.append(rendered);
        }
        out
    }

    fn markup_body(&self) -> Rendered {
        let mut out = Rendered::new();
        for line in markup_to_text(self.state.html.as_deref().unwrap_or_default()) {
            out.push(Line::styled(line, theme::text()));
        }
        out
    }

    pub fn body(&self) -> &ScrollView {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ScrollView {
        &mut self.body
    }

    fn regions(&self, area: Rect) -> Regions {
        let inner = Block::bordered().inner(area);
        let [header, _, content] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        match self.presentation() {
            Presentation::Markup { advisory } => {
                let (banner, rest) = if advisory.is_some() {
                    let [banner, rest] =
                        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(content);
                    (Some(banner), rest)
                } else {
                    (None, content)
                };
                Regions {
                    header,
                    banner,
                    frame: Some(rest),
                    body: Block::bordered().inner(rest),
                }
            }
            _ => Regions {
                header,
                banner: None,
                frame: None,
                body: content,
            },
        }
    }

    pub fn layout(&mut self, area: Rect) {
        let body = self.regions(area).body;
        self.body.layout(body);
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let Some(source) = &self.state.source else {
            return;
        };
        Clear.render(area, buf);
        Block::bordered()
            .border_type(BorderType::Rounded)
            .title(Line::from(" Preview ").style(theme::title()))
            .render(area, buf);

        let regions = self.regions(area);
        let header = vec![
            Line::styled(source.display_title(), theme::title()),
            Line::styled(source.actionable_url().unwrap_or_default().to_string(), theme::link()),
            Line::styled(HINTS, theme::dim()),
        ];
        Paragraph::new(header).render(regions.header, buf);

        match self.presentation() {
            Presentation::Hidden => {}
            Presentation::Loading => centered(LOADING_TEXT, theme::dim(), regions.body, buf),
            Presentation::Error(message) => centered(&message, theme::warn(), regions.body, buf),
            Presentation::Blocks => self.body.render(regions.body, buf),
            Presentation::Markup { advisory } => {
                if let (Some(advisory), Some(banner)) = (advisory, regions.banner) {
                    Paragraph::new(Line::from(vec![
                        Span::styled("! ", theme::warn()),
                        Span::styled(advisory, theme::warn()),
                    ]))
                    .render(banner, buf);
                }
                if let Some(frame) = regions.frame {
                    Block::bordered()
                        .title(Line::from(" raw markup ").style(theme::dim()))
                        .border_style(theme::dim())
                        .render(frame, buf);
                }
                self.body.render(regions.body, buf);
            }
        }
    }
}

/// Wrapped text, centered both ways in `area`.
fn centered(text: &str, style: ratatui::style::Style, area: Rect, buf: &mut Buffer) {
    let lines = wrap_line(Line::styled(text.to_string(), style), usize::from(area.width));
    let height = u16::try_from(lines.len()).unwrap_or(area.height).min(area.height);
    let [_, middle, _] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)]).areas(area);
    Paragraph::new(lines).alignment(Alignment::Center).render(middle, buf);
}
