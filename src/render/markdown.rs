//! Markdown prose to styled lines.
//!
//! Supports headings, emphasis, lists, block quotes, tables, links, inline
//! code and fenced code blocks. Fenced blocks are highlighted by the language
//! named in the fence annotation ("text" when there is none). Every link
//! becomes a browser target on the line it ends up on.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style as SynStyle, ThemeSet};
use syntect::parsing::SyntaxSet;
use unicode_width::UnicodeWidthStr;

use super::{theme, Activation, Rendered};
use crate::text::strip_tags;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Language assumed for fences without an annotation.
pub const DEFAULT_LANGUAGE: &str = "text";

/// Open container while walking the event stream.
enum Frame {
    Heading(u8),
    Strong,
    Emphasis,
    Strikethrough,
    Link(String),
    List(Option<u64>),
    Item,
    Quote,
    CodeBlock,
    Table,
    TableRow,
    TableCell,
    /// Paragraph-like container; ends its line.
    Block,
    Inline,
}

struct MarkdownWriter {
    out: Rendered,
    frames: Vec<Frame>,
    spans: Vec<Span<'static>>,
    /// Links closed on the current line, flushed with it.
    pending_links: Vec<String>,
    code_lang: String,
    code: String,
    table_rows: Vec<Vec<String>>,
    cell: String,
}

/// Language tag from a fence annotation such as `rust,ignore` or `python title=x`.
pub fn fence_language(info: &str) -> String {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .find(|token| !token.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// Render markdown prose.
pub fn render_markdown(text: &str) -> Rendered {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = MarkdownWriter {
        out: Rendered::new(),
        frames: Vec::new(),
        spans: Vec::new(),
        pending_links: Vec::new(),
        code_lang: DEFAULT_LANGUAGE.to_string(),
        code: String::new(),
        table_rows: Vec::new(),
        cell: String::new(),
    };
    for event in Parser::new_ext(text, options) {
        writer.event(event);
    }
    writer.flush();
    writer.out
}

impl MarkdownWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.in_table_cell() {
                    self.cell.push_str(&code);
                } else {
                    self.spans.push(Span::styled(format!(" {code} "), theme::inline_code()));
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let stripped = strip_tags(&html);
                if !stripped.trim().is_empty() {
                    self.text(stripped.trim_end_matches('\n'));
                }
            }
            Event::SoftBreak => {
                if self.in_code_block() {
                    self.code.push('\n');
                } else {
                    self.spans.push(Span::raw(" "));
                }
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.out.push(Line::styled("─".repeat(24), theme::dim()));
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(marker, theme::dim()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                Frame::Heading(level as u8)
            }
            Tag::Paragraph => {
                // An item's marker stays on the line of its first paragraph.
                if !matches!(self.frames.last(), Some(Frame::Item)) {
                    self.flush();
                }
                Frame::Block
            }
            Tag::HtmlBlock => {
                self.flush();
                Frame::Block
            }
            Tag::Strong => Frame::Strong,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link { dest_url, .. } => Frame::Link(dest_url.to_string()),
            Tag::List(first) => {
                self.flush();
                Frame::List(first)
            }
            Tag::Item => {
                self.flush();
                let depth = self.frames.iter().filter(|f| matches!(f, Frame::List(_))).count();
                let indent = "  ".repeat(depth.saturating_sub(1));
                let marker = match self.frames.iter_mut().rev().find(|f| matches!(f, Frame::List(_))) {
                    Some(Frame::List(Some(n))) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.spans.push(Span::styled(marker, theme::dim()));
                Frame::Item
            }
            Tag::BlockQuote(..) => {
                self.flush();
                Frame::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.code_lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => DEFAULT_LANGUAGE.to_string(),
                };
                self.code.clear();
                Frame::CodeBlock
            }
            Tag::Table(_) => {
                self.flush();
                self.table_rows.clear();
                Frame::Table
            }
            Tag::TableHead | Tag::TableRow => {
                self.table_rows.push(Vec::new());
                Frame::TableRow
            }
            Tag::TableCell => {
                self.cell.clear();
                Frame::TableCell
            }
            _ => Frame::Inline,
        };
        self.frames.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        match frame {
            Frame::Heading(level) => {
                let style = theme::heading(level);
                for span in &mut self.spans {
                    span.style = span.style.patch(style);
                }
                self.flush();
            }
            Frame::Link(url) => {
                self.spans.push(Span::styled(" ↗", theme::dim()));
                self.pending_links.push(url);
            }
            Frame::Item | Frame::Quote | Frame::List(_) => self.flush(),
            Frame::Block => {
                if !self.in_table() {
                    self.flush();
                }
            }
            Frame::CodeBlock => {
                let code = std::mem::take(&mut self.code);
                let lang = std::mem::replace(&mut self.code_lang, DEFAULT_LANGUAGE.to_string());
                let block = render_code_block(&code, &lang, None);
                let prefix = self.quote_prefix();
                if prefix.is_empty() {
                    self.out.append(block);
                } else {
                    self.out.append(block.indented(&prefix, theme::dim()));
                }
            }
            Frame::TableCell => {
                let cell = std::mem::take(&mut self.cell);
                if let Some(row) = self.table_rows.last_mut() {
                    row.push(cell.trim().to_string());
                }
            }
            Frame::TableRow => {}
            Frame::Table => {
                let rows = std::mem::take(&mut self.table_rows);
                for line in render_table(&rows) {
                    self.out.push(line);
                }
            }
            Frame::Strong | Frame::Emphasis | Frame::Strikethrough | Frame::Inline => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block() {
            self.code.push_str(text);
        } else if self.in_table_cell() {
            self.cell.push_str(text);
        } else {
            self.spans.push(Span::styled(text.to_string(), self.inline_style()));
        }
    }

    fn inline_style(&self) -> Style {
        let mut style = theme::text();
        for frame in &self.frames {
            style = match frame {
                Frame::Strong => style.add_modifier(Modifier::BOLD),
                Frame::Emphasis => style.add_modifier(Modifier::ITALIC),
                Frame::Strikethrough => style.add_modifier(Modifier::CROSSED_OUT),
                Frame::Link(_) => style.patch(theme::link()),
                Frame::Quote => style.fg(theme::QUOTE),
                _ => style,
            };
        }
        style
    }

    fn quote_prefix(&self) -> String {
        let depth = self.frames.iter().filter(|f| matches!(f, Frame::Quote)).count();
        "│ ".repeat(depth)
    }

    fn in_code_block(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::CodeBlock))
    }

    fn in_table(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::Table))
    }

    fn in_table_cell(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::TableCell))
    }

    /// Emit the current line, registering links closed on it.
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = std::mem::take(&mut self.spans);
        let prefix = self.quote_prefix();
        if !prefix.is_empty() {
            spans.insert(0, Span::styled(prefix, theme::dim()));
        }
        let links = std::mem::take(&mut self.pending_links);
        let line = Line::from(spans);
        let mut links = links.into_iter();
        match links.next() {
            Some(first) => self.out.push_target(line, Activation::Navigate(first)),
            None => self.out.push(line),
        }
        // Further links on the same line share its row.
        let row = self.out.len() - 1;
        for url in links {
            self.out.targets.push(super::Target {
                line: row,
                activation: Activation::Navigate(url),
            });
        }
    }
}

/// A framed, highlighted code block labeled with `label` or the language.
pub fn render_code_block(code: &str, lang: &str, label: Option<&str>) -> Rendered {
    let mut out = Rendered::new();
    let header = label.unwrap_or(lang);
    out.push(Line::styled(format!("┌─ {header} "), theme::dim()));
    for line in highlight_code(code.trim_end_matches('\n'), lang) {
        let mut spans = vec![Span::styled("│ ", theme::dim())];
        spans.extend(line.spans);
        out.push(Line::from(spans));
    }
    out.push(Line::styled("└─", theme::dim()));
    out
}

/// Highlight `code` by language token, falling back to plain text.
pub fn highlight_code(code: &str, lang: &str) -> Vec<Line<'static>> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let plain = |line: &str| Line::styled(line.to_string(), Style::default().fg(theme::CODE_FG));

    let Some(code_theme) = THEME_SET.themes.get(CODE_THEME) else {
        return code.lines().map(plain).collect();
    };
    let mut highlighter = HighlightLines::new(syntax, code_theme);
    code.lines()
        .map(|line| match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, text)| Span::styled(text.to_string(), syntect_style(style)))
                    .collect::<Vec<_>>(),
            ),
            Err(_) => plain(line),
        })
        .collect()
}

fn syntect_style(style: SynStyle) -> Style {
    Style::default().fg(ratatui::style::Color::Rgb(
        style.foreground.r,
        style.foreground.g,
        style.foreground.b,
    ))
}

fn render_table(rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        let mut spans = Vec::new();
        for (col, width) in widths.iter().enumerate() {
            if col > 0 {
                spans.push(Span::styled(" │ ", theme::dim()));
            }
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(cell.width());
            let style = if idx == 0 {
                theme::text().add_modifier(Modifier::BOLD)
            } else {
                theme::text()
            };
            spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), style));
        }
        lines.push(Line::from(spans));
        if idx == 0 && rows.len() > 1 {
            let rule = widths
                .iter()
                .map(|w| "─".repeat(*w))
                .collect::<Vec<_>>()
                .join("─┼─");
            lines.push(Line::styled(rule, theme::dim()));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust"), "rust");
        assert_eq!(fence_language("rust,ignore"), "rust");
        assert_eq!(fence_language("  python title=x"), "python");
        assert_eq!(fence_language(""), "text");
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let out = render_markdown("# Title\n\nSome *prose* here.");
        assert_eq!(out.plain_lines(), vec!["Title", "Some prose here."]);
    }

    #[test]
    fn test_code_block_defaults_to_text() {
        let out = render_markdown("```\nplain\n```");
        let lines = out.plain_lines();
        assert_eq!(lines[0], "┌─ text ");
        assert_eq!(lines[1], "│ plain");
        assert_eq!(lines[2], "└─");
    }

    #[test]
    fn test_code_block_uses_fence_language() {
        let out = render_markdown("```rust\nfn main() {}\n```");
        assert_eq!(out.plain_lines()[0], "┌─ rust ");
        assert_eq!(out.plain_lines()[1], "│ fn main() {}");
    }

    #[test]
    fn test_inline_code_styled_apart_from_prose() {
        let out = render_markdown("run `cargo test` now");
        let spans = &out.lines[0].spans;
        let code = spans.iter().find(|s| s.content.contains("cargo test")).unwrap();
        assert_eq!(code.style, theme::inline_code());
    }

    #[test]
    fn test_links_become_targets() {
        let out = render_markdown("See [docs](https://docs.rs) and [crates](https://crates.io).");
        assert_eq!(out.targets.len(), 2);
        assert!(out.targets.iter().all(|t| t.line == 0));
        assert_eq!(out.targets[0].activation, Activation::Navigate("https://docs.rs".into()));
    }

    #[test]
    fn test_lists_and_quotes() {
        let out = render_markdown("- one\n- two\n\n1. first\n2. second\n\n> quoted");
        assert_eq!(
            out.plain_lines(),
            vec!["• one", "• two", "1. first", "2. second", "│ quoted"]
        );
    }

    #[test]
    fn test_table() {
        let out = render_markdown("| A | Bee |\n|---|---|\n| 1 | 2 |");
        let lines = out.plain_lines();
        assert_eq!(lines[0], "A │ Bee");
        assert_eq!(lines[1], "──┼────");
        assert_eq!(lines[2], "1 │ 2  ");
    }
}
