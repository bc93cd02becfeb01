//! Raw markup as inert text.
//!
//! The raw-markup pane never interprets scripts, styles or embedded frames;
//! it only shows the document's text with block structure kept as lines.

use scraper::{ElementRef, Html, Node};

const SKIPPED: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "embed", "svg", "head",
];

const PARAGRAPH_BREAK: &[&str] = &[
    "p", "div", "section", "article", "main", "header", "footer", "nav", "aside", "blockquote",
    "table", "ul", "ol", "dl", "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6",
];

const LINE_BREAK: &[&str] = &["br", "li", "tr", "dt", "dd", "figcaption", "hr"];

#[derive(Default)]
struct TextCollector {
    lines: Vec<String>,
    current: String,
}

impl TextCollector {
    fn text(&mut self, text: &str) {
        let starts_ws = text.starts_with(char::is_whitespace);
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            if starts_ws && !self.current.is_empty() && !self.current.ends_with(' ') {
                self.current.push(' ');
            }
            return;
        }
        if starts_ws && !self.current.is_empty() && !self.current.ends_with(' ') {
            self.current.push(' ');
        }
        self.current.push_str(&words.join(" "));
        if text.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
    }

    fn line_break(&mut self) {
        let line = self.current.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.current.clear();
    }

    fn paragraph_break(&mut self) {
        self.line_break();
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn preformatted(&mut self, text: &str) {
        self.paragraph_break();
        for line in text.trim_matches('\n').lines() {
            self.lines.push(line.trim_end().to_string());
        }
        self.paragraph_break();
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(el) = ElementRef::wrap(child) {
                let name = el.value().name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                if name == "pre" {
                    self.preformatted(&el.text().collect::<String>());
                    continue;
                }
                let paragraph = PARAGRAPH_BREAK.contains(&name);
                let line = LINE_BREAK.contains(&name);
                if paragraph {
                    self.paragraph_break();
                } else if line {
                    self.line_break();
                }
                if name == "li" {
                    self.current.push_str("• ");
                }
                self.walk(el);
                if paragraph {
                    self.paragraph_break();
                } else if line {
                    self.line_break();
                }
            } else if let Node::Text(text) = child.value() {
                self.text(text);
            }
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.line_break();
        while self.lines.last().is_some_and(String::is_empty) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Text lines of `html`, blank lines between paragraphs.
pub fn markup_to_text(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut collector = TextCollector::default();
    collector.walk(document.root_element());
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_lists() {
        let lines = markup_to_text(
            "<h1>Title</h1><p>First   para <b>bold</b>.</p><ul><li>one</li><li>two</li></ul>",
        );
        assert_eq!(lines, vec!["Title", "", "First para bold.", "", "• one", "• two"]);
    }

    #[test]
    fn test_scripts_and_styles_are_never_shown() {
        let lines = markup_to_text(
            "<head><title>T</title><style>p{}</style></head><body><script>alert(1)</script><p>Safe</p><iframe src=x>frame</iframe></body>",
        );
        assert_eq!(lines, vec!["Safe"]);
    }

    #[test]
    fn test_pre_keeps_lines() {
        let lines = markup_to_text("<p>Run:</p><pre>cargo build\n  --release\n</pre>");
        assert_eq!(lines, vec!["Run:", "", "cargo build", "  --release"]);
    }

    #[test]
    fn test_fragment_and_entities() {
        assert_eq!(
            markup_to_text("<p>No preview content available</p>"),
            vec!["No preview content available"]
        );
        assert_eq!(markup_to_text("<p>A &lt;short&gt; page</p>"), vec!["A <short> page"]);
        assert!(markup_to_text("").is_empty());
    }
}
