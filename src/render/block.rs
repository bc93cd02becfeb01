//! Preview blocks: one summarized fragment of a cited page each.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use url::Url;

use super::markdown::{render_code_block, render_markdown, DEFAULT_LANGUAGE};
use super::{theme, Activation, Rendered};
use crate::model::{BlockKind, PreviewBlock};

/// Resolve `path` against `base` when it is relative. Absolute URLs and
/// unresolvable input come back trimmed but otherwise unchanged.
pub fn resolve_against(base: Option<&str>, path: &str) -> String {
    let path = path.trim();
    if Url::parse(path).is_ok() {
        return path.to_string();
    }
    base.and_then(|base| Url::parse(base.trim()).ok())
        .and_then(|base| base.join(path).ok())
        .map(String::from)
        .unwrap_or_else(|| path.to_string())
}

/// Render one block. `base_url` is the page the block was summarized from.
pub fn render_block(block: &PreviewBlock, base_url: Option<&str>) -> Rendered {
    let mut out = Rendered::new();
    if let Some(description) = block.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push(Line::styled(
            description.trim().to_string(),
            theme::label().add_modifier(Modifier::ITALIC),
        ));
    }

    match block.kind {
        BlockKind::Code => {
            let lang = block
                .language
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(DEFAULT_LANGUAGE);
            out.append(render_code_block(&block.content, lang, None));
        }
        BlockKind::Image => {
            if !block.content.trim().is_empty() {
                let url = resolve_against(base_url, &block.content);
                out.push_target(
                    Line::from(vec![
                        Span::styled("▣ ", theme::dim()),
                        Span::styled(url.clone(), theme::link()),
                    ]),
                    Activation::Navigate(url),
                );
            }
        }
        BlockKind::Link => {
            let url = block.content.trim();
            if !url.is_empty() {
                out.push_target(
                    Line::from(vec![
                        Span::styled(url.to_string(), theme::link()),
                        Span::styled(" ↗", theme::dim()),
                    ]),
                    Activation::Navigate(url.to_string()),
                );
            }
        }
        BlockKind::Text => out.append(render_markdown(&block.content)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_against_base() {
        assert_eq!(
            resolve_against(Some("https://blog.example/posts/one"), "img/a.png"),
            "https://blog.example/posts/img/a.png"
        );
        assert_eq!(
            resolve_against(Some("https://blog.example/posts/one"), "/static/b.png"),
            "https://blog.example/static/b.png"
        );
        assert_eq!(
            resolve_against(Some("https://blog.example/"), "https://cdn.example/c.png"),
            "https://cdn.example/c.png"
        );
        assert_eq!(resolve_against(None, "img/a.png"), "img/a.png");
    }

    #[test]
    fn test_caption_precedes_every_kind() {
        for kind in [BlockKind::Code, BlockKind::Image, BlockKind::Link, BlockKind::Text] {
            let block = PreviewBlock::new(kind, "https://x.example/y").with_description("Caption");
            let out = render_block(&block, None);
            assert_eq!(out.plain_lines()[0], "Caption", "{kind:?}");
        }
    }

    #[test]
    fn test_code_defaults_to_text() {
        let out = render_block(&PreviewBlock::new(BlockKind::Code, "echo hi"), None);
        assert_eq!(out.plain_lines()[0], "┌─ text ");

        let out = render_block(
            &PreviewBlock::new(BlockKind::Code, "fn f() {}").with_language("rust"),
            None,
        );
        assert_eq!(out.plain_lines()[0], "┌─ rust ");
    }

    #[test]
    fn test_image_resolves_and_targets() {
        let out = render_block(
            &PreviewBlock::new(BlockKind::Image, "pic.png"),
            Some("https://site.example/a/page"),
        );
        assert_eq!(
            out.targets[0].activation,
            Activation::Navigate("https://site.example/a/pic.png".into())
        );
    }

    #[test]
    fn test_link_and_text() {
        let out = render_block(&PreviewBlock::new(BlockKind::Link, "https://l.example"), None);
        assert_eq!(out.plain_lines(), vec!["https://l.example ↗"]);
        assert_eq!(out.targets.len(), 1);

        let out = render_block(&PreviewBlock::new(BlockKind::Text, "Some **bold** text"), None);
        assert_eq!(out.plain_lines(), vec!["Some bold text"]);
    }
}
