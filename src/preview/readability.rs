//! Local summarizer: pulls typed blocks out of a page's main content.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{SummarizeError, Summarizer};
use crate::model::{BlockKind, PreviewBlock};
use crate::text::compact_ws;

pub const MAX_BLOCKS: usize = 40;

const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, pre, img, li";
const CHROME: &[&str] = &["nav", "footer", "aside", "header", "form", "noscript", "script", "style"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilitySummarizer;

#[async_trait]
impl Summarizer for ReadabilitySummarizer {
    async fn summarize(&self, html: &str) -> Result<Vec<Option<PreviewBlock>>, SummarizeError> {
        Ok(extract_blocks(html).into_iter().map(Some).collect())
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| document.select(&sel).next())
}

fn text_of(el: ElementRef<'_>) -> String {
    compact_ws(&el.text().collect::<String>())
}

fn in_chrome(el: ElementRef<'_>, root: ElementRef<'_>) -> bool {
    el.ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|a| CHROME.contains(&a.value().name()) || a.value().name() == "pre")
}

fn code_language(pre: ElementRef<'_>) -> Option<String> {
    let code = Selector::parse("code")
        .ok()
        .and_then(|sel| pre.select(&sel).next());
    [Some(pre), code]
        .into_iter()
        .flatten()
        .flat_map(|el| el.value().classes())
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|lang| !lang.is_empty())
                .map(str::to_string)
        })
}

/// A list item whose whole text is one absolute link.
fn standalone_link(li: ElementRef<'_>) -> Option<PreviewBlock> {
    let sel = Selector::parse("a[href]").ok()?;
    let mut anchors = li.select(&sel);
    let anchor = anchors.next()?;
    if anchors.next().is_some() || text_of(anchor) != text_of(li) {
        return None;
    }
    let href = anchor.value().attr("href")?.trim();
    if !(href.starts_with("http://") || href.starts_with("https://")) {
        return None;
    }
    let block = PreviewBlock::new(BlockKind::Link, href);
    let label = text_of(anchor);
    Some(if label.is_empty() { block } else { block.with_description(label) })
}

fn block_of(el: ElementRef<'_>) -> Option<PreviewBlock> {
    let name = el.value().name();
    match name {
        "pre" => {
            let code = el.text().collect::<String>();
            let code = code.trim_matches('\n');
            if code.trim().is_empty() {
                return None;
            }
            let block = PreviewBlock::new(BlockKind::Code, code);
            Some(match code_language(el) {
                Some(lang) => block.with_language(lang),
                None => block,
            })
        }
        "img" => {
            let src = el.value().attr("src")?.trim();
            if src.is_empty() || src.starts_with("data:") {
                return None;
            }
            let block = PreviewBlock::new(BlockKind::Image, src);
            Some(match el.value().attr("alt").map(compact_ws).filter(|a| !a.is_empty()) {
                Some(alt) => block.with_description(alt),
                None => block,
            })
        }
        "li" => {
            if let Some(link) = standalone_link(el) {
                return Some(link);
            }
            let has_blocks = Selector::parse("p, pre, ul, ol")
                .ok()
                .is_some_and(|sel| el.select(&sel).next().is_some());
            let text = text_of(el);
            (!has_blocks && !text.is_empty()).then(|| PreviewBlock::new(BlockKind::Text, format!("- {text}")))
        }
        heading if heading.len() == 2 && heading.starts_with('h') => {
            let level = heading[1..].parse::<usize>().ok()?;
            let text = text_of(el);
            (!text.is_empty())
                .then(|| PreviewBlock::new(BlockKind::Text, format!("{} {text}", "#".repeat(level))))
        }
        _ => {
            let text = text_of(el);
            (!text.is_empty()).then(|| PreviewBlock::new(BlockKind::Text, text))
        }
    }
}

/// Up to [`MAX_BLOCKS`] blocks from `article`, else `main`, else `body`, in
/// document order.
pub fn extract_blocks(html: &str) -> Vec<PreviewBlock> {
    let document = Html::parse_document(html);
    let Some(root) = select_first(&document, "article")
        .or_else(|| select_first(&document, "main"))
        .or_else(|| select_first(&document, "body"))
    else {
        return Vec::new();
    };
    let Ok(blocks) = Selector::parse(BLOCK_SELECTOR) else {
        return Vec::new();
    };
    root.select(&blocks)
        .filter(|el| !in_chrome(*el, root))
        .filter(|el| {
            // Paragraphs inside list items are covered by the item.
            el.value().name() != "p"
                || !el
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|a| a.value().name() == "li")
        })
        .filter_map(block_of)
        .take(MAX_BLOCKS)
        .collect()
}
