//! One renderer per answer-section variant.
//!
//! Each renderer hides only the fragment whose data is missing; a section
//! with nothing displayable renders as an empty [`Rendered`].

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use super::markdown::{render_code_block, render_markdown, DEFAULT_LANGUAGE};
use super::{theme, Activation, RenderContext, Rendered};
use crate::model::{
    CorpusCitation, EncyclopediaSection, GenericSection, InstantAnswerSection, NoteCitation,
    OtherDetail, OtherResultsSection, PromotedSection, ResponseBody, Source,
};
use crate::policy::{decide_open, OpenDecision};
use crate::text::{format_date, truncate_chars, ELLIPSIS};

/// Characters of a source snippet shown on its card.
const CARD_SNIPPET_CHARS: usize = 160;

/// Stack non-empty parts with a blank line between them.
fn join(parts: impl IntoIterator<Item = Rendered>) -> Rendered {
    let mut out = Rendered::new();
    for part in parts.into_iter().filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.blank();
        }
        out.append(part);
    }
    out
}

fn section_label(text: &str) -> Line<'static> {
    Line::styled(text.to_string(), theme::label())
}

fn topic_heading(topic: Option<&str>) -> Rendered {
    let mut out = Rendered::new();
    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        out.push(Line::styled(topic.to_string(), theme::heading(1)));
    }
    out
}

fn image_line(url: &str) -> (Line<'static>, Activation) {
    (
        Line::from(vec![
            Span::styled("▣ ", theme::dim()),
            Span::styled(url.to_string(), theme::link()),
        ]),
        Activation::Navigate(url.to_string()),
    )
}

/// A labeled list of images; nothing at all when `images` is empty.
fn image_strip(label: &str, images: &[String]) -> Rendered {
    let mut out = Rendered::new();
    if images.is_empty() {
        return out;
    }
    out.push(section_label(label));
    for url in images {
        let (line, activation) = image_line(url);
        out.push_target(line, activation);
    }
    out
}

/// A source card. Only actionable sources get a target; `open` picks what
/// activation does with the URL.
pub fn source_card(source: &Source, open: impl Fn(&Source) -> Activation) -> Rendered {
    let mut out = Rendered::new();
    let title = Line::from(vec![
        Span::styled("▸ ", theme::dim()),
        Span::styled(source.display_title(), theme::title()),
    ]);
    match source.actionable_url() {
        Some(url) => {
            out.push_target(title, open(source));
            out.push(Line::styled(format!("  {url}"), theme::dim()));
        }
        None => out.push(title),
    }
    if let Some(snippet) = source.snippet.as_deref().filter(|s| !s.trim().is_empty()) {
        let (kept, cut) = truncate_chars(snippet.trim(), CARD_SNIPPET_CHARS);
        let snippet = if cut { format!("{kept}{ELLIPSIS}") } else { kept };
        out.push(Line::styled(format!("  {snippet}"), theme::text()));
    }
    out
}

fn preview_card(source: &Source) -> Rendered {
    source_card(source, |s| Activation::Preview(s.clone()))
}

fn card_list(label: &str, sources: &[Source], open: impl Fn(&Source) -> Activation + Copy) -> Rendered {
    let mut out = Rendered::new();
    if sources.is_empty() {
        return out;
    }
    out.push(section_label(label));
    for source in sources {
        out.append(source_card(source, open));
    }
    out
}

fn plain_lines(text: &str, style: ratatui::style::Style) -> Rendered {
    let mut out = Rendered::new();
    for line in text.lines() {
        out.push(Line::styled(line.to_string(), style));
    }
    out
}

/// Normalized response body: snippets, markdown prose or preformatted text.
pub fn render_response(body: &ResponseBody) -> Rendered {
    match body {
        ResponseBody::Empty => Rendered::new(),
        ResponseBody::Prose(text) => render_markdown(text),
        ResponseBody::Preformatted(text) => plain_lines(text, theme::inline_code()),
        ResponseBody::Snippets(snippets) => join(snippets.iter().map(|snippet| {
            if snippet.is_code {
                let lang = snippet.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
                return render_code_block(&snippet.content, lang, snippet.label.as_deref());
            }
            let mut out = Rendered::new();
            if let Some(label) = &snippet.label {
                out.push(section_label(label));
            }
            out.append(plain_lines(&snippet.content, theme::text()));
            out
        })),
    }
}

fn captcha_frame(url: &str) -> Rendered {
    let mut out = Rendered::new();
    out.push(Line::styled("┌ Verification required", theme::warn()));
    out.push(Line::styled(
        "│ The search provider wants a captcha solved before answering.",
        theme::text(),
    ));
    out.push_target(
        Line::from(vec![
            Span::styled("│ ", theme::warn()),
            Span::styled(url.to_string(), theme::link()),
        ]),
        Activation::Navigate(url.to_string()),
    );
    out.push(Line::styled("└", theme::warn()));
    out
}

fn date_caption(date: Option<&str>) -> Rendered {
    let mut out = Rendered::new();
    if let Some(date) = date.filter(|d| !d.trim().is_empty()) {
        out.push(Line::styled(
            format_date(date),
            theme::dim().add_modifier(Modifier::ITALIC),
        ));
    }
    out
}

/// Default layout: topic, body, captcha, sources, date, gallery, citations.
pub fn render_generic(section: &GenericSection) -> Rendered {
    join([
        topic_heading(section.topic.as_deref()),
        render_response(&section.response),
        section.captcha_url.as_deref().map(captcha_frame).unwrap_or_default(),
        card_list("Sources", &section.sources, |s| Activation::Preview(s.clone())),
        date_caption(section.date.as_deref()),
        image_strip("Images", &section.images),
        render_notes(&section.notes),
        render_corpus(&section.knowledgebase),
    ])
}

/// `answer` layout: topic, leading image, body.
pub fn render_answer(section: &GenericSection) -> Rendered {
    let mut lead = Rendered::new();
    if let Some(url) = section.lead_image() {
        let (line, activation) = image_line(url);
        lead.push_target(line, activation);
    }
    join([
        topic_heading(section.topic.as_deref()),
        lead,
        render_response(&section.response),
        render_notes(&section.notes),
        render_corpus(&section.knowledgebase),
    ])
}

pub fn render_promoted(section: &PromotedSection) -> Rendered {
    let mut head = Rendered::new();
    if let Some((primary, badge)) = section.heading_parts() {
        let mut spans = vec![Span::styled(primary, theme::heading(1))];
        if let Some(badge) = badge {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {badge} "), theme::badge()));
        }
        head.push(Line::from(spans));
    }
    if let Some(url) = section.lead_image() {
        let (line, activation) = image_line(url);
        head.push_target(line, activation);
    }
    if let Some(description) = &section.description {
        head.append(plain_lines(description, theme::text()));
    }
    join([
        head,
        image_strip("Images", section.strip_images()),
        card_list("Links", &section.links, |s| {
            Activation::Navigate(s.actionable_url().unwrap_or_default().to_string())
        }),
    ])
}

pub fn render_encyclopedia(section: &EncyclopediaSection) -> Rendered {
    if section.is_empty() {
        return Rendered::new();
    }
    join([
        topic_heading(section.title.as_deref()),
        section
            .summary
            .as_deref()
            .map(|s| plain_lines(s, theme::text()))
            .unwrap_or_default(),
        card_list("References", &section.references, |s| Activation::Preview(s.clone())),
    ])
}

pub fn render_instant_answer(section: &InstantAnswerSection) -> Rendered {
    if !section.is_present() {
        return Rendered::new();
    }
    join([
        section
            .answer
            .as_deref()
            .map(|s| plain_lines(s, theme::text()))
            .unwrap_or_default(),
        section
            .card_link()
            .map(|link| preview_card(&Source::from_url(link)))
            .unwrap_or_default(),
    ])
}

pub fn render_other_results(section: &OtherResultsSection, ctx: &RenderContext<'_>) -> Rendered {
    let mut items = Rendered::new();
    if !section.items.is_empty() {
        items.push(section_label("Web results"));
    }
    for item in &section.items {
        let title = item.display_title();
        match decide_open(item, ctx.trusted) {
            OpenDecision::Navigate(url) => items.push_target(
                Line::from(vec![
                    Span::styled("◦ ", theme::dim()),
                    Span::styled(title, theme::title()),
                    Span::styled(" ↗", theme::dim()),
                ]),
                Activation::Navigate(url),
            ),
            OpenDecision::ShowDetail(detail) => items.push_target(
                Line::from(vec![
                    Span::styled("◦ ", theme::dim()),
                    Span::styled(title, theme::title()),
                    Span::styled(" ⋯", theme::dim()),
                ]),
                Activation::ShowDetail(detail),
            ),
            OpenDecision::Ignore => items.push(Line::styled(format!("◦ {title}"), theme::dim())),
        }
        if let Some(link) = item.actionable_link() {
            items.push(Line::styled(format!("  {link}"), theme::dim()));
        }
    }
    join([
        section.summary.as_deref().map(render_markdown).unwrap_or_default(),
        items,
    ])
}

fn push_citation_head(out: &mut Rendered, title: &str, relevance: String, open: Option<Activation>) {
    let line = Line::from(vec![
        Span::styled("┃ ", theme::dim()),
        Span::styled(title.to_string(), theme::title()),
        Span::styled(format!("  {relevance}"), theme::warn()),
    ]);
    match open {
        Some(activation) => out.push_target(line, activation),
        None => out.push(line),
    }
}

pub fn render_notes(notes: &[NoteCitation]) -> Rendered {
    let mut out = Rendered::new();
    if notes.is_empty() {
        return out;
    }
    out.push(section_label("Notes"));
    for note in notes {
        let open = note.id.clone().map(Activation::OpenNote);
        push_citation_head(&mut out, note.display_title(), note.relevance(), open);
        out.push(Line::styled(format!("┃ {}", note.excerpt()), theme::text()));
    }
    out
}

pub fn render_corpus(entries: &[CorpusCitation]) -> Rendered {
    let mut out = Rendered::new();
    if entries.is_empty() {
        return out;
    }
    out.push(section_label("Knowledgebase"));
    for entry in entries {
        let open = entry.id.clone().map(Activation::OpenCorpus);
        push_citation_head(&mut out, entry.display_title(), entry.relevance(), open);
        out.push(Line::styled(format!("┃ {}", entry.excerpt()), theme::text()));

        let mut meta = vec![Span::styled("┃ ", theme::dim())];
        if let Some(name) = &entry.knowledgebase_name {
            meta.push(Span::styled(name.clone(), theme::dim().add_modifier(Modifier::BOLD)));
        }
        for keyword in entry.keyword_chips() {
            meta.push(Span::raw(" "));
            meta.push(Span::styled(format!(" {keyword} "), theme::inline_code()));
        }
        if meta.len() > 1 {
            out.push(Line::from(meta));
        }
    }
    out
}

/// Body of the detail modal for a miscellaneous hit.
pub fn render_other_detail(detail: &OtherDetail) -> Rendered {
    let mut texts = Rendered::new();
    for (idx, text) in detail.texts.iter().enumerate() {
        if idx > 0 {
            texts.blank();
        }
        texts.append(render_markdown(text));
    }
    join([
        texts,
        image_strip("Images", &detail.images),
        card_list("Links", &detail.links, |s| Activation::Preview(s.clone())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerSection;
    use crate::policy::TrustedDomains;
    use serde_json::json;

    fn generic(value: serde_json::Value) -> GenericSection {
        GenericSection::from_value(&value)
    }

    #[test]
    fn test_generic_layout_order() {
        let out = render_generic(&generic(json!({
            "topic": "Tokio",
            "response": "An async runtime.",
            "sources": [{"title": "Docs", "url": "https://tokio.rs"}],
            "date": "2024-03-01T10:15:00Z",
            "images": ["https://img/1.png"]
        })));
        let lines = out.plain_lines();
        let pos = |needle: &str| lines.iter().position(|l| l.contains(needle)).unwrap();
        assert!(pos("Tokio") < pos("An async runtime."));
        assert!(pos("An async runtime.") < pos("Sources"));
        assert!(pos("Sources") < pos("2024-03-01 10:15"));
        assert!(pos("2024-03-01 10:15") < pos("Images"));
        assert_eq!(out.targets.len(), 2);
        assert_eq!(
            out.targets[0].activation,
            Activation::Preview(Source::from_url("https://tokio.rs").with_title("Docs"))
        );
    }

    #[test]
    fn test_empty_generic_renders_nothing() {
        assert!(render_generic(&generic(json!({}))).is_empty());
        assert!(render_generic(&generic(json!({"response": null, "images": [null, ""]}))).is_empty());
    }

    #[test]
    fn test_missing_fragments_hide_only_themselves() {
        let out = render_generic(&generic(json!({"response": "Only prose"})));
        assert_eq!(out.plain_lines(), vec!["Only prose"]);
    }

    #[test]
    fn test_captcha_frame_targets_url() {
        let out = render_generic(&generic(json!({"captchaUrl": "https://search/captcha"})));
        assert_eq!(
            out.targets[0].activation,
            Activation::Navigate("https://search/captcha".into())
        );
    }

    #[test]
    fn test_source_without_url_renders_but_is_inert() {
        let out = render_generic(&generic(json!({"sources": [{"title": "Offline paper"}]})));
        assert!(out.plain_lines().iter().any(|l| l.contains("Offline paper")));
        assert!(out.targets.is_empty());
    }

    #[test]
    fn test_answer_layout_leads_with_image() {
        let out = render_answer(&generic(json!({
            "type": "answer", "topic": "T", "images": [null, "https://i/1.png", "https://i/2.png"], "response": "Body"
        })));
        assert_eq!(out.plain_lines(), vec!["T", "", "▣ https://i/1.png", "", "Body"]);
    }

    #[test]
    fn test_snippets_each_render_independently() {
        let out = render_response(&ResponseBody::from_value(Some(&json!([
            {"title": "Install", "code": "cargo add serde"},
            {"content": "Then derive."}
        ]))));
        let lines = out.plain_lines();
        assert_eq!(lines[0], "┌─ Install ");
        assert!(lines.contains(&"Then derive.".to_string()));
    }

    #[test]
    fn test_promoted_badge_and_labels() {
        let section = PromotedSection::from_value(&json!({
            "heading": "Acme Corp - Sponsored",
            "images": ["https://i/lead.png"],
            "links": [{"title": "Shop", "url": "https://acme.example/shop"}]
        }));
        let out = render_promoted(&section);
        let lines = out.plain_lines();
        assert_eq!(lines[0], "Acme Corp  Sponsored ");
        assert!(!lines.iter().any(|l| l == "Images"));
        assert!(lines.iter().any(|l| l == "Links"));
        assert!(out
            .targets
            .iter()
            .any(|t| t.activation == Activation::Navigate("https://acme.example/shop".into())));
    }

    #[test]
    fn test_promoted_without_separator_has_no_badge() {
        let out = render_promoted(&PromotedSection::from_value(&json!({"heading": "Acme Corp"})));
        assert_eq!(out.plain_lines(), vec!["Acme Corp"]);
    }

    #[test]
    fn test_encyclopedia_suppresses_empty_references() {
        let out = render_encyclopedia(&EncyclopediaSection::from_value(&json!({
            "summary": "Line one\nLine two", "references": [null, ""]
        })));
        assert_eq!(out.plain_lines(), vec!["Line one", "Line two"]);
        assert!(render_encyclopedia(&EncyclopediaSection::default()).is_empty());
    }

    #[test]
    fn test_instant_answer() {
        assert!(render_instant_answer(&InstantAnswerSection::default()).is_empty());
        let out = render_instant_answer(&InstantAnswerSection::from_value(&json!({
            "answer": "42", "link": " https://ddg.example/a "
        })));
        assert_eq!(out.plain_lines()[0], "42");
        assert_eq!(
            out.targets[0].activation,
            Activation::Preview(Source::from_url("https://ddg.example/a"))
        );
    }

    #[test]
    fn test_other_results_open_policy() {
        let section = OtherResultsSection::from_value(&json!({
            "response": "More:",
            "data": [
                {"link": "https://github.com/foo/bar", "data": {"texts": ["repo"]}},
                {"link": "https://example.com/page", "data": {"texts": [], "images": [], "links": []}},
                {"title": "Rich", "data": {"texts": ["para"]}},
                {"title": "Nothing"}
            ]
        }));
        let trusted = TrustedDomains::default();
        let out = render_other_results(&section, &RenderContext { trusted: &trusted });
        let activations: Vec<_> = out.targets.iter().map(|t| t.activation.clone()).collect();
        assert_eq!(
            activations,
            vec![
                Activation::Navigate("https://github.com/foo/bar".into()),
                Activation::Navigate("https://example.com/page".into()),
                Activation::ShowDetail(OtherDetail {
                    title: Some("Rich".into()),
                    texts: vec!["para".into()],
                    ..OtherDetail::default()
                }),
            ]
        );
        assert!(out.plain_lines().iter().any(|l| l == "◦ Nothing"));
    }

    #[test]
    fn test_note_cards() {
        let notes: Vec<_> = [
            json!({"id": "n1", "title": "Meeting", "body": "x".repeat(250), "similarity": 0.8734}),
            json!({"id": "n2", "body": "<p></p>", "similarity": 0.1}),
        ]
        .iter()
        .filter_map(NoteCitation::from_value)
        .collect();
        let out = render_notes(&notes);
        let lines = out.plain_lines();
        assert_eq!(lines[1], "┃ Meeting  87%");
        assert_eq!(lines[2], format!("┃ {}...", "x".repeat(200)));
        assert_eq!(lines[3], "┃ Untitled  10%");
        assert_eq!(lines[4], "┃ No content");
        assert_eq!(out.targets[0].activation, Activation::OpenNote("n1".into()));
        assert!(render_notes(&[]).is_empty());
    }

    #[test]
    fn test_corpus_cards_show_kb_and_three_keywords() {
        let entry = CorpusCitation::from_value(&json!({
            "id": "c9", "title": "Deploy", "body": "steps", "similarity": 0.42,
            "knowledgebaseName": "Ops", "keywords": ["k8s", "helm", "ci", "extra"]
        }))
        .unwrap();
        let out = render_corpus(&[entry]);
        let lines = out.plain_lines();
        assert_eq!(lines[3], "┃ Ops  k8s   helm   ci ");
        assert_eq!(out.targets[0].activation, Activation::OpenCorpus("c9".into()));
    }

    #[test]
    fn test_generic_section_carries_citations() {
        let section = AnswerSection::classify(&json!({
            "response": "see notes",
            "notes": [{"id": "n", "title": "N", "similarity": 1}]
        }));
        let AnswerSection::Generic(generic) = section else { panic!("expected generic") };
        let out = render_generic(&generic);
        assert!(out.plain_lines().iter().any(|l| l == "Notes"));
    }

    #[test]
    fn test_other_detail_lists_texts_images_and_links() {
        let detail = OtherDetail {
            title: Some("Crate page".into()),
            texts: vec!["First fact.".into(), "Second fact.".into()],
            images: vec!["https://img.io/a.png".into()],
            links: vec![Source::from_url("https://docs.rs/x").with_title("Docs")],
        };
        let out = render_other_detail(&detail);
        let text = out.plain_lines();
        assert_eq!(text[0], "First fact.");
        assert!(text.contains(&"Images".to_string()));
        assert!(text.contains(&"Links".to_string()));
        assert_eq!(out.targets.len(), 2);
        assert_eq!(out.targets[0].activation, Activation::Navigate("https://img.io/a.png".into()));
        assert!(matches!(out.targets[1].activation, Activation::Preview(_)));
        assert!(render_other_detail(&OtherDetail::default()).is_empty());
    }
}
