use tracing::trace;

use super::sections::{
    render_answer, render_encyclopedia, render_generic, render_instant_answer, render_other_results,
    render_promoted,
};
use super::{RenderContext, Rendered};
use crate::model::AnswerSection;

/// Render one section with the renderer for its variant.
pub fn render_section(section: &AnswerSection, ctx: &RenderContext<'_>) -> Rendered {
    let rendered = match section {
        AnswerSection::Answer(s) => render_answer(s),
        AnswerSection::Promoted(s) => render_promoted(s),
        AnswerSection::Encyclopedia(s) => render_encyclopedia(s),
        AnswerSection::InstantAnswer(s) => render_instant_answer(s),
        AnswerSection::OtherResults(s) => render_other_results(s, ctx),
        AnswerSection::Generic(s) => render_generic(s),
    };
    trace!(
        kind = section.kind_name(),
        lines = rendered.len(),
        targets = rendered.targets.len(),
        "rendered section"
    );
    rendered
}

/// Render every section of an AI turn, separated by a blank line.
pub fn render_sections(sections: &[AnswerSection], ctx: &RenderContext<'_>) -> Rendered {
    let mut out = Rendered::new();
    for rendered in sections.iter().map(|s| render_section(s, ctx)) {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::TrustedDomains;
    use serde_json::json;

    fn render(value: serde_json::Value) -> Vec<String> {
        let trusted = TrustedDomains::default();
        let ctx = RenderContext { trusted: &trusted };
        render_section(&AnswerSection::classify(&value), &ctx).plain_lines()
    }

    #[test]
    fn test_unknown_type_uses_generic_layout() {
        assert_eq!(
            render(json!({"type": "weather", "topic": "Rain", "response": "Bring a coat."})),
            vec!["Rain", "", "Bring a coat."]
        );
    }

    #[test]
    fn test_each_variant_dispatches() {
        assert_eq!(render(json!({"type": "promoted", "heading": "Ad"})), vec!["Ad"]);
        assert_eq!(
            render(json!({"type": "wikipedia", "data": {"summary": "Summary"}})),
            vec!["Summary"]
        );
        assert_eq!(render(json!({"type": "duckduckgo", "answer": "42"})), vec!["42"]);
        assert_eq!(
            render(json!({"type": "others", "response": "More"})),
            vec!["More"]
        );
    }

    #[test]
    fn test_absent_variants_render_nothing() {
        assert!(render(json!({"type": "duckduckgo"})).is_empty());
        assert!(render(json!({"type": "wikipedia"})).is_empty());
    }

    #[test]
    fn test_sections_skip_empty_ones() {
        let trusted = TrustedDomains::default();
        let ctx = RenderContext { trusted: &trusted };
        let sections = vec![
            AnswerSection::classify(&json!({"response": "one"})),
            AnswerSection::classify(&json!({"type": "duckduckgo"})),
            AnswerSection::classify(&json!({"response": "two"})),
        ];
        assert_eq!(render_sections(&sections, &ctx).plain_lines(), vec!["one", "", "two"]);
    }
}
