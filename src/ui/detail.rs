//! Detail modal for a miscellaneous web hit.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Clear, Widget};
use tracing::debug;

use super::overlay_block;
use super::scroll::ScrollView;
use crate::model::OtherDetail;
use crate::render::sections::render_other_detail;

#[derive(Default)]
pub struct TuiDetail {
    detail: Option<OtherDetail>,
    view: ScrollView,
}

impl TuiDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.detail.is_some()
    }

    pub fn detail(&self) -> Option<&OtherDetail> {
        self.detail.as_ref()
    }

    /// Show `detail`, replacing whatever the modal showed before.
    pub fn open(&mut self, detail: OtherDetail) {
        debug!(title = ?detail.title, "opening detail modal");
        self.view.set_content(render_other_detail(&detail));
        self.detail = Some(detail);
    }

    pub fn close(&mut self) {
        self.detail = None;
        self.view.set_content(Default::default());
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
        let Some(detail) = &self.detail else {
            return;
        };
        let title = detail.title.as_deref().unwrap_or("Result");
        let block = overlay_block(title, "Tab/Enter open · Esc close");
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        self.view.render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;

    fn detail(title: &str) -> OtherDetail {
        OtherDetail {
            title: Some(title.into()),
            texts: vec![format!("{title} text")],
            images: Vec::new(),
            links: vec![Source::from_url("https://docs.rs")],
        }
    }

    #[test]
    fn test_open_replaces_previous_item() {
        let mut modal = TuiDetail::new();
        modal.open(detail("First"));
        modal.view_mut().move_focus(1);
        modal.open(detail("Second"));
        assert_eq!(modal.detail().and_then(|d| d.title.as_deref()), Some("Second"));
        assert_eq!(modal.view_mut().focus(), None);

        let area = Rect::new(0, 0, 40, 10);
        modal.layout(area);
        let mut buf = Buffer::empty(area);
        modal.render(area, &mut buf);
        let row: String = (0..40).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Second text"));
    }

    #[test]
    fn test_close() {
        let mut modal = TuiDetail::new();
        modal.open(detail("Only"));
        modal.close();
        assert!(!modal.is_open());
    }
}
