//! Scrollable, focusable view over rendered lines.
//!
//! Every surface (message list, preview body, detail modal, viewer) keeps
//! one. The view wraps its content to the width it was last laid out at and
//! tracks which target has keyboard focus.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

use crate::render::{theme, Activation, Rendered};

#[derive(Debug, Clone, Default)]
pub struct ScrollView {
    content: Rendered,
    wrapped: Rendered,
    wrapped_width: Option<u16>,
    area: Rect,
    scroll: usize,
    focus: Option<usize>,
}

impl ScrollView {
    pub fn new(content: Rendered) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Replace the content; scroll and focus start over.
    pub fn set_content(&mut self, content: Rendered) {
        self.content = content;
        self.scroll = 0;
        self.focus = None;
        self.rewrap();
    }

    pub fn content(&self) -> &Rendered {
        &self.content
    }

    /// Lay out for `area`, re-wrapping when the width changed.
    pub fn layout(&mut self, area: Rect) {
        self.area = area;
        if self.wrapped_width != Some(area.width) {
            self.wrapped_width = Some(area.width);
            self.rewrap();
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn rewrap(&mut self) {
        let Some(width) = self.wrapped_width else {
            return;
        };
        self.wrapped = self.content.wrapped(usize::from(width));
        // Keep the focused target's line in view across a reflow.
        self.reveal_focus();
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn lines(&self) -> &Rendered {
        if self.wrapped_width.is_some() {
            &self.wrapped
        } else {
            &self.content
        }
    }

    pub fn max_scroll(&self) -> usize {
        self.lines().len().saturating_sub(usize::from(self.area.height))
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let next = self.scroll.saturating_add_signed(delta);
        self.scroll = next.min(self.max_scroll());
    }

    pub fn page(&mut self, pages: isize) {
        let height = usize::from(self.area.height.max(1)).saturating_sub(1).max(1);
        self.scroll_by(pages.saturating_mul(height as isize));
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn target_count(&self) -> usize {
        self.content.targets.len()
    }

    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Move focus by `step` targets, wrapping around.
    pub fn move_focus(&mut self, step: isize) {
        let count = self.target_count();
        if count == 0 {
            self.focus = None;
            return;
        }
        let next = match self.focus {
            None if step >= 0 => 0,
            None => count - 1,
            Some(current) => (current as isize + step).rem_euclid(count as isize) as usize,
        };
        self.focus = Some(next);
        self.reveal_focus();
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.target_count() {
            self.focus = Some(index);
            self.reveal_focus();
        }
    }

    pub fn focused_activation(&self) -> Option<&Activation> {
        self.focus
            .and_then(|idx| self.content.targets.get(idx))
            .map(|t| &t.activation)
    }

    fn focused_row(&self) -> Option<usize> {
        self.focus
            .and_then(|idx| self.lines().targets.get(idx))
            .map(|t| t.line)
    }

    fn reveal_focus(&mut self) {
        let Some(row) = self.focused_row() else {
            return;
        };
        let height = usize::from(self.area.height.max(1));
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + height {
            self.scroll = row + 1 - height;
        }
    }

    /// Index of the target drawn at screen position `(col, row)`.
    pub fn target_at(&self, col: u16, row: u16) -> Option<usize> {
        let area = self.area;
        if col < area.x || col >= area.x + area.width || row < area.y || row >= area.y + area.height {
            return None;
        }
        let line = self.scroll + usize::from(row - area.y);
        self.lines().targets.iter().position(|t| t.line == line)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let focused_row = self.focused_row();
        let height = usize::from(area.height);
        let visible: Vec<Line<'static>> = self
            .lines()
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(height)
            .map(|(row, line)| {
                if Some(row) == focused_row {
                    line.clone().patch_style(theme::focused())
                } else {
                    line.clone()
                }
            })
            .collect();
        Paragraph::new(visible).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize, targets: &[usize]) -> Rendered {
        let mut out = Rendered::new();
        for i in 0..count {
            if targets.contains(&i) {
                out.push_target(format!("line {i}"), Activation::Navigate(format!("u{i}")));
            } else {
                out.push(format!("line {i}"));
            }
        }
        out
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = ScrollView::new(numbered(10, &[]));
        view.layout(Rect::new(0, 0, 20, 4));
        view.scroll_by(100);
        assert_eq!(view.scroll(), 6);
        view.scroll_by(-100);
        assert_eq!(view.scroll(), 0);
    }

    #[test]
    fn test_focus_cycles_and_scrolls_into_view() {
        let mut view = ScrollView::new(numbered(20, &[1, 15]));
        view.layout(Rect::new(0, 0, 20, 5));
        view.move_focus(1);
        assert_eq!(view.focused_activation(), Some(&Activation::Navigate("u1".into())));
        assert_eq!(view.scroll(), 0);
        view.move_focus(1);
        assert_eq!(view.focused_activation(), Some(&Activation::Navigate("u15".into())));
        assert_eq!(view.scroll(), 11);
        view.move_focus(1);
        assert_eq!(view.focus(), Some(0));
        assert_eq!(view.scroll(), 1);
        view.move_focus(-1);
        assert_eq!(view.focus(), Some(1));
    }

    #[test]
    fn test_no_targets_no_focus() {
        let mut view = ScrollView::new(numbered(3, &[]));
        view.move_focus(1);
        assert_eq!(view.focus(), None);
        assert_eq!(view.focused_activation(), None);
    }

    #[test]
    fn test_target_at_accounts_for_scroll() {
        let mut view = ScrollView::new(numbered(10, &[6]));
        view.layout(Rect::new(2, 3, 20, 4));
        view.scroll_by(4);
        assert_eq!(view.target_at(5, 5), Some(0));
        assert_eq!(view.target_at(5, 4), None);
        assert_eq!(view.target_at(0, 5), None);
    }

    #[test]
    fn test_render_highlights_focus() {
        let mut view = ScrollView::new(numbered(3, &[1]));
        let area = Rect::new(0, 0, 10, 3);
        view.layout(area);
        view.move_focus(1);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        assert_eq!(buf[(0, 1)].symbol(), "l");
        assert!(buf[(0, 1)].modifier.contains(ratatui::style::Modifier::REVERSED));
        assert!(!buf[(0, 0)].modifier.contains(ratatui::style::Modifier::REVERSED));
    }
}
