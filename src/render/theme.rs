//! Palette shared by every renderer.

use ratatui::style::{Color, Modifier, Style};

pub const TEXT: Color = Color::Rgb(205, 205, 200);
pub const DIM: Color = Color::Rgb(110, 110, 110);
pub const ACCENT: Color = Color::Rgb(120, 180, 255);
pub const LINK: Color = Color::Rgb(100, 170, 240);
pub const BADGE: Color = Color::Rgb(240, 190, 90);
pub const WARN: Color = Color::Rgb(230, 180, 80);
pub const CODE_FG: Color = Color::Rgb(180, 180, 180);
pub const CODE_BG: Color = Color::Rgb(45, 45, 45);
pub const QUOTE: Color = Color::Rgb(150, 150, 140);
pub const HEADING_H1: Color = Color::Rgb(255, 215, 100);
pub const HEADING_H2: Color = Color::Rgb(240, 190, 90);
pub const HEADING: Color = Color::Rgb(220, 170, 80);
pub const HUMAN: Color = Color::Rgb(120, 200, 220);
pub const AI: Color = Color::Rgb(140, 210, 140);

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn dim() -> Style {
    Style::default().fg(DIM)
}

pub fn label() -> Style {
    Style::default().fg(DIM).add_modifier(Modifier::BOLD)
}

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn link() -> Style {
    Style::default().fg(LINK).add_modifier(Modifier::UNDERLINED)
}

pub fn badge() -> Style {
    Style::default().fg(Color::Black).bg(BADGE)
}

pub fn warn() -> Style {
    Style::default().fg(WARN)
}

pub fn inline_code() -> Style {
    Style::default().fg(CODE_FG).bg(CODE_BG)
}

pub fn heading(level: u8) -> Style {
    let color = match level {
        1 => HEADING_H1,
        2 => HEADING_H2,
        _ => HEADING,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn focused() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}
