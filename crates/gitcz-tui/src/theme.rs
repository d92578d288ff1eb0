use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

const ACCENT: Color = Color::Rgb(0xbb, 0x9a, 0xf7);

pub(crate) fn chrome<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn key_block() -> Block<'static> {
    chrome("Keys")
}

pub(crate) fn prompt() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn icon() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub(crate) fn cursor_item() -> Style {
    Style::default().fg(ACCENT)
}

pub(crate) fn choice_highlight() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn choice_idle() -> Style {
    Style::default().bg(Color::Rgb(0x1e, 0x1e, 0x2e))
}

pub(crate) fn text_cursor() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub(crate) fn preview() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn error_prompt() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
