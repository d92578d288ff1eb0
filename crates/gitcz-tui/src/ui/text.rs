use ratatui::layout::Alignment;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

pub(crate) fn wrapped_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a, T>(text: T) -> Paragraph<'a>
where
    T: Into<Text<'a>>,
{
    wrapped_paragraph(text).alignment(Alignment::Center)
}

pub(crate) fn key_hint_height(total_width: u16, text: &str) -> u16 {
    let content_width = total_width.saturating_sub(2).max(1) as usize;
    let lines = wrapped_line_count(text, content_width);
    lines.saturating_add(2).max(3)
}

/// Rows `lines` occupy once wrapped to `width` columns.
pub(crate) fn rendered_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines.iter().fold(0u16, |total, line| {
        let content = line_content(line);
        total.saturating_add(wrapped_line_count_single(&content, width))
    })
}

pub(crate) fn prompt_span(prompt: &str) -> Span<'static> {
    Span::styled(format!("{prompt}: "), theme::prompt())
}

pub(crate) fn label_value_line(
    label: impl Into<String>,
    value: impl Into<String>,
) -> Line<'static> {
    let label = label.into();
    Line::from(vec![prompt_span(&label), Span::raw(value.into())])
}

pub(crate) fn error_line(message: &str) -> Line<'static> {
    Line::from(Span::styled(format!("✕ {message}"), theme::error_prompt()))
}

/// Splits `value` around the character at `cursor` so the caret can be
/// drawn as a reversed cell. A caret past the end is drawn as a space.
pub(crate) fn cursor_spans(value: &str, cursor: usize) -> Vec<Span<'static>> {
    let before: String = value.chars().take(cursor).collect();
    let mut rest = value.chars().skip(cursor);
    let at = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = rest.collect();

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::raw(before));
    }
    spans.push(Span::styled(at, theme::text_cursor()));
    if !after.is_empty() {
        spans.push(Span::raw(after));
    }
    spans
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Unstyled content of rendered lines, one `\n`-separated row per line.
#[cfg(test)]
pub(crate) fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(line_content)
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_content(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

fn wrapped_line_count(text: &str, width: usize) -> u16 {
    if text.is_empty() {
        return 1;
    }

    let mut total = 0u16;
    for line in text.split('\n') {
        total = total.saturating_add(wrapped_line_count_single(line, width));
    }

    total.max(1)
}

fn wrapped_line_count_single(line: &str, width: usize) -> u16 {
    if line.is_empty() {
        return 1;
    }

    let mut lines = 1u16;
    let mut used = 0usize;
    for ch in line.chars() {
        let mut remaining = if ch == '\t' { 4 } else { 1 };
        while remaining > 0 {
            let space_left = width.saturating_sub(used);
            if space_left == 0 {
                lines = lines.saturating_add(1);
                used = 0;
                continue;
            }
            if remaining > space_left {
                remaining -= space_left;
                lines = lines.saturating_add(1);
                used = 0;
            } else {
                used += remaining;
                remaining = 0;
            }
        }
    }

    lines.max(1)
}

#[cfg(test)]
mod tests {
    use ratatui::style::Modifier;
    use ratatui::text::Line;

    use super::{
        cursor_spans, error_line, key_hint_height, label_value_line, plain_text,
        rendered_height, wrapped_line_count_single, yes_no,
    };

    #[test]
    fn key_hint_height_is_single_line_when_hint_fits() {
        assert_eq!(key_hint_height(80, "Enter: continue    Ctrl+C: quit"), 3);
    }

    #[test]
    fn key_hint_height_grows_when_hint_wraps() {
        let height = key_hint_height(20, "Enter: continue    Up/Down or j/k: move    Esc: quit");
        assert!(height > 3);
    }

    #[test]
    fn wrapped_line_count_preserves_repeated_spaces() {
        assert_eq!(wrapped_line_count_single("a    b", 3), 2);
        assert_eq!(wrapped_line_count_single("a b", 3), 1);
    }

    #[test]
    fn rendered_height_sums_wrapped_rows() {
        let lines = vec![Line::from("abcdef"), Line::from(""), Line::from("ab")];
        assert_eq!(rendered_height(&lines, 3), 4);
    }

    #[test]
    fn cursor_spans_reverse_the_character_under_the_caret() {
        let spans = cursor_spans("abc", 1);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content.as_ref(), "b");
        assert!(spans[1].style.add_modifier.contains(Modifier::REVERSED));

        let spans = cursor_spans("abc", 3);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content.as_ref(), " ");
    }

    #[test]
    fn label_value_and_error_lines_render_plain_text() {
        let lines = vec![label_value_line("Scope", "api"), error_line("bad")];
        assert_eq!(plain_text(&lines), "Scope: api\n✕ bad");
    }

    #[test]
    fn yes_no_maps_boolean_values() {
        assert_eq!(yes_no(true), "Yes");
        assert_eq!(yes_no(false), "No");
    }
}
