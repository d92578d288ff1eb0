use std::fmt;

use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::keymap::{self, SelectorKeys};
use crate::step::{Flow, Step};
use crate::theme;
use crate::ui::text::prompt_span;

const DEFAULT_PROMPT: &str = "Select";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("invalid display size {0}, must be a positive integer")]
    InvalidDisplaySize(usize),
}

/// Single-choice list chooser that shows at most `display_size` items at a
/// time. In cyclic mode both the cursor and the visible window wrap around.
#[derive(Debug, Clone)]
pub struct Selector<T> {
    prompt: String,
    items: Vec<T>,
    cursor: usize,
    start: usize,
    display_size: usize,
    cyclic: bool,
    show_selected: bool,
    selected: bool,
    keys: SelectorKeys,
}

impl<T: fmt::Display> Selector<T> {
    pub fn new(items: Vec<T>, display_size: usize, keys: SelectorKeys) -> Result<Self, SelectorError> {
        if display_size == 0 {
            return Err(SelectorError::InvalidDisplaySize(display_size));
        }

        Ok(Self {
            prompt: DEFAULT_PROMPT.to_string(),
            items,
            cursor: 0,
            start: 0,
            display_size,
            cyclic: false,
            show_selected: false,
            selected: false,
            keys,
        })
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_show_selected(mut self, show_selected: bool) -> Self {
        self.show_selected = show_selected;
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        if self.selected {
            self.items.get(self.cursor)
        } else {
            None
        }
    }

    /// Visible range as `[start, end)`. When the window wraps, `end <= start`
    /// and the range continues from index 0.
    pub fn display_window(&self) -> (usize, usize) {
        let len = self.items.len();
        let end = self.start + self.window_len();
        if self.cyclic && len > 0 {
            (self.start, end % len)
        } else {
            (self.start, end)
        }
    }

    pub fn move_up(&mut self) {
        let len = self.items.len();
        if self.selected || len == 0 {
            return;
        }

        if self.cyclic {
            self.cursor = (self.cursor + len - 1) % len;
            if self.scrolls() {
                self.start = (self.start + len - 1) % len;
            }
            return;
        }

        if self.start != 0 && self.cursor <= self.midpoint() {
            self.start -= 1;
        }
        if self.cursor != 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let len = self.items.len();
        if self.selected || len == 0 {
            return;
        }

        if self.cyclic {
            self.cursor = (self.cursor + 1) % len;
            let offset = (self.cursor + len - self.start) % len;
            if self.scrolls() && offset >= self.window_len() / 2 {
                self.start = (self.start + 1) % len;
            }
            return;
        }

        if self.start + self.window_len() != len && self.cursor >= self.midpoint() {
            self.start += 1;
        }
        if self.cursor + 1 != len {
            self.cursor += 1;
        }
    }

    /// Locks in the item under the cursor. An empty list cannot be selected.
    pub fn select(&mut self) {
        if !self.items.is_empty() {
            self.selected = true;
        }
    }

    fn window_len(&self) -> usize {
        self.display_size.min(self.items.len())
    }

    fn scrolls(&self) -> bool {
        self.display_size < self.items.len()
    }

    fn midpoint(&self) -> usize {
        (self.start + self.window_len() / 2) % self.items.len()
    }

    fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        let len = self.items.len();
        (0..self.window_len()).map(move |offset| (self.start + offset) % len)
    }
}

impl<T: fmt::Display> Step for Selector<T> {
    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if self.keys.quit.matches(key) {
            return Flow::Quit;
        }

        if self.keys.up.matches(key) {
            self.move_up();
        } else if self.keys.down.matches(key) {
            self.move_down();
        } else if self.keys.select.matches(key) {
            self.select();
        }

        Flow::Continue
    }

    fn is_finished(&self) -> bool {
        self.selected
    }

    fn render(&self) -> Vec<Line<'static>> {
        if let Some(item) = self.selected_item() {
            if !self.show_selected {
                return Vec::new();
            }
            return vec![Line::from(vec![
                prompt_span(&self.prompt),
                Span::raw(item.to_string()),
            ])];
        }

        let mut lines = vec![Line::from(prompt_span(&self.prompt))];
        lines.extend(self.visible_indices().map(|index| {
            let label = self.items[index].to_string();
            if index == self.cursor {
                Line::from(Span::styled(format!("> {label}"), theme::cursor_item()))
            } else {
                Line::from(format!("  {label}"))
            }
        }));
        lines
    }

    fn key_hint(&self) -> String {
        keymap::hint(&[
            &self.keys.up,
            &self.keys.down,
            &self.keys.select,
            &self.keys.quit,
        ])
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{Selector, SelectorError};
    use crate::keymap::KeyMap;
    use crate::step::{Flow, Step};
    use crate::ui::text::plain_text;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn build(count: usize, display_size: usize, cyclic: bool) -> Selector<String> {
        let items = (0..count).map(|index| format!("item{index}")).collect();
        Selector::new(items, display_size, KeyMap::default().selector)
            .expect("valid selector")
            .with_cyclic(cyclic)
    }

    fn window_contains_cursor(selector: &Selector<String>) -> bool {
        let (start, end) = selector.display_window();
        let cursor = selector.cursor();
        if start < end {
            (start..end).contains(&cursor)
        } else {
            cursor >= start || cursor < end
        }
    }

    #[test]
    fn zero_display_size_is_rejected() {
        let error = Selector::new(vec!["a"], 0, KeyMap::default().selector).expect_err("invalid");
        assert_eq!(error, SelectorError::InvalidDisplaySize(0));
    }

    #[test]
    fn non_cyclic_cursor_clamps_at_both_ends() {
        let mut selector = build(4, 2, false);

        selector.move_up();
        assert_eq!(selector.cursor(), 0);
        assert_eq!(selector.display_window(), (0, 2));

        for _ in 0..10 {
            selector.move_down();
            assert!(selector.cursor() < 4);
            assert!(window_contains_cursor(&selector));
        }
        assert_eq!(selector.cursor(), 3);
        assert_eq!(selector.display_window(), (2, 4));

        selector.move_down();
        assert_eq!(selector.cursor(), 3);
        assert_eq!(selector.display_window(), (2, 4));
    }

    #[test]
    fn non_cyclic_window_scrolls_around_the_midpoint() {
        let mut selector = build(10, 5, false);

        selector.move_down();
        selector.move_down();
        assert_eq!(selector.display_window(), (0, 5));

        selector.move_down();
        assert_eq!(selector.cursor(), 3);
        assert_eq!(selector.display_window(), (1, 6));

        for _ in 0..3 {
            selector.move_up();
            assert!(window_contains_cursor(&selector));
        }
        assert_eq!(selector.cursor(), 0);
        assert_eq!(selector.display_window(), (0, 5));
    }

    #[test]
    fn cyclic_cursor_wraps_by_modulo() {
        let mut selector = build(7, 3, true);

        for step in 1..=20 {
            selector.move_down();
            assert_eq!(selector.cursor(), step % 7);
            assert!(window_contains_cursor(&selector));
        }

        let mut selector = build(7, 3, true);
        selector.move_up();
        assert_eq!(selector.cursor(), 6);
        assert!(window_contains_cursor(&selector));
    }

    #[test]
    fn mixed_moves_keep_cursor_in_window() {
        for cyclic in [false, true] {
            let mut selector = build(9, 4, cyclic);
            let pattern = [true, true, false, true, true, true, false, false, false, false, true];
            for _ in 0..5 {
                for down in pattern {
                    if down {
                        selector.move_down();
                    } else {
                        selector.move_up();
                    }
                    assert!(selector.cursor() < 9);
                    assert!(window_contains_cursor(&selector), "cyclic={cyclic}");
                }
            }
        }
    }

    #[test]
    fn wrapped_window_renders_tail_then_head() {
        let mut selector = build(5, 3, true);
        selector.move_up();
        assert_eq!(selector.display_window(), (4, 2));

        let rendered = plain_text(&selector.render());
        assert_eq!(rendered, "Select: \n> item4\n  item0\n  item1");
    }

    #[test]
    fn window_never_moves_when_everything_fits() {
        for cyclic in [false, true] {
            let mut selector = build(3, 5, cyclic);
            for _ in 0..4 {
                selector.move_down();
                assert_eq!(selector.display_window().0, 0);
            }
            selector.move_up();
            assert_eq!(selector.display_window().0, 0);
        }
    }

    #[test]
    fn selection_freezes_movement_and_reports_item() {
        let mut selector = build(3, 3, true);
        assert!(selector.selected_item().is_none());

        assert_eq!(selector.on_key(key(KeyCode::Down)), Flow::Continue);
        assert_eq!(selector.on_key(key(KeyCode::Enter)), Flow::Continue);
        assert!(selector.is_finished());

        selector.on_key(key(KeyCode::Down));
        assert_eq!(selector.selected_item().map(String::as_str), Some("item1"));
    }

    #[test]
    fn quit_is_honored_after_selection() {
        let mut selector = build(3, 3, false);
        selector.select();
        assert_eq!(selector.on_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            selector.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
    }

    #[test]
    fn render_after_selection_depends_on_show_selected() {
        let mut hidden = build(3, 3, false);
        hidden.select();
        assert!(hidden.render().is_empty());

        let mut shown = build(3, 3, false)
            .with_show_selected(true)
            .with_prompt("Type");
        shown.move_down();
        shown.select();
        assert_eq!(plain_text(&shown.render()), "Type: item1");
    }

    #[test]
    fn empty_list_ignores_moves_and_selection() {
        let mut selector = build(0, 3, true);
        selector.move_down();
        selector.move_up();
        selector.select();
        assert!(!selector.is_selected());
        assert_eq!(plain_text(&selector.render()), "Select: ");
    }
}
