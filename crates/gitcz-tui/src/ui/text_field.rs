use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::keymap::{Binding, KeyMap};
use crate::step::{Flow, Step};
use crate::ui::text::{cursor_spans, error_line, label_value_line, prompt_span};

/// Outcome of running a field's predicate over its current buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidation {
    pub valid: bool,
    pub message: String,
}

impl FieldValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

pub type Validator = Box<dyn Fn(&str) -> FieldValidation>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

/// Free-text question. Submitting is gated on the validator, which reruns
/// after every edit.
pub struct TextField {
    prompt: String,
    kind: FieldKind,
    above: Vec<String>,
    input: Input,
    below: Vec<String>,
    validator: Validator,
    validation: FieldValidation,
    finished: bool,
    submit: Binding,
}

impl TextField {
    pub fn single_line(prompt: impl Into<String>, keys: &KeyMap) -> Self {
        Self::new(prompt.into(), FieldKind::SingleLine, keys.enter.clone())
    }

    /// Enter breaks the line; the dedicated submit chord finishes the field.
    pub fn multi_line(prompt: impl Into<String>, keys: &KeyMap) -> Self {
        Self::new(prompt.into(), FieldKind::MultiLine, keys.submit.clone())
    }

    fn new(prompt: String, kind: FieldKind, submit: Binding) -> Self {
        Self {
            prompt,
            kind,
            above: Vec::new(),
            input: Input::default(),
            below: Vec::new(),
            validator: Box::new(|_| FieldValidation::valid()),
            validation: FieldValidation::valid(),
            finished: false,
            submit,
        }
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> FieldValidation + 'static,
    {
        self.validator = Box::new(validator);
        self.revalidate();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        let mut lines: Vec<String> = match self.kind {
            FieldKind::SingleLine => vec![value.replace('\n', " ")],
            FieldKind::MultiLine => value.split('\n').map(str::to_string).collect(),
        };
        let last = lines.pop().unwrap_or_default();
        self.above = lines;
        self.input = Input::new(last);
        self.below.clear();
        self.revalidate();
        self
    }

    pub fn value(&self) -> String {
        let mut lines: Vec<&str> = self.above.iter().map(String::as_str).collect();
        lines.push(self.input.value());
        lines.extend(self.below.iter().map(String::as_str));
        lines.join("\n")
    }

    pub fn validation(&self) -> &FieldValidation {
        &self.validation
    }

    fn revalidate(&mut self) {
        self.validation = (self.validator)(&self.value());
    }

    fn break_line(&mut self) {
        let cursor = self.input.cursor();
        let before: String = self.input.value().chars().take(cursor).collect();
        let after: String = self.input.value().chars().skip(cursor).collect();
        self.above.push(before);
        self.input = Input::new(after).with_cursor(0);
    }

    fn join_previous_line(&mut self) -> bool {
        if self.input.cursor() != 0 {
            return false;
        }
        let Some(previous) = self.above.pop() else {
            return false;
        };
        let cursor = previous.chars().count();
        let joined = format!("{previous}{}", self.input.value());
        self.input = Input::new(joined).with_cursor(cursor);
        true
    }

    /// Moves the caret to the line above, keeping its column where possible.
    fn previous_line(&mut self) {
        let Some(previous) = self.above.pop() else {
            return;
        };
        let column = self.input.cursor();
        self.below.insert(0, self.input.value().to_string());
        self.input = line_input(previous, column);
    }

    fn next_line(&mut self) {
        if self.below.is_empty() {
            return;
        }
        let next = self.below.remove(0);
        let column = self.input.cursor();
        self.above.push(self.input.value().to_string());
        self.input = line_input(next, column);
    }
}

fn line_input(line: String, column: usize) -> Input {
    let column = column.min(line.chars().count());
    Input::new(line).with_cursor(column)
}

impl Step for TextField {
    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if self.finished {
            return Flow::Continue;
        }

        if self.submit.matches(key) {
            if self.validation.valid {
                self.finished = true;
            }
            return Flow::Continue;
        }

        let handled = match (self.kind, key.code) {
            (FieldKind::MultiLine, KeyCode::Enter) if key.modifiers.is_empty() => {
                self.break_line();
                true
            }
            (FieldKind::MultiLine, KeyCode::Backspace) => self.join_previous_line(),
            (FieldKind::MultiLine, KeyCode::Up) => {
                self.previous_line();
                true
            }
            (FieldKind::MultiLine, KeyCode::Down) => {
                self.next_line();
                true
            }
            _ => false,
        };
        if !handled {
            self.input.handle_event(&Event::Key(key));
        }

        self.revalidate();
        Flow::Continue
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn render(&self) -> Vec<Line<'static>> {
        if self.finished {
            let value = self.value();
            if self.kind == FieldKind::SingleLine || !value.contains('\n') {
                return vec![label_value_line(&self.prompt, value)];
            }
            let mut lines = vec![Line::from(prompt_span(&self.prompt))];
            lines.extend(value.split('\n').map(|line| Line::from(format!("  {line}"))));
            return lines;
        }

        let caret = cursor_spans(self.input.value(), self.input.cursor());
        let mut lines = match self.kind {
            FieldKind::SingleLine => {
                let mut spans = vec![prompt_span(&self.prompt)];
                spans.extend(caret);
                vec![Line::from(spans)]
            }
            FieldKind::MultiLine => {
                let mut lines = vec![Line::from(prompt_span(&self.prompt))];
                lines.extend(self.above.iter().map(|line| Line::from(format!("  {line}"))));
                let mut spans = vec![Span::raw("  ")];
                spans.extend(caret);
                lines.push(Line::from(spans));
                lines.extend(self.below.iter().map(|line| Line::from(format!("  {line}"))));
                lines
            }
        };

        if !self.validation.valid && !self.validation.message.is_empty() {
            lines.push(error_line(&self.validation.message));
        }
        lines
    }

    fn key_hint(&self) -> String {
        match self.kind {
            FieldKind::SingleLine => self.submit.help(),
            FieldKind::MultiLine => format!(
                "{}    Enter: new line    Up/Down: change line",
                self.submit.help()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::{FieldValidation, TextField};
    use crate::keymap::KeyMap;
    use crate::step::Step;
    use crate::ui::text::plain_text;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(field: &mut TextField, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                field.on_key(key(KeyCode::Enter));
            } else {
                field.on_key(key(KeyCode::Char(ch)));
            }
        }
    }

    fn alt_enter() -> KeyEvent {
        KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT)
    }

    #[test]
    fn single_line_submits_on_enter() {
        let keys = KeyMap::default();
        let mut field = TextField::single_line("Scope", &keys);
        type_text(&mut field, "api");
        assert_eq!(field.value(), "api");
        assert!(!field.is_finished());

        field.on_key(key(KeyCode::Enter));
        assert!(field.is_finished());
        assert_eq!(plain_text(&field.render()), "Scope: api");
    }

    #[test]
    fn input_is_ignored_once_finished() {
        let keys = KeyMap::default();
        let mut field = TextField::single_line("Subject", &keys);
        type_text(&mut field, "x");
        field.on_key(key(KeyCode::Enter));
        type_text(&mut field, "yz");
        field.on_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "x");
    }

    #[test]
    fn invalid_content_blocks_submission() {
        let keys = KeyMap::default();
        let mut field = TextField::single_line("Ticket", &keys).with_validator(|value| {
            if value.is_empty() {
                FieldValidation::invalid("required")
            } else {
                FieldValidation::valid()
            }
        });

        assert!(!field.validation().valid);
        field.on_key(key(KeyCode::Enter));
        assert!(!field.is_finished());
        assert!(plain_text(&field.render()).contains("✕ required"));

        type_text(&mut field, "7");
        assert!(field.validation().valid);
        field.on_key(key(KeyCode::Enter));
        assert!(field.is_finished());
    }

    #[test]
    fn multi_line_breaks_on_enter_and_submits_on_chord() {
        let keys = KeyMap::default();
        let mut field = TextField::multi_line("Body", &keys);
        type_text(&mut field, "first\nsecond");
        assert_eq!(field.value(), "first\nsecond");
        assert!(!field.is_finished());

        field.on_key(alt_enter());
        assert!(field.is_finished());
        assert_eq!(plain_text(&field.render()), "Body: \n  first\n  second");
    }

    #[test]
    fn backspace_at_line_start_rejoins_previous_line() {
        let keys = KeyMap::default();
        let mut field = TextField::multi_line("Body", &keys);
        type_text(&mut field, "ab\n");
        assert_eq!(field.value(), "ab\n");

        field.on_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "ab");
        field.on_key(key(KeyCode::Backspace));
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn enter_splits_line_at_cursor() {
        let keys = KeyMap::default();
        let mut field = TextField::multi_line("Body", &keys);
        type_text(&mut field, "abcd");
        field.on_key(key(KeyCode::Left));
        field.on_key(key(KeyCode::Left));
        field.on_key(key(KeyCode::Enter));
        assert_eq!(field.value(), "ab\ncd");
    }

    #[test]
    fn up_and_down_move_between_lines_keeping_column() {
        let keys = KeyMap::default();
        let mut field = TextField::multi_line("Body", &keys);
        type_text(&mut field, "first\nsecond\nthird");

        field.on_key(key(KeyCode::Up));
        type_text(&mut field, "X");
        assert_eq!(field.value(), "first\nseconXd\nthird");

        field.on_key(key(KeyCode::Up));
        field.on_key(key(KeyCode::Up));
        type_text(&mut field, "!");
        assert_eq!(field.value(), "first!\nseconXd\nthird");
        assert_eq!(
            plain_text(&field.render()),
            "Body: \n  first! \n  seconXd\n  third"
        );

        field.on_key(key(KeyCode::Down));
        field.on_key(key(KeyCode::Down));
        field.on_key(key(KeyCode::Down));
        type_text(&mut field, "?");
        assert_eq!(field.value(), "first!\nseconXd\nthird?");
    }

    #[test]
    fn enter_in_middle_line_keeps_following_lines() {
        let keys = KeyMap::default();
        let mut field = TextField::multi_line("Body", &keys);
        type_text(&mut field, "ab\ncd");
        field.on_key(key(KeyCode::Up));
        field.on_key(key(KeyCode::Enter));
        type_text(&mut field, "z");
        assert_eq!(field.value(), "ab\nz\ncd");

        field.on_key(alt_enter());
        assert!(field.is_finished());
    }

    #[test]
    fn prefilled_value_is_validated_immediately() {
        let keys = KeyMap::default();
        let field = TextField::multi_line("Footer", &keys)
            .with_validator(|value| {
                if value.contains("\n\n") {
                    FieldValidation::invalid("blank")
                } else {
                    FieldValidation::valid()
                }
            })
            .with_value("a\n\nb");

        assert_eq!(field.value(), "a\n\nb");
        assert!(!field.validation().valid);
    }

    #[test]
    fn key_hint_names_the_submit_chord() {
        let keys = KeyMap::default();
        assert_eq!(
            TextField::single_line("Scope", &keys).key_hint(),
            "Enter: continue"
        );
        assert_eq!(
            TextField::multi_line("Body", &keys).key_hint(),
            "Alt+Enter/Ctrl+Enter: submit    Enter: new line    Up/Down: change line"
        );
    }
}
