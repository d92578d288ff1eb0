use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};

use crate::keymap::{self, ChoiceKeys};
use crate::step::{Flow, Step};
use crate::theme;
use crate::ui::text::yes_no;

const DEFAULT_PROMPT: &str = "Confirm";

/// Yes/No toggle that only counts once explicitly confirmed.
#[derive(Debug, Clone)]
pub struct BinaryChoice {
    prompt: String,
    value: bool,
    confirmed: bool,
    keys: ChoiceKeys,
}

impl BinaryChoice {
    pub fn new(keys: ChoiceKeys) -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            value: false,
            confirmed: false,
            keys,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }
}

impl Step for BinaryChoice {
    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if self.keys.quit.matches(key) {
            return Flow::Quit;
        }

        if self.confirmed {
            return Flow::Continue;
        }

        if self.keys.toggle.matches(key) {
            self.value = !self.value;
        } else if self.keys.affirmative.matches(key) {
            self.value = true;
            self.confirmed = true;
        } else if self.keys.negative.matches(key) {
            self.value = false;
            self.confirmed = true;
        } else if self.keys.accept.matches(key) {
            self.confirmed = true;
        }

        Flow::Continue
    }

    fn is_finished(&self) -> bool {
        self.confirmed
    }

    fn render(&self) -> Vec<Line<'static>> {
        if self.confirmed {
            return vec![Line::from(vec![
                Span::styled(self.prompt.clone(), theme::prompt()),
                Span::raw(" "),
                Span::raw(yes_no(self.value)),
            ])];
        }

        let (yes_style, no_style) = if self.value {
            (theme::choice_highlight(), theme::choice_idle())
        } else {
            (theme::choice_idle(), theme::choice_highlight())
        };

        vec![
            Line::from(Span::styled(self.prompt.clone(), theme::prompt())),
            Line::from(vec![
                Span::raw(" "),
                Span::styled("  Yes  ", yes_style),
                Span::raw("  "),
                Span::styled("  No  ", no_style),
            ]),
        ]
    }

    fn key_hint(&self) -> String {
        keymap::hint(&[
            &self.keys.toggle,
            &self.keys.affirmative,
            &self.keys.negative,
            &self.keys.accept,
            &self.keys.quit,
        ])
    }
}
