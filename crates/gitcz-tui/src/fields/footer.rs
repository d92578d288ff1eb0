use std::sync::LazyLock;

use crossterm::event::KeyEvent;
use ratatui::text::Line;
use regex::Regex;

use crate::keymap::KeyMap;
use crate::step::{Flow, Step};
use crate::ui::text_field::{FieldValidation, TextField};

pub const DEFAULT_PROMPT: &str = "Enter footer ('word: content' or 'word #content')";

// A single token followed by ": " or " #".
static FOOTER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+(: | #)").expect("footer start pattern compiles"));

/// Multi-line trailer question validated against the footer line grammar.
pub struct FooterField {
    field: TextField,
}

impl FooterField {
    pub fn new(prompt: impl Into<String>, keys: &KeyMap) -> Self {
        Self {
            field: TextField::multi_line(prompt, keys).with_validator(validate_footer),
        }
    }

    pub fn value(&self) -> String {
        self.field.value().trim().to_string()
    }

    pub fn validation(&self) -> &FieldValidation {
        self.field.validation()
    }
}

impl Step for FooterField {
    fn on_key(&mut self, key: KeyEvent) -> Flow {
        self.field.on_key(key)
    }

    fn is_finished(&self) -> bool {
        self.field.is_finished()
    }

    fn render(&self) -> Vec<Line<'static>> {
        self.field.render()
    }

    fn key_hint(&self) -> String {
        self.field.key_hint()
    }
}

/// An empty footer is valid. Otherwise no line may be blank and the first
/// line must open an entry; every later line continues it.
pub fn validate_footer(value: &str) -> FieldValidation {
    let value = value.trim();
    if value.is_empty() {
        return FieldValidation::valid();
    }

    let mut continuation = false;
    for line in value.split('\n') {
        if line.is_empty() {
            return FieldValidation::invalid("Footer cannot contain empty line");
        }
        if !continuation && !FOOTER_START.is_match(line) {
            return FieldValidation::invalid("Footer must start with 'word: ' or 'word #' format");
        }
        continuation = true;
    }

    FieldValidation::valid()
}
