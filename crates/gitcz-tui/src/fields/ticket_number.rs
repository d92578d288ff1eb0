use crossterm::event::KeyEvent;
use gitcz_core::config::{Pattern, TicketNumberConfig};
use gitcz_core::git::Repository;
use ratatui::text::Line;

use crate::keymap::KeyMap;
use crate::step::{Flow, Step};
use crate::ui::text_field::{FieldValidation, TextField};

pub const DEFAULT_PROMPT: &str = "Enter ticket number";
const TICKET_NUMBER_GROUP: &str = "ticket_number";

/// Ticket reference question, optionally pre-filled from the branch name.
pub struct TicketNumberField {
    field: TextField,
    prefix: String,
}

impl TicketNumberField {
    pub fn new(
        prompt: impl Into<String>,
        config: &TicketNumberConfig,
        repo: &dyn Repository,
        keys: &KeyMap,
    ) -> Self {
        let required = config.required;
        let pattern = config.match_pattern.clone();
        let mut field = TextField::single_line(prompt, keys).with_validator(move |value| {
            validate_ticket_number(value, required, pattern.as_ref())
        });

        if let Some(ticket) = ticket_from_branch(config, repo) {
            field = field.with_value(&ticket);
        }

        Self {
            field,
            prefix: config.prefix.clone(),
        }
    }

    /// Trimmed ticket number with the configured prefix. Empty stays empty.
    pub fn value(&self) -> String {
        let value = self.field.value();
        let value = value.trim();
        if value.is_empty() {
            return String::new();
        }
        format!("{}{value}", self.prefix)
    }

    pub fn validation(&self) -> &FieldValidation {
        self.field.validation()
    }
}

impl Step for TicketNumberField {
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

pub fn validate_ticket_number(
    value: &str,
    required: bool,
    pattern: Option<&Pattern>,
) -> FieldValidation {
    if !required {
        return FieldValidation::valid();
    }

    let value = value.trim();
    match pattern {
        Some(pattern) if pattern.is_full_match(value) => FieldValidation::valid(),
        Some(_) => FieldValidation::invalid("Invalid ticket number format"),
        None if value.is_empty() => FieldValidation::invalid("Ticket number is required"),
        None => FieldValidation::valid(),
    }
}

/// Best effort: any failure simply means no pre-fill.
pub fn ticket_from_branch(config: &TicketNumberConfig, repo: &dyn Repository) -> Option<String> {
    let from_branch = &config.from_branch_name;
    if !from_branch.enable {
        return None;
    }
    let pattern = from_branch.extract_regexp.as_ref()?;

    let branch = match repo.current_branch() {
        Ok(branch) => branch,
        Err(error) => {
            tracing::debug!(%error, "no branch to extract a ticket number from");
            return None;
        }
    };

    let ticket = pattern.capture(&branch, TICKET_NUMBER_GROUP).map(str::to_string);
    tracing::debug!(%branch, ?ticket, "ticket number extraction");
    ticket
}
