use crossterm::event::KeyEvent;
use ratatui::text::Line;

use crate::keymap::KeyMap;
use crate::step::{Flow, Step};
use crate::ui::binary_choice::BinaryChoice;
use crate::ui::text_field::TextField;

pub const DEFAULT_CONFIRM_PROMPT: &str = "Are there any breaking changes?";
pub const DEFAULT_MESSAGE_PROMPT: &str = "Describe breaking changes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakingPhase {
    Confirm,
    Input,
    Finished,
}

/// Asks whether the change breaks compatibility, then for a description
/// when it does.
pub struct BreakingFlow {
    phase: BreakingPhase,
    choice: BinaryChoice,
    description: TextField,
}

impl BreakingFlow {
    pub fn new(
        confirm_prompt: impl Into<String>,
        message_prompt: impl Into<String>,
        keys: &KeyMap,
    ) -> Self {
        Self {
            phase: BreakingPhase::Confirm,
            choice: BinaryChoice::new(keys.choice.clone()).with_prompt(confirm_prompt),
            description: TextField::multi_line(message_prompt, keys),
        }
    }

    pub fn phase(&self) -> BreakingPhase {
        self.phase
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.choice.is_confirmed() && self.choice.value()
    }

    /// The description, or empty when the change was declared non-breaking.
    pub fn value(&self) -> String {
        if self.has_breaking_changes() {
            self.description.value().trim_end().to_string()
        } else {
            String::new()
        }
    }
}

impl Step for BreakingFlow {
    fn on_key(&mut self, key: KeyEvent) -> Flow {
        match self.phase {
            BreakingPhase::Confirm => {
                let flow = self.choice.on_key(key);
                if self.choice.is_confirmed() {
                    self.phase = if self.choice.value() {
                        BreakingPhase::Input
                    } else {
                        BreakingPhase::Finished
                    };
                    tracing::debug!(phase = ?self.phase, "breaking change answer");
                }
                flow
            }
            BreakingPhase::Input => {
                let flow = self.description.on_key(key);
                if self.description.is_finished() {
                    self.phase = BreakingPhase::Finished;
                }
                flow
            }
            BreakingPhase::Finished => Flow::Continue,
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == BreakingPhase::Finished
    }

    fn render(&self) -> Vec<Line<'static>> {
        let mut lines = self.choice.render();
        if self.has_breaking_changes() {
            lines.extend(self.description.render());
        }
        lines
    }

    fn key_hint(&self) -> String {
        match self.phase {
            BreakingPhase::Input => self.description.key_hint(),
            BreakingPhase::Confirm | BreakingPhase::Finished => self.choice.key_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::{BreakingFlow, BreakingPhase};
    use crate::keymap::KeyMap;
    use crate::step::{Flow, Step};
    use crate::test_support::{chord, key};
    use crate::ui::text::plain_text;

    fn flow() -> BreakingFlow {
        BreakingFlow::new("Breaking?", "Describe", &KeyMap::default())
    }

    #[test]
    fn declining_finishes_without_description() {
        let mut flow = flow();
        flow.on_key(key(KeyCode::Char('n')));

        assert_eq!(flow.phase(), BreakingPhase::Finished);
        assert!(!flow.has_breaking_changes());
        assert_eq!(flow.value(), "");
        assert_eq!(plain_text(&flow.render()), "Breaking? No");
    }

    #[test]
    fn accepting_default_answer_declines() {
        let mut flow = flow();
        flow.on_key(key(KeyCode::Enter));
        assert!(flow.is_finished());
        assert!(!flow.has_breaking_changes());
    }

    #[test]
    fn confirming_moves_to_input_then_finishes_on_submit() {
        let mut flow = flow();
        flow.on_key(key(KeyCode::Char('y')));
        assert_eq!(flow.phase(), BreakingPhase::Input);
        assert!(!flow.is_finished());

        for ch in "removes Y".chars() {
            flow.on_key(key(KeyCode::Char(ch)));
        }
        flow.on_key(key(KeyCode::Enter));
        assert_eq!(flow.phase(), BreakingPhase::Input);

        flow.on_key(chord(KeyCode::Enter, KeyModifiers::ALT));
        assert!(flow.is_finished());
        assert!(flow.has_breaking_changes());
        assert_eq!(flow.value(), "removes Y");
    }

    #[test]
    fn input_phase_uses_text_hints() {
        let mut flow = flow();
        assert!(flow.key_hint().contains("y: yes"));

        flow.on_key(key(KeyCode::Tab));
        flow.on_key(key(KeyCode::Char(' ')));
        assert_eq!(flow.phase(), BreakingPhase::Input);
        assert!(flow.key_hint().starts_with("Alt+Enter/Ctrl+Enter: submit"));
    }

    #[test]
    fn quit_during_confirm_propagates() {
        let mut flow = flow();
        assert_eq!(flow.on_key(key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(flow.phase(), BreakingPhase::Confirm);
    }
}
