use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One physical key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    pub fn matches(&self, key: KeyEvent) -> bool {
        if self.code != key.code {
            return false;
        }

        // Shift is already folded into the character (or BackTab) itself.
        let modifiers = match key.code {
            KeyCode::Char(_) | KeyCode::BackTab => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        modifiers == self.modifiers
    }
}

/// A logical action bound to one or more key presses, with help text for
/// the key hint bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    presses: Vec<KeyPress>,
    keys_label: String,
    action: String,
}

impl Binding {
    pub fn new(
        presses: Vec<KeyPress>,
        keys_label: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            presses,
            keys_label: keys_label.into(),
            action: action.into(),
        }
    }

    pub fn matches(&self, key: KeyEvent) -> bool {
        self.presses.iter().any(|press| press.matches(key))
    }

    pub fn help(&self) -> String {
        format!("{}: {}", self.keys_label, self.action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorKeys {
    pub up: Binding,
    pub down: Binding,
    pub select: Binding,
    pub quit: Binding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceKeys {
    pub toggle: Binding,
    pub affirmative: Binding,
    pub negative: Binding,
    pub accept: Binding,
    pub quit: Binding,
}

/// Every key binding the dialogue reacts to. Built once and handed to each
/// component, so tests and callers can swap bindings freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    pub quit: Binding,
    pub enter: Binding,
    pub submit: Binding,
    pub selector: SelectorKeys,
    pub choice: ChoiceKeys,
}

impl Default for KeyMap {
    fn default() -> Self {
        let alt_enter = KeyPress::new(KeyCode::Enter, KeyModifiers::ALT);
        let ctrl_enter = KeyPress::new(KeyCode::Enter, KeyModifiers::CONTROL);

        Self {
            quit: Binding::new(vec![KeyPress::ctrl('c')], "Ctrl+C", "quit"),
            enter: Binding::new(vec![KeyPress::plain(KeyCode::Enter)], "Enter", "continue"),
            submit: Binding::new(
                vec![alt_enter, ctrl_enter],
                "Alt+Enter/Ctrl+Enter",
                "submit",
            ),
            selector: SelectorKeys {
                up: Binding::new(
                    vec![KeyPress::plain(KeyCode::Up), KeyPress::char('k')],
                    "Up/k",
                    "move up",
                ),
                down: Binding::new(
                    vec![KeyPress::plain(KeyCode::Down), KeyPress::char('j')],
                    "Down/j",
                    "move down",
                ),
                select: Binding::new(
                    vec![KeyPress::plain(KeyCode::Enter), KeyPress::char(' ')],
                    "Enter/Space",
                    "select",
                ),
                quit: Binding::new(
                    vec![KeyPress::ctrl('c'), KeyPress::plain(KeyCode::Esc)],
                    "Esc",
                    "quit",
                ),
            },
            choice: ChoiceKeys {
                toggle: Binding::new(
                    vec![
                        KeyPress::plain(KeyCode::Tab),
                        KeyPress::plain(KeyCode::BackTab),
                        KeyPress::plain(KeyCode::Left),
                        KeyPress::plain(KeyCode::Right),
                        KeyPress::char('h'),
                        KeyPress::char('l'),
                    ],
                    "Left/Right",
                    "toggle",
                ),
                affirmative: Binding::new(vec![KeyPress::char('y')], "y", "yes"),
                negative: Binding::new(vec![KeyPress::char('n')], "n", "no"),
                accept: Binding::new(
                    vec![KeyPress::plain(KeyCode::Enter), KeyPress::char(' ')],
                    "Enter/Space",
                    "confirm",
                ),
                quit: Binding::new(
                    vec![
                        KeyPress::ctrl('c'),
                        KeyPress::char('q'),
                        KeyPress::plain(KeyCode::Esc),
                    ],
                    "q/Esc",
                    "quit",
                ),
            },
        }
    }
}

/// Joins binding help entries into one hint line.
pub(crate) fn hint(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .map(|binding| binding.help())
        .collect::<Vec<_>>()
        .join("    ")
}
