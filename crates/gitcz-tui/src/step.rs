use crossterm::event::KeyEvent;
use ratatui::text::Line;

/// What the caller should do after a component consumed a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Contract shared by every question of the dialogue. A step consumes keys
/// until it reports itself finished; its rendering then switches to the
/// compact answered form.
pub trait Step {
    fn on_key(&mut self, key: KeyEvent) -> Flow;
    fn is_finished(&self) -> bool;
    fn render(&self) -> Vec<Line<'static>>;
    fn key_hint(&self) -> String;
}
