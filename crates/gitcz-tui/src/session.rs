use crossterm::event::KeyEvent;
use gitcz_core::config::{ConfigError, GitCzConfig, TypeEntry};
use gitcz_core::git::{GitError, Repository};
use gitcz_core::message::CommitData;
use gitcz_core::stage::{FlowRules, Stage};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::fields::breaking::{self, BreakingFlow};
use crate::fields::footer::{self, FooterField};
use crate::fields::ticket_number::{self, TicketNumberField};
use crate::keymap::KeyMap;
use crate::step::{Flow, Step};
use crate::theme;
use crate::ui::binary_choice::BinaryChoice;
use crate::ui::selector::{Selector, SelectorError};
use crate::ui::text_field::TextField;

const DEFAULT_TYPE_PROMPT: &str = "Select commit type";
const DEFAULT_SCOPE_PROMPT: &str = "Enter scope (optional)";
const DEFAULT_SUBJECT_PROMPT: &str = "Enter commit subject";
const DEFAULT_BODY_PROMPT: &str = "Enter commit body (optional)";
const DEFAULT_CONFIRM_PROMPT: &str = "Commit this message?";
const ICON_ACTIVE: &str = "?";
const ICON_DONE: &str = "✓";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid type selector: {0}")]
    Selector(#[from] SelectorError),
    #[error("failed to commit: {0}")]
    Commit(#[from] GitError),
}

/// How a dialogue ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    Quit,
    Declined,
    Committed { message: String },
}

enum ActiveStep {
    TypeSelect(Selector<TypeEntry>),
    Scope(TextField),
    TicketNumber(TicketNumberField),
    Subject(TextField),
    Body(TextField),
    Breaking(BreakingFlow),
    Footer(FooterField),
    Confirm(BinaryChoice),
}

impl ActiveStep {
    fn step(&self) -> &dyn Step {
        match self {
            Self::TypeSelect(step) => step,
            Self::Scope(step) | Self::Subject(step) | Self::Body(step) => step,
            Self::TicketNumber(step) => step,
            Self::Breaking(step) => step,
            Self::Footer(step) => step,
            Self::Confirm(step) => step,
        }
    }

    fn step_mut(&mut self) -> &mut dyn Step {
        match self {
            Self::TypeSelect(step) => step,
            Self::Scope(step) | Self::Subject(step) | Self::Body(step) => step,
            Self::TicketNumber(step) => step,
            Self::Breaking(step) => step,
            Self::Footer(step) => step,
            Self::Confirm(step) => step,
        }
    }
}

/// Drives the commit dialogue: asks one question at a time, records each
/// answer into [`CommitData`], and commits once the user accepts the
/// assembled message.
pub struct CommitSession<'a> {
    config: &'a GitCzConfig,
    repo: &'a dyn Repository,
    keys: KeyMap,
    rules: FlowRules,
    stage: Stage,
    active: ActiveStep,
    transcript: Vec<Line<'static>>,
    data: CommitData,
    exit: Option<SessionExit>,
}

impl<'a> CommitSession<'a> {
    /// Fails on configuration problems so they surface before any drawing.
    pub fn new(
        config: &'a GitCzConfig,
        repo: &'a dyn Repository,
        keys: KeyMap,
    ) -> Result<Self, SessionError> {
        let rules = config.flow_rules()?;
        let type_select = type_selector(config, &keys)?;

        Ok(Self {
            config,
            repo,
            keys,
            rules,
            stage: Stage::TypeSelect,
            active: ActiveStep::TypeSelect(type_select),
            transcript: Vec::new(),
            data: CommitData::default(),
            exit: None,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn commit_data(&self) -> &CommitData {
        &self.data
    }

    pub fn exit(&self) -> Option<&SessionExit> {
        self.exit.as_ref()
    }

    /// Feeds one key to the active question. Returns the exit once the
    /// dialogue is over; further keys keep returning it.
    pub fn on_key(&mut self, key: KeyEvent) -> Result<Option<SessionExit>, SessionError> {
        if let Some(exit) = &self.exit {
            return Ok(Some(exit.clone()));
        }

        if self.keys.quit.matches(key) || self.active.step_mut().on_key(key) == Flow::Quit {
            tracing::info!(stage = %self.stage, "dialogue quit");
            return Ok(Some(self.finish(SessionExit::Quit)));
        }

        if !self.active.step().is_finished() {
            return Ok(None);
        }

        if let ActiveStep::Confirm(choice) = &self.active {
            if !choice.value() {
                tracing::info!("commit declined");
                return Ok(Some(self.finish(SessionExit::Declined)));
            }

            let message = self.data.message();
            if let Err(error) = self.repo.commit(&message) {
                tracing::warn!(%error, "commit failed");
                return Err(error.into());
            }
            return Ok(Some(self.finish(SessionExit::Committed { message })));
        }

        self.record_answer();
        self.transcript
            .extend(decorate(ICON_DONE, self.active.step().render()));

        let next = self.rules.next_stage(self.stage);
        tracing::debug!(from = %self.stage, to = %next, "stage finished");
        self.active = self.enter(next)?;
        self.stage = next;
        Ok(None)
    }

    /// Finished answers followed by the live question.
    pub fn render(&self) -> Vec<Line<'static>> {
        let mut lines = self.transcript.clone();
        let active = match &self.active {
            ActiveStep::Confirm(choice) => {
                let mut choice_lines = choice.render();
                let buttons = choice_lines.split_off(1.min(choice_lines.len()));
                choice_lines.extend(preview_lines(&self.data.message()));
                choice_lines.extend(buttons);
                choice_lines
            }
            active => active.step().render(),
        };
        lines.extend(decorate(ICON_ACTIVE, active));
        lines
    }

    pub fn key_hint(&self) -> String {
        format!("{}    {}", self.active.step().key_hint(), self.keys.quit.help())
    }

    fn finish(&mut self, exit: SessionExit) -> SessionExit {
        self.exit = Some(exit.clone());
        exit
    }

    fn record_answer(&mut self) {
        match &self.active {
            ActiveStep::TypeSelect(selector) => {
                self.data.commit_type = selector
                    .selected_item()
                    .map(|entry| entry.value.clone())
                    .unwrap_or_default();
            }
            ActiveStep::Scope(field) => self.data.scope = field.value().trim().to_string(),
            ActiveStep::TicketNumber(field) => self.data.ticket_number = field.value(),
            ActiveStep::Subject(field) => self.data.subject = field.value().trim().to_string(),
            ActiveStep::Body(field) => self.data.body = field.value().trim_end().to_string(),
            ActiveStep::Breaking(flow) => {
                self.data.breaking_changes = flow.value();
                self.data.is_breaking = flow.has_breaking_changes();
            }
            ActiveStep::Footer(field) => self.data.footer = field.value(),
            ActiveStep::Confirm(_) => {}
        }
    }

    fn enter(&self, stage: Stage) -> Result<ActiveStep, SessionError> {
        let messages = &self.config.messages;
        let keys = &self.keys;
        let step = match stage {
            Stage::TypeSelect => ActiveStep::TypeSelect(type_selector(self.config, keys)?),
            Stage::Confirm => ActiveStep::Confirm(
                BinaryChoice::new(keys.choice.clone())
                    .with_prompt(prompt(&messages.confirm_commit, DEFAULT_CONFIRM_PROMPT)),
            ),
            Stage::Scope => ActiveStep::Scope(TextField::single_line(
                prompt(&messages.scope, DEFAULT_SCOPE_PROMPT),
                keys,
            )),
            Stage::TicketNumber => ActiveStep::TicketNumber(TicketNumberField::new(
                prompt(&messages.ticket_number, ticket_number::DEFAULT_PROMPT),
                &self.config.ticket_number,
                self.repo,
                keys,
            )),
            Stage::Subject => ActiveStep::Subject(TextField::single_line(
                prompt(&messages.subject, DEFAULT_SUBJECT_PROMPT),
                keys,
            )),
            Stage::Body => ActiveStep::Body(TextField::multi_line(
                prompt(&messages.body, DEFAULT_BODY_PROMPT),
                keys,
            )),
            Stage::Breaking => ActiveStep::Breaking(BreakingFlow::new(
                prompt(&messages.breaking_confirm, breaking::DEFAULT_CONFIRM_PROMPT),
                prompt(&messages.breaking_message, breaking::DEFAULT_MESSAGE_PROMPT),
                keys,
            )),
            Stage::Footer => ActiveStep::Footer(FooterField::new(
                prompt(&messages.footer, footer::DEFAULT_PROMPT),
                keys,
            )),
        };
        Ok(step)
    }
}

fn type_selector(
    config: &GitCzConfig,
    keys: &KeyMap,
) -> Result<Selector<TypeEntry>, SelectorError> {
    Ok(Selector::new(
        config.types.clone(),
        config.type_display_size,
        keys.selector.clone(),
    )?
    .with_cyclic(true)
    .with_show_selected(true)
    .with_prompt(prompt(&config.messages.type_select, DEFAULT_TYPE_PROMPT)))
}

fn prompt(custom: &Option<String>, default: &str) -> String {
    custom
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Prefixes the first line with a status icon and indents the rest under it.
fn decorate(icon: &str, lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let lead = if index == 0 {
                Span::styled(format!("{icon} "), theme::icon())
            } else {
                Span::raw("  ")
            };
            let mut spans = vec![lead];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn preview_lines(message: &str) -> Vec<Line<'static>> {
    let width = message
        .split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let rule = "─".repeat(width + 4);

    let mut lines = vec![Line::from(Span::styled(format!(" ╭{rule}╮"), theme::preview()))];
    lines.extend(message.split('\n').map(|line| {
        let padding = " ".repeat(width - line.chars().count());
        Line::from(Span::styled(
            format!(" │  {line}{padding}  │"),
            theme::preview(),
        ))
    }));
    lines.push(Line::from(Span::styled(format!(" ╰{rule}╯"), theme::preview())));
    lines
}
