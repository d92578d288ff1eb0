use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// One question of the commit dialogue, in the order it is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    TypeSelect,
    Scope,
    TicketNumber,
    Subject,
    Body,
    Breaking,
    Footer,
    Confirm,
}

/// Stages a user may opt out of through `skip_questions`.
pub const SKIPPABLE_STAGES: [Stage; 4] = [Stage::Scope, Stage::Body, Stage::Breaking, Stage::Footer];

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::TypeSelect => "type_select",
            Self::Scope => "scope",
            Self::TicketNumber => "ticket_number",
            Self::Subject => "subject",
            Self::Body => "body",
            Self::Breaking => "breaking",
            Self::Footer => "footer",
            Self::Confirm => "confirm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::TypeSelect,
            Self::Scope,
            Self::TicketNumber,
            Self::Subject,
            Self::Body,
            Self::Breaking,
            Self::Footer,
            Self::Confirm,
        ]
        .into_iter()
        .find(|stage| stage.name() == name)
    }

    pub fn is_skippable(self) -> bool {
        SKIPPABLE_STAGES.contains(&self)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid skip question: {name}")]
pub struct InvalidSkipQuestion {
    pub name: String,
}

/// Validated set of skipped stages. Only ever holds skippable stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet {
    stages: BTreeSet<Stage>,
}

impl SkipSet {
    /// Parses configured names, returning the first name that is not an
    /// allowed skip target.
    pub fn parse<I, S>(names: I) -> Result<Self, InvalidSkipQuestion>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stages = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            match Stage::from_name(name) {
                Some(stage) if stage.is_skippable() => {
                    stages.insert(stage);
                }
                _ => {
                    return Err(InvalidSkipQuestion {
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(Self { stages })
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Inputs of the transition function that come from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowRules {
    pub skip: SkipSet,
    pub ticket_number_enabled: bool,
}

impl FlowRules {
    fn asks(&self, stage: Stage) -> bool {
        match stage {
            Stage::TicketNumber => self.ticket_number_enabled,
            stage => !self.skip.contains(stage),
        }
    }

    /// The stage asked after `stage`. `Confirm` is terminal and maps to itself.
    pub fn next_stage(&self, stage: Stage) -> Stage {
        let candidates: &[Stage] = match stage {
            Stage::TypeSelect => &[Stage::Scope, Stage::TicketNumber, Stage::Subject],
            Stage::Scope => &[Stage::TicketNumber, Stage::Subject],
            Stage::TicketNumber => &[Stage::Subject],
            Stage::Subject => &[Stage::Body, Stage::Breaking, Stage::Footer],
            Stage::Body => &[Stage::Breaking, Stage::Footer],
            Stage::Breaking => &[Stage::Footer],
            Stage::Footer | Stage::Confirm => &[],
        };

        candidates
            .iter()
            .copied()
            .find(|candidate| *candidate == Stage::Subject || self.asks(*candidate))
            .unwrap_or(Stage::Confirm)
    }

    /// Every stage visited from `TypeSelect` through `Confirm`.
    pub fn sequence(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::TypeSelect];
        let mut current = Stage::TypeSelect;
        while current != Stage::Confirm {
            current = self.next_stage(current);
            stages.push(current);
        }
        stages
    }
}
