use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::stage::{FlowRules, SkipSet};

pub const DEFAULT_TYPE_DISPLAY_SIZE: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitCzConfig {
    pub types: Vec<TypeEntry>,
    #[serde(default = "default_type_display_size")]
    pub type_display_size: usize,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub skip_questions: Vec<String>,
    #[serde(default)]
    pub ticket_number: TicketNumberConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeEntry {
    pub value: String,
    pub name: String,
}

impl fmt::Display for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Prompt overrides. Unset entries fall back to built-in prompts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Messages {
    #[serde(rename = "type")]
    pub type_select: Option<String>,
    pub scope: Option<String>,
    pub ticket_number: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub breaking_confirm: Option<String>,
    pub breaking_message: Option<String>,
    pub footer: Option<String>,
    pub confirm_commit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketNumberConfig {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub prefix: String,
    pub match_pattern: Option<Pattern>,
    #[serde(default)]
    pub from_branch_name: FromBranchName,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FromBranchName {
    #[serde(default)]
    pub enable: bool,
    pub extract_regexp: Option<Pattern>,
}

/// A configured regular expression, compiled once at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern {
    regex: Regex,
    anchored: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
            anchored: Regex::new(&format!("^(?:{source})$"))?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True when the whole of `value` matches, not just a substring.
    pub fn is_full_match(&self, value: &str) -> bool {
        self.anchored.is_match(value)
    }

    /// The text captured by the named `group`, if it took part in the match.
    pub fn capture<'h>(&self, haystack: &'h str, group: &str) -> Option<&'h str> {
        self.regex
            .captures(haystack)
            .and_then(|captures| captures.name(group))
            .map(|found| found.as_str())
    }
}

impl TryFrom<String> for Pattern {
    type Error = regex::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Validation { message: String },
}

fn default_type_display_size() -> usize {
    DEFAULT_TYPE_DISPLAY_SIZE
}

impl Default for GitCzConfig {
    fn default() -> Self {
        let types = [
            ("feat", "feat:     A new feature"),
            ("fix", "fix:      A bug fix"),
            ("docs", "docs:     Documentation only changes"),
            ("style", "style:    Changes that do not affect the meaning of the code"),
            ("refactor", "refactor: A code change that neither fixes a bug nor adds a feature"),
            ("perf", "perf:     A code change that improves performance"),
            ("test", "test:     Adding missing tests or correcting existing tests"),
            ("build", "build:    Changes that affect the build system or external dependencies"),
            ("ci", "ci:       Changes to CI configuration files and scripts"),
            ("chore", "chore:    Other changes that don't modify src or test files"),
            ("revert", "revert:   Reverts a previous commit"),
        ]
        .into_iter()
        .map(|(value, name)| TypeEntry {
            value: value.to_string(),
            name: name.to_string(),
        })
        .collect();

        Self {
            types,
            type_display_size: DEFAULT_TYPE_DISPLAY_SIZE,
            messages: Messages::default(),
            skip_questions: Vec::new(),
            ticket_number: TicketNumberConfig::default(),
        }
    }
}

impl GitCzConfig {
    pub fn flow_rules(&self) -> Result<FlowRules, ConfigError> {
        let skip =
            SkipSet::parse(&self.skip_questions).map_err(|error| ConfigError::Validation {
                message: error.to_string(),
            })?;

        Ok(FlowRules {
            skip,
            ticket_number_enabled: self.ticket_number.enable,
        })
    }
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs
        .home_dir()
        .join(".config")
        .join("git-cz")
        .join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<GitCzConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: GitCzConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_config(&parsed)?;
    Ok(parsed)
}

/// Loads `explicit` when given. Otherwise reads the per-user config if it
/// exists and falls back to the built-in type catalogue.
pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<GitCzConfig> {
    if let Some(path) = explicit {
        return Ok(load_config(path)?);
    }

    let path = resolve_config_path()?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading user config");
        return Ok(load_config(&path)?);
    }

    tracing::debug!("no user config found, using built-in defaults");
    Ok(GitCzConfig::default())
}

pub fn validate_config(config: &GitCzConfig) -> Result<(), ConfigError> {
    if config.types.is_empty() {
        return Err(ConfigError::Validation {
            message: "at least one commit type must be configured".to_string(),
        });
    }

    if config.type_display_size == 0 {
        return Err(ConfigError::Validation {
            message: "type_display_size must be greater than zero".to_string(),
        });
    }

    for (index, entry) in config.types.iter().enumerate() {
        if entry.value.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("types[{index}] value must be non-empty"),
            });
        }
    }

    config.flow_rules()?;
    Ok(())
}
