//! Layered configuration
//!
//!     `defaults/statblock.default.toml` is embedded into the crate so the documented defaults
//!     and the runtime defaults cannot drift apart. Callers layer their own files and
//!     key/value overrides on top with [`Loader`] and deserialize into [`StatblockConfig`].
//!
//!     The config maps onto the per-call [`ConvertOptions`] and onto the [`Vocabulary`] (for
//!     homebrew conditions), which is all a [`Converter`] needs.

use crate::statblock::lexing::ContinuationRules;
use crate::statblock::pipeline::{ConvertError, ConvertOptions, Converter};
use crate::statblock::tagging::TaggingOptions;
use crate::statblock::vocabulary::Vocabulary;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/statblock.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatblockConfig {
    pub convert: ConvertConfig,
    pub continuation: ContinuationRules,
    pub tagging: TaggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub source: String,
    pub page: Option<u32>,
    pub title_case_fields: Vec<String>,
    pub is_title_case: bool,
    pub is_append: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaggingConfig {
    pub dice: bool,
    pub conditions: bool,
    pub skills: bool,
    pub senses: bool,
    pub actions: bool,
    pub homebrew_conditions: Vec<HomebrewCondition>,
}

/// A condition contributed by a homebrew source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HomebrewCondition {
    pub name: String,
    pub source: String,
}

impl StatblockConfig {
    /// Per-call options seeded from this configuration.
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            source: self.convert.source.clone(),
            page: self.convert.page,
            title_case_fields: self.convert.title_case_fields.clone(),
            is_title_case: self.convert.is_title_case,
            is_append: self.convert.is_append,
            continuation: self.continuation.clone(),
            tagging: TaggingOptions {
                dice: self.tagging.dice,
                conditions: self.tagging.conditions,
                skills: self.tagging.skills,
                senses: self.tagging.senses,
                actions: self.tagging.actions,
            },
        }
    }

    /// Built-in vocabulary plus the configured homebrew conditions.
    pub fn vocabulary(&self) -> Vocabulary {
        self.tagging
            .homebrew_conditions
            .iter()
            .fold(Vocabulary::builtin(), |vocabulary, condition| {
                vocabulary.with_condition(condition.name.clone(), condition.source.clone())
            })
    }

    pub fn converter(&self) -> Result<Converter, ConvertError> {
        Converter::new(self.vocabulary())
    }
}

/// Errors raised while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Load(config::ConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(e) => Some(e),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Load(e)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<StatblockConfig, ConfigError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<StatblockConfig, ConfigError> {
    Loader::new().build()
}
