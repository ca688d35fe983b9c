//! Shared configuration loader for the MathLingua tools.
//!
//! `defaults/mathlingua.default.toml` is embedded into every binary so the documented
//! defaults and runtime behavior cannot drift apart. Applications layer user files and
//! `key=value` overrides on top via [`Loader`] before deserializing into
//! [`MathlinguaConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mathlingua.default.toml");

/// Top-level configuration consumed by MathLingua applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MathlinguaConfig {
    pub expansion: ExpansionConfig,
    pub render: RenderConfig,
    pub check: CheckConfig,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

/// Definitional inlining performed before rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    pub max_iterations: usize,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub html: bool,
    pub literal: bool,
    pub html_class_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub skip_operator_signatures: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive such as `warn` or `mathlingua_analysis=debug`
    pub level: String,
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

    /// Layer TOML text, e.g. a `mathlingua.toml` the caller already read.
    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply a `key=value` assignment as typed on a command line.
    pub fn set_assignment(self, assignment: &str) -> Result<Self, ConfigError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            ConfigError::Message(format!("expected key=value but found '{assignment}'"))
        })?;
        self.set_override(key.trim(), value.trim().to_string())
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MathlinguaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MathlinguaConfig, ConfigError> {
    Loader::new().build()
}
