//! `widgen.toml` configuration and tracing setup.
//!
//! Every section is optional; an empty file is a valid configuration. Unknown
//! keys are rejected so typos surface as errors instead of being ignored.
//! Relative paths are resolved against the directory containing the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;

/// Environment variable naming the config file, overriding discovery.
pub const CONFIG_ENV_VAR: &str = "WIDGEN_CONFIG_PATH";

/// Reserved quirk key carrying a class-level alias.
pub const CLASS_ALIAS_KEY: &str = "__classAlias";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgenConfig {
    /// Binary name of the root widget type, e.g. `android.view.View`.
    #[serde(default)]
    pub root: Option<String>,

    /// Archives whose classes are candidates for generation.
    #[serde(default)]
    pub archives: Vec<PathBuf>,

    /// Archives used only to resolve types (platform jars, dependencies).
    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub nullability: NullabilityConfig,

    /// Per-class overrides keyed by canonical class name, then by method key
    /// (`setText`, `setText:CharSequence`) or `__classAlias`.
    #[serde(default)]
    pub quirks: BTreeMap<String, BTreeMap<String, QuirkValue>>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File the generated source is written to.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Comment lines at the top of the generated file.
    #[serde(default)]
    pub header: Option<Vec<String>>,
}

/// Fully qualified names of the DSL runtime. Unset entries keep the built-in
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub attribute_setter: Option<String>,
    #[serde(default)]
    pub renderable: Option<String>,
    #[serde(default)]
    pub view_class_result: Option<String>,
    #[serde(default)]
    pub construct: Option<String>,
    #[serde(default)]
    pub apply_attribute: Option<String>,
    #[serde(default)]
    pub render: Option<String>,
    /// Annotation placed on nullable wrapper parameters.
    #[serde(default)]
    pub nullable_annotation: Option<String>,
    /// Annotation placed on non-null wrapper parameters.
    #[serde(default)]
    pub non_null_annotation: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NullabilityConfig {
    /// Annotation names (simple or fully qualified) meaning "nullable".
    /// Replaces the built-in list when set.
    #[serde(default)]
    pub nullable_annotations: Option<Vec<String>>,
    /// Annotation names meaning "non-null". Replaces the built-in list when set.
    #[serde(default)]
    pub non_null_annotations: Option<Vec<String>>,
    /// Explicit answers keyed `pkg.Class#method(pkg.ParamType)` or
    /// `pkg.Class#method`. These win over annotations.
    #[serde(default)]
    pub overrides: BTreeMap<String, NullabilityOverride>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullabilityOverride {
    Nullable,
    NonNull,
}

/// A quirk entry: a string is replacement code (or, under `__classAlias`, a
/// factory name); `false` skips the method (or excludes the class).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuirkValue {
    Code(String),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`warn`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled nothing is logged.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "warn".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        })
    }

    /// The effective filter: the configured level, with `RUST_LOG` merged in
    /// when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse toml config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: String, message: String },
}

impl WidgenConfig {
    /// Parse and validate a TOML document. Paths are left as written.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WidgenConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, resolving its relative paths against the file's
    /// directory.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: WidgenConfig =
            toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        tracing::debug!(target: "widgen.config", path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Make every relative path absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.archives.iter_mut().for_each(resolve);
        self.classpath.iter_mut().for_each(resolve);
        if let Some(path) = self.output.path.as_mut() {
            resolve(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.root {
            if root.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    key: "root".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        for (class, entries) in &self.quirks {
            for (key, value) in entries {
                let invalid = |message: &str| ConfigError::Invalid {
                    key: format!("quirks.\"{class}\".{key}"),
                    message: message.to_string(),
                };
                match value {
                    QuirkValue::Flag(true) => {
                        return Err(invalid("only `false` or a string is allowed"));
                    }
                    QuirkValue::Code(code) if code.trim().is_empty() => {
                        return Err(invalid("must not be empty"));
                    }
                    _ => {}
                }
                if key == CLASS_ALIAS_KEY {
                    if let QuirkValue::Code(alias) = value {
                        if !is_identifier(alias) {
                            return Err(invalid("class alias must be a Java identifier"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Locate the config file for `dir`: `WIDGEN_CONFIG_PATH` if set (relative to
/// `dir`), else `widgen.toml` or `.widgen.toml` in `dir`.
pub fn discover_config_path(dir: &Path) -> Option<PathBuf> {
    if let Some(value) = std::env::var_os(CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        return Some(if candidate.is_absolute() {
            candidate
        } else {
            dir.join(candidate)
        });
    }
    ["widgen.toml", ".widgen.toml"]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Only the first call has an effect.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        if !config.stderr {
            return;
        }
        let filter = config.env_filter();
        let result = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()
        };
        // Another subscriber (e.g. a test harness) may already be installed.
        let _ = result;
    });
}
