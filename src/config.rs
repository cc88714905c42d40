//! Parameter parsing for `groupby_agg`
//!
//! Parameters can come from JSON, YAML or TOML documents (or an already
//! parsed `serde_json::Value`). Deprecated parameter names are rewritten to
//! their canonical names before deserialization, with a warning logged for
//! each one, so the rest of the crate only ever sees canonical names.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dataframe::GroupByAggOptions;
use crate::error::{Error, Result};
use crate::groupby::GroupKeySpec;

/// A deprecated parameter name and the name that replaced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterAlias {
    pub deprecated: &'static str,
    pub canonical: &'static str,
    /// Crate version that deprecated the alias
    pub since: &'static str,
}

/// Aliases accepted for `groupby_agg` parameters
pub const GROUPBY_AGG_ALIASES: &[ParameterAlias] = &[
    ParameterAlias {
        deprecated: "new_column",
        canonical: "new_column_name",
        since: "0.1.0",
    },
    ParameterAlias {
        deprecated: "agg_column",
        canonical: "agg_column_name",
        since: "0.1.0",
    },
];

/// Record of a deprecated name that was rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationNotice {
    pub deprecated: String,
    pub canonical: String,
    pub since: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is deprecated since {}, use '{}' instead",
            self.deprecated, self.since, self.canonical
        )
    }
}

/// Rewrite deprecated keys of `params` to their canonical names.
///
/// Fails with [`Error::ConflictingParameter`] when a parameter is given
/// under both names.
pub fn canonicalize_params(
    params: &mut Map<String, Value>,
    aliases: &[ParameterAlias],
) -> Result<Vec<DeprecationNotice>> {
    let mut notices = Vec::new();

    for alias in aliases {
        if !params.contains_key(alias.deprecated) {
            continue;
        }
        if params.contains_key(alias.canonical) {
            return Err(Error::ConflictingParameter {
                deprecated: alias.deprecated.to_string(),
                canonical: alias.canonical.to_string(),
            });
        }

        if let Some(value) = params.remove(alias.deprecated) {
            params.insert(alias.canonical.to_string(), value);
        }

        let notice = DeprecationNotice {
            deprecated: alias.deprecated.to_string(),
            canonical: alias.canonical.to_string(),
            since: alias.since.to_string(),
        };
        log::warn!("{}", notice);
        notices.push(notice);
    }

    Ok(notices)
}

/// Grouping columns as written in a config document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ByConfig {
    One(String),
    Many(Vec<String>),
}

/// `groupby_agg` parameters in canonical form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupByAggConfig {
    pub by: ByConfig,
    pub new_column_name: String,
    pub agg_column_name: String,
    pub agg: String,
    #[serde(default = "default_dropna")]
    pub dropna: bool,
}

fn default_dropna() -> bool {
    true
}

/// A parsed config together with the deprecated names it used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: GroupByAggConfig,
    pub deprecations: Vec<DeprecationNotice>,
}

impl GroupByAggConfig {
    pub fn from_value(value: Value) -> Result<LoadedConfig> {
        let mut params = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Config(format!(
                    "expected a mapping of parameters, found {}",
                    other
                )))
            }
        };

        let deprecations = canonicalize_params(&mut params, GROUPBY_AGG_ALIASES)?;
        let config = serde_json::from_value(Value::Object(params))?;
        Ok(LoadedConfig {
            config,
            deprecations,
        })
    }

    pub fn from_json_str(text: &str) -> Result<LoadedConfig> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<LoadedConfig> {
        Self::from_value(serde_yaml::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<LoadedConfig> {
        Self::from_value(toml::from_str(text)?)
    }

    /// Load from a file; the format follows the extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LoadedConfig> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            _ => Err(Error::Config(format!(
                "unsupported config file: {}",
                path.display()
            ))),
        }
    }
}

impl From<ByConfig> for GroupKeySpec {
    fn from(by: ByConfig) -> Self {
        match by {
            ByConfig::One(column) => GroupKeySpec::Columns(vec![column]),
            ByConfig::Many(columns) => GroupKeySpec::Columns(columns),
        }
    }
}

impl From<GroupByAggConfig> for GroupByAggOptions {
    fn from(config: GroupByAggConfig) -> Self {
        GroupByAggOptions::new(
            config.by,
            config.new_column_name,
            config.agg_column_name,
            config.agg,
        )
        .dropna(config.dropna)
    }
}
