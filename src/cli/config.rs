use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use jlc_lambda::{GroupingScope, LambdaOptions};

use crate::cli::args::CliArgs;

/// File name looked up when `--project` names a directory.
pub const CONFIG_FILE_NAME: &str = "jlc.json";

/// Accepts `true` as well as `"true"`, `"yes"`, `"on"` and `"1"` (and their negations).
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub lambda_options: Option<LambdaOptionsConfig>,
    /// Program files or directories, relative to the config file.
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
}

/// `lambdaOptions` as written in `jlc.json`; unset fields keep their defaults.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LambdaOptionsConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub merge_interfaces: Option<bool>,
    #[serde(default)]
    pub grouping_scope: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub simplify_stateless: Option<bool>,
    #[serde(default)]
    pub group_class_prefix: Option<String>,
}

/// A loaded project config and the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub config: ProjectConfig,
}

impl LoadedProject {
    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.config
            .inputs
            .iter()
            .flatten()
            .map(|input| self.base_dir.join(input))
            .collect()
    }
}

pub fn parse_project_config(source: &str) -> Result<ProjectConfig> {
    serde_json::from_str(source).context("failed to parse project config")
}

/// Load `path`, or `path/jlc.json` when `path` is a directory.
pub fn load_project_config(path: &Path) -> Result<LoadedProject> {
    let path = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read project config {}", path.display()))?;
    let config = parse_project_config(&source)
        .with_context(|| format!("invalid project config {}", path.display()))?;
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(LoadedProject {
        path,
        base_dir,
        config,
    })
}

/// Turn the `lambdaOptions` block into pass options.
pub fn resolve_lambda_options(config: Option<&LambdaOptionsConfig>) -> Result<LambdaOptions> {
    let mut options = LambdaOptions::default();
    let Some(config) = config else {
        return Ok(options);
    };

    if let Some(merge) = config.merge_interfaces {
        options.merge_interfaces = merge;
    }
    if let Some(scope) = config.grouping_scope.as_deref() {
        options.grouping_scope = scope
            .parse::<GroupingScope>()
            .map_err(anyhow::Error::msg)?;
    }
    if let Some(simplify) = config.simplify_stateless {
        options.simplify_stateless = simplify;
    }
    if let Some(prefix) = &config.group_class_prefix {
        options.group_class_prefix = validate_group_class_prefix(prefix)?;
    }
    Ok(options)
}

/// Command-line flags win over the project config.
pub fn apply_cli_overrides(options: &mut LambdaOptions, args: &CliArgs) -> Result<()> {
    if args.merge_interfaces {
        options.merge_interfaces = true;
    }
    if let Some(scope) = args.grouping_scope {
        options.grouping_scope = scope.into();
    }
    if let Some(simplify) = args.simplify_stateless {
        options.simplify_stateless = simplify;
    }
    if let Some(prefix) = &args.group_class_prefix {
        options.group_class_prefix = validate_group_class_prefix(prefix)?;
    }
    Ok(())
}

/// The prefix becomes part of a simple class name inside an existing package.
fn validate_group_class_prefix(prefix: &str) -> Result<String> {
    if prefix.is_empty() {
        bail!("group class prefix must not be empty");
    }
    if let Some(bad) = prefix
        .chars()
        .find(|c| matches!(c, '.' | '/' | ';' | '[') || c.is_whitespace())
    {
        bail!("group class prefix '{prefix}' contains invalid character '{bad}'");
    }
    Ok(prefix.to_string())
}
