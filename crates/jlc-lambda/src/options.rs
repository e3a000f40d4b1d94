//! Options controlling how lambdas are grouped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity at which lambdas may share a group class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingScope {
    /// Every lambda gets its own group class.
    None,
    /// Lambdas of the same top-level type may share.
    #[default]
    Type,
    /// Lambdas of the same package may share.
    Package,
}

impl GroupingScope {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Type => "type",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for GroupingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "type" => Ok(Self::Type),
            "package" => Ok(Self::Package),
            other => Err(format!(
                "invalid grouping scope '{other}'. Expected none, type, or package"
            )),
        }
    }
}

/// Options of the lambda grouping pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LambdaOptions {
    /// Group lambdas implementing different (but hierarchy-compatible)
    /// interface sets together; the group class implements the normalized
    /// union.
    pub merge_interfaces: bool,
    pub grouping_scope: GroupingScope,
    /// Share one pre-built instance per capture-less lambda through static
    /// fields instead of allocating at every evaluation.
    pub simplify_stateless: bool,
    /// Simple-name prefix of generated group classes; the class id follows.
    pub group_class_prefix: String,
}

impl LambdaOptions {
    pub const DEFAULT_GROUP_CLASS_PREFIX: &'static str = "-$Lambda$";
}

impl Default for LambdaOptions {
    fn default() -> Self {
        Self {
            merge_interfaces: false,
            grouping_scope: GroupingScope::Type,
            simplify_stateless: true,
            group_class_prefix: Self::DEFAULT_GROUP_CLASS_PREFIX.to_string(),
        }
    }
}
