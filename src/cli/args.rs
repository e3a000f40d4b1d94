use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use jlc_lambda::GroupingScope;

/// CLI arguments for the jlc binary.
#[derive(Parser, Debug)]
#[command(
    name = "jlc",
    version,
    about = "Groups lambda expressions of a compiled Java program into shared synthetic classes"
)]
pub struct CliArgs {
    /// Path to a jlc.json project file, or a directory containing one.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Group lambdas regardless of the interfaces they implement.
    #[arg(long = "merge-interfaces")]
    pub merge_interfaces: bool,

    /// How far apart lambdas may live and still share a group class.
    #[arg(long = "grouping-scope", value_enum, ignore_case = true)]
    pub grouping_scope: Option<Scope>,

    /// Share one instance per stateless lambda through a static field.
    #[arg(long = "simplify-stateless", value_name = "BOOL")]
    pub simplify_stateless: Option<bool>,

    /// Simple-name prefix of synthesized group classes.
    #[arg(long = "group-class-prefix", value_name = "PREFIX")]
    pub group_class_prefix: Option<String>,

    /// Print the group classes and rewritten types as Java-like source.
    #[arg(long)]
    pub print: bool,

    /// Print a JSON summary of the run.
    #[arg(long, conflicts_with = "print")]
    pub json: bool,

    /// Print grouping statistics.
    #[arg(long)]
    pub stats: bool,

    /// Colorize diagnostics (defaults to on when stdout is a terminal).
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub pretty: Option<bool>,

    /// Program files (JSON) or directories to search for them.
    pub inputs: Vec<PathBuf>,
}

/// Command-line spelling of [`GroupingScope`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    None,
    Type,
    Package,
}

impl From<Scope> for GroupingScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::None => GroupingScope::None,
            Scope::Type => GroupingScope::Type,
            Scope::Package => GroupingScope::Package,
        }
    }
}
