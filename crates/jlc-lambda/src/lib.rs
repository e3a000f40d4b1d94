//! Lambda grouping for the jlc compiler.
//!
//! Instead of one class per lambda expression, compatible lambdas share a
//! synthesized *group class*. Lambdas are compatible when they capture the
//! same number of values of each kind, implement the same (reduced) set of
//! interfaces and live in the same grouping scope. Each instance of a group
//! class carries a member id selecting which lambda body it runs.
//!
//! The pass is driven by [`LambdaGroupingPass`]:
//! - [`collector`] gathers lambdas into the concurrent [`LambdaCollection`]
//! - [`collection`] orders groups deterministically and names their classes
//! - [`finalizer`] synthesizes fields, constructor, dispatch and forwarding methods
//! - [`site_rewriter`] replaces every lambda site with an instantiation

pub mod options;
pub use options::{GroupingScope, LambdaOptions};

pub mod capture_signature;
pub use capture_signature::{CaptureKind, CaptureMapping, CaptureSignature};

pub mod interface_signature;
pub use interface_signature::{InterfaceSignature, UnresolvedInterfaces, normalize_interfaces};

pub mod collection;
pub use collection::{
    CollectedLambda, GroupId, GroupKey, GroupMember, LambdaCollection, LambdaGroup, StableId,
};

pub mod reporter;
pub use reporter::SessionReporter;

pub mod collector;
pub use collector::LambdaCollector;

pub mod synthesis;
pub use synthesis::{LambdaSynthesis, SynthesisTable};

pub mod finalizer;
pub use finalizer::{FinalizedGroup, GroupClassFinalizer};

pub mod site_rewriter;
pub use site_rewriter::SiteRewriter;

pub mod stats;
pub use stats::DesugarStats;

pub mod pipeline;
pub use pipeline::{DesugarError, DesugarOutput, LambdaGroupingPass};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;
