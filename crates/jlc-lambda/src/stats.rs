use serde::Serialize;

/// Counters reported after a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesugarStats {
    pub lambdas: usize,
    pub groups: usize,
    pub singleton_fields: usize,
    pub forwarding_methods: usize,
    pub dispatch_methods: usize,
    /// Classes a one-class-per-lambda translation would have produced on top
    /// of the group classes.
    pub classes_saved: usize,
}
