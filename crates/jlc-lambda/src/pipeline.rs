//! The lambda grouping pass, phase by phase.
//!
//! 1. `collect_lambdas`: one parallel task per method.
//! 2. Barrier. Abort here when any task reported a fatal diagnostic.
//! 3. `create_group_classes`: single-threaded, sorts keys and members.
//! 4. `finalize_groups`: one parallel task per group.
//! 5. `rewrite_sites`: one parallel task per method.
//!
//! Every parallel phase only starts after the previous one has completed for
//! all of its inputs.

use crate::collection::{LambdaCollection, LambdaGroup};
use crate::collector::{LambdaCollector, duplicate_declarations};
use crate::finalizer::{FinalizedGroup, GroupClassFinalizer};
use crate::options::LambdaOptions;
use crate::reporter::SessionReporter;
use crate::site_rewriter::SiteRewriter;
use crate::stats::DesugarStats;
use crate::synthesis::SynthesisTable;
use jlc_common::Diagnostic;
use jlc_ir::{ClassDecl, Program, TypeHierarchy};
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DesugarError {
    /// The program is malformed or references interfaces missing from the classpath.
    #[error("lambda grouping aborted with {} error(s)", diagnostics.len())]
    Aborted { diagnostics: Vec<Diagnostic> },
}

impl DesugarError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Aborted { diagnostics } => diagnostics,
        }
    }
}

/// Result of a successful run. The group classes themselves have been
/// appended to [`Program::synthetic_types`].
#[derive(Debug, Default)]
pub struct DesugarOutput {
    pub stats: DesugarStats,
    /// Non-fatal diagnostics reported during collection.
    pub diagnostics: Vec<Diagnostic>,
}

pub struct LambdaGroupingPass<'a> {
    options: &'a LambdaOptions,
    hierarchy: &'a dyn TypeHierarchy,
}

impl<'a> LambdaGroupingPass<'a> {
    pub fn new(options: &'a LambdaOptions, hierarchy: &'a dyn TypeHierarchy) -> Self {
        Self { options, hierarchy }
    }

    /// Replace every lambda in `program` with a group class instantiation.
    ///
    /// On error the program is left untouched.
    pub fn run(&self, program: &mut Program) -> Result<DesugarOutput, DesugarError> {
        let _span = tracing::info_span!(
            "lambda_grouping",
            types = program.types.len(),
            scope = %self.options.grouping_scope,
            merge_interfaces = self.options.merge_interfaces,
        )
        .entered();

        let (collection, reporter) = self.collect_lambdas(&program.types);
        if reporter.is_aborted() {
            let diagnostics = reporter.into_diagnostics();
            info!(errors = diagnostics.len(), "lambda grouping aborted");
            return Err(DesugarError::Aborted { diagnostics });
        }
        let diagnostics = reporter.into_diagnostics();

        let lambdas = collection.lambda_count();
        let groups = self.create_group_classes(collection);
        let finalized = self.finalize_groups(&groups);

        let mut stats = DesugarStats {
            lambdas,
            groups: finalized.len(),
            classes_saved: lambdas - finalized.len(),
            ..DesugarStats::default()
        };
        let mut table = SynthesisTable::new();
        let mut classes = Vec::with_capacity(finalized.len());
        for group in finalized {
            stats.singleton_fields += group.singleton_fields;
            stats.forwarding_methods += group.forwarding_methods;
            stats.dispatch_methods += group.dispatch_methods;
            for (id, synthesis) in group.syntheses {
                table.insert(id, synthesis);
            }
            classes.push(group.class);
        }

        let rewritten = rewrite_sites(&table, &mut program.types);
        assert_eq!(
            rewritten, lambdas,
            "BUG: rewrote {rewritten} lambda sites but collected {lambdas}"
        );
        program.synthetic_types.extend(classes);

        info!(
            lambdas = stats.lambdas,
            groups = stats.groups,
            classes_saved = stats.classes_saved,
            "lambda grouping finished"
        );
        Ok(DesugarOutput { stats, diagnostics })
    }

    /// Phase 1: collect every lambda of every method, in parallel.
    ///
    /// Repeated type or method declarations abort before any lambda is collected.
    pub fn collect_lambdas(&self, types: &[ClassDecl]) -> (LambdaCollection, SessionReporter) {
        let _span = tracing::info_span!("collect_lambdas").entered();
        let collection = LambdaCollection::new();
        let reporter = SessionReporter::new();
        reporter.report_all(duplicate_declarations(types));
        if reporter.is_aborted() {
            return (collection, reporter);
        }
        let collector =
            LambdaCollector::new(self.hierarchy, self.options, &collection, &reporter);

        let collected: usize = types
            .par_iter()
            .flat_map_iter(|class| class.methods.iter().map(move |method| (class, method)))
            .map(|(class, method)| collector.collect_method(class, method))
            .sum();

        tracing::debug!(
            collected,
            keys = collection.group_count(),
            diagnostics = reporter.diagnostic_count(),
            "collected lambdas"
        );
        (collection, reporter)
    }

    /// Phase 3: order the collected groups and name their classes.
    pub fn create_group_classes(&self, collection: LambdaCollection) -> Vec<LambdaGroup> {
        let _span = tracing::info_span!("create_group_classes").entered();
        collection.into_groups(self.options)
    }

    /// Phase 4: synthesize every group class, in parallel.
    ///
    /// The result is in group order.
    pub fn finalize_groups(&self, groups: &[LambdaGroup]) -> Vec<FinalizedGroup> {
        let _span = tracing::info_span!("finalize_groups", groups = groups.len()).entered();
        let finalizer = GroupClassFinalizer::new(self.options, self.hierarchy);
        groups.par_iter().map(|group| finalizer.finalize(group)).collect()
    }
}

/// Phase 5: replace lambda sites, one parallel task per method.
pub fn rewrite_sites(table: &SynthesisTable, types: &mut [ClassDecl]) -> usize {
    let _span = tracing::info_span!("rewrite_sites", entries = table.len()).entered();
    let rewriter = SiteRewriter::new(table);
    types
        .par_iter_mut()
        .flat_map_iter(|class| {
            let name = class.name.as_str();
            class.methods.iter_mut().map(move |method| (name, method))
        })
        .map(|(class, method)| rewriter.rewrite_method(class, method))
        .sum()
}

#[cfg(test)]
#[path = "../tests/pipeline_unit_tests.rs"]
mod tests;
