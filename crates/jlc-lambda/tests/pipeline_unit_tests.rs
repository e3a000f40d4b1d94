use super::*;
use crate::test_fixtures::*;
use jlc_ir::visit::count_lambdas;

fn run(program: &mut Program, options: &LambdaOptions) -> Result<DesugarOutput, DesugarError> {
    LambdaGroupingPass::new(options, &*JDK).run(program)
}

#[test]
fn test_run_rewrites_and_appends_group_classes() {
    let mut program = stateless_runnables_program();
    let output = run(&mut program, &LambdaOptions::default()).expect("no errors");

    assert_eq!(program.synthetic_types.len(), 1);
    assert_eq!(program.synthetic_types[0].name, "p.-$Lambda$0");
    for class in &program.types {
        for method in &class.methods {
            assert_eq!(count_lambdas(&method.body), 0);
        }
    }
    assert_eq!(
        output.stats,
        DesugarStats {
            lambdas: 3,
            groups: 1,
            singleton_fields: 3,
            forwarding_methods: 3,
            dispatch_methods: 1,
            classes_saved: 2,
        }
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_program_without_lambdas_is_unchanged() {
    let mut program = program_of(vec![class_with("p.A", vec![void_method("m", vec![])])]);
    let before = program.clone();
    let output = run(&mut program, &LambdaOptions::default()).expect("no errors");
    assert_eq!(program, before);
    assert_eq!(output.stats, DesugarStats::default());
}

#[test]
fn test_abort_leaves_program_untouched() {
    let mut program = program_of(vec![
        class_with(
            "p.A",
            vec![void_method(
                "m",
                vec![LambdaBuilder::new("p.Missing", run_sig(), "p.A", "b").stmt()],
            )],
        ),
        class_with(
            "p.B",
            vec![void_method("m", vec![LambdaBuilder::runnable("p.B", "ok").stmt()])],
        ),
    ]);
    let before = program.clone();

    let err = run(&mut program, &LambdaOptions::default()).unwrap_err();
    let DesugarError::Aborted { diagnostics } = &err;
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(err.diagnostics().len(), 1);
    assert!(err.to_string().contains("1 error"));
    assert_eq!(program, before);
}

#[test]
fn test_every_unresolved_lambda_is_reported() {
    let mut program = program_of(vec![class_with(
        "p.A",
        vec![
            void_method(
                "m",
                vec![LambdaBuilder::new("p.Gone", run_sig(), "p.A", "a").span(5, 9).stmt()],
            ),
            void_method(
                "n",
                vec![LambdaBuilder::new("p.Gone", run_sig(), "p.A", "b").span(1, 3).stmt()],
            ),
        ],
    )]);
    let err = run(&mut program, &LambdaOptions::default()).unwrap_err();
    let starts: Vec<u32> = err.diagnostics().iter().map(|d| d.start).collect();
    // Sorted by position regardless of which task finished first.
    assert_eq!(starts, vec![1, 5]);
}

#[test]
fn test_phases_can_be_driven_separately() {
    let options = LambdaOptions::default();
    let pass = LambdaGroupingPass::new(&options, &*JDK);
    let mut program = stateless_runnables_program();

    let (collection, reporter) = pass.collect_lambdas(&program.types);
    assert!(!reporter.is_aborted());
    assert_eq!(collection.lambda_count(), 3);

    let groups = pass.create_group_classes(collection);
    let finalized = pass.finalize_groups(&groups);
    let mut table = SynthesisTable::new();
    for group in finalized {
        for (id, synthesis) in group.syntheses {
            table.insert(id, synthesis);
        }
    }
    assert_eq!(rewrite_sites(&table, &mut program.types), 3);
}

#[test]
fn test_duplicate_type_aborts_instead_of_dropping_lambdas() {
    let class = class_with(
        "p.A",
        vec![void_method(
            "m",
            vec![
                LambdaBuilder::runnable("p.A", "lambda$m$0").stmt(),
                LambdaBuilder::runnable("p.A", "lambda$m$1").stmt(),
            ],
        )],
    );
    let mut program = program_of(vec![class.clone(), class]);
    let before = program.clone();

    let err = run(&mut program, &LambdaOptions::default()).unwrap_err();
    assert_eq!(err.diagnostics().len(), 1);
    assert_eq!(
        err.diagnostics()[0].code,
        jlc_common::diagnostic_codes::DUPLICATE_TYPE_DECLARATION
    );
    assert_eq!(program, before);
}

#[test]
fn test_deeply_nested_lambda_aborts() {
    let deep = (0..jlc_common::limits::MAX_IR_VISIT_DEPTH).fold(
        LambdaBuilder::runnable("p.A", "lambda$m$0").stmt(),
        |inner, _| jlc_ir::IrNode::Block(vec![inner]),
    );
    let mut program = program_of(vec![class_with("p.A", vec![void_method("m", vec![deep])])]);
    let before = program.clone();

    let err = run(&mut program, &LambdaOptions::default()).unwrap_err();
    assert_eq!(
        err.diagnostics()[0].code,
        jlc_common::diagnostic_codes::METHOD_BODY_TOO_DEEP
    );
    assert!(program.synthetic_types.is_empty());
    assert_eq!(program, before);
}
