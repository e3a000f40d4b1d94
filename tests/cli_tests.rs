//! End-to-end tests: programs written to disk as JSON, read back by the
//! driver and by the `jlc` binary.

#[path = "../crates/jlc-lambda/tests/test_fixtures.rs"]
mod test_fixtures;

use clap::Parser;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use jlc::cli::args::CliArgs;
use jlc::cli::driver;
use jlc::ir::{IrPrinter, JType, Program};
use jlc::lambda::{LambdaGroupingPass, LambdaOptions};
use test_fixtures::*;

fn sample_program() -> Program {
    let mut a = class_with(
        "p.A",
        vec![
            void_method(
                "m",
                vec![
                    LambdaBuilder::runnable("p.A", "lambda$m$0").stmt(),
                    LambdaBuilder::runnable("p.A", "lambda$m$1")
                        .capture("s", JType::string())
                        .capture("i", int())
                        .stmt(),
                ],
            ),
            void_method(
                "n",
                vec![
                    LambdaBuilder::runnable("p.A", "lambda$n$0").stmt(),
                    LambdaBuilder::runnable("p.A", "lambda$n$1")
                        .capture("t", JType::string())
                        .capture("j", int())
                        .stmt(),
                ],
            ),
        ],
    );
    a.source_file = Some("p/A.java".to_string());
    let b = class_with(
        "p.B",
        vec![void_method(
            "m",
            vec![LambdaBuilder::new(SUPPLIER, get_sig(), "p.B", "lambda$m$0").stmt()],
        )],
    );
    program_of(vec![a, b])
}

fn write_program(dir: &Path, name: &str, program: &Program) {
    let json = serde_json::to_string_pretty(program).expect("serialize program");
    std::fs::write(dir.join(name), json).expect("write program");
}

fn parse_args(list: &[&str]) -> CliArgs {
    let mut argv = vec!["jlc"];
    argv.extend_from_slice(list);
    CliArgs::try_parse_from(argv).expect("args should parse")
}

#[test]
fn json_round_trip_matches_in_memory_pass() {
    let temp = TempDir::new().expect("temp dir");
    write_program(temp.path(), "program.json", &sample_program());

    let result =
        driver::run(&parse_args(&["program.json"]), temp.path()).expect("run should succeed");

    let mut expected = sample_program();
    let class_path = jlc::ir::ClassPath::for_program(&expected);
    let options = LambdaOptions::default();
    let output = LambdaGroupingPass::new(&options, &class_path)
        .run(&mut expected)
        .expect("pass succeeds");

    assert_eq!(result.program, expected);
    assert_eq!(result.stats, Some(output.stats));
    // p.A: stateless runnables and (int, ref) runnables; p.B: one supplier.
    assert_eq!(output.stats.groups, 3);
    assert_eq!(output.stats.lambdas, 5);
}

#[test]
fn split_inputs_group_like_a_single_file() {
    let temp = TempDir::new().expect("temp dir");
    let program = sample_program();
    std::fs::create_dir(temp.path().join("classes")).expect("mkdir");
    for (i, class) in program.types.iter().enumerate() {
        write_program(
            &temp.path().join("classes"),
            &format!("part{i}.json"),
            &program_of(vec![class.clone()]),
        );
    }
    write_program(temp.path(), "whole.json", &program);

    let split = driver::run(&parse_args(&["classes"]), temp.path()).expect("split run");
    let whole = driver::run(&parse_args(&["whole.json"]), temp.path()).expect("whole run");
    assert_eq!(split.printed_classes(), whole.printed_classes());
}

#[test]
fn printed_output_is_stable_across_runs() {
    let temp = TempDir::new().expect("temp dir");
    write_program(temp.path(), "program.json", &sample_program());
    let args = parse_args(&["--grouping-scope", "package", "--merge-interfaces", "program.json"]);

    let first = driver::run(&args, temp.path()).expect("first run");
    for _ in 0..4 {
        let again = driver::run(&args, temp.path()).expect("repeat run");
        assert_eq!(again.printed_classes(), first.printed_classes());
    }
    // Stateless p.A runnables and the p.B supplier share one class.
    assert_eq!(first.stats.expect("stats").groups, 2);
    let merged = &first.program.synthetic_types[0];
    assert_eq!(merged.interfaces, vec![RUNNABLE.to_string(), SUPPLIER.to_string()]);
    let printed = IrPrinter::print_class(merged);
    assert!(printed.contains("public void run() {"), "{printed}");
    assert!(printed.contains("public java.lang.Object get() {"), "{printed}");
}

#[test]
fn binary_prints_classes_and_stats() {
    let temp = TempDir::new().expect("temp dir");
    write_program(temp.path(), "program.json", &sample_program());

    let output = Command::new(env!("CARGO_BIN_EXE_jlc"))
        .current_dir(temp.path())
        .args(["--print", "--stats", "program.json"])
        .output()
        .expect("run jlc");
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("package p;"), "{stdout}");
    assert!(stdout.contains("class -$Lambda$0"), "{stdout}");
    assert!(stdout.contains("Lambdas:"), "{stdout}");
    assert!(stdout.contains("Group classes:"), "{stdout}");
}

#[test]
fn binary_json_summary() {
    let temp = TempDir::new().expect("temp dir");
    write_program(temp.path(), "program.json", &sample_program());

    let output = Command::new(env!("CARGO_BIN_EXE_jlc"))
        .current_dir(temp.path())
        .args(["--json", "--simplify-stateless", "false", "program.json"])
        .output()
        .expect("run jlc");
    assert!(output.status.success(), "{output:?}");

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("summary is JSON");
    assert_eq!(summary["options"]["simplifyStateless"], false);
    assert_eq!(summary["stats"]["singletonFields"], 0);
    assert_eq!(summary["groupClasses"].as_array().map(Vec::len), Some(3));
}

#[test]
fn binary_exits_with_failure_on_unresolved_interface() {
    let temp = TempDir::new().expect("temp dir");
    let program = program_of(vec![class_with(
        "p.A",
        vec![void_method(
            "m",
            vec![
                LambdaBuilder::new("p.Gone", run_sig(), "p.A", "lambda$m$0")
                    .span(3, 9)
                    .stmt(),
            ],
        )],
    )]);
    write_program(temp.path(), "program.json", &program);

    let output = Command::new(env!("CARGO_BIN_EXE_jlc"))
        .current_dir(temp.path())
        .args(["--print", "--pretty=false", "program.json"])
        .output()
        .expect("run jlc");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "nothing printed on abort");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error JLC7001"), "{stderr}");
    assert!(stderr.contains("'p.Gone'"), "{stderr}");
}

#[test]
fn binary_reports_bad_input() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("broken.json"), "{").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_jlc"))
        .current_dir(temp.path())
        .arg("broken.json")
        .output()
        .expect("run jlc");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.json"), "{stderr}");
}
