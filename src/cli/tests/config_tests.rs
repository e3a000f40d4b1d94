use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::args::CliArgs;
use super::config::{
    CONFIG_FILE_NAME, apply_cli_overrides, load_project_config, parse_project_config,
    resolve_lambda_options,
};
use jlc_lambda::{GroupingScope, LambdaOptions};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

#[test]
fn parses_lambda_options_with_string_booleans() {
    let config = parse_project_config(
        r#"{
          "lambdaOptions": {
            "mergeInterfaces": "yes",
            "groupingScope": "package",
            "simplifyStateless": "off",
            "groupClassPrefix": "$G$"
          },
          "inputs": ["classes"]
        }"#,
    )
    .expect("config should parse");

    let lambda = config.lambda_options.as_ref().expect("lambdaOptions missing");
    assert_eq!(lambda.merge_interfaces, Some(true));
    assert_eq!(lambda.simplify_stateless, Some(false));
    assert_eq!(config.inputs, Some(vec!["classes".to_string()]));

    let options = resolve_lambda_options(Some(lambda)).expect("options should resolve");
    assert_eq!(
        options,
        LambdaOptions {
            merge_interfaces: true,
            grouping_scope: GroupingScope::Package,
            simplify_stateless: false,
            group_class_prefix: "$G$".to_string(),
        }
    );
}

#[test]
fn missing_options_keep_defaults() {
    let config = parse_project_config("{}").expect("empty config should parse");
    assert!(config.lambda_options.is_none());
    assert_eq!(
        resolve_lambda_options(None).expect("defaults"),
        LambdaOptions::default()
    );

    let partial = parse_project_config(r#"{"lambdaOptions": {"mergeInterfaces": true}}"#)
        .expect("partial config should parse");
    let options = resolve_lambda_options(partial.lambda_options.as_ref()).expect("resolve");
    assert!(options.merge_interfaces);
    assert_eq!(options.grouping_scope, GroupingScope::Type);
    assert!(options.simplify_stateless);
}

#[test]
fn rejects_invalid_boolean_string() {
    let err = parse_project_config(r#"{"lambdaOptions": {"simplifyStateless": "sometimes"}}"#)
        .expect_err("should reject");
    assert!(
        format!("{err:#}").contains("invalid boolean value: 'sometimes'"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn rejects_unknown_grouping_scope() {
    let config = parse_project_config(r#"{"lambdaOptions": {"groupingScope": "module"}}"#)
        .expect("config should parse");
    let err = resolve_lambda_options(config.lambda_options.as_ref()).expect_err("should reject");
    assert!(err.to_string().contains("invalid grouping scope 'module'"));
}

#[test]
fn rejects_group_class_prefix_with_package_separator() {
    let config = parse_project_config(r#"{"lambdaOptions": {"groupClassPrefix": "a.b"}}"#)
        .expect("config should parse");
    let err = resolve_lambda_options(config.lambda_options.as_ref()).expect_err("should reject");
    assert!(err.to_string().contains("invalid character '.'"), "{err}");

    let config = parse_project_config(r#"{"lambdaOptions": {"groupClassPrefix": ""}}"#)
        .expect("config should parse");
    assert!(resolve_lambda_options(config.lambda_options.as_ref()).is_err());
}

#[test]
fn load_project_config_from_directory() {
    let temp = TempDir::new().expect("temp dir");
    write_file(
        temp.path(),
        CONFIG_FILE_NAME,
        r#"{"lambdaOptions": {"groupingScope": "none"}, "inputs": ["out/a.json", "lib"]}"#,
    );

    let project = load_project_config(temp.path()).expect("config should load");
    assert_eq!(project.path, temp.path().join(CONFIG_FILE_NAME));
    assert_eq!(project.base_dir, temp.path());
    assert_eq!(
        project.input_paths(),
        vec![temp.path().join("out/a.json"), temp.path().join("lib")]
    );
}

#[test]
fn load_project_config_reports_path_on_failure() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("nope.json");
    let err = load_project_config(&missing).expect_err("missing file");
    assert!(err.to_string().contains("nope.json"), "{err}");

    let broken = write_file(temp.path(), "broken.json", "{ not json");
    let err = load_project_config(&broken).expect_err("broken file");
    assert!(err.to_string().contains("invalid project config"), "{err}");
}

#[test]
fn cli_flags_override_config() {
    let config = parse_project_config(
        r#"{"lambdaOptions": {"groupingScope": "package", "simplifyStateless": true}}"#,
    )
    .expect("config should parse");
    let mut options =
        resolve_lambda_options(config.lambda_options.as_ref()).expect("options should resolve");

    let args = CliArgs::try_parse_from([
        "jlc",
        "--merge-interfaces",
        "--grouping-scope",
        "type",
        "--simplify-stateless",
        "false",
        "--group-class-prefix",
        "Lambdas$",
    ])
    .expect("args should parse");
    apply_cli_overrides(&mut options, &args).expect("overrides apply");

    assert!(options.merge_interfaces);
    assert_eq!(options.grouping_scope, GroupingScope::Type);
    assert!(!options.simplify_stateless);
    assert_eq!(options.group_class_prefix, "Lambdas$");
}

#[test]
fn absent_cli_flags_leave_config_alone() {
    let mut options = LambdaOptions {
        merge_interfaces: true,
        grouping_scope: GroupingScope::None,
        simplify_stateless: false,
        group_class_prefix: "X".to_string(),
    };
    let expected = options.clone();
    let args = CliArgs::try_parse_from(["jlc"]).expect("args should parse");
    apply_cli_overrides(&mut options, &args).expect("overrides apply");
    assert_eq!(options, expected);
}
