// CLI behaviour of the cypher-mutant binary
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn cli() -> Command {
    Command::cargo_bin("cypher-mutant").unwrap()
}

#[test]
fn cli_prints_report_for_one_category() {
    cli()
        .args(["--category", "Arrow direction", "MATCH (a)-->(b) RETURN a"])
        .assert()
        .success()
        .stdout(
            contains("[INPUT]\n  MATCH (a)-->(b) RETURN a")
                .and(contains("  KEY : Arrow direction\n"))
                .and(contains("    MATCH (a)<--(b) RETURN a\n"))
                .and(contains("2 mutants were generated.")),
        );
}

#[test]
fn cli_defaults_to_every_category() {
    cli()
        .arg("MATCH (a:L) RETURN a LIMIT 1")
        .assert()
        .success()
        .stdout(
            contains("KEY : Label on nodes")
                .and(contains("KEY : MATCH clause"))
                .and(contains("KEY : Trimming section"))
                .and(contains("KEY : Unary operator")),
        );
}

#[test]
fn cli_json_report() {
    let output = cli()
        .args(["--json", "--category", "MATCH clause", "MATCH (a) RETURN a"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["mutants"]["MATCH clause"][0], "OPTIONAL MATCH (a) RETURN a");
}

#[test]
fn cli_errors_exit_zero() {
    cli()
        .arg("RETURN 1; RETURN 2")
        .assert()
        .success()
        .stdout(contains("input shape error"));

    cli()
        .args(["--category", "arrow direction", "MATCH (a) RETURN a"])
        .assert()
        .success()
        .stdout(contains("configuration error"));

    cli()
        .arg("EXPLAIN MATCH (a) RETURN a")
        .assert()
        .success()
        .stdout(contains("unsupported feature"));
}

#[test]
fn cli_dump_ast_and_tree_input() {
    let output = cli()
        .args(["--dump-ast", "MATCH (a)-->(b) RETURN a"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let dumped = String::from_utf8(output.stdout).unwrap();
    assert!(dumped.contains("\"type\": \"statement\""));

    let tree_file = std::env::temp_dir().join("cypher_mutant_cli_tree.json");
    fs::write(&tree_file, &dumped).unwrap();
    cli()
        .args(["--category", "Arrow direction", "--tree"])
        .arg(&tree_file)
        .assert()
        .success()
        .stdout(contains("2 mutants were generated."));
    let _ = fs::remove_file(&tree_file);
}

#[test]
fn cli_config_file() {
    let config_file = std::env::temp_dir().join("cypher_mutant_cli_config.json");
    fs::write(&config_file, r#"{"RETURN clause": true, "MATCH clause": false}"#).unwrap();
    cli()
        .arg("--config")
        .arg(&config_file)
        .arg("MATCH (a) RETURN a")
        .assert()
        .success()
        .stdout(
            contains("    MATCH (a) RETURN DISTINCT a\n")
                .and(contains("1 mutants were generated."))
                .and(contains("MATCH clause").not()),
        );
    let _ = fs::remove_file(&config_file);
}

#[test]
fn cli_runs_fixture_cases() {
    cli()
        .args(["--cases", "fixtures/mutation_cases.json"])
        .assert()
        .success()
        .stdout(contains("38/38 cases passed").and(contains("NG ").not()));
}
