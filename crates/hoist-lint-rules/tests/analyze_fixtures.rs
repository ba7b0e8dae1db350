//! Runs `vars-on-top` over the fixture project through the analyzer.

use hoist_lint_core::{Analyzer, Config, Severity};
use hoist_lint_rules::{rules_from_config, VarsOnTop};
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

fn summary(analyzer: &Analyzer) -> Vec<String> {
    let result = analyzer.analyze().expect("analysis should succeed");
    result
        .violations
        .iter()
        .map(|v| format!("{}:{}", v.location.file.display(), v.location.line))
        .collect()
}

#[test]
fn reports_misplaced_declarations_across_files() {
    let analyzer = Analyzer::builder()
        .root(fixture_root())
        .exclude("vendor/**")
        .rule(VarsOnTop::new())
        .build()
        .unwrap();

    assert_eq!(
        summary(&analyzer),
        vec!["src/misplaced.js:3", "src/misplaced.js:10", "src/misplaced.js:12"]
    );
}

#[test]
fn excluded_directories_are_skipped() {
    let analyzer = Analyzer::builder()
        .root(fixture_root())
        .rule(VarsOnTop::new())
        .build()
        .unwrap();

    assert!(summary(&analyzer).contains(&"vendor/legacy.js:2".to_string()));

    let result = Analyzer::builder()
        .root(fixture_root())
        .exclude("vendor/**")
        .rule(VarsOnTop::new())
        .build()
        .unwrap()
        .analyze()
        .unwrap();
    assert_eq!(result.files_checked, 3);
}

#[test]
fn configured_options_and_severity_apply() {
    let config = Config::parse(
        r#"
fail_on = "warning"

[analyzer]
exclude = ["vendor/**"]

[rules.vars-on-top]
severity = "warning"
forStatement = false
forInStatement = false
"#,
    )
    .unwrap();

    let mut builder = Analyzer::builder().root(fixture_root()).config(config.clone());
    for rule in rules_from_config(&config).unwrap() {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().unwrap();
    let result = analyzer.analyze().unwrap();

    let clean: Vec<usize> = result
        .violations
        .iter()
        .filter(|v| v.location.file == Path::new("src/clean.js"))
        .map(|v| v.location.line)
        .collect();
    assert_eq!(clean, vec![9, 12]);
    assert!(result.violations.iter().all(|v| v.severity == Severity::Warning));
    assert!(result.has_violations_at(config.fail_threshold()));
}

#[test]
fn disabled_rule_reports_nothing() {
    let config = Config::parse("[rules.vars-on-top]\nenabled = false\n").unwrap();
    let analyzer = Analyzer::builder()
        .root(fixture_root())
        .config(config)
        .rule(VarsOnTop::new())
        .build()
        .unwrap();

    assert!(summary(&analyzer).is_empty());
}
