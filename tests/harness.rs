//! Golden-file test harness for cjs2esm.
//!
//! Discovers `.input.js` files under `tests/fixtures/`, converts each one
//! (parse → transform → codegen, resolving local specifiers against the
//! fixture directory) and compares the output against the corresponding
//! `.expected.js` file. Comparison ignores whitespace.
//!
//! Set `CE_UPDATE_FIXTURES=1` to overwrite expected files with actual output.

use std::path::{Path, PathBuf};

use anyhow::Result;
use ce_ast::TransformOptions;
use ce_parser::parse_commonjs;
use ce_transform::{transform_file, transform_source, OsFileSystem};

fn fixtures_dir() -> PathBuf {
    // CARGO_MANIFEST_DIR is crates/ce_test/, so go up two levels to workspace root.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
}

fn collect_input_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = walkdir(dir)
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".input.js"))
        })
        .collect();
    files.sort();
    files
}

fn walkdir(dir: &Path) -> Vec<PathBuf> {
    let mut result = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                result.extend(walkdir(&path));
            } else {
                result.push(path);
            }
        }
    }
    result
}

fn normalize(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

fn test_name(fixtures: &Path, input: &Path) -> String {
    input
        .strip_prefix(fixtures)
        .unwrap_or(input)
        .display()
        .to_string()
}

fn run_pipeline(input: &Path) -> Result<String> {
    Ok(transform_file(input, &TransformOptions::default())?.code)
}

#[test]
fn golden_file_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);

    assert!(
        !input_files.is_empty(),
        "No test fixtures found in {}",
        fixtures.display()
    );

    let update_mode = std::env::var("CE_UPDATE_FIXTURES").is_ok();
    let mut failures = Vec::new();

    for input_path in &input_files {
        let expected_path = PathBuf::from(
            input_path
                .to_str()
                .unwrap()
                .replace(".input.js", ".expected.js"),
        );
        let test_name = test_name(&fixtures, input_path);

        let actual = match run_pipeline(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e:#}"));
                continue;
            }
        };

        if update_mode {
            if let Err(e) = std::fs::write(&expected_path, &actual) {
                failures.push(format!("{test_name}: failed to write expected: {e}"));
            }
            continue;
        }

        let expected = match std::fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!(
                    "{test_name}: failed to read {}: {e}",
                    expected_path.display()
                ));
                continue;
            }
        };
        if normalize(&actual) != normalize(&expected) {
            failures.push(format!(
                "{test_name}: output mismatch\n--- expected ---\n{}\n--- actual ---\n{}",
                expected.trim(),
                actual.trim()
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

/// Every output must parse as an ES module, and converting it again must
/// not change it.
#[test]
fn roundtrip_tests() {
    let fixtures = fixtures_dir();
    let input_files = collect_input_files(&fixtures);
    let options = TransformOptions::default();

    let mut failures = Vec::new();

    for input_path in &input_files {
        let test_name = test_name(&fixtures, input_path);

        let output = match run_pipeline(input_path) {
            Ok(s) => s,
            Err(e) => {
                failures.push(format!("{test_name}: pipeline failed: {e:#}"));
                continue;
            }
        };

        if let Err(e) = parse_commonjs(&output, &format!("{test_name}.output.js")) {
            failures.push(format!(
                "{test_name}: output is not a valid module: {e}\n--- output ---\n{}",
                output.trim()
            ));
            continue;
        }

        match transform_source(&output, input_path, &options, &OsFileSystem) {
            Ok(again) if normalize(&again.code) == normalize(&output) => {}
            Ok(again) => failures.push(format!(
                "{test_name}: second conversion changed the output\n--- first ---\n{}\n--- second ---\n{}",
                output.trim(),
                again.code.trim()
            )),
            Err(e) => failures.push(format!("{test_name}: second conversion failed: {e}")),
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} roundtrip test(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}
