use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Host features for the driver: std error impls, settings serde, tracing.
pub const HOST_FEATURES: &str = "sgtl5000/std,sgtl5000/serde,sgtl5000/tracing";

/// Which part of the test tree a suite covers.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Unit,
    Integration,
    Doc,
}

/// One `cargo test` invocation.
struct Suite {
    kind: Kind,
    label: &'static str,
    /// Selects the test targets; host features are appended.
    selector: &'static [&'static str],
}

const SUITES: &[Suite] = &[
    Suite {
        kind: Kind::Unit,
        label: "inline unit tests",
        selector: &["--lib"],
    },
    Suite {
        kind: Kind::Integration,
        label: "crates/*/tests (register port, enable sequence, CC dispatch, proptest, serde)",
        selector: &["--test", "*"],
    },
    Suite {
        kind: Kind::Doc,
        label: "doc tests",
        selector: &["--doc"],
    },
];

/// Pass/fail counts summed over every `test result:` line of a run.
#[derive(Default, Debug, PartialEq, Eq)]
struct Tally {
    passed: u32,
    failed: u32,
    ignored: u32,
}

impl Tally {
    fn parse(output: &str) -> Self {
        let mut tally = Self::default();
        for line in output.lines() {
            let Some(result) = line.split("test result:").nth(1) else {
                continue;
            };
            for part in result.split(';') {
                let mut words = part.split_whitespace().rev();
                let (Some(name), Some(count)) = (words.next(), words.next()) else {
                    continue;
                };
                let Ok(count) = count.parse::<u32>() else {
                    continue;
                };
                match name {
                    "passed" => tally.passed = tally.passed.saturating_add(count),
                    "failed" => tally.failed = tally.failed.saturating_add(count),
                    "ignored" => tally.ignored = tally.ignored.saturating_add(count),
                    _ => {}
                }
            }
        }
        tally
    }
}

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running driver tests...".cyan().bold());
    println!();

    let total_start = Instant::now();
    let mut total = Tally::default();

    let selected = SUITES.iter().filter(|suite| match suite.kind {
        Kind::Unit => !integration_only,
        Kind::Integration => !unit_only,
        Kind::Doc => !unit_only && !integration_only,
    });

    for suite in selected {
        println!("{}", format!("  Running {}...", suite.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .arg("test")
            .arg("--workspace")
            .args(suite.selector)
            .args(["--features", HOST_FEATURES])
            .output()
            .with_context(|| format!("Failed to run {}", suite.label))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let tally = Tally::parse(&stdout);

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", suite.label).red().bold());
            eprintln!();
            for line in stdout.lines().filter(|l| l.contains("FAILED") || l.contains("panicked")) {
                eprintln!("  {}", line);
            }
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{} failed ({} failed, {} passed)", suite.label, tally.failed, tally.passed);
        }

        println!(
            "{}",
            format!(
                "  ✓ {} passed, {} ignored in {:.2}s",
                tally.passed,
                tally.ignored,
                start.elapsed().as_secs_f64()
            )
            .green()
        );
        println!();

        total.passed = total.passed.saturating_add(tally.passed);
        total.ignored = total.ignored.saturating_add(tally.ignored);
    }

    println!(
        "{}",
        format!(
            "✓ {} tests passed in {:.2}s",
            total.passed,
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_sums_every_result_line() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 1 ignored; 0 measured; 0 filtered out; finished in 0.01s

running 2 tests
test result: FAILED. 1 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out; finished in 0.00s
";
        assert_eq!(
            Tally::parse(output),
            Tally {
                passed: 4,
                failed: 1,
                ignored: 1
            }
        );
    }

    #[test]
    fn test_tally_of_empty_output_is_zero() {
        assert_eq!(Tally::parse("error: could not compile"), Tally::default());
    }

    #[test]
    fn test_integration_suite_excludes_lib_targets() {
        let integration = SUITES.iter().find(|s| s.kind == Kind::Integration).unwrap();
        assert_eq!(integration.selector, &["--test", "*"]);
        assert!(!integration.selector.contains(&"--tests"));
    }
}
