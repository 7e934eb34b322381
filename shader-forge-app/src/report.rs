//! Console output for a build run.

use colored::Colorize;
use forge_core::{BuildObserver, BuildResult, CompileOutcome, UnitStatus};

/// Plain text line for one outcome, without colours.
pub fn outcome_line(outcome: &CompileOutcome) -> String {
    let (label, detail) = outcome_parts(outcome);
    format!("{label} {detail}")
}

/// Trailing summary line.
pub fn summary_line(result: &BuildResult) -> String {
    format!(
        "Summary: {} succeeded, {} failed, {} up to date.",
        result.succeeded(),
        result.failed(),
        result.skipped()
    )
}

fn outcome_parts(outcome: &CompileOutcome) -> (&'static str, String) {
    let source = outcome.source.display();
    match &outcome.status {
        UnitStatus::Compiled => ("Compiled:", format!("{} -> {}", source, outcome.output.display())),
        UnitStatus::UpToDate => ("Up to date:", source.to_string()),
        UnitStatus::Failed { diagnostic } => ("Failed:", format!("{source}: {diagnostic}")),
    }
}

/// Prints one line per unit to stdout and the collected failures to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl BuildObserver for ConsoleReporter {
    fn on_outcome(&self, outcome: &CompileOutcome) {
        let (label, detail) = outcome_parts(outcome);
        let label = match outcome.status {
            UnitStatus::Compiled => label.green(),
            UnitStatus::UpToDate => label.cyan(),
            UnitStatus::Failed { .. } => label.red().bold(),
        };
        println!("{label} {detail}");
    }

    fn on_finish(&self, result: &BuildResult) {
        println!();
        println!("{}", summary_line(result));

        if result.failed() > 0 {
            eprintln!("{} shader(s) failed to compile:", result.failed());
            for failure in result.failures() {
                eprintln!("{}:", failure.source.display());
                for line in failure.diagnostic().lines() {
                    eprintln!("    {line}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_lines() {
        let compiled = CompileOutcome::compiled("/s/a.vert", "/o/a_vert.spv");
        assert_eq!(outcome_line(&compiled), "Compiled: /s/a.vert -> /o/a_vert.spv");

        let skipped = CompileOutcome::up_to_date("/s/a.vert", "/o/a_vert.spv");
        assert_eq!(outcome_line(&skipped), "Up to date: /s/a.vert");

        let failed = CompileOutcome::failed("/s/b.frag", "/o/b_frag.spv", "1: error");
        assert_eq!(outcome_line(&failed), "Failed: /s/b.frag: 1: error");
    }

    #[test]
    fn test_summary_line() {
        let result: BuildResult = vec![
            CompileOutcome::compiled("a.vert", "a_vert.spv"),
            CompileOutcome::failed("b.frag", "b_frag.spv", "oops"),
            CompileOutcome::up_to_date("c.frag", "c_frag.spv"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            summary_line(&result),
            "Summary: 1 succeeded, 1 failed, 1 up to date."
        );
    }
}
