//! Render scenario results as console text, JSON, or Markdown.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use crate::scenarios::ScenarioResult;

/// Write `results` to `out` in the requested format. Unknown format names
/// fall back to the console report.
pub fn write_report<W: Write>(out: &mut W, results: &[ScenarioResult], format: &str) -> Result<()> {
    match format {
        "json" => write_json_report(out, results),
        "markdown" => write_markdown_report(out, results),
        _ => write_console_report(out, results),
    }
}

fn write_console_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📋 Scenario Results".bold().underline())?;
    writeln!(out)?;

    for result in results {
        let badge = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{badge} {} ({}/{} iterations, avg {:?})",
            result.scenario_name.bold(),
            result.successful_iterations,
            result.iterations_run,
            result.average_duration
        )?;
        for failure in &result.failures {
            writeln!(out, "     {} {failure}", "↳".red())?;
        }
    }

    let passed = results.iter().filter(|result| result.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = if results.is_empty() {
        100.0
    } else {
        passed as f64 / results.len() as f64 * 100.0
    };
    writeln!(out)?;
    let summary = format!("{passed}/{} scenarios passed ({rate:.0}%)", results.len());
    if passed == results.len() {
        writeln!(out, "🎉 {}", summary.green().bold())?;
    } else {
        writeln!(out, "⚠️  {}", summary.yellow().bold())?;
    }
    Ok(())
}

fn write_json_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    let body = serde_json::to_string_pretty(results)?;
    writeln!(out, "{body}")?;
    Ok(())
}

fn write_markdown_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Scenario Report")?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;
    writeln!(out, "| Scenario | Result | Iterations | Avg duration |")?;
    writeln!(out, "|----------|--------|------------|--------------|")?;
    for result in results {
        let verdict = if result.passed { "✅ pass" } else { "❌ fail" };
        writeln!(
            out,
            "| {} | {verdict} | {}/{} | {:?} |",
            result.scenario_name,
            result.successful_iterations,
            result.iterations_run,
            result.average_duration
        )?;
    }

    let failing: Vec<_> = results.iter().filter(|result| !result.passed).collect();
    if !failing.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Failures")?;
        for result in failing {
            writeln!(out)?;
            writeln!(out, "### {}", result.scenario_name)?;
            writeln!(out)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "Start flow".to_string(),
            iterations_run: 10,
            successful_iterations: if passed { 10 } else { 7 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["seed 3: weather never reached the panel".to_string()]
            },
            average_duration: Duration::from_millis(2),
            passed,
        }
    }

    #[test]
    fn console_report_names_every_scenario() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[sample(true), sample(false)], "console").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Start flow"));
        assert!(text.contains("1/2 scenarios passed"));
        assert!(text.contains("seed 3"));
    }

    #[test]
    fn json_report_round_trips() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[sample(true)], "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed[0]["scenario_name"], "Start flow");
        assert_eq!(parsed[0]["passed"], true);
        assert_eq!(parsed[0]["iterations_run"], 10);
    }

    #[test]
    fn markdown_report_tabulates_and_lists_failures() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[sample(false)], "markdown").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# Scenario Report"));
        assert!(text.contains("| Start flow | ❌ fail | 7/10 |"));
        assert!(text.contains("## Failures"));
        assert!(text.contains("- seed 3"));
    }

    #[test]
    fn unknown_formats_fall_back_to_console() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[sample(true)], "csv").unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("scenarios passed"));
    }
}
