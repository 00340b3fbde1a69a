//! Command-line QA harness: drives the Contrail game client against an
//! in-process mock server and reports per-scenario results.

mod harness;
mod report;
mod scenarios;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use colored::Colorize;

use crate::scenarios::{Scenario, catalog, find, list_scenarios, run_scenario};

/// Scenario runner for the Contrail flight game client.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated scenario keys to run, or "all"
    #[arg(short, long, default_value = "all")]
    scenarios: String,

    /// List the available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Base seed for the deterministic mock data
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Iterations per scenario, each with its own derived seed
    #[arg(short, long, default_value_t = 10)]
    iterations: usize,

    /// Report format
    #[arg(short, long, default_value = "console", value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every passing iteration
    #[arg(short, long)]
    verbose: bool,
}

enum OutputTarget {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::Stdout(io::stdout())),
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating report file {}", path.display()))?;
                Ok(Self::File(BufWriter::new(file)))
            }
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(out) => out.write(buf),
            Self::File(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(out) => out.flush(),
            Self::File(out) => out.flush(),
        }
    }
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut target = OutputTarget::new(args.output.as_deref())?;
    writeln!(target, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(target, "  {key:20} - {description}")?;
    }
    target.flush()?;
    Ok(true)
}

fn selected_scenarios(raw: &str) -> Result<Vec<&'static Scenario>> {
    let keys: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .collect();
    if keys.iter().any(|key| *key == "all") {
        return Ok(catalog().iter().collect());
    }

    let mut selected = Vec::with_capacity(keys.len());
    for key in keys {
        match find(key) {
            Some(scenario) => selected.push(scenario),
            None => bail!("unknown scenario '{key}' (try --list-scenarios)"),
        }
    }
    ensure!(!selected.is_empty(), "no scenarios selected");
    Ok(selected)
}

fn announce_banner() {
    println!("{}", "✈️  Contrail QA Harness".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();
    let scenarios = selected_scenarios(&args.scenarios)?;
    println!(
        "Running {} scenario(s), {} iteration(s) each, base seed {}",
        scenarios.len(),
        args.iterations,
        args.seed
    );

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        println!("  {} {}", "▶".cyan(), scenario.name);
        results.push(run_scenario(scenario, args.seed, args.iterations, args.verbose).await);
    }

    let mut target = OutputTarget::new(args.output.as_deref())?;
    report::write_report(&mut target, &results, &args.report)?;
    target.flush()?;
    if let Some(path) = &args.output {
        println!("Report written to {}", path.display());
    }

    if results.iter().any(|result| !result.passed) {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: "all".to_string(),
            list_scenarios: false,
            seed: 1337,
            iterations: 1,
            report: "console".to_string(),
            output: None,
            verbose: false,
        }
    }

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["contrail-tester"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn defaults_cover_the_whole_catalog() {
        let args = parse(&[]);
        assert_eq!(args.scenarios, "all");
        assert_eq!(args.seed, 1337);
        assert_eq!(args.iterations, 10);
        assert_eq!(args.report, "console");
        assert!(args.output.is_none());
        let selected = selected_scenarios(&args.scenarios).expect("catalog selection");
        assert_eq!(selected.len(), catalog().len());
    }

    #[test]
    fn a_comma_list_selects_in_order() {
        let selected = selected_scenarios("fly-chain, weather-outage").expect("known keys");
        let keys: Vec<_> = selected.iter().map(|scenario| scenario.key).collect();
        assert_eq!(keys, vec!["fly-chain", "weather-outage"]);
    }

    #[test]
    fn the_all_token_wins_over_other_keys() {
        let selected = selected_scenarios("fly-chain,all").expect("all expands");
        assert_eq!(selected.len(), catalog().len());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = selected_scenarios("warp-drive").unwrap_err();
        assert!(err.to_string().contains("warp-drive"));
    }

    #[test]
    fn empty_selections_are_rejected() {
        assert!(selected_scenarios(" , ").is_err());
    }

    #[test]
    fn bad_report_formats_fail_at_parse_time() {
        let result = Args::try_parse_from(["contrail-tester", "--report", "csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn maybe_list_scenarios_writes_output() {
        let temp = std::env::temp_dir().join("contrail-scenarios.txt");
        let args = Args {
            list_scenarios: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available scenarios"));
        assert!(content.contains("start-flow"));
    }

    #[test]
    fn maybe_list_scenarios_returns_false_when_disabled() {
        let args = base_args();
        assert!(!maybe_list_scenarios(&args).unwrap());
    }
}
