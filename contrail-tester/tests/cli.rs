use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "contrail-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_contrail-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("validation-policy"));
}

#[test]
fn cli_runs_a_scenario_with_a_json_report() {
    let exe = env!("CARGO_BIN_EXE_contrail-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--scenarios",
            "no-session-guard",
            "--iterations",
            "2",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(parsed[0]["scenario_name"], "No-session guard");
    assert_eq!(parsed[0]["passed"], true);
    assert_eq!(parsed[0]["iterations_run"], 2);
}

#[test]
fn cli_rejects_unknown_scenario_keys() {
    let exe = env!("CARGO_BIN_EXE_contrail-tester");
    let output = Command::new(exe)
        .args(["--scenarios", "warp-drive"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warp-drive"));
}

#[test]
fn cli_runs_the_whole_catalog_clean() {
    let exe = env!("CARGO_BIN_EXE_contrail-tester");
    let output_path = temp_path("all");
    let status = Command::new(exe)
        .args(["--iterations", "1", "--report", "markdown", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("✅ pass"));
    assert!(!content.contains("❌ fail"));
}
