use std::process::Command;

fn scenario_path() -> String {
    format!("{}/../../scenarios/crossroads.toml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn cli_prints_json_summary_for_shipped_scenario() {
    let output = Command::new(env!("CARGO_BIN_EXE_emberline"))
        .args([scenario_path().as_str(), "--json", "--duration-secs", "30"])
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run the emberline binary");

    assert!(output.status.success(), "emberline exited with {}", output.status);
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a json summary");
    assert_eq!(summary["simulated_ms"], 30_000);
    assert!(summary["spawned"].as_u64().expect("spawned count") > 0);
    assert_eq!(summary["outcome"], "out_of_time");
    assert_eq!(summary["waves_started"], 1);
}

#[test]
fn cli_reports_missing_scenario() {
    let output = Command::new(env!("CARGO_BIN_EXE_emberline"))
        .arg("does/not/exist.toml")
        .output()
        .expect("failed to run the emberline binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"), "stderr: {stderr}");
}
