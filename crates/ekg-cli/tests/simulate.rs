use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[test]
fn reports_config_and_estimate() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("ekg.toml");
    fs::write(
        &config,
        "[waveform]\ncount = 200\nseed = 11\n\n[estimator]\nthreshold = 0.8\nwindow_s = 10.0\n",
    )
    .unwrap();

    let output = Command::cargo_bin("ekg")
        .unwrap()
        .args(&["simulate", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["samples"], 200);
    assert_eq!(json["config"]["waveform"]["count"], 200);
    assert_eq!(json["config"]["estimator"]["threshold"], 0.8);
    assert!(json["estimate"]["bpm"].is_number());
}

#[test]
fn seeded_runs_are_reproducible() {
    let runs: Vec<Vec<u8>> = (0..2)
        .map(|_| {
            Command::cargo_bin("ekg")
                .unwrap()
                .args(&["simulate", "--seed", "99"])
                .assert()
                .success()
                .get_output()
                .stdout
                .clone()
        })
        .collect();
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn seed_flag_overrides_config_seed() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("ekg.toml");
    fs::write(&config, "[waveform]\ncount = 50\nseed = 1\n").unwrap();

    let output = Command::cargo_bin("ekg")
        .unwrap()
        .args(&[
            "simulate",
            "--config",
            config.to_str().unwrap(),
            "--seed",
            "9",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["config"]["waveform"]["seed"], 9);
}

#[test]
fn emits_samples_when_asked() {
    let temp = tempdir().unwrap();
    let samples = temp.path().join("wave.txt");
    Command::cargo_bin("ekg")
        .unwrap()
        .args(&[
            "simulate",
            "--seed",
            "5",
            "--emit-samples",
            samples.to_str().unwrap(),
        ])
        .assert()
        .success();

    let contents = fs::read_to_string(&samples).unwrap();
    assert_eq!(contents.lines().count(), 1000);
}

#[test]
fn invalid_config_exits_nonzero() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("ekg.toml");
    fs::write(&config, "[estimator]\nwindow_s = 0.0\n").unwrap();

    Command::cargo_bin("ekg")
        .unwrap()
        .args(&["simulate", "--config", config.to_str().unwrap()])
        .assert()
        .failure();
}
