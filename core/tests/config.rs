//! Runner configuration files, written the way users write them.

use complexity_core::{
    config::{ExperimentSpec, RunnerConfig},
    error::SimError,
    ising::IsingParams,
    random_walk::FirstReturnParams,
};
use std::path::PathBuf;

struct TempConfig(PathBuf);

impl TempConfig {
    fn write(tag: &str, json: &str) -> Self {
        let path = std::env::temp_dir()
            .join(format!("complexity-config-{tag}-{}.json", std::process::id()));
        std::fs::write(&path, json).expect("write config");
        Self(path)
    }

    fn path(&self) -> &str {
        self.0.to_str().expect("utf-8 temp path")
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn load_reads_documented_experiment_names() {
    let file = TempConfig::write(
        "names",
        r#"{
            "seed": 9,
            "db_path": "cache.db",
            "experiments": [
                {"experiment": "ising_2d", "size": 8, "nsteps": 40, "beta": 0.4},
                {"experiment": "ising_1d", "size": 20, "beta": 1.0, "nsteps": 30},
                {"experiment": "first_return_1d", "nsteps": 100, "nwalks": 5},
                {"experiment": "first_return_2d", "nsteps": 100, "nwalks": 5},
                {"experiment": "bak_sneppen", "size": 50, "nsteps": 200}
            ]
        }"#,
    );
    let config = RunnerConfig::load(file.path()).unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.db_path, "cache.db");
    let names: Vec<&str> = config.experiments.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["ising_2d", "ising_1d", "first_return_1d", "first_return_2d", "bak_sneppen"]);
    assert_eq!(
        config.experiments[0],
        ExperimentSpec::Ising2d(IsingParams { size: 8, nsteps: 40, beta: 0.4, nsnapshots: 8 })
    );
    assert_eq!(
        config.experiments[3],
        ExperimentSpec::FirstReturn2d(FirstReturnParams { nsteps: 100, nwalks: 5 })
    );
}

#[test]
fn demo_config_survives_a_file_round_trip() {
    let demo = RunnerConfig::default_demo();
    let file = TempConfig::write("demo", &serde_json::to_string_pretty(&demo).unwrap());
    let loaded = RunnerConfig::load(file.path()).unwrap();
    assert_eq!(loaded.seed, demo.seed);
    let names = |c: &RunnerConfig| c.experiments.iter().map(|s| s.name()).collect::<Vec<_>>();
    assert_eq!(names(&loaded), names(&demo));
}

#[test]
fn load_rejects_invalid_parameters() {
    let file = TempConfig::write(
        "invalid",
        r#"{"experiments": [{"experiment": "bak_sneppen", "size": 2, "nsteps": 10}]}"#,
    );
    let err = RunnerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "size", .. }), "{err}");
}

#[test]
fn load_rejects_unknown_experiment() {
    let file = TempConfig::write(
        "unknown",
        r#"{"experiments": [{"experiment": "ising2d", "size": 8, "nsteps": 40, "beta": 0.4}]}"#,
    );
    let err = RunnerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, SimError::Serialization(_)), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RunnerConfig::load("/nonexistent/complexity/runs.json").unwrap_err();
    assert!(matches!(err, SimError::Io(_)), "{err}");
}
