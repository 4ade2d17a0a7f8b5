//! Runner configuration: which experiments to run and with what parameters.
//!
//! Loaded from a JSON file. `RunnerConfig::default_demo()` reproduces the
//! default slider values of the teaching dashboard.

use crate::{
    bak_sneppen::BakSneppenParams,
    bet_hedging::BetHedgingParams,
    bethe::{BetheParams, BetheSweepParams},
    error::{SimError, SimResult},
    ising::IsingParams,
    ising_chain::ChainParams,
    mandelbrot::MandelbrotParams,
    network::NetworkParams,
    percolation::{PercolationParams, SweepParams},
    random_walk::{FirstReturnParams, WalkParams},
    rng::ExperimentSlot,
    sandpile::SandpileParams,
};
use serde::{Deserialize, Serialize};

/// One configured experiment.
/// Variants may be appended, never removed or renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum ExperimentSpec {
    #[serde(rename = "ising_2d")]
    Ising2d(IsingParams),
    #[serde(rename = "ising_1d")]
    Ising1d(ChainParams),
    Percolation(PercolationParams),
    PercolationSweep(SweepParams),
    Bethe(BetheParams),
    BetheSweep(BetheSweepParams),
    RandomNetwork(NetworkParams),
    Mandelbrot(MandelbrotParams),
    BakSneppen(BakSneppenParams),
    Sandpile(SandpileParams),
    RandomWalk(WalkParams),
    #[serde(rename = "first_return_1d")]
    FirstReturn1d(FirstReturnParams),
    #[serde(rename = "first_return_2d")]
    FirstReturn2d(FirstReturnParams),
    BetHedging(BetHedgingParams),
}

impl ExperimentSpec {
    pub fn slot(&self) -> ExperimentSlot {
        match self {
            Self::Ising2d(_) => ExperimentSlot::Ising2d,
            Self::Ising1d(_) => ExperimentSlot::Ising1d,
            Self::Percolation(_) => ExperimentSlot::Percolation,
            Self::PercolationSweep(_) => ExperimentSlot::PercolationSweep,
            Self::Bethe(_) => ExperimentSlot::Bethe,
            Self::BetheSweep(_) => ExperimentSlot::BetheSweep,
            Self::RandomNetwork(_) => ExperimentSlot::RandomNetwork,
            Self::Mandelbrot(_) => ExperimentSlot::Mandelbrot,
            Self::BakSneppen(_) => ExperimentSlot::BakSneppen,
            Self::Sandpile(_) => ExperimentSlot::Sandpile,
            Self::RandomWalk(_) => ExperimentSlot::RandomWalk,
            Self::FirstReturn1d(_) => ExperimentSlot::FirstReturn1d,
            Self::FirstReturn2d(_) => ExperimentSlot::FirstReturn2d,
            Self::BetHedging(_) => ExperimentSlot::BetHedging,
        }
    }

    pub fn name(&self) -> &'static str {
        self.slot().name()
    }

    /// Check parameters without running anything.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            Self::Ising2d(p) => p.validate(),
            Self::Ising1d(p) => p.validate(),
            Self::Percolation(p) => p.validate(),
            Self::PercolationSweep(p) => p.validate(),
            Self::Bethe(p) => p.validate(),
            Self::BetheSweep(p) => p.validate(),
            Self::RandomNetwork(p) => p.validate(),
            Self::Mandelbrot(p) => p.validate(),
            Self::BakSneppen(p) => p.validate(),
            Self::Sandpile(p) => p.validate(),
            Self::RandomWalk(p) => p.validate(),
            Self::FirstReturn1d(p) | Self::FirstReturn2d(p) => p.validate(),
            Self::BetHedging(p) => p.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// SQLite file for the susceptibility cache; `:memory:` keeps nothing.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    pub experiments: Vec<ExperimentSpec>,
}

fn default_seed() -> u64 {
    42
}

fn default_db_path() -> String {
    ":memory:".into()
}

impl RunnerConfig {
    /// Load from a JSON file and validate every experiment.
    pub fn load(path: &str) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: RunnerConfig = serde_json::from_str(&content)?;
        for spec in &config.experiments {
            spec.validate()?;
        }
        log::info!("Loaded {} experiment(s) from {path}", config.experiments.len());
        Ok(config)
    }

    /// Every experiment once, with the default page parameters.
    pub fn default_demo() -> Self {
        Self {
            seed: default_seed(),
            db_path: default_db_path(),
            experiments: vec![
                ExperimentSpec::Ising2d(IsingParams::default()),
                ExperimentSpec::Ising1d(ChainParams::default()),
                ExperimentSpec::Percolation(PercolationParams::default()),
                ExperimentSpec::PercolationSweep(SweepParams::default()),
                ExperimentSpec::Bethe(BetheParams::default()),
                ExperimentSpec::BetheSweep(BetheSweepParams::default()),
                ExperimentSpec::RandomNetwork(NetworkParams::default()),
                ExperimentSpec::Mandelbrot(MandelbrotParams::default()),
                ExperimentSpec::BakSneppen(BakSneppenParams::default()),
                ExperimentSpec::Sandpile(SandpileParams::default()),
                ExperimentSpec::RandomWalk(WalkParams::default()),
                ExperimentSpec::FirstReturn1d(FirstReturnParams::default_1d()),
                ExperimentSpec::FirstReturn2d(FirstReturnParams::default_2d()),
                ExperimentSpec::BetHedging(BetHedgingParams::default()),
            ],
        }
    }

    /// Keep only experiments whose name is in `names`. A name that is not
    /// an experiment kind at all is an error.
    pub fn retain_named(&mut self, names: &[String]) -> SimResult<()> {
        if let Some(unknown) = names.iter().find(|n| ExperimentSlot::from_name(n).is_none()) {
            return Err(SimError::ExperimentNotFound { name: unknown.clone() });
        }
        self.experiments.retain(|spec| names.iter().any(|n| n == spec.name()));
        if self.experiments.is_empty() {
            log::warn!("No configured experiment matched {names:?}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_json_is_tagged_by_experiment_name() {
        let json = r#"{"experiment": "sandpile", "size": 12, "nsteps": 50}"#;
        let spec: ExperimentSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, ExperimentSpec::Sandpile(SandpileParams { size: 12, nsteps: 50 }));
        assert_eq!(spec.name(), "sandpile");
    }

    #[test]
    fn config_defaults_seed_and_db() {
        let json = r#"{"experiments": [{"experiment": "ising_2d", "size": 8, "nsteps": 40, "beta": 0.4}]}"#;
        let config: RunnerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.db_path, ":memory:");
        match &config.experiments[0] {
            ExperimentSpec::Ising2d(p) => assert_eq!(p.nsnapshots, 8),
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn demo_config_is_valid_and_covers_every_slot() {
        let config = RunnerConfig::default_demo();
        assert_eq!(config.experiments.len(), 14);
        for spec in &config.experiments {
            spec.validate().unwrap();
        }
    }

    #[test]
    fn retain_named_filters() {
        let mut config = RunnerConfig::default_demo();
        config
            .retain_named(&["bak_sneppen".to_string(), "mandelbrot".to_string()])
            .unwrap();
        let names: Vec<&str> = config.experiments.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["mandelbrot", "bak_sneppen"]);
    }

    #[test]
    fn retain_named_rejects_unknown_kind() {
        let mut config = RunnerConfig::default_demo();
        let err = config.retain_named(&["sandpile".to_string(), "ising2d".to_string()]).unwrap_err();
        assert!(matches!(err, SimError::ExperimentNotFound { ref name } if name == "ising2d"));
        assert_eq!(config.experiments.len(), 14, "config must be untouched on error");
    }

    #[test]
    fn known_kind_missing_from_config_leaves_it_empty() {
        let mut config = RunnerConfig {
            seed: 1,
            db_path: default_db_path(),
            experiments: vec![ExperimentSpec::Sandpile(SandpileParams::default())],
        };
        config.retain_named(&["mandelbrot".to_string()]).unwrap();
        assert!(config.experiments.is_empty());
    }

    #[test]
    fn json_tag_matches_experiment_name() {
        for spec in RunnerConfig::default_demo().experiments {
            let value = serde_json::to_value(&spec).unwrap();
            assert_eq!(value["experiment"], spec.name());
            let back: ExperimentSpec = serde_json::from_value(value).unwrap();
            assert_eq!(back, spec);
        }
    }
}
