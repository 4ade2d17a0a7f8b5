//! The experiment engine: dispatches configured experiments to kernels.
//!
//! RULES:
//!   - Every experiment draws from its own RNG slot of the RngBank.
//!   - Kernels are pure: (params, rng) -> result. Only the engine touches
//!     the store.
//!   - A 2D Ising run records its susceptibility under the run id before
//!     the report is returned.

use crate::{
    bak_sneppen, bet_hedging, bethe,
    config::ExperimentSpec,
    error::SimResult,
    ising, ising_chain, mandelbrot, network, percolation, random_walk,
    report::ExperimentReport,
    rng::{ExperimentSlot, RngBank},
    sandpile,
    store::SimStore,
    types::RunId,
};
use std::collections::HashMap;

pub struct SimEngine {
    pub run_id:   RunId,
    pub rng_bank: RngBank,
    pub store:    SimStore,
}

impl SimEngine {
    /// The run must already exist in `store` (see `SimStore::insert_run`).
    pub fn new(run_id: RunId, seed: u64, store: SimStore) -> Self {
        Self { run_id, rng_bank: RngBank::new(seed), store }
    }

    /// In-memory store, migrated, with the run registered. For tests and
    /// one-shot runs that don't keep the cache.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        Ok(Self::new(run_id, seed, store))
    }

    /// Run one experiment on its plain slot stream.
    pub fn run(&self, spec: &ExperimentSpec) -> SimResult<ExperimentReport> {
        self.run_at(spec, 0)
    }

    /// Run the `sequence`-th experiment of its kind in a batch. Repeating
    /// an experiment kind gives each repeat its own stream; the first of
    /// each kind always uses the plain slot stream.
    pub fn run_at(&self, spec: &ExperimentSpec, sequence: u64) -> SimResult<ExperimentReport> {
        spec.validate()?;
        let mut rng = self.rng_bank.for_experiment_at(spec.slot(), sequence);
        log::debug!(
            "run={} seed={} experiment={} seq={sequence}",
            self.run_id,
            self.rng_bank.master_seed(),
            spec.name()
        );

        let report = match spec {
            ExperimentSpec::Ising2d(params) => {
                let run = ising::run(params, &mut rng)?;
                self.store.upsert_susceptibility(
                    &self.run_id,
                    params.beta,
                    run.susceptibility,
                    params.nsteps,
                    params.size,
                )?;
                let susceptibility = self.store.all_susceptibilities()?;
                ExperimentReport::Ising2d { run, susceptibility }
            }
            ExperimentSpec::Ising1d(params) => {
                ExperimentReport::Ising1d { run: ising_chain::run(params, &mut rng)? }
            }
            ExperimentSpec::Percolation(params) => {
                ExperimentReport::Percolation { result: percolation::run(params, &mut rng)? }
            }
            ExperimentSpec::PercolationSweep(params) => {
                ExperimentReport::PercolationSweep { points: percolation::sweep(params, &mut rng)? }
            }
            ExperimentSpec::Bethe(params) => ExperimentReport::Bethe {
                run: bethe::run(params, &mut rng)?,
                critical_probability: bethe::critical_probability(params.degree),
            },
            ExperimentSpec::BetheSweep(params) => ExperimentReport::BetheSweep {
                points: bethe::sweep(params, &mut rng)?,
                critical_probability: bethe::critical_probability(params.degree),
            },
            ExperimentSpec::RandomNetwork(params) => {
                ExperimentReport::RandomNetwork { graph: network::random_network(params, &mut rng)? }
            }
            ExperimentSpec::Mandelbrot(params) => {
                ExperimentReport::Mandelbrot { map: mandelbrot::run(params)? }
            }
            ExperimentSpec::BakSneppen(params) => {
                ExperimentReport::BakSneppen { run: bak_sneppen::run(params, &mut rng)? }
            }
            ExperimentSpec::Sandpile(params) => {
                ExperimentReport::Sandpile { run: sandpile::run(params, &mut rng)? }
            }
            ExperimentSpec::RandomWalk(params) => {
                ExperimentReport::RandomWalk { walks: random_walk::run(params, &mut rng)? }
            }
            ExperimentSpec::FirstReturn1d(params) => ExperimentReport::FirstReturn1d {
                result: random_walk::first_return_1d(params, &mut rng)?,
            },
            ExperimentSpec::FirstReturn2d(params) => ExperimentReport::FirstReturn2d {
                result: random_walk::first_return_2d(params, &mut rng)?,
            },
            ExperimentSpec::BetHedging(params) => {
                ExperimentReport::BetHedging { run: bet_hedging::run(params, &mut rng)? }
            }
        };
        Ok(report)
    }

    /// Run experiments in order, stopping at the first failure.
    ///
    /// An experiment's stream depends only on its kind and how many of
    /// that kind came before it, so filtering or reordering other kinds
    /// never changes its report.
    pub fn run_all(&self, specs: &[ExperimentSpec]) -> SimResult<Vec<ExperimentReport>> {
        let mut seen: HashMap<ExperimentSlot, u64> = HashMap::new();
        specs
            .iter()
            .map(|spec| {
                let count = seen.entry(spec.slot()).or_insert(0);
                let sequence = *count;
                *count += 1;
                self.run_at(spec, sequence)
            })
            .collect()
    }
}
