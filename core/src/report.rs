//! Experiment reports: the engine's output, one variant per kernel.
//! Variants may be appended, never removed or reordered.

use crate::{
    bak_sneppen::BakSneppenRun,
    bet_hedging::BetHedgingRun,
    bethe::BetheRun,
    graph::Graph,
    ising::IsingRun,
    ising_chain::ChainRun,
    mandelbrot::StabilityMap,
    percolation::{Percolation, SweepPoint},
    random_walk::{FirstReturn1d, FirstReturn2d, Walk},
    sandpile::SandpileRun,
    store::SusceptibilityRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "experiment", rename_all = "snake_case")]
pub enum ExperimentReport {
    #[serde(rename = "ising_2d")]
    Ising2d {
        run: IsingRun,
        /// Full cache after this run was recorded, ordered by beta.
        susceptibility: Vec<SusceptibilityRecord>,
    },
    #[serde(rename = "ising_1d")]
    Ising1d {
        run: ChainRun,
    },
    Percolation {
        result: Percolation,
    },
    PercolationSweep {
        points: Vec<SweepPoint>,
    },
    Bethe {
        run: BetheRun,
        critical_probability: f64,
    },
    BetheSweep {
        points: Vec<(f64, usize)>,
        critical_probability: f64,
    },
    RandomNetwork {
        graph: Graph,
    },
    Mandelbrot {
        map: StabilityMap,
    },
    BakSneppen {
        run: BakSneppenRun,
    },
    Sandpile {
        run: SandpileRun,
    },
    RandomWalk {
        walks: Vec<Walk>,
    },
    #[serde(rename = "first_return_1d")]
    FirstReturn1d {
        result: FirstReturn1d,
    },
    #[serde(rename = "first_return_2d")]
    FirstReturn2d {
        result: FirstReturn2d,
    },
    BetHedging {
        run: BetHedgingRun,
    },
}

impl ExperimentReport {
    /// One-line human summary, used by the runner's text output.
    pub fn summary(&self) -> String {
        match self {
            Self::Ising2d { run, susceptibility } => format!(
                "ising_2d: size={} beta={:.2} E={} M={} chi={:.2} (cache: {} betas)",
                run.params.size,
                run.params.beta,
                run.energy.last().copied().unwrap_or(0),
                run.magnetization.last().copied().unwrap_or(0),
                run.susceptibility,
                susceptibility.len()
            ),
            Self::Ising1d { run } => format!(
                "ising_1d: size={} beta={:.2} final M={}",
                run.params.size,
                run.params.beta,
                run.magnetization.last().copied().unwrap_or(0)
            ),
            Self::Percolation { result } => format!(
                "percolation: size={} p={:.2} N={} largest={} spans={}",
                result.size,
                result.p,
                result.domain_count(),
                result.largest_domain(),
                result.spans()
            ),
            Self::PercolationSweep { points } => format!(
                "percolation_sweep: {}",
                points
                    .iter()
                    .map(|pt| format!("N({:.2})={}", pt.p, pt.domain_count))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Self::Bethe { run, critical_probability } => format!(
                "bethe: n={} z={} p={:.2} N={} (p_c={:.3})",
                run.params.n_nodes,
                run.params.degree,
                run.params.p,
                run.domains.len(),
                critical_probability
            ),
            Self::BetheSweep { points, critical_probability } => format!(
                "bethe_sweep: {} (p_c={:.3})",
                points
                    .iter()
                    .map(|(p, n)| format!("N({p:.2})={n}"))
                    .collect::<Vec<_>>()
                    .join(" "),
                critical_probability
            ),
            Self::RandomNetwork { graph } => format!(
                "random_network: nodes={} edges={}",
                graph.node_count(),
                graph.edge_count()
            ),
            Self::Mandelbrot { map } => format!(
                "mandelbrot: res={} a={:.2} n={} stable={:.1}%",
                map.params.resolution,
                map.params.exponent,
                map.params.iterations,
                map.stable_fraction * 100.0
            ),
            Self::BakSneppen { run } => format!(
                "bak_sneppen: size={} steps={} gap={:.3}",
                run.params.size,
                run.params.nsteps,
                run.gap.last().copied().unwrap_or(0.0)
            ),
            Self::Sandpile { run } => format!(
                "sandpile: size={} steps={} mean load={:.3} largest avalanche={}",
                run.params.size,
                run.params.nsteps,
                run.mean_load.last().copied().unwrap_or(0.0),
                run.avalanche_sizes.iter().max().copied().unwrap_or(0)
            ),
            Self::RandomWalk { walks } => format!(
                "random_walk: {}",
                walks
                    .iter()
                    .map(|w| format!("{:?}={:.2}", w.distribution, w.displacement))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            Self::FirstReturn1d { result } => format!(
                "first_return_1d: {}/{} returned",
                result.returned, result.params.nwalks
            ),
            Self::FirstReturn2d { result } => format!(
                "first_return_2d: {}/{} returned",
                result.returned, result.params.nwalks
            ),
            Self::BetHedging { run } => format!(
                "bet_hedging: rounds={} wins={} final capital={:.4e}",
                run.params.nsteps,
                run.wins,
                run.capital.last().copied().unwrap_or(0.0)
            ),
        }
    }
}
