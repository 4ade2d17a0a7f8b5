//! Site percolation on a square lattice.
//!
//! Every site carries a uniform random value; a site is open when its
//! value is below `p`. Open sites joined through up/down/left/right
//! neighbours form a domain. The lattice edge is closed (no wrap).

use crate::{
    error::{require_at_least, require_probability, SimResult},
    lattice::SquareLattice,
    rng::SimRng,
    stats,
    types::Coord,
};
use serde::{Deserialize, Serialize};

/// Lowest and highest occupation probability of a sweep.
pub const SWEEP_P_MIN: f64 = 0.01;
pub const SWEEP_P_MAX: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercolationParams {
    pub size: usize,
    pub p: f64,
}

impl Default for PercolationParams {
    fn default() -> Self {
        Self { size: 24, p: 0.1 }
    }
}

impl PercolationParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("size", self.size, 1)?;
        require_probability("p", self.p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub size: usize,
    pub n_ps: usize,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self { size: 24, n_ps: 5 }
    }
}

impl SweepParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("size", self.size, 1)?;
        require_at_least("n_ps", self.n_ps, 1)
    }
}

/// Draw the random site values for one lattice.
pub fn random_lattice(size: usize, rng: &mut SimRng) -> SquareLattice<f64> {
    SquareLattice::from_fn(size, |_, _| rng.next_f64())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percolation {
    pub size: usize,
    pub p: f64,
    /// Domains in row-major order of their first site; each sorted.
    pub domains: Vec<Vec<Coord>>,
}

impl Percolation {
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn domain_sizes(&self) -> Vec<usize> {
        self.domains.iter().map(Vec::len).collect()
    }

    pub fn open_sites(&self) -> usize {
        self.domains.iter().map(Vec::len).sum()
    }

    pub fn largest_domain(&self) -> usize {
        self.domains.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True if one domain touches both the top and the bottom row.
    pub fn spans(&self) -> bool {
        let bottom = self.size - 1;
        self.domains.iter().any(|d| {
            d.iter().any(|&(i, _)| i == 0) && d.iter().any(|&(i, _)| i == bottom)
        })
    }

    /// Per-site domain label, `None` for closed sites.
    pub fn labels(&self) -> SquareLattice<Option<usize>> {
        let mut labels = SquareLattice::new(self.size, None);
        for (label, domain) in self.domains.iter().enumerate() {
            for &(i, j) in domain {
                labels.set(i, j, Some(label));
            }
        }
        labels
    }
}

/// Label the open domains of `values` at threshold `p`.
pub fn find_domains(values: &SquareLattice<f64>, p: f64) -> Percolation {
    let open = values.map(|&v| v < p);
    let mut visited = SquareLattice::new(values.size(), false);
    let mut domains = Vec::new();
    let mut stack = Vec::new();

    for ((i, j), &is_open) in open.iter() {
        if !is_open || *visited.get(i, j) {
            continue;
        }
        visited.set(i, j, true);
        stack.push((i, j));
        let mut domain = Vec::new();
        while let Some((r, c)) = stack.pop() {
            domain.push((r, c));
            for (nr, nc) in open.open_neighbours(r, c) {
                if *open.get(nr, nc) && !*visited.get(nr, nc) {
                    visited.set(nr, nc, true);
                    stack.push((nr, nc));
                }
            }
        }
        domain.sort_unstable();
        domains.push(domain);
    }

    Percolation { size: values.size(), p, domains }
}

pub fn run(params: &PercolationParams, rng: &mut SimRng) -> SimResult<Percolation> {
    params.validate()?;
    let values = random_lattice(params.size, rng);
    let result = find_domains(&values, params.p);
    log::debug!(
        "percolation size={} p={:.3} domains={} largest={} spans={}",
        params.size,
        params.p,
        result.domain_count(),
        result.largest_domain(),
        result.spans()
    );
    Ok(result)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPoint {
    pub p: f64,
    pub domain_count: usize,
    pub domain_sizes: Vec<usize>,
    pub largest_domain: usize,
    pub spans: bool,
}

/// Domain statistics over `linspace(0.01, 0.9, n_ps)`, all on one lattice.
pub fn sweep(params: &SweepParams, rng: &mut SimRng) -> SimResult<Vec<SweepPoint>> {
    params.validate()?;
    let values = random_lattice(params.size, rng);
    let points = stats::linspace(SWEEP_P_MIN, SWEEP_P_MAX, params.n_ps)
        .into_iter()
        .map(|p| {
            let result = find_domains(&values, p);
            SweepPoint {
                p,
                domain_count: result.domain_count(),
                domain_sizes: result.domain_sizes(),
                largest_domain: result.largest_domain(),
                spans: result.spans(),
            }
        })
        .collect();
    Ok(points)
}
