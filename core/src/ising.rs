//! 2D Ising model on a periodic square lattice, Metropolis dynamics.
//!
//! One step = one single-spin-flip attempt at a uniformly random site.
//! Energy and magnetization are tracked incrementally; the energy after a
//! run always equals the energy recomputed from the final lattice.

use crate::{
    error::{require_at_least, SimError, SimResult},
    lattice::SquareLattice,
    rng::SimRng,
    stats,
    types::{Spin, Step},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsingParams {
    pub size: usize,
    pub nsteps: u64,
    pub beta: f64,
    #[serde(default = "default_nsnapshots")]
    pub nsnapshots: u64,
}

fn default_nsnapshots() -> u64 {
    8
}

impl Default for IsingParams {
    fn default() -> Self {
        Self { size: 10, nsteps: 100, beta: 1.0, nsnapshots: default_nsnapshots() }
    }
}

impl IsingParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("size", self.size, 2)?;
        require_at_least("nsteps", self.nsteps, 1)?;
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(SimError::invalid("beta", format!("must be finite and > 0, got {}", self.beta)));
        }
        Ok(())
    }

    /// Steps after which a snapshot is taken, ascending and deduplicated.
    pub fn snapshot_steps(&self) -> Vec<Step> {
        // With more snapshots than steps every step is taken once.
        let count = self.nsnapshots.min(self.nsteps);
        let mut steps: Vec<Step> = (0..count)
            .map(|m| (m as u128 * self.nsteps as u128 / self.nsnapshots as u128) as Step)
            .collect();
        steps.dedup();
        steps
    }
}

/// Metropolis acceptance probability for an energy change `d_e`.
pub fn acceptance_probability(beta: f64, d_e: f64) -> f64 {
    if d_e <= 0.0 {
        1.0
    } else {
        (-beta * d_e).exp()
    }
}

/// `(dE, acceptance)` pairs over `n` evenly spaced energy differences.
pub fn acceptance_curve(beta: f64, lo: f64, hi: f64, n: usize) -> Vec<(f64, f64)> {
    stats::linspace(lo, hi, n)
        .into_iter()
        .map(|d_e| (d_e, acceptance_probability(beta, d_e)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct IsingLattice {
    spins: SquareLattice<Spin>,
    energy: i64,
    magnetization: i64,
}

impl IsingLattice {
    /// Hot start: every spin up or down with probability ½.
    pub fn random(size: usize, rng: &mut SimRng) -> Self {
        let spins = SquareLattice::from_fn(size, |_, _| if rng.chance(0.5) { 1 } else { -1 });
        Self::from_spins(spins)
    }

    pub fn from_spins(spins: SquareLattice<Spin>) -> Self {
        let energy = total_energy(&spins);
        let magnetization = spins.cells().iter().map(|&s| s as i64).sum();
        Self { spins, energy, magnetization }
    }

    pub fn spins(&self) -> &SquareLattice<Spin> {
        &self.spins
    }

    pub fn energy(&self) -> i64 {
        self.energy
    }

    pub fn magnetization(&self) -> i64 {
        self.magnetization
    }

    /// Energy change if the spin at `(i, j)` were flipped.
    pub fn flip_delta(&self, i: usize, j: usize) -> i64 {
        let s = *self.spins.get(i, j) as i64;
        let neighbour_sum: i64 = self
            .spins
            .periodic_neighbours(i, j)
            .iter()
            .map(|&(r, c)| *self.spins.get(r, c) as i64)
            .sum();
        2 * s * neighbour_sum
    }

    /// One Metropolis attempt at a random site. Returns whether it flipped.
    pub fn metropolis_step(&mut self, beta: f64, rng: &mut SimRng) -> bool {
        let n = self.spins.size();
        let i = rng.next_index(n);
        let j = rng.next_index(n);
        let d_e = self.flip_delta(i, j);
        if rng.next_f64() < acceptance_probability(beta, d_e as f64) {
            let s = self.spins.get_mut(i, j);
            *s = -*s;
            self.energy += d_e;
            self.magnetization += 2 * (*s as i64);
            true
        } else {
            false
        }
    }
}

/// `E = -Σ s_i s_j` over nearest-neighbour bonds, each bond once.
pub fn total_energy(spins: &SquareLattice<Spin>) -> i64 {
    let n = spins.size();
    spins
        .iter()
        .map(|((i, j), &s)| {
            let right = *spins.get(i, (j + 1) % n);
            let down = *spins.get((i + 1) % n, j);
            -(s as i64) * (right as i64 + down as i64)
        })
        .sum()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: Step,
    pub spins: Vec<Vec<Spin>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsingRun {
    pub params: IsingParams,
    /// Energy before the first step, then after every step.
    pub energy: Vec<i64>,
    /// Total magnetization, same indexing as `energy`.
    pub magnetization: Vec<i64>,
    pub snapshots: Vec<Snapshot>,
    pub accepted_flips: u64,
    pub susceptibility: f64,
    pub final_spins: Vec<Vec<Spin>>,
}

/// Variance of the magnetization over the last three quarters of the run.
pub fn susceptibility(magnetization: &[i64], nsteps: u64) -> f64 {
    let tail = (3 * nsteps.div_ceil(4)) as usize;
    let tail = tail.min(magnetization.len());
    let window: Vec<f64> =
        magnetization[magnetization.len() - tail..].iter().map(|&m| m as f64).collect();
    stats::variance(&window)
}

pub fn run(params: &IsingParams, rng: &mut SimRng) -> SimResult<IsingRun> {
    params.validate()?;

    let mut lattice = IsingLattice::random(params.size, rng);
    let capacity = params.nsteps as usize + 1;
    let mut energy = Vec::with_capacity(capacity);
    let mut magnetization = Vec::with_capacity(capacity);
    energy.push(lattice.energy());
    magnetization.push(lattice.magnetization());

    let snapshot_steps = params.snapshot_steps();
    let mut next_snapshot = snapshot_steps.iter().peekable();
    let mut snapshots = Vec::with_capacity(snapshot_steps.len());
    let mut accepted_flips = 0;

    for step in 0..params.nsteps {
        if lattice.metropolis_step(params.beta, rng) {
            accepted_flips += 1;
        }
        energy.push(lattice.energy());
        magnetization.push(lattice.magnetization());

        if next_snapshot.next_if(|&&s| s == step).is_some() {
            snapshots.push(Snapshot { step, spins: lattice.spins().to_rows() });
        }
    }

    let susceptibility = susceptibility(&magnetization, params.nsteps);

    log::debug!(
        "ising size={} beta={:.3} nsteps={} accepted={} E={} M={} chi={:.3}",
        params.size,
        params.beta,
        params.nsteps,
        accepted_flips,
        lattice.energy(),
        lattice.magnetization(),
        susceptibility
    );

    Ok(IsingRun {
        params: params.clone(),
        energy,
        magnetization,
        snapshots,
        accepted_flips,
        susceptibility,
        final_spins: lattice.spins().to_rows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_lattice_has_ground_state_energy() {
        let lattice = IsingLattice::from_spins(SquareLattice::new(5, 1));
        assert_eq!(lattice.energy(), -2 * 25);
        assert_eq!(lattice.magnetization(), 25);
        assert_eq!(lattice.flip_delta(2, 2), 8);
    }

    #[test]
    fn checkerboard_has_maximum_energy() {
        let spins = SquareLattice::from_fn(4, |i, j| if (i + j) % 2 == 0 { 1 } else { -1 });
        let lattice = IsingLattice::from_spins(spins);
        assert_eq!(lattice.energy(), 2 * 16);
        assert_eq!(lattice.magnetization(), 0);
    }

    #[test]
    fn acceptance_is_one_for_downhill_moves() {
        assert_eq!(acceptance_probability(2.0, -4.0), 1.0);
        assert_eq!(acceptance_probability(2.0, 0.0), 1.0);
        assert!((acceptance_probability(0.5, 4.0) - (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn snapshot_steps_are_spread_over_run() {
        let params = IsingParams { nsteps: 100, nsnapshots: 8, ..Default::default() };
        assert_eq!(params.snapshot_steps(), vec![0, 12, 25, 37, 50, 62, 75, 87]);
        let crowded = IsingParams { nsteps: 3, nsnapshots: 8, ..Default::default() };
        assert_eq!(crowded.snapshot_steps(), vec![0, 1, 2]);
        let none = IsingParams { nsnapshots: 0, ..Default::default() };
        assert!(none.snapshot_steps().is_empty());
    }

    #[test]
    fn huge_snapshot_count_is_capped_by_steps() {
        let params = IsingParams { nsteps: 5, nsnapshots: 1_000_000_000_000, ..Default::default() };
        assert_eq!(params.snapshot_steps(), vec![0, 1, 2, 3, 4]);
        let long = IsingParams { nsteps: (1 << 63) - 1, nsnapshots: 4, ..Default::default() };
        assert_eq!(
            long.snapshot_steps(),
            vec![0, (1 << 61) - 1, (1 << 62) - 1, 3 * (1 << 61) - 1]
        );
    }

    #[test]
    fn susceptibility_uses_last_three_quarters() {
        // 0 in the first quarter, then alternating ±2.
        let m = vec![100, 100, 2, -2, 2, -2, 2, -2, 2];
        assert!((susceptibility(&m, 8) - 4.0).abs() < 1e-12);
    }
}
