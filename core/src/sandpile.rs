//! Sandpile ("bureaucrat") model.
//!
//! Every step one task lands on a random desk. A desk holding four or
//! more tasks passes one to each neighbouring desk; tasks passed over
//! the edge of the office are lost. Toppling repeats until every desk
//! holds at most three tasks, and the number of topplings is the
//! avalanche size of that step.

use crate::{
    error::{require_at_least, SimResult},
    lattice::SquareLattice,
    rng::SimRng,
    types::{Coord, Step},
};
use serde::{Deserialize, Serialize};

pub const TOPPLE_THRESHOLD: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandpileParams {
    pub size: usize,
    pub nsteps: u64,
}

impl Default for SandpileParams {
    fn default() -> Self {
        Self { size: 30, nsteps: 3000 }
    }
}

impl SandpileParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("size", self.size, 1)?;
        require_at_least("nsteps", self.nsteps, 1)
    }

    /// Roughly ten snapshots per run, at least one step apart.
    pub fn snapshot_interval(&self) -> Step {
        (self.nsteps / 10).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct Sandpile {
    grid: SquareLattice<u32>,
    lost: u64,
}

impl Sandpile {
    pub fn new(size: usize) -> Self {
        Self { grid: SquareLattice::new(size, 0), lost: 0 }
    }

    pub fn grid(&self) -> &SquareLattice<u32> {
        &self.grid
    }

    /// Tasks that have fallen off the edge so far.
    pub fn lost(&self) -> u64 {
        self.lost
    }

    pub fn total(&self) -> u64 {
        self.grid.cells().iter().map(|&v| v as u64).sum()
    }

    pub fn mean_load(&self) -> f64 {
        self.total() as f64 / self.grid.len() as f64
    }

    /// Drop one task at `(i, j)` and relax. Returns the number of topplings.
    pub fn add_and_relax(&mut self, i: usize, j: usize) -> u64 {
        *self.grid.get_mut(i, j) += 1;
        let mut unstable: Vec<Coord> = vec![(i, j)];
        let mut topplings = 0;

        while let Some((r, c)) = unstable.pop() {
            let load = *self.grid.get(r, c);
            if load < TOPPLE_THRESHOLD {
                continue;
            }
            // Topple as many times as this desk can in one go.
            let times = load / TOPPLE_THRESHOLD;
            self.grid.set(r, c, load % TOPPLE_THRESHOLD);
            topplings += times as u64;

            let mut kept = 0;
            let neighbours: Vec<Coord> = self.grid.open_neighbours(r, c).collect();
            for (nr, nc) in neighbours {
                let cell = self.grid.get_mut(nr, nc);
                *cell += times;
                kept += 1;
                if *cell >= TOPPLE_THRESHOLD {
                    unstable.push((nr, nc));
                }
            }
            self.lost += (TOPPLE_THRESHOLD as u64 - kept) * times as u64;
        }
        topplings
    }

    pub fn is_stable(&self) -> bool {
        self.grid.cells().iter().all(|&v| v < TOPPLE_THRESHOLD)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub step: Step,
    pub grid: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandpileRun {
    pub params: SandpileParams,
    pub mean_load: Vec<f64>,
    pub avalanche_sizes: Vec<u64>,
    pub snapshots: Vec<GridSnapshot>,
    pub lost: u64,
    pub final_grid: Vec<Vec<u32>>,
}

pub fn run(params: &SandpileParams, rng: &mut SimRng) -> SimResult<SandpileRun> {
    params.validate()?;
    let mut pile = Sandpile::new(params.size);
    let interval = params.snapshot_interval();
    let steps = params.nsteps as usize;
    let mut mean_load = Vec::with_capacity(steps);
    let mut avalanche_sizes = Vec::with_capacity(steps);
    let mut snapshots = Vec::new();

    for step in 0..params.nsteps {
        let i = rng.next_index(params.size);
        let j = rng.next_index(params.size);
        avalanche_sizes.push(pile.add_and_relax(i, j));
        mean_load.push(pile.mean_load());
        if step.is_multiple_of(interval) {
            snapshots.push(GridSnapshot { step, grid: pile.grid().to_rows() });
        }
    }

    log::debug!(
        "sandpile size={} nsteps={} mean={:.3} largest avalanche={} lost={}",
        params.size,
        params.nsteps,
        pile.mean_load(),
        avalanche_sizes.iter().max().copied().unwrap_or(0),
        pile.lost()
    );

    Ok(SandpileRun {
        params: params.clone(),
        mean_load,
        avalanche_sizes,
        snapshots,
        lost: pile.lost(),
        final_grid: pile.grid().to_rows(),
    })
}
