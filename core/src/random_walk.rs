//! Random walks in one and two dimensions.
//!
//! - [`run`] compares 2D walks whose step directions come from a
//!   uniform, a normal and a bimodal angle distribution.
//! - [`first_return_1d`] / [`first_return_2d`] collect first-return
//!   times to the origin.

use crate::{
    error::{require_at_least, SimError, SimResult},
    rng::SimRng,
};
use serde::{Deserialize, Serialize};

/// A 2D walker must get this far out before a return counts.
pub const LEAVE_RADIUS: f64 = 1.5;
/// Re-entering this radius after leaving counts as a return.
pub const HOME_RADIUS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleDistribution {
    Uniform,
    Normal,
    Bimodal,
}

impl AngleDistribution {
    pub const ALL: [AngleDistribution; 3] = [Self::Uniform, Self::Normal, Self::Bimodal];

    /// `nsteps` direction angles; the first is always 0.
    fn sample(self, nsteps: usize, sigma: f64, rng: &mut SimRng) -> Vec<f64> {
        let half = nsteps / 2;
        let mut thetas: Vec<f64> = (0..nsteps)
            .map(|k| match self {
                Self::Uniform => rng.next_angle(),
                Self::Normal => rng.next_normal(0.0, sigma),
                Self::Bimodal if k < half => rng.next_normal(-1.0, sigma),
                Self::Bimodal => rng.next_normal(1.0, sigma),
            })
            .collect();
        if let Some(first) = thetas.first_mut() {
            *first = 0.0;
        }
        thetas
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    pub nsteps: usize,
    pub sigma: f64,
    /// Step length is `u^step_exponent`, `u` uniform in [0, 1).
    #[serde(default)]
    pub step_exponent: f64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self { nsteps: 14, sigma: 0.32, step_exponent: 0.0 }
    }
}

impl WalkParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("nsteps", self.nsteps, 1)?;
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(SimError::invalid("sigma", format!("must be finite and >= 0, got {}", self.sigma)));
        }
        if !(self.step_exponent.is_finite() && self.step_exponent >= 0.0) {
            return Err(SimError::invalid(
                "step_exponent",
                format!("must be finite and >= 0, got {}", self.step_exponent),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Walk {
    pub distribution: AngleDistribution,
    pub steps: Vec<(f64, f64)>,
    /// Cumulative positions, starting at the origin; `nsteps + 1` points.
    pub path: Vec<(f64, f64)>,
    pub displacement: f64,
}

pub fn run(params: &WalkParams, rng: &mut SimRng) -> SimResult<Vec<Walk>> {
    params.validate()?;
    let angles: Vec<(AngleDistribution, Vec<f64>)> = AngleDistribution::ALL
        .iter()
        .map(|&d| (d, d.sample(params.nsteps, params.sigma, rng)))
        .collect();
    let lengths: Vec<f64> =
        (0..params.nsteps).map(|_| rng.next_f64().powf(params.step_exponent)).collect();

    let walks = angles
        .into_iter()
        .map(|(distribution, thetas)| {
            let steps: Vec<(f64, f64)> = thetas
                .iter()
                .zip(&lengths)
                .map(|(&theta, &r)| (r * theta.cos(), r * theta.sin()))
                .collect();
            let mut path = Vec::with_capacity(steps.len() + 1);
            let (mut x, mut y) = (0.0f64, 0.0f64);
            path.push((x, y));
            for &(dx, dy) in &steps {
                x += dx;
                y += dy;
                path.push((x, y));
            }
            Walk { distribution, steps, path, displacement: x.hypot(y) }
        })
        .collect::<Vec<_>>();

    for w in &walks {
        log::debug!("random_walk {:?} nsteps={} displacement={:.3}", w.distribution, params.nsteps, w.displacement);
    }
    Ok(walks)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstReturnParams {
    pub nsteps: usize,
    pub nwalks: usize,
}

impl FirstReturnParams {
    pub fn default_1d() -> Self {
        Self { nsteps: 1000, nwalks: 50 }
    }

    pub fn default_2d() -> Self {
        Self { nsteps: 4000, nwalks: 20 }
    }

    pub fn validate(&self) -> SimResult<()> {
        require_at_least("nsteps", self.nsteps, 1)?;
        require_at_least("nwalks", self.nwalks, 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstReturn1d {
    pub params: FirstReturnParams,
    pub walks: Vec<Vec<i64>>,
    /// Points per walk, origin included. A walk that never came back
    /// has `nsteps + 1` points.
    pub lengths: Vec<usize>,
    pub returned: usize,
}

/// ±1 walks from 0, each stopped at its first return to 0.
pub fn first_return_1d(params: &FirstReturnParams, rng: &mut SimRng) -> SimResult<FirstReturn1d> {
    params.validate()?;
    let mut walks = Vec::with_capacity(params.nwalks);
    let mut returned = 0;
    for _ in 0..params.nwalks {
        let mut x = 0i64;
        let mut positions = vec![x];
        for _ in 0..params.nsteps {
            x += if rng.chance(0.5) { -1 } else { 1 };
            positions.push(x);
            if x == 0 {
                returned += 1;
                break;
            }
        }
        walks.push(positions);
    }
    let lengths = walks.iter().map(Vec::len).collect();
    log::debug!("first_return_1d nwalks={} returned={returned}", params.nwalks);
    Ok(FirstReturn1d { params: params.clone(), walks, lengths, returned })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstReturn2d {
    pub params: FirstReturnParams,
    pub paths: Vec<Vec<(f64, f64)>>,
    pub lengths: Vec<usize>,
    pub returned: usize,
}

/// Unit steps in uniform directions. A walk ends when it re-enters the
/// unit circle after having been farther than 3/2 from the origin.
pub fn first_return_2d(params: &FirstReturnParams, rng: &mut SimRng) -> SimResult<FirstReturn2d> {
    params.validate()?;
    let mut paths = Vec::with_capacity(params.nwalks);
    let mut returned = 0;
    for _ in 0..params.nwalks {
        let (mut x, mut y) = (0.0f64, 0.0f64);
        let mut path = vec![(x, y)];
        let mut has_left = false;
        for _ in 0..params.nsteps {
            let theta = rng.next_angle();
            x += theta.cos();
            y += theta.sin();
            path.push((x, y));
            let r = x.hypot(y);
            if !has_left {
                has_left = r > LEAVE_RADIUS;
            } else if r < HOME_RADIUS {
                returned += 1;
                break;
            }
        }
        paths.push(path);
    }
    let lengths = paths.iter().map(Vec::len).collect();
    log::debug!("first_return_2d nwalks={} returned={returned}", params.nwalks);
    Ok(FirstReturn2d { params: params.clone(), paths, lengths, returned })
}
