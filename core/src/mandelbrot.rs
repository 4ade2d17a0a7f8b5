//! Stability maps for the generalised Mandelbrot iteration `z -> z^a + c`.
//!
//! `a` is real, so the complex power takes the principal branch.
//! Points are iterated a fixed number of times from `z = 0`; a point is
//! stable when the final value is finite and within radius 2.

use crate::{
    error::{require_at_least, SimError, SimResult},
    lattice::SquareLattice,
    stats,
};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Real-axis window, traversed from high to low.
pub const RE_RANGE: (f64, f64) = (-1.85, 1.25);
pub const IM_RANGE: (f64, f64) = (-1.25, 1.45);
pub const ESCAPE_RADIUS: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandelbrotParams {
    pub resolution: usize,
    pub exponent: f64,
    pub iterations: u32,
}

impl Default for MandelbrotParams {
    fn default() -> Self {
        Self { resolution: 100, exponent: 2.3, iterations: 27 }
    }
}

impl MandelbrotParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("resolution", self.resolution, 1)?;
        if !(self.exponent.is_finite() && self.exponent > 0.0) {
            return Err(SimError::invalid(
                "exponent",
                format!("must be finite and > 0, got {}", self.exponent),
            ));
        }
        Ok(())
    }
}

/// `z^a` with `0^a = 0`.
fn power(z: Complex64, a: f64) -> Complex64 {
    if z == Complex64::new(0.0, 0.0) {
        return z;
    }
    if a == 2.0 {
        return z * z;
    }
    z.powf(a)
}

/// Value of `z` after `iterations` rounds, starting from 0.
pub fn iterate(c: Complex64, exponent: f64, iterations: u32) -> Complex64 {
    let mut z = Complex64::new(0.0, 0.0);
    for _ in 0..iterations {
        z = power(z, exponent) + c;
        if !z.re.is_finite() || !z.im.is_finite() {
            break;
        }
    }
    z
}

pub fn is_stable(c: Complex64, exponent: f64, iterations: u32) -> bool {
    let z = iterate(c, exponent, iterations);
    z.re.is_finite() && z.im.is_finite() && z.norm() <= ESCAPE_RADIUS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityMap {
    pub params: MandelbrotParams,
    /// `stable[i][j]` for imaginary row `i` and real column `j`.
    pub stable: Vec<Vec<bool>>,
    pub stable_fraction: f64,
}

pub fn run(params: &MandelbrotParams) -> SimResult<StabilityMap> {
    params.validate()?;
    let mut re = stats::linspace(RE_RANGE.0, RE_RANGE.1, params.resolution);
    re.reverse();
    let im = stats::linspace(IM_RANGE.0, IM_RANGE.1, params.resolution);

    let map = SquareLattice::from_fn(params.resolution, |i, j| {
        is_stable(Complex64::new(re[j], im[i]), params.exponent, params.iterations)
    });
    let stable_count = map.cells().iter().filter(|&&s| s).count();
    let stable_fraction = stable_count as f64 / map.len() as f64;

    log::debug!(
        "mandelbrot res={} a={:.2} n={} stable={:.3}",
        params.resolution,
        params.exponent,
        params.iterations,
        stable_fraction
    );

    Ok(StabilityMap { params: params.clone(), stable: map.to_rows(), stable_fraction })
}
