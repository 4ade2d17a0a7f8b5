//! Multiplicative bet-hedging process.

use crate::{
    error::{require_probability, SimError, SimResult},
    rng::SimRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetHedgingParams {
    pub nsteps: u64,
    pub starting_capital: f64,
    pub loss_probability: f64,
    /// Fraction of capital gained or lost each round.
    pub invest_fraction: f64,
}

impl Default for BetHedgingParams {
    fn default() -> Self {
        Self { nsteps: 500, starting_capital: 10.0, loss_probability: 0.5, invest_fraction: 0.5 }
    }
}

impl BetHedgingParams {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.starting_capital.is_finite() && self.starting_capital > 0.0) {
            return Err(SimError::invalid(
                "starting_capital",
                format!("must be finite and > 0, got {}", self.starting_capital),
            ));
        }
        require_probability("loss_probability", self.loss_probability)?;
        require_probability("invest_fraction", self.invest_fraction)
    }

    /// Expected log-growth per round; negative means ruin in the long run.
    /// An outcome that never happens contributes nothing, even if it would
    /// wipe out the capital.
    pub fn log_growth_rate(&self) -> f64 {
        let win = 1.0 - self.loss_probability;
        [(win, 1.0 + self.invest_fraction), (self.loss_probability, 1.0 - self.invest_fraction)]
            .into_iter()
            .filter(|&(weight, _)| weight > 0.0)
            .map(|(weight, factor)| weight * factor.ln())
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetHedgingRun {
    pub params: BetHedgingParams,
    /// Capital before the first round, then after every round.
    pub capital: Vec<f64>,
    pub wins: u64,
}

pub fn run(params: &BetHedgingParams, rng: &mut SimRng) -> SimResult<BetHedgingRun> {
    params.validate()?;
    let mut capital = Vec::with_capacity(params.nsteps as usize + 1);
    let mut current = params.starting_capital;
    let mut wins = 0;
    capital.push(current);
    for _ in 0..params.nsteps {
        if rng.next_f64() > params.loss_probability {
            current *= 1.0 + params.invest_fraction;
            wins += 1;
        } else {
            current *= 1.0 - params.invest_fraction;
        }
        capital.push(current);
    }
    log::debug!(
        "bet_hedging nsteps={} wins={wins} final={:.4e} growth={:.4}",
        params.nsteps,
        current,
        params.log_growth_rate()
    );
    Ok(BetHedgingRun { params: params.clone(), capital, wins })
}
