//! Random contact networks.

use crate::{
    error::{require_at_least, require_probability, SimResult},
    graph::Graph,
    rng::SimRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub n: usize,
    /// Probability that a given pair is NOT linked from one side.
    pub alpha: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self { n: 22, alpha: 0.97 }
    }
}

impl NetworkParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("n", self.n, 1)?;
        require_probability("alpha", self.alpha)
    }
}

/// Each node links to every other node with probability `1 - alpha`.
/// A node left without links is tied to one random other node, so for
/// `n >= 2` nobody is isolated.
pub fn random_network(params: &NetworkParams, rng: &mut SimRng) -> SimResult<Graph> {
    params.validate()?;
    let n = params.n;
    let mut graph = Graph::new(n);
    for i in 0..n {
        for j in (0..n).filter(|&j| j != i) {
            if rng.next_f64() > params.alpha {
                graph.add_edge(i, j);
            }
        }
        if n > 1 && graph.degree(i) == 0 {
            // Uniform over the other n - 1 nodes.
            let mut j = rng.next_index(n - 1);
            if j >= i {
                j += 1;
            }
            graph.add_edge(i, j);
        }
    }
    log::debug!("random_network n={} alpha={:.3} edges={}", n, params.alpha, graph.edge_count());
    Ok(graph)
}
