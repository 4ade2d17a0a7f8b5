//! Percolation on a Bethe lattice (a regular tree, truncated).
//!
//! The root has `degree` children and every other node `degree - 1`,
//! so every interior node ends up with exactly `degree` neighbours.
//! Node ids are handed out breadth-first.

use crate::{
    error::{require_at_least, require_probability, SimResult},
    graph::Graph,
    rng::SimRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetheParams {
    pub n_nodes: usize,
    pub degree: usize,
    pub p: f64,
}

impl Default for BetheParams {
    fn default() -> Self {
        Self { n_nodes: 40, degree: 3, p: 0.33 }
    }
}

impl BetheParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("n_nodes", self.n_nodes, 1)?;
        require_at_least("degree", self.degree, 2)?;
        require_probability("p", self.p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetheSweepParams {
    pub n_nodes: usize,
    pub degree: usize,
    pub ps: Vec<f64>,
}

impl Default for BetheSweepParams {
    fn default() -> Self {
        Self { n_nodes: 32, degree: 3, ps: crate::stats::linspace(0.1, 0.9, 7) }
    }
}

impl BetheSweepParams {
    pub fn validate(&self) -> SimResult<()> {
        require_at_least("n_nodes", self.n_nodes, 1)?;
        require_at_least("degree", self.degree, 2)?;
        self.ps.iter().try_for_each(|&p| require_probability("ps", p))
    }
}

/// Percolation threshold of an infinite Bethe lattice.
pub fn critical_probability(degree: usize) -> f64 {
    1.0 / (degree as f64 - 1.0)
}

/// Build the first `n_nodes` nodes of a Bethe lattice.
pub fn bethe_lattice(n_nodes: usize, degree: usize) -> Graph {
    assert!(degree >= 2, "degree must be >= 2");
    let mut graph = Graph::new(n_nodes);
    let mut next_id = 1;
    for parent in 0..n_nodes {
        let children = if parent == 0 { degree } else { degree - 1 };
        for _ in 0..children {
            if next_id >= n_nodes {
                return graph;
            }
            graph.add_edge(parent, next_id);
            next_id += 1;
        }
    }
    graph
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetheRun {
    pub params: BetheParams,
    pub edges: Vec<(usize, usize)>,
    pub open: Vec<bool>,
    pub domains: Vec<Vec<usize>>,
}

fn percolate(graph: &Graph, p: f64, rng: &mut SimRng) -> (Vec<bool>, Vec<Vec<usize>>) {
    let open: Vec<bool> = (0..graph.node_count()).map(|_| rng.chance(p)).collect();
    let domains = graph.open_components(&open);
    (open, domains)
}

pub fn run(params: &BetheParams, rng: &mut SimRng) -> SimResult<BetheRun> {
    params.validate()?;
    let graph = bethe_lattice(params.n_nodes, params.degree);
    let (open, domains) = percolate(&graph, params.p, rng);
    log::debug!(
        "bethe n={} z={} p={:.3} domains={}",
        params.n_nodes,
        params.degree,
        params.p,
        domains.len()
    );
    Ok(BetheRun { params: params.clone(), edges: graph.edges(), open, domains })
}

/// Number of domains for each `p`, fresh node draws per `p`.
pub fn sweep(params: &BetheSweepParams, rng: &mut SimRng) -> SimResult<Vec<(f64, usize)>> {
    params.validate()?;
    let graph = bethe_lattice(params.n_nodes, params.degree);
    Ok(params
        .ps
        .iter()
        .map(|&p| (p, percolate(&graph, p, rng).1.len()))
        .collect())
}
