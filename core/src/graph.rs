//! Undirected graph over `0..n` used by the Bethe lattice and
//! random-network kernels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    pub fn new(n: usize) -> Self {
        Self { adjacency: vec![Vec::new(); n] }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Add the undirected edge `a - b`. Duplicates and self-loops are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a == b || self.adjacency[a].contains(&b) {
            return;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
    }

    pub fn neighbours(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// All edges as `(a, b)` with `a < b`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, ns)| ns.iter().filter(move |&&b| a < b).map(move |&b| (a, b)))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Connected components among the nodes marked open.
    ///
    /// Closed nodes neither belong to a component nor connect two open ones.
    /// Each component is sorted; components are ordered by their smallest node.
    pub fn open_components(&self, open: &[bool]) -> Vec<Vec<usize>> {
        assert_eq!(open.len(), self.node_count(), "open mask length mismatch");
        let mut visited = vec![false; self.node_count()];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for start in 0..self.node_count() {
            if !open[start] || visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push(start);
            let mut component = Vec::new();
            while let Some(node) = stack.pop() {
                component.push(node);
                for &next in &self.adjacency[node] {
                    if open[next] && !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }
}
