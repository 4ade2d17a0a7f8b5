//! Square lattice storage shared by the grid kernels.
//!
//! Cells are stored row-major in a flat vector. Two neighbourhood
//! conventions are offered:
//! - periodic: the lattice is a torus, every cell has 4 neighbours.
//! - open: neighbours falling off the edge are dropped.

use crate::types::Coord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareLattice<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Clone> SquareLattice<T> {
    /// Create a `size × size` lattice filled with `fill`.
    pub fn new(size: usize, fill: T) -> Self {
        assert!(size >= 1, "Lattice size must be at least 1");
        Self { size, cells: vec![fill; size * size] }
    }
}

impl<T> SquareLattice<T> {
    /// Build a lattice cell by cell, in row-major order.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        assert!(size >= 1, "Lattice size must be at least 1");
        let mut cells = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                cells.push(f(i, j));
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.size && j < self.size, "({i}, {j}) out of bounds");
        i * self.size + j
    }

    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.cells[self.index(i, j)]
    }

    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut T {
        let idx = self.index(i, j);
        &mut self.cells[idx]
    }

    pub fn set(&mut self, i: usize, j: usize, value: T) {
        let idx = self.index(i, j);
        self.cells[idx] = value;
    }

    /// Row-major view of all cells.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate `((i, j), &cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        let n = self.size;
        self.cells.iter().enumerate().map(move |(k, c)| ((k / n, k % n), c))
    }

    /// The four neighbours on a torus: right, left, down, up.
    pub fn periodic_neighbours(&self, i: usize, j: usize) -> [Coord; 4] {
        let n = self.size;
        [
            (i, (j + 1) % n),
            (i, (j + n - 1) % n),
            ((i + 1) % n, j),
            ((i + n - 1) % n, j),
        ]
    }

    /// In-bounds neighbours only: up, down, left, right.
    pub fn open_neighbours(&self, i: usize, j: usize) -> impl Iterator<Item = Coord> {
        let n = self.size;
        let up = i.checked_sub(1).map(|r| (r, j));
        let down = (i + 1 < n).then_some((i + 1, j));
        let left = j.checked_sub(1).map(|c| (i, c));
        let right = (j + 1 < n).then_some((i, j + 1));
        [up, down, left, right].into_iter().flatten()
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> SquareLattice<U> {
        SquareLattice { size: self.size, cells: self.cells.iter().map(f).collect() }
    }
}

impl<T: Clone> SquareLattice<T> {
    /// Nested rows, for serialization to consumers that expect a matrix.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}
