//! Shared primitive types used across the kernels.

/// A single Ising spin, always +1 or -1.
pub type Spin = i8;

/// A step counter inside one simulation run.
pub type Step = u64;

/// Row/column position on a square lattice.
pub type Coord = (usize, usize);

/// The canonical run identifier.
pub type RunId = String;
