//! Statistical-mechanics and complex-systems simulation kernels.
//!
//! Kernels:
//! - [`ising`]: 2D Ising model, Metropolis dynamics.
//! - [`ising_chain`]: 1D Ising chain.
//! - [`percolation`]: site percolation on a square lattice.
//! - [`bethe`]: percolation on a Bethe lattice.
//! - [`network`]: random contact networks.
//! - [`mandelbrot`]: stability maps for `z -> z^a + c`.
//! - [`bak_sneppen`]: Bak-Sneppen evolution model.
//! - [`sandpile`]: sandpile ("bureaucrat") cascades.
//! - [`random_walk`]: 2D walks and first-return statistics.
//! - [`bet_hedging`]: multiplicative capital process.
//!
//! Plumbing: [`rng`], [`lattice`], [`graph`], [`stats`], [`config`],
//! [`store`], [`engine`], [`report`].

pub mod bak_sneppen;
pub mod bet_hedging;
pub mod bethe;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod ising;
pub mod ising_chain;
pub mod lattice;
pub mod mandelbrot;
pub mod network;
pub mod percolation;
pub mod random_walk;
pub mod report;
pub mod rng;
pub mod sandpile;
pub mod stats;
pub mod store;
pub mod types;
