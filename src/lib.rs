//! **gridflow** solves discrete optimal transport between two measures on
//! regular Cartesian grids of arbitrary fixed dimension.
//!
//! Given source supplies on an X-grid, target demands on a Y-grid, and the
//! squared-Euclidean ground cost, [`multiscale::GridSolver`] computes an
//! integral min-cost flow transporting all supply to satisfy all demand.
//!
//! The crate is organized bottom-up:
//!
//! - [`grid`] -- position/index arithmetic over row-major grids.
//! - [`bipartite`] -- an append-only red/blue digraph arena.
//! - [`grid_graph`] -- a [`bipartite::BpDigraph`] specialized to two grids,
//!   carrying supplies, costs and per-red shield rectangles.
//! - [`simplex`] -- an integer primal network simplex with a shielded pivot
//!   rule layered on top of the five classical ones.
//! - [`multiscale`] -- the coarsen/solve/refine driver that makes large grids
//!   tractable.

pub mod bipartite;
pub mod grid;
pub mod grid_graph;
pub mod multiscale;
pub mod simplex;

pub use bipartite::{ArcId, BlueId, BpDigraph, NodeId, RedId};
pub use grid_graph::{sort_support, GridGraph, Support};
pub use multiscale::GridSolver;
pub use simplex::{
    extract_support, run_shielded, FlowNetwork, NetSimplex, PivotRule, ProblemType, SupplyType,
    TotalCost,
};
