//! Sliding-Block Puzzle Solver Library
//!
//! Models rectangular sliding-block puzzles (Klotski / Hua Rong Dao)
//! and searches for a sequence of single-cell slides that brings the
//! 2x2 goal block to a target region, by depth-first search or A*.

pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod solver;

pub use grid::{Board, BoardError};
pub use solver::{solve, Algorithm, SearchOutcome};
