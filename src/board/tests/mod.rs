//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Performance tests for move generation
//! - `draw.rs` - Draw detection (50-move, repetition)
//! - `edge_cases.rs` - Special positions and edge cases
//! - `eval.rs` - Incremental evaluation
//! - `search.rs` - Search results against a plain minimax
//! - `proptest.rs` - Property-based tests

mod draw;
mod proptest;
mod search;
