#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint-satisfaction core: board representation, constraint
//! checking, candidate domains, cell selection heuristics and the
//! backtracking search engine.

pub mod board;
pub mod constraint;
pub mod domain;
pub mod engine;
pub mod selection;
