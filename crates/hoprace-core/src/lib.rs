//! **hoprace-core** — shared types for the hopping race solver.
//!
//! This crate provides the foundational types used across the *hoprace*
//! workspace: integer geometry primitives and the cooperative cancellation
//! token handed to worker threads.

pub mod context;
pub mod geom;

pub use context::Context;
pub use geom::{Point, Range};
