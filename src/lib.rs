//! Causal Reasoning Demo Service
//!
//! A small Rust server simulating causal reasoning over collider graphs:
//! - Fixed scenario registry across six domains
//! - Randomized model responses with explaining-away dynamics
//! - Axum HTTP surface serving schema lookups and evaluations

pub mod evaluator;
pub mod scenario;
pub mod server;

// Re-exports for convenience
pub use evaluator::{evaluate, EvaluationRequest, ModelKind, QueryVariable};
pub use scenario::Scenario;
