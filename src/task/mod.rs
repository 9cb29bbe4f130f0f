//! Prioritized task tracking.
//!
//! Tasks are ranked by a computed priority score instead of manual ordering.
//! Ending tasks are completed once; endless tasks accumulate time logs that
//! lower or reset their impact. The module follows hexagonal architecture:
//!
//! - Domain types and the priority engine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
