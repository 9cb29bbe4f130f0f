//! Busyness: a personal task tracker that ranks work by computed priority.
//!
//! Instead of ordering tasks by hand, every task carries an impact, an effort
//! estimate, growth and decay rates, and an optional deadline. A pure priority
//! engine turns those into a sortable score at read time.
//!
//! # Architecture
//!
//! Busyness follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, clocks)
//!
//! # Modules
//!
//! - [`task`]: Task records, priority engine, and lifecycle service
//! - [`config`]: Layered runtime settings
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod task;
pub mod telemetry;
