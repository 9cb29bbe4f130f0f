//! In-memory adapters for tests and local runs.

mod clock;
mod task;

pub use clock::ManualClock;
pub use task::InMemoryTaskRepository;
