//! Background workers owned by the runtime.
mod scheduler;

pub use scheduler::RoundScheduler;
