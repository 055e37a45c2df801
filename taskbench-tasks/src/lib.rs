//! taskbench Reference Tasks
//!
//! Concrete algorithms implementing the four-phase task lifecycle, plus
//! seeded data generators and a factory building tasks from configuration.

pub mod factory;
pub mod generate;
pub mod histogram;
pub mod strassen;

pub use factory::{build_task, PreparedTask};
pub use histogram::{linear_histogram_stretch, HistogramStretch};
pub use strassen::{naive_multiply, strassen_multiply, StrassenMultiply};
