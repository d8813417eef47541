pub mod generator;
pub mod service;
pub mod thresholds;

pub use service::{CycleReport, Simulator};
