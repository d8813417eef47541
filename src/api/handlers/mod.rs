pub mod actuators;
pub mod alerts;
pub mod debug;
pub mod devices;
pub mod readings;
pub mod thresholds;
