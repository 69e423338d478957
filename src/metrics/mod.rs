// Metrics module
// Thread-safe collection plus console reporting

pub mod collector;
pub mod reporter;
pub mod types;
