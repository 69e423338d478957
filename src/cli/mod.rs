// CLI module
// Command line argument definitions

mod args;

pub use args::{Cli, ConstantVusArgs, RampingVusArgs, Scenario, SmokeArgs};
