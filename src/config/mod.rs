// Config module
// Load profile presets

pub mod profiles;
