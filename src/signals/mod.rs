// =============================================================================
// Signals Module
// =============================================================================
//
// Turns an indicator bundle into the ordered, labelled signal list carried by
// every analysis report.

pub mod generator;

pub use generator::{Signal, SignalGenerator};
