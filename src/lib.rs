//! Gridsite library
//!
//! GPU workload power/cost estimation and datacenter site ranking over
//! regional grid data. Exposed as a library for the CLI, the demo and tests.

pub mod catalog;
pub mod core;
pub mod engine;
pub mod i18n;
pub mod policy;
pub mod pricing;
pub mod region;
pub mod simulator;

pub use engine::Engine;
