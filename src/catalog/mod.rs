//! Reference data catalogs
//!
//! Both catalogs are immutable snapshots produced upstream; the engine
//! only reads them.

mod gpu;
mod region;

pub use gpu::{find_preset, workload_presets, GpuSpecCatalog, WorkloadPreset};
pub use region::{validate_records, RegionCatalog};
