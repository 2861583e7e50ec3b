//! Core module - configuration, errors, and the shared data model

mod config;
mod error;
mod types;

pub use config::{Config, GeneralConfig, PricingConfig, SimulationConfig, ScoringConfig, GradeBands, RankingConfig, PolicyConfig, GridConfig};
pub use error::{Error, Result};
pub(crate) use error::{require_positive, require_range};
pub use types::{
    GpuSpec, GpuWorkloadEntry, SimulationRequest, EntrySimulation, SimulationResult, FacilityProfile, FacilityResult,
    GridStability, RegionRecord, DatacenterGrade, RegionScore, RankRequest, LocationRecommendation, PriceGap,
    InvestmentPriority, IncentiveTarget, PolicyInsight, GridRisk, GridImpact,
};
pub(crate) use types::cmp_f64;
