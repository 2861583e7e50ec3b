//! Common types used across the engine

use crate::core::GradeBands;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Reference specification of a GPU model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpec {
    /// Catalog identifier (e.g. "H100")
    pub id: String,
    /// Display label (e.g. "NVIDIA H100")
    pub label: String,
    #[serde(default)]
    pub architecture: String,
    /// Reference thermal design power in watts
    pub tdp_watts: f64,
    #[serde(default)]
    pub memory_gb: f64,
    /// Peak AI throughput (TOPS) at the model's headline precision
    #[serde(default)]
    pub ai_performance_tops: f64,
    #[serde(default)]
    pub release_year: u16,
}

impl GpuSpec {
    /// Peak TOPS per watt of TDP
    pub fn perf_per_watt(&self) -> f64 {
        if self.tdp_watts > 0.0 {
            self.ai_performance_tops / self.tdp_watts
        } else {
            0.0
        }
    }
}

/// One homogeneous group of GPUs in a simulated workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuWorkloadEntry {
    /// Catalog model id
    pub gpu_model: String,
    pub quantity: u32,
    /// Average fraction of TDP drawn, in (0, 1]
    pub utilization: f64,
    /// Overrides the catalog TDP when present
    #[serde(default)]
    pub custom_tdp_watts: Option<f64>,
}

impl GpuWorkloadEntry {
    pub fn new(gpu_model: &str, quantity: u32, utilization: f64) -> Self {
        Self {
            gpu_model: gpu_model.to_string(),
            quantity,
            utilization,
            custom_tdp_watts: None,
        }
    }

    pub fn with_custom_tdp(mut self, tdp_watts: f64) -> Self {
        self.custom_tdp_watts = Some(tdp_watts);
        self
    }
}

/// A simulation call: ordered entries run for a common duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub entries: Vec<GpuWorkloadEntry>,
    pub duration_hours: f64,
}

impl SimulationRequest {
    pub fn new(entries: Vec<GpuWorkloadEntry>, duration_hours: f64) -> Self {
        Self { entries, duration_hours }
    }

    pub fn single(entry: GpuWorkloadEntry, duration_hours: f64) -> Self {
        Self::new(vec![entry], duration_hours)
    }
}

/// Per-entry simulation figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySimulation {
    pub gpu_model: String,
    pub quantity: u32,
    /// TDP actually used (custom override or catalog value)
    pub effective_tdp_watts: f64,
    /// Average draw of a single GPU in watts
    pub unit_power_watts: f64,
    pub hourly_power_kw: f64,
    pub total_energy_kwh: f64,
    pub cost_estimate: f64,
    pub carbon_footprint_kg: f64,
    /// Bounded [0, 100] operational efficiency heuristic
    pub efficiency_score: f64,
    pub utilization_actual: f64,
    /// Steady-state board temperature indicator
    pub temperature_estimate_c: f64,
}

/// Aggregate result of a simulation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub entries: Vec<EntrySimulation>,
    pub duration_hours: f64,
    pub total_power_kw: f64,
    pub total_energy_kwh: f64,
    pub total_cost: f64,
    pub total_carbon_kg: f64,
    pub average_efficiency_score: f64,
    pub total_gpu_count: u64,
}

/// Facility overheads applied on top of the IT load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacilityProfile {
    /// Power usage effectiveness (>= 1.0)
    pub pue: f64,
    /// Fraction of facility energy from renewable sources, in [0, 1]
    pub renewable_share: f64,
}

impl Default for FacilityProfile {
    fn default() -> Self {
        Self {
            pue: 1.3,
            renewable_share: 0.0,
        }
    }
}

/// Facility-level roll-up of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityResult {
    pub it: SimulationResult,
    pub profile: FacilityProfile,
    /// Cooling and infrastructure draw beyond the IT load
    pub overhead_power_kw: f64,
    pub facility_power_kw: f64,
    pub facility_energy_kwh: f64,
    pub facility_cost: f64,
    pub facility_carbon_kg: f64,
}

/// Grid stability indicator, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStability {
    High,
    Moderate,
    Low,
}

impl GridStability {
    /// Higher is more stable
    pub fn level(&self) -> u8 {
        match self {
            GridStability::High => 2,
            GridStability::Moderate => 1,
            GridStability::Low => 0,
        }
    }
}

/// Per-region grid supply and pricing snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: String,
    pub name: String,
    /// Annual consumption (MWh)
    pub current_consumption_mwh: f64,
    /// Annual supply capacity (MWh)
    pub supply_capacity_mwh: f64,
    /// Average sale price per kWh
    pub average_price_per_kwh: f64,
    #[serde(default)]
    pub renewable_share: f64,
    pub stability: GridStability,
    /// National usage ranking (1 = highest consumption)
    pub usage_rank: u32,
}

impl RegionRecord {
    /// Current consumption over supply capacity
    pub fn utilization_ratio(&self) -> f64 {
        self.current_consumption_mwh / self.supply_capacity_mwh
    }

    /// Unused share of supply capacity, floored at zero
    pub fn spare_capacity_ratio(&self) -> f64 {
        ((self.supply_capacity_mwh - self.current_consumption_mwh) / self.supply_capacity_mwh).max(0.0)
    }
}

/// Datacenter suitability grade, ordered D < C < B < A < S
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatacenterGrade {
    D,
    C,
    B,
    A,
    S,
}

impl DatacenterGrade {
    /// Map an overall score onto the configured bands
    pub fn from_score(score: f64, bands: &GradeBands) -> Self {
        if score >= bands.s {
            DatacenterGrade::S
        } else if score >= bands.a {
            DatacenterGrade::A
        } else if score >= bands.b {
            DatacenterGrade::B
        } else if score >= bands.c {
            DatacenterGrade::C
        } else {
            DatacenterGrade::D
        }
    }

    /// Multiplier used when weighting incentive targets
    pub fn weight(&self) -> f64 {
        match self {
            DatacenterGrade::S => 1.0,
            DatacenterGrade::A => 0.8,
            DatacenterGrade::B => 0.6,
            DatacenterGrade::C => 0.4,
            DatacenterGrade::D => 0.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatacenterGrade::S => "S",
            DatacenterGrade::A => "A",
            DatacenterGrade::B => "B",
            DatacenterGrade::C => "C",
            DatacenterGrade::D => "D",
        }
    }
}

/// Normalized efficiency scores of one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionScore {
    pub region_id: String,
    pub infrastructure_score: f64,
    pub cost_efficiency_score: f64,
    pub overall_score: f64,
    pub grade: DatacenterGrade,
    pub meets_threshold: bool,
}

/// Parameters of a ranking call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    /// Datacenter power demand in MW
    pub target_power_mw: f64,
    /// GPU profile used to estimate how many units the target supports
    #[serde(default)]
    pub reference_workload: Option<GpuWorkloadEntry>,
}

impl RankRequest {
    pub fn new(target_power_mw: f64) -> Self {
        Self {
            target_power_mw,
            reference_workload: None,
        }
    }

    pub fn with_reference_workload(mut self, entry: GpuWorkloadEntry) -> Self {
        self.reference_workload = Some(entry);
        self
    }
}

/// One ranked candidate site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecommendation {
    pub region_id: String,
    pub region_name: String,
    pub price_per_kwh: f64,
    pub current_consumption_mwh: f64,
    pub utilization_ratio: f64,
    pub score: RegionScore,
    pub annual_energy_kwh: f64,
    pub annual_cost: f64,
    pub tco: f64,
    /// Annual cost minus the mean annual cost across all candidates
    pub cost_delta_vs_mean: f64,
    pub roi_score: f64,
    #[serde(default)]
    pub estimated_gpu_count: Option<u64>,
    /// Utilization at or above the risk threshold
    pub risk_excluded: bool,
    pub recommended: bool,
}

/// Spread between the most and least expensive regions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGap {
    pub highest_region: String,
    pub highest_region_name: String,
    pub highest_price: f64,
    pub lowest_region: String,
    pub lowest_region_name: String,
    pub lowest_price: f64,
    pub mean_price: f64,
    pub gap: f64,
    /// Gap relative to the lowest price, in percent
    pub gap_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPriority {
    pub region_id: String,
    pub region_name: String,
    pub priority_score: f64,
    pub current_usage_gwh: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveTarget {
    pub region_id: String,
    pub region_name: String,
    pub grade: DatacenterGrade,
    /// Mean price minus the region's price
    pub price_advantage: f64,
    pub incentive_score: f64,
}

/// Cross-region policy summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyInsight {
    pub regions_analyzed: usize,
    pub price_gap: Option<PriceGap>,
    pub investment_priorities: Vec<InvestmentPriority>,
    pub incentive_targets: Vec<IncentiveTarget>,
    pub recommendations: Vec<String>,
}

/// Grid stress level after adding a datacenter load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridRisk {
    Low,
    Moderate,
    High,
}

impl GridRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridRisk::Low => "low",
            GridRisk::Moderate => "moderate",
            GridRisk::High => "high",
        }
    }
}

/// Effect of a new datacenter load on a region's grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridImpact {
    pub region_id: String,
    pub datacenter_power_mw: f64,
    /// Average current load (MW)
    pub current_load_mw: f64,
    /// Average supply capacity (MW)
    pub supply_capacity_mw: f64,
    /// Datacenter load relative to the current load; None when the region has no recorded load
    pub load_increase_percent: Option<f64>,
    pub remaining_capacity_mw: f64,
    /// (current load + datacenter) / capacity
    pub capacity_utilization: f64,
    pub risk: GridRisk,
    /// Localized risk label
    pub risk_label: String,
    pub upgrade_needed: bool,
    pub recommended_actions: Vec<String>,
}

/// Total order on scores for deterministic sorting
pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bands() {
        let bands = GradeBands::default();
        assert_eq!(DatacenterGrade::from_score(85.0, &bands), DatacenterGrade::S);
        assert_eq!(DatacenterGrade::from_score(84.99, &bands), DatacenterGrade::A);
        assert_eq!(DatacenterGrade::from_score(70.0, &bands), DatacenterGrade::A);
        assert_eq!(DatacenterGrade::from_score(55.0, &bands), DatacenterGrade::B);
        assert_eq!(DatacenterGrade::from_score(40.0, &bands), DatacenterGrade::C);
        assert_eq!(DatacenterGrade::from_score(39.9, &bands), DatacenterGrade::D);
        assert!(DatacenterGrade::S > DatacenterGrade::A);
        assert!(DatacenterGrade::C > DatacenterGrade::D);
    }

    #[test]
    fn test_recalibrated_bands() {
        let bands = GradeBands { s: 95.0, a: 80.0, b: 60.0, c: 30.0 };
        assert_eq!(DatacenterGrade::from_score(90.0, &bands), DatacenterGrade::A);
        assert_eq!(DatacenterGrade::from_score(35.0, &bands), DatacenterGrade::C);
    }

    #[test]
    fn test_region_ratios() {
        let region = RegionRecord {
            id: "r".into(),
            name: "R".into(),
            current_consumption_mwh: 120.0,
            supply_capacity_mwh: 100.0,
            average_price_per_kwh: 100.0,
            renewable_share: 0.0,
            stability: GridStability::Low,
            usage_rank: 1,
        };
        assert!((region.utilization_ratio() - 1.2).abs() < 1e-12);
        assert_eq!(region.spare_capacity_ratio(), 0.0);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        let json = serde_json::to_string(&DatacenterGrade::A).unwrap();
        assert_eq!(json, "\"A\"");
        let stability: GridStability = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(stability, GridStability::Moderate);
    }
}
