//! Estimation-and-ranking engine
//!
//! Owns the validated configuration, GPU catalog and message table, and
//! exposes the request/response operations consumed by the CLI. Every
//! call is a pure computation over its arguments, so one `Engine` can be
//! shared across threads without locking.

use std::collections::BTreeMap;

use crate::catalog::GpuSpecCatalog;
use crate::core::{
    Config, FacilityProfile, FacilityResult, GridImpact, LocationRecommendation, PolicyInsight, RankRequest,
    RegionRecord, RegionScore, Result, SimulationRequest, SimulationResult,
};
use crate::i18n::I18n;
use crate::policy::PolicyInsightGenerator;
use crate::pricing::PricingEngine;
use crate::region::{OptimalLocationRanker, RegionalEfficiencyScorer};
use crate::simulator::PowerSimulator;

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    gpus: GpuSpecCatalog,
    i18n: I18n,
}

impl Engine {
    /// Build an engine; the configuration is validated once here
    pub fn new(config: Config, gpus: GpuSpecCatalog) -> Result<Self> {
        config.validate()?;
        let i18n = I18n::new(&config.general.language);
        log::debug!("Engine ready with {} GPU models ({})", gpus.len(), i18n.current_language());
        Ok(Self { config, gpus, i18n })
    }

    /// Default configuration and the built-in GPU catalog
    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
            gpus: GpuSpecCatalog::builtin(),
            i18n: I18n::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gpus(&self) -> &GpuSpecCatalog {
        &self.gpus
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Simulate at the configured reference rate
    pub fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        PowerSimulator::new(&self.gpus, &self.config).simulate(request)
    }

    /// Simulate at a caller-supplied rate per kWh
    pub fn simulate_at_rate(&self, request: &SimulationRequest, rate_per_kwh: f64) -> Result<SimulationResult> {
        let pricing = PricingEngine::new(&self.config.pricing).with_rate(rate_per_kwh)?;
        PowerSimulator::new(&self.gpus, &self.config)
            .with_pricing(pricing)
            .simulate(request)
    }

    /// Simulate at a region's average price
    pub fn simulate_in_region(&self, request: &SimulationRequest, region: &RegionRecord) -> Result<SimulationResult> {
        self.simulate_at_rate(request, region.average_price_per_kwh)
    }

    pub fn simulate_facility(&self, request: &SimulationRequest, profile: FacilityProfile) -> Result<FacilityResult> {
        PowerSimulator::new(&self.gpus, &self.config).simulate_facility(request, profile)
    }

    /// Facility roll-up priced at a region's average price
    pub fn simulate_facility_in_region(
        &self,
        request: &SimulationRequest,
        profile: FacilityProfile,
        region: &RegionRecord,
    ) -> Result<FacilityResult> {
        let pricing = PricingEngine::new(&self.config.pricing).for_region(region)?;
        PowerSimulator::new(&self.gpus, &self.config)
            .with_pricing(pricing)
            .simulate_facility(request, profile)
    }

    pub fn score_regions(&self, regions: &[RegionRecord]) -> Result<BTreeMap<String, RegionScore>> {
        RegionalEfficiencyScorer::new(&self.config).score_regions(regions)
    }

    pub fn rank_locations(&self, request: &RankRequest, regions: &[RegionRecord]) -> Result<Vec<LocationRecommendation>> {
        OptimalLocationRanker::new(&self.gpus, &self.config).rank(request, regions)
    }

    pub fn summarize_policy(&self, recommendations: &[LocationRecommendation]) -> PolicyInsight {
        PolicyInsightGenerator::new(&self.config.policy, &self.i18n).summarize(recommendations)
    }

    pub fn assess_grid_impact(&self, region: &RegionRecord, datacenter_power_mw: f64) -> Result<GridImpact> {
        crate::region::assess_grid_impact(region, datacenter_power_mw, &self.config, &self.i18n)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RegionCatalog;
    use crate::core::{Error, GpuWorkloadEntry};

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = Config::default();
        config.simulation.efficiency_derating = -1.0;
        assert!(matches!(
            Engine::new(config, GpuSpecCatalog::builtin()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_reference_scenario() {
        let engine = Engine::default();
        let request = SimulationRequest::single(GpuWorkloadEntry::new("H100", 4, 0.8), 24.0);
        let result = engine.simulate(&request).unwrap();

        assert!((result.total_power_kw - 2.24).abs() < 1e-9);
        assert!((result.total_energy_kwh - 53.76).abs() < 1e-9);
        assert!((result.total_cost - 6451.2).abs() < 1e-6);
    }

    #[test]
    fn test_simulate_in_region_uses_regional_price() {
        let engine = Engine::default();
        let regions = RegionCatalog::builtin();
        let region = &regions.records()[0];
        let request = SimulationRequest::single(GpuWorkloadEntry::new("A100", 10, 0.5), 10.0);

        let result = engine.simulate_in_region(&request, region).unwrap();
        let expected = result.total_energy_kwh * region.average_price_per_kwh;
        assert!((result.total_cost - expected).abs() < 1e-6);
    }

    #[test]
    fn test_facility_in_region_uses_regional_price() {
        let engine = Engine::default();
        let regions = RegionCatalog::builtin();
        let jeju = regions.get("jeju").unwrap();
        let request = SimulationRequest::single(GpuWorkloadEntry::new("H100", 8, 0.9), 12.0);
        let profile = FacilityProfile { pue: 1.5, renewable_share: 0.0 };

        let flat = engine.simulate_facility(&request, profile).unwrap();
        let regional = engine.simulate_facility_in_region(&request, profile, jeju).unwrap();

        assert!((regional.facility_energy_kwh - flat.facility_energy_kwh).abs() < 1e-9);
        let expected = regional.facility_energy_kwh * jeju.average_price_per_kwh;
        assert!((regional.facility_cost - expected).abs() < 1e-6);
        assert!((regional.it.total_cost - regional.it.total_energy_kwh * jeju.average_price_per_kwh).abs() < 1e-6);
    }

    #[test]
    fn test_end_to_end_flow() {
        let engine = Engine::default();
        let regions = RegionCatalog::builtin();

        let scores = engine.score_regions(regions.records()).unwrap();
        assert_eq!(scores.len(), regions.len());

        let request = RankRequest::new(100.0).with_reference_workload(GpuWorkloadEntry::new("H100", 1, 0.8));
        let ranked = engine.rank_locations(&request, regions.records()).unwrap();
        assert_eq!(ranked.len(), regions.len());
        assert!(ranked.windows(2).all(|w| w[0].roi_score >= w[1].roi_score));
        assert!(ranked.iter().all(|r| r.estimated_gpu_count.is_some()));

        let insight = engine.summarize_policy(&ranked);
        assert_eq!(insight.regions_analyzed, regions.len());
        assert!(insight.price_gap.is_some());
        assert!(!insight.recommendations.is_empty());

        let seoul = regions.get("seoul").unwrap();
        let impact = engine.assess_grid_impact(seoul, 100.0).unwrap();
        assert_eq!(impact.region_id, "seoul");
    }

    #[test]
    fn test_empty_region_set() {
        let engine = Engine::default();
        assert!(matches!(
            engine.rank_locations(&RankRequest::new(10.0), &[]),
            Err(Error::NoCandidateRegions)
        ));
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let engine = Engine::default();
        let regions = RegionCatalog::builtin();
        let request = RankRequest::new(50.0);
        let baseline = engine.rank_locations(&request, regions.records()).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.rank_locations(&request, regions.records()).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), baseline);
            }
        });
    }
}
