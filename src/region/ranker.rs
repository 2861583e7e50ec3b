//! Optimal datacenter location ranking
//!
//! Joins regional scores with the annual cost of serving a target power
//! demand in each region, then orders candidates by a bounded ROI score.

use crate::catalog::GpuSpecCatalog;
use crate::core::{
    cmp_f64, require_positive, Config, Error, LocationRecommendation, RankRequest, RegionRecord, RegionScore, Result,
};
use crate::pricing::{annual_energy_kwh, PricingEngine};
use crate::region::RegionalEfficiencyScorer;
use crate::simulator::PowerSimulator;

/// Ranks candidate regions for a datacenter of a given size
pub struct OptimalLocationRanker<'a> {
    catalog: &'a GpuSpecCatalog,
    config: &'a Config,
}

impl<'a> OptimalLocationRanker<'a> {
    pub fn new(catalog: &'a GpuSpecCatalog, config: &'a Config) -> Self {
        Self { catalog, config }
    }

    /// Rank every region; the output is a permutation of the input set
    pub fn rank(&self, request: &RankRequest, regions: &[RegionRecord]) -> Result<Vec<LocationRecommendation>> {
        let target_mw = require_positive("target_power_mw", request.target_power_mw)?;
        if regions.is_empty() {
            return Err(Error::NoCandidateRegions);
        }

        let scores = RegionalEfficiencyScorer::new(self.config).score_regions(regions)?;
        let estimated_gpu_count = self.estimated_gpu_count(request)?;

        let ranking = &self.config.ranking;
        let base_pricing = PricingEngine::new(&self.config.pricing);
        let annual_energy = annual_energy_kwh(target_mw, ranking.hours_per_year);

        let annual_costs = regions
            .iter()
            .map(|region| -> Result<f64> { Ok(base_pricing.for_region(region)?.calculate_cost(annual_energy)) })
            .collect::<Result<Vec<f64>>>()?;
        let mean_cost = annual_costs.iter().sum::<f64>() / annual_costs.len() as f64;
        let tco_ok = annual_costs
            .iter()
            .all(|cost| (cost * f64::from(ranking.tco_years) + ranking.capital_cost).is_finite());
        if !(mean_cost.is_finite() && tco_ok) {
            return Err(Error::invalid(
                "target_power_mw",
                target_mw,
                "annual cost of this demand is not representable",
            ));
        }

        let mut recommendations: Vec<LocationRecommendation> = regions
            .iter()
            .zip(annual_costs)
            .map(|(region, annual_cost)| -> Result<LocationRecommendation> {
                // Validated above, every region has a score
                let score = scores.get(&region.id).cloned().ok_or_else(|| {
                    Error::invalid("region.id", &region.id, "missing score")
                })?;
                Ok(self.build_recommendation(region, score, annual_energy, annual_cost, mean_cost, estimated_gpu_count))
            })
            .collect::<Result<Vec<_>>>()?;

        recommendations.sort_by(|a, b| {
            cmp_f64(b.roi_score, a.roi_score)
                .then_with(|| cmp_f64(a.cost_delta_vs_mean, b.cost_delta_vs_mean))
                .then_with(|| a.region_id.cmp(&b.region_id))
        });

        log::info!(
            "Ranked {} regions for {} MW ({} recommended)",
            recommendations.len(),
            target_mw,
            recommendations.iter().filter(|r| r.recommended).count()
        );

        Ok(recommendations)
    }

    /// Overall score plus a capped bonus for being cheaper than average
    pub fn roi_score(&self, overall_score: f64, annual_cost: f64, mean_cost: f64) -> f64 {
        let ranking = &self.config.ranking;
        let percent_below_mean = if mean_cost > 0.0 {
            (mean_cost - annual_cost) / mean_cost * 100.0
        } else {
            0.0
        };
        let adjustment = (percent_below_mean * ranking.roi_cost_sensitivity)
            .clamp(-ranking.roi_max_adjustment, ranking.roi_max_adjustment);

        (overall_score + adjustment).clamp(0.0, 100.0)
    }

    fn build_recommendation(
        &self,
        region: &RegionRecord,
        score: RegionScore,
        annual_energy_kwh: f64,
        annual_cost: f64,
        mean_cost: f64,
        estimated_gpu_count: Option<u64>,
    ) -> LocationRecommendation {
        let ranking = &self.config.ranking;
        let utilization_ratio = region.utilization_ratio();
        let risk_excluded = utilization_ratio >= ranking.utilization_risk_threshold;

        if risk_excluded && score.meets_threshold {
            log::warn!(
                "Region {} scores {:.1} but runs at {:.1}% utilization; excluded from recommendation",
                region.id,
                score.overall_score,
                utilization_ratio * 100.0
            );
        }

        let roi_score = self.roi_score(score.overall_score, annual_cost, mean_cost);
        let recommended = score.meets_threshold && !risk_excluded;

        LocationRecommendation {
            region_id: region.id.clone(),
            region_name: region.name.clone(),
            price_per_kwh: region.average_price_per_kwh,
            current_consumption_mwh: region.current_consumption_mwh,
            utilization_ratio,
            annual_energy_kwh,
            annual_cost,
            tco: annual_cost * f64::from(ranking.tco_years) + ranking.capital_cost,
            cost_delta_vs_mean: annual_cost - mean_cost,
            roi_score,
            estimated_gpu_count,
            risk_excluded,
            recommended,
            score,
        }
    }

    /// GPUs of the reference profile the target power can feed
    fn estimated_gpu_count(&self, request: &RankRequest) -> Result<Option<u64>> {
        let Some(entry) = &request.reference_workload else {
            return Ok(None);
        };

        let unit_watts = PowerSimulator::new(self.catalog, self.config).unit_power_watts(entry)?;
        let target_watts = request.target_power_mw * 1_000_000.0;
        Ok(Some((target_watts / unit_watts).floor() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RegionCatalog;
    use crate::core::{GpuWorkloadEntry, GridStability};
    use std::collections::BTreeSet;

    fn region(id: &str, consumption: f64, capacity: f64, price: f64) -> RegionRecord {
        RegionRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            current_consumption_mwh: consumption,
            supply_capacity_mwh: capacity,
            average_price_per_kwh: price,
            renewable_share: 0.0,
            stability: GridStability::Moderate,
            usage_rank: 1,
        }
    }

    #[test]
    fn test_empty_region_set() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        assert!(matches!(ranker.rank(&RankRequest::new(100.0), &[]), Err(Error::NoCandidateRegions)));
    }

    #[test]
    fn test_non_positive_target() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);
        let regions = vec![region("a", 10.0, 100.0, 100.0)];

        for target in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                ranker.rank(&RankRequest::new(target), &regions),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_annual_cost_and_tco() {
        let catalog = GpuSpecCatalog::builtin();
        let mut config = Config::default();
        config.ranking.capital_cost = 1_000.0;
        let ranker = OptimalLocationRanker::new(&catalog, &config);
        let regions = vec![region("a", 10.0, 100.0, 100.0), region("b", 10.0, 100.0, 150.0)];

        let ranked = ranker.rank(&RankRequest::new(1.0), &regions).unwrap();
        let a = ranked.iter().find(|r| r.region_id == "a").unwrap();
        let b = ranked.iter().find(|r| r.region_id == "b").unwrap();

        assert_eq!(a.annual_energy_kwh, 8_760_000.0);
        assert!((a.annual_cost - 876_000_000.0).abs() < 1e-3);
        assert!((a.tco - (876_000_000.0 * 5.0 + 1_000.0)).abs() < 1e-3);
        assert!((a.cost_delta_vs_mean + 219_000_000.0).abs() < 1e-3);
        assert!((b.cost_delta_vs_mean - 219_000_000.0).abs() < 1e-3);
        assert!(a.roi_score > b.roi_score);
        assert_eq!(ranked[0].region_id, "a");
    }

    #[test]
    fn test_output_is_sorted_permutation() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);
        let regions = RegionCatalog::builtin().records().to_vec();

        let ranked = ranker.rank(&RankRequest::new(100.0), &regions).unwrap();

        let input: BTreeSet<_> = regions.iter().map(|r| r.id.clone()).collect();
        let output: BTreeSet<_> = ranked.iter().map(|r| r.region_id.clone()).collect();
        assert_eq!(ranked.len(), regions.len());
        assert_eq!(input, output);

        for pair in ranked.windows(2) {
            assert!(pair[0].roi_score >= pair[1].roi_score);
        }
    }

    #[test]
    fn test_roi_bounded() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        assert_eq!(ranker.roi_score(95.0, 10.0, 100.0), 100.0);
        assert_eq!(ranker.roi_score(5.0, 300.0, 100.0), 0.0);
        assert!((ranker.roi_score(50.0, 90.0, 100.0) - 60.0).abs() < 1e-9);
        assert!((ranker.roi_score(50.0, 100.0, 100.0) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_saturated_region_never_recommended() {
        let catalog = GpuSpecCatalog::builtin();
        let mut config = Config::default();
        config.scoring.infrastructure_weight = 0.0;
        config.scoring.cost_weight = 1.0;
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        // Cheapest region would score 100 on cost alone, but runs at 96% utilization
        let regions = vec![region("hot", 96.0, 100.0, 80.0), region("cool", 30.0, 100.0, 120.0)];
        let ranked = ranker.rank(&RankRequest::new(50.0), &regions).unwrap();

        let hot = ranked.iter().find(|r| r.region_id == "hot").unwrap();
        assert!(hot.score.meets_threshold);
        assert!(hot.risk_excluded);
        assert!(!hot.recommended);
    }

    #[test]
    fn test_risk_threshold_property() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        let ranked = ranker.rank(&RankRequest::new(100.0), RegionCatalog::builtin().records()).unwrap();
        for rec in &ranked {
            if rec.utilization_ratio >= config.ranking.utilization_risk_threshold {
                assert!(!rec.recommended, "{} should be excluded", rec.region_id);
            }
            assert_eq!(rec.recommended, rec.score.meets_threshold && !rec.risk_excluded);
        }
    }

    #[test]
    fn test_tie_break_by_cost_then_id() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        let regions = vec![region("zeta", 50.0, 100.0, 100.0), region("alpha", 50.0, 100.0, 100.0)];
        let ranked = ranker.rank(&RankRequest::new(10.0), &regions).unwrap();

        // Same price: cost scores split by id, so alpha outranks zeta outright
        assert_eq!(ranked[0].region_id, "alpha");
        assert_eq!(ranked[1].region_id, "zeta");
    }

    #[test]
    fn test_clamped_roi_ties_break_on_cost_delta() {
        let catalog = GpuSpecCatalog::builtin();
        let mut config = Config::default();
        config.scoring.infrastructure_weight = 1.0;
        config.scoring.cost_weight = 0.0;
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        // zeta and alpha both sit far enough below the mean to clamp at 100
        let regions = vec![
            region("alpha", 10.0, 100.0, 110.0),
            region("omega", 10.0, 100.0, 300.0),
            region("zeta", 10.0, 100.0, 100.0),
        ];
        let ranked = ranker.rank(&RankRequest::new(10.0), &regions).unwrap();

        assert_eq!(ranked[0].roi_score, 100.0);
        assert_eq!(ranked[1].roi_score, 100.0);
        assert!(ranked[0].cost_delta_vs_mean < ranked[1].cost_delta_vs_mean);
        let ids: Vec<_> = ranked.iter().map(|r| r.region_id.as_str()).collect();
        assert_eq!(ids, ["zeta", "alpha", "omega"]);
    }

    #[test]
    fn test_exact_tie_falls_back_to_id() {
        let catalog = GpuSpecCatalog::builtin();
        let mut config = Config::default();
        config.scoring.infrastructure_weight = 1.0;
        config.scoring.cost_weight = 0.0;
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        let regions = vec![region("zeta", 50.0, 100.0, 100.0), region("alpha", 50.0, 100.0, 100.0)];
        let ranked = ranker.rank(&RankRequest::new(10.0), &regions).unwrap();

        assert_eq!(ranked[0].roi_score, ranked[1].roi_score);
        assert_eq!(ranked[0].cost_delta_vs_mean, ranked[1].cost_delta_vs_mean);
        assert_eq!(ranked[0].region_id, "alpha");
        assert_eq!(ranked[1].region_id, "zeta");
    }

    #[test]
    fn test_rejects_target_with_unrepresentable_cost() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);
        let regions = vec![region("a", 10.0, 100.0, 100.0), region("b", 10.0, 100.0, 150.0)];

        assert!(matches!(
            ranker.rank(&RankRequest::new(1e305), &regions),
            Err(Error::InvalidParameter { .. })
        ));

        let ranked = ranker.rank(&RankRequest::new(1e6), &regions).unwrap();
        assert!(ranked.iter().all(|r| r.roi_score.is_finite() && r.cost_delta_vs_mean.is_finite()));
    }

    #[test]
    fn test_estimated_gpu_count() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        let request = RankRequest::new(1.0).with_reference_workload(GpuWorkloadEntry::new("H100", 1, 0.8));
        let ranked = ranker.rank(&request, &[region("a", 10.0, 100.0, 100.0)]).unwrap();

        // 1 MW / 560 W per GPU
        assert_eq!(ranked[0].estimated_gpu_count, Some(1785));

        let unknown = RankRequest::new(1.0).with_reference_workload(GpuWorkloadEntry::new("UNKNOWN", 1, 0.8));
        assert!(matches!(
            ranker.rank(&unknown, &[region("a", 10.0, 100.0, 100.0)]),
            Err(Error::UnknownGpuModel { .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let catalog = GpuSpecCatalog::builtin();
        let config = Config::default();
        let ranker = OptimalLocationRanker::new(&catalog, &config);

        let mut shuffled = RegionCatalog::builtin().records().to_vec();
        shuffled.reverse();

        let a = ranker.rank(&RankRequest::new(75.0), RegionCatalog::builtin().records()).unwrap();
        let b = ranker.rank(&RankRequest::new(75.0), &shuffled).unwrap();
        let ids_a: Vec<_> = a.iter().map(|r| &r.region_id).collect();
        let ids_b: Vec<_> = b.iter().map(|r| &r.region_id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
