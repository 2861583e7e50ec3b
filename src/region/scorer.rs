//! Regional efficiency scoring
//!
//! Cost-efficiency is a relative measure (a region's price rank within the
//! supplied set), so scoring is a batch pass over one immutable snapshot
//! rather than a per-record function.

use crate::catalog::validate_records;
use crate::core::{Config, DatacenterGrade, RegionRecord, RegionScore, Result};
use std::collections::{BTreeMap, HashMap};

/// Scores every region of a snapshot against the others
pub struct RegionalEfficiencyScorer<'a> {
    config: &'a Config,
}

impl<'a> RegionalEfficiencyScorer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Score a full region set, keyed by region id
    ///
    /// The result is independent of input order.
    pub fn score_regions(&self, regions: &[RegionRecord]) -> Result<BTreeMap<String, RegionScore>> {
        validate_records(regions, self.config.ranking.max_regions)?;

        let cost_scores = cost_efficiency_scores(regions);
        let scores: BTreeMap<String, RegionScore> = regions
            .iter()
            .map(|region| {
                let cost = cost_scores.get(region.id.as_str()).copied().unwrap_or(0.0);
                (region.id.clone(), self.build_score(region, cost))
            })
            .collect();

        log::debug!("Scored {} regions", scores.len());
        Ok(scores)
    }

    /// Spare capacity ratio scaled to [0, 100]; saturated regions score 0
    pub fn infrastructure_score(&self, region: &RegionRecord) -> f64 {
        region.spare_capacity_ratio().min(1.0) * 100.0
    }

    /// Weighted combination of the two sub-scores, normalized by the weight sum
    pub fn overall_score(&self, infrastructure: f64, cost_efficiency: f64) -> f64 {
        let w = &self.config.scoring;
        (infrastructure * w.infrastructure_weight + cost_efficiency * w.cost_weight)
            / (w.infrastructure_weight + w.cost_weight)
    }

    pub fn grade(&self, overall: f64) -> DatacenterGrade {
        DatacenterGrade::from_score(overall, &self.config.scoring.grade_bands)
    }

    fn build_score(&self, region: &RegionRecord, cost_efficiency_score: f64) -> RegionScore {
        let infrastructure_score = self.infrastructure_score(region);
        let overall_score = self.overall_score(infrastructure_score, cost_efficiency_score);

        RegionScore {
            region_id: region.id.clone(),
            infrastructure_score,
            cost_efficiency_score,
            overall_score,
            grade: self.grade(overall_score),
            meets_threshold: overall_score >= self.config.scoring.recommendation_threshold,
        }
    }
}

/// Inverted price rank scaled to [0, 100]: cheapest 100, dearest 0
///
/// Equal prices are ordered by stability (more stable first), then by id.
fn cost_efficiency_scores(regions: &[RegionRecord]) -> HashMap<&str, f64> {
    let mut ordered: Vec<&RegionRecord> = regions.iter().collect();
    ordered.sort_by(|a, b| {
        a.average_price_per_kwh
            .total_cmp(&b.average_price_per_kwh)
            .then_with(|| b.stability.level().cmp(&a.stability.level()))
            .then_with(|| a.id.cmp(&b.id))
    });

    let last = ordered.len().saturating_sub(1);
    ordered
        .into_iter()
        .enumerate()
        .map(|(position, region)| {
            let score = if last == 0 {
                100.0
            } else {
                100.0 * (last - position) as f64 / last as f64
            };
            (region.id.as_str(), score)
        })
        .collect()
}
