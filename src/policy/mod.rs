//! Policy insight aggregation over ranked regions

use crate::core::{
    cmp_f64, IncentiveTarget, InvestmentPriority, LocationRecommendation, PolicyConfig, PolicyInsight, PriceGap,
};
use crate::i18n::I18n;

/// Summarizes a ranking into price gaps, investment priorities and incentive targets
pub struct PolicyInsightGenerator<'a> {
    config: &'a PolicyConfig,
    i18n: &'a I18n,
}

impl<'a> PolicyInsightGenerator<'a> {
    pub fn new(config: &'a PolicyConfig, i18n: &'a I18n) -> Self {
        Self { config, i18n }
    }

    /// Aggregate a ranked recommendation set. Empty input yields an empty insight.
    pub fn summarize(&self, recommendations: &[LocationRecommendation]) -> PolicyInsight {
        let price_gap = price_gap(recommendations);
        let investment_priorities = self.investment_priorities(recommendations);
        let incentive_targets = self.incentive_targets(recommendations, price_gap.as_ref().map(|g| g.mean_price));
        let recommendations_text = self.recommendation_text(
            recommendations,
            price_gap.as_ref(),
            &investment_priorities,
            &incentive_targets,
        );

        log::debug!(
            "Policy summary over {} regions: {} investment, {} incentive entries",
            recommendations.len(),
            investment_priorities.len(),
            incentive_targets.len()
        );

        PolicyInsight {
            regions_analyzed: recommendations.len(),
            price_gap,
            investment_priorities,
            incentive_targets,
            recommendations: recommendations_text,
        }
    }

    /// Higher usage and lower overall score raise priority
    pub fn priority_score(current_consumption_mwh: f64, overall_score: f64) -> f64 {
        let usage_twh = current_consumption_mwh / 1_000_000.0;
        usage_twh * (100.0 - overall_score).max(0.0) / 100.0
    }

    fn investment_priorities(&self, recommendations: &[LocationRecommendation]) -> Vec<InvestmentPriority> {
        let mut priorities: Vec<InvestmentPriority> = recommendations
            .iter()
            .map(|rec| InvestmentPriority {
                region_id: rec.region_id.clone(),
                region_name: rec.region_name.clone(),
                priority_score: Self::priority_score(rec.current_consumption_mwh, rec.score.overall_score),
                current_usage_gwh: rec.current_consumption_mwh / 1000.0,
                overall_score: rec.score.overall_score,
            })
            .collect();

        priorities.sort_by(|a, b| {
            cmp_f64(b.priority_score, a.priority_score).then_with(|| a.region_id.cmp(&b.region_id))
        });
        priorities.truncate(self.config.investment_list_len);
        priorities
    }

    fn incentive_targets(
        &self,
        recommendations: &[LocationRecommendation],
        mean_price: Option<f64>,
    ) -> Vec<IncentiveTarget> {
        let Some(mean_price) = mean_price else {
            return Vec::new();
        };

        let mut targets: Vec<IncentiveTarget> = recommendations
            .iter()
            .filter_map(|rec| {
                let price_advantage = mean_price - rec.price_per_kwh;
                // Only regions cheaper than average are worth subsidizing
                (price_advantage > 0.0).then(|| IncentiveTarget {
                    region_id: rec.region_id.clone(),
                    region_name: rec.region_name.clone(),
                    grade: rec.score.grade,
                    price_advantage,
                    incentive_score: price_advantage * rec.score.grade.weight(),
                })
            })
            .collect();

        targets.sort_by(|a, b| {
            cmp_f64(b.incentive_score, a.incentive_score).then_with(|| a.region_id.cmp(&b.region_id))
        });
        targets.truncate(self.config.incentive_list_len);
        targets
    }

    fn recommendation_text(
        &self,
        recommendations: &[LocationRecommendation],
        price_gap: Option<&PriceGap>,
        investment: &[InvestmentPriority],
        incentive: &[IncentiveTarget],
    ) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(gap) = price_gap {
            lines.push(self.i18n.render(
                "policy.price_gap",
                &[
                    ("highest", gap.highest_region_name.clone()),
                    ("highest_price", format!("{:.1}", gap.highest_price)),
                    ("lowest", gap.lowest_region_name.clone()),
                    ("lowest_price", format!("{:.1}", gap.lowest_price)),
                    ("gap", format!("{:.1}", gap.gap)),
                    ("gap_percent", format!("{:.1}", gap.gap_percent)),
                ],
            ));
        }

        if let Some(top) = investment.first() {
            lines.push(self.i18n.render(
                "policy.top_investment",
                &[("region", top.region_name.clone()), ("score", format!("{:.2}", top.priority_score))],
            ));
        }

        if let Some(top) = incentive.first() {
            lines.push(self.i18n.render(
                "policy.top_incentive",
                &[
                    ("region", top.region_name.clone()),
                    ("grade", self.i18n.get(&format!("grade.{}", top.grade.as_str()))),
                    ("advantage", format!("{:.1}", top.price_advantage)),
                ],
            ));
        }

        if !recommendations.is_empty() {
            let recommended: Vec<&LocationRecommendation> =
                recommendations.iter().filter(|rec| rec.recommended).collect();
            match recommended.first() {
                Some(best) => lines.push(self.i18n.render(
                    "policy.recommended_count",
                    &[
                        ("count", recommended.len().to_string()),
                        ("total", recommendations.len().to_string()),
                        ("region", best.region_name.clone()),
                    ],
                )),
                None => lines.push(self.i18n.get("policy.no_recommended")),
            }

            for key in [
                "policy.static.modernize",
                "policy.static.tariff",
                "policy.static.infrastructure",
                "policy.static.incentives",
            ] {
                lines.push(self.i18n.get(key));
            }
        }

        lines
    }
}

/// Highest and lowest priced regions; ties resolve to the smallest id
pub fn price_gap(recommendations: &[LocationRecommendation]) -> Option<PriceGap> {
    let highest = recommendations.iter().min_by(|a, b| {
        cmp_f64(b.price_per_kwh, a.price_per_kwh).then_with(|| a.region_id.cmp(&b.region_id))
    })?;
    let lowest = recommendations.iter().min_by(|a, b| {
        cmp_f64(a.price_per_kwh, b.price_per_kwh).then_with(|| a.region_id.cmp(&b.region_id))
    })?;

    let mean_price =
        recommendations.iter().map(|rec| rec.price_per_kwh).sum::<f64>() / recommendations.len() as f64;
    let gap = highest.price_per_kwh - lowest.price_per_kwh;

    Some(PriceGap {
        highest_region: highest.region_id.clone(),
        highest_region_name: highest.region_name.clone(),
        highest_price: highest.price_per_kwh,
        lowest_region: lowest.region_id.clone(),
        lowest_region_name: lowest.region_name.clone(),
        lowest_price: lowest.price_per_kwh,
        mean_price,
        gap,
        // Prices are validated positive upstream
        gap_percent: gap / lowest.price_per_kwh * 100.0,
    })
}
