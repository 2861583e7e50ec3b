//! Grid impact of adding a datacenter load to a region

use crate::core::{require_positive, Config, GridImpact, GridRisk, RegionRecord, Result};
use crate::i18n::I18n;

/// Assess how a new `datacenter_power_mw` load stresses a region's supply
pub fn assess_grid_impact(
    region: &RegionRecord,
    datacenter_power_mw: f64,
    config: &Config,
    i18n: &I18n,
) -> Result<GridImpact> {
    let datacenter_power_mw = require_positive("datacenter_power_mw", datacenter_power_mw)?;
    require_positive(&format!("region[{}].supply_capacity_mwh", region.id), region.supply_capacity_mwh)?;

    // Annual MWh -> average MW
    let hours = config.ranking.hours_per_year;
    let current_load_mw = region.current_consumption_mwh / hours;
    let supply_capacity_mw = region.supply_capacity_mwh / hours;

    let load_increase_percent = if current_load_mw > 0.0 {
        Some(datacenter_power_mw / current_load_mw * 100.0)
    } else {
        None
    };
    let remaining_capacity_mw = supply_capacity_mw - current_load_mw - datacenter_power_mw;
    let capacity_utilization = (current_load_mw + datacenter_power_mw) / supply_capacity_mw;

    let grid = &config.grid;
    let risk = if capacity_utilization >= grid.high_risk_utilization {
        GridRisk::High
    } else if capacity_utilization >= grid.moderate_risk_utilization {
        GridRisk::Moderate
    } else {
        GridRisk::Low
    };

    log::debug!(
        "Grid impact for {}: {:.1}% utilization after +{} MW ({:?})",
        region.id,
        capacity_utilization * 100.0,
        datacenter_power_mw,
        risk
    );

    Ok(GridImpact {
        region_id: region.id.clone(),
        datacenter_power_mw,
        current_load_mw,
        supply_capacity_mw,
        load_increase_percent,
        remaining_capacity_mw,
        capacity_utilization,
        risk,
        risk_label: i18n.get(&format!("grid.risk.{}", risk.as_str())),
        upgrade_needed: capacity_utilization >= grid.upgrade_utilization,
        recommended_actions: recommended_actions(risk, i18n),
    })
}

fn recommended_actions(risk: GridRisk, i18n: &I18n) -> Vec<String> {
    let keys: &[&str] = match risk {
        GridRisk::High => &["grid.action.high.expand", "grid.action.high.interconnect", "grid.action.high.downsize"],
        GridRisk::Moderate => &[
            "grid.action.moderate.plan",
            "grid.action.moderate.peak_shift",
            "grid.action.moderate.renewables",
        ],
        GridRisk::Low => &["grid.action.low.accept", "grid.action.low.phased"],
    };

    keys.iter().map(|key| i18n.get(key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, GridStability};

    fn region(consumption_mw: f64, capacity_mw: f64) -> RegionRecord {
        RegionRecord {
            id: "test".to_string(),
            name: "Test".to_string(),
            current_consumption_mwh: consumption_mw * 8760.0,
            supply_capacity_mwh: capacity_mw * 8760.0,
            average_price_per_kwh: 140.0,
            renewable_share: 0.1,
            stability: GridStability::High,
            usage_rank: 3,
        }
    }

    #[test]
    fn test_low_risk() {
        let config = Config::default();
        let i18n = I18n::new("en");
        let impact = assess_grid_impact(&region(5000.0, 10000.0), 500.0, &config, &i18n).unwrap();

        assert!((impact.current_load_mw - 5000.0).abs() < 1e-6);
        assert!((impact.load_increase_percent.unwrap() - 10.0).abs() < 1e-6);
        assert!((impact.remaining_capacity_mw - 4500.0).abs() < 1e-6);
        assert!((impact.capacity_utilization - 0.55).abs() < 1e-9);
        assert_eq!(impact.risk, GridRisk::Low);
        assert!(!impact.upgrade_needed);
        assert_eq!(impact.recommended_actions.len(), 2);
    }

    #[test]
    fn test_risk_levels() {
        let config = Config::default();
        let i18n = I18n::new("en");

        let moderate = assess_grid_impact(&region(7000.0, 10000.0), 1200.0, &config, &i18n).unwrap();
        assert_eq!(moderate.risk, GridRisk::Moderate);
        assert!(!moderate.upgrade_needed);

        let upgrade = assess_grid_impact(&region(7000.0, 10000.0), 1600.0, &config, &i18n).unwrap();
        assert_eq!(upgrade.risk, GridRisk::Moderate);
        assert!(upgrade.upgrade_needed);

        let high = assess_grid_impact(&region(9000.0, 10000.0), 500.0, &config, &i18n).unwrap();
        assert_eq!(high.risk, GridRisk::High);
        assert!(high.upgrade_needed);
        assert_eq!(high.recommended_actions.len(), 3);
    }

    #[test]
    fn test_risk_label_is_localized() {
        let config = Config::default();
        let en = I18n::new("en");
        let ko = I18n::new("ko");

        let high = assess_grid_impact(&region(9000.0, 10000.0), 500.0, &config, &en).unwrap();
        assert_eq!(high.risk_label, "High");

        let low = assess_grid_impact(&region(5000.0, 10000.0), 500.0, &config, &ko).unwrap();
        assert_eq!(low.risk_label, ko.get("grid.risk.low"));
        assert_ne!(low.risk_label, "grid.risk.low");
    }

    #[test]
    fn test_empty_region_has_no_relative_increase() {
        let config = Config::default();
        let i18n = I18n::new("en");
        let impact = assess_grid_impact(&region(0.0, 100.0), 10.0, &config, &i18n).unwrap();
        assert_eq!(impact.load_increase_percent, None);
    }

    #[test]
    fn test_rejects_non_positive_load() {
        let config = Config::default();
        let i18n = I18n::new("en");
        assert!(matches!(
            assess_grid_impact(&region(10.0, 100.0), 0.0, &config, &i18n),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
