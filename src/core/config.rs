//! Configuration management
//!
//! Every numeric policy the engine applies (rates, emission factor,
//! derating constant, grade bands, risk thresholds, list lengths) lives
//! here and is passed explicitly into each entry point.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join("gridsite");

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
            log::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        Self::load_from(&path)
    }

    /// Load and validate configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());

        Ok(config)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations that would make the engine's outputs meaningless
    pub fn validate(&self) -> Result<()> {
        let p = &self.pricing;
        if !(p.rate_per_kwh.is_finite() && p.rate_per_kwh > 0.0) {
            return Err(Error::Config(format!("pricing.rate_per_kwh must be > 0, got {}", p.rate_per_kwh)));
        }
        if !(p.emission_factor_kg_per_kwh.is_finite() && p.emission_factor_kg_per_kwh >= 0.0) {
            return Err(Error::Config(format!(
                "pricing.emission_factor_kg_per_kwh must be >= 0, got {}",
                p.emission_factor_kg_per_kwh
            )));
        }

        let s = &self.simulation;
        if !(s.efficiency_derating > 0.0 && s.efficiency_derating < 1.0) {
            return Err(Error::Config(format!(
                "simulation.efficiency_derating must be in (0, 1), got {}",
                s.efficiency_derating
            )));
        }
        if s.max_entries == 0 {
            return Err(Error::Config("simulation.max_entries must be at least 1".to_string()));
        }
        if !(s.ambient_temp_c.is_finite() && s.thermal_rise_c.is_finite() && s.thermal_rise_c >= 0.0) {
            return Err(Error::Config(format!(
                "simulation thermal constants must be finite with a non-negative rise, got {} / {}",
                s.ambient_temp_c, s.thermal_rise_c
            )));
        }

        let sc = &self.scoring;
        let weights_ok = [sc.infrastructure_weight, sc.cost_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !(weights_ok && sc.infrastructure_weight + sc.cost_weight > 0.0) {
            return Err(Error::Config(format!(
                "scoring weights must be non-negative with a positive sum, got {} / {}",
                sc.infrastructure_weight, sc.cost_weight
            )));
        }
        sc.grade_bands.validate()?;
        if !(0.0..=100.0).contains(&sc.recommendation_threshold) {
            return Err(Error::Config(format!(
                "scoring.recommendation_threshold must be in [0, 100], got {}",
                sc.recommendation_threshold
            )));
        }

        let r = &self.ranking;
        if !(r.utilization_risk_threshold > 0.0 && r.utilization_risk_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "ranking.utilization_risk_threshold must be in (0, 1], got {}",
                r.utilization_risk_threshold
            )));
        }
        if !(r.hours_per_year.is_finite() && r.hours_per_year > 0.0) || r.tco_years == 0 || r.max_regions == 0 {
            return Err(Error::Config("ranking.hours_per_year, tco_years and max_regions must be positive".to_string()));
        }
        if !(r.capital_cost.is_finite() && r.capital_cost >= 0.0)
            || !(r.roi_cost_sensitivity.is_finite() && r.roi_cost_sensitivity >= 0.0)
            || !(0.0..=100.0).contains(&r.roi_max_adjustment)
        {
            return Err(Error::Config("ranking capital/ROI parameters out of range".to_string()));
        }

        if self.policy.investment_list_len == 0 || self.policy.incentive_list_len == 0 {
            return Err(Error::Config("policy list lengths must be at least 1".to_string()));
        }

        let g = &self.grid;
        if !(g.high_risk_utilization.is_finite()
            && g.moderate_risk_utilization > 0.0
            && g.moderate_risk_utilization <= g.high_risk_utilization)
        {
            return Err(Error::Config(format!(
                "grid risk thresholds must satisfy 0 < moderate <= high, got {} / {}",
                g.moderate_risk_utilization, g.high_risk_utilization
            )));
        }
        if !(g.upgrade_utilization > 0.0 && g.upgrade_utilization <= 1.0) {
            return Err(Error::Config(format!(
                "grid.upgrade_utilization must be in (0, 1], got {}",
                g.upgrade_utilization
            )));
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Language for templated text: "auto", "en", "ko"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String { "en".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Currency code (KRW, USD, EUR, etc.)
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Currency symbol
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Flat reference rate per kWh, used when no regional price applies
    #[serde(default = "default_rate")]
    pub rate_per_kwh: f64,
    /// Grid emission factor (kg CO2 per kWh)
    #[serde(default = "default_emission_factor")]
    pub emission_factor_kg_per_kwh: f64,
}

fn default_currency() -> String { "KRW".to_string() }
fn default_currency_symbol() -> String { "\u{20A9}".to_string() } // Won sign
fn default_rate() -> f64 { 120.0 }
fn default_emission_factor() -> f64 { 0.4571 }

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            currency_symbol: default_currency_symbol(),
            rate_per_kwh: default_rate(),
            emission_factor_kg_per_kwh: default_emission_factor(),
        }
    }
}

/// Power simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Efficiency derating constant k in `100 * (1 - utilization * k)`
    #[serde(default = "default_derating")]
    pub efficiency_derating: f64,
    /// Idle board temperature for the thermal estimate (C)
    #[serde(default = "default_ambient_temp")]
    pub ambient_temp_c: f64,
    /// Temperature rise at full TDP (C)
    #[serde(default = "default_thermal_rise")]
    pub thermal_rise_c: f64,
    /// Maximum workload entries accepted per request
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_derating() -> f64 { 0.3 }
fn default_ambient_temp() -> f64 { 35.0 }
fn default_thermal_rise() -> f64 { 45.0 }
fn default_max_entries() -> usize { 1024 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            efficiency_derating: default_derating(),
            ambient_temp_c: default_ambient_temp(),
            thermal_rise_c: default_thermal_rise(),
            max_entries: default_max_entries(),
        }
    }
}

/// Lower bounds (inclusive) of the S, A, B and C grades; anything below `c` is D
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeBands {
    #[serde(default = "default_band_s")]
    pub s: f64,
    #[serde(default = "default_band_a")]
    pub a: f64,
    #[serde(default = "default_band_b")]
    pub b: f64,
    #[serde(default = "default_band_c")]
    pub c: f64,
}

fn default_band_s() -> f64 { 85.0 }
fn default_band_a() -> f64 { 70.0 }
fn default_band_b() -> f64 { 55.0 }
fn default_band_c() -> f64 { 40.0 }

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            s: default_band_s(),
            a: default_band_a(),
            b: default_band_b(),
            c: default_band_c(),
        }
    }
}

impl GradeBands {
    /// Cut points must be strictly descending and inside [0, 100]
    pub fn validate(&self) -> Result<()> {
        let cuts = [self.s, self.a, self.b, self.c];
        let in_range = cuts.iter().all(|c| (0.0..=100.0).contains(c));
        let descending = cuts.windows(2).all(|w| w[0] > w[1]);
        if in_range && descending {
            Ok(())
        } else {
            Err(Error::Config(format!(
                "scoring.grade_bands must be strictly descending within [0, 100], got {:?}",
                cuts
            )))
        }
    }
}

/// Regional scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the infrastructure (spare capacity) score
    #[serde(default = "default_half")]
    pub infrastructure_weight: f64,
    /// Weight of the relative cost-efficiency score
    #[serde(default = "default_half")]
    pub cost_weight: f64,
    #[serde(default)]
    pub grade_bands: GradeBands,
    /// Overall score a region needs to be considered for recommendation
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: f64,
}

fn default_half() -> f64 { 0.5 }
fn default_recommendation_threshold() -> f64 { 65.0 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            infrastructure_weight: default_half(),
            cost_weight: default_half(),
            grade_bands: GradeBands::default(),
            recommendation_threshold: default_recommendation_threshold(),
        }
    }
}

/// Location ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Current utilization ratio at or above which a region is never recommended
    #[serde(default = "default_risk_threshold")]
    pub utilization_risk_threshold: f64,
    #[serde(default = "default_hours_per_year")]
    pub hours_per_year: f64,
    /// Horizon of the total cost of ownership
    #[serde(default = "default_tco_years")]
    pub tco_years: u32,
    /// Fixed capital term added to the TCO
    #[serde(default)]
    pub capital_cost: f64,
    /// ROI points per percent of annual cost below the cross-region mean
    #[serde(default = "default_roi_sensitivity")]
    pub roi_cost_sensitivity: f64,
    /// Cap on the ROI cost adjustment, in either direction
    #[serde(default = "default_roi_max_adjustment")]
    pub roi_max_adjustment: f64,
    /// Maximum regions accepted per request
    #[serde(default = "default_max_regions")]
    pub max_regions: usize,
}

fn default_risk_threshold() -> f64 { 0.95 }
fn default_hours_per_year() -> f64 { 8760.0 }
fn default_tco_years() -> u32 { 5 }
fn default_roi_sensitivity() -> f64 { 1.0 }
fn default_roi_max_adjustment() -> f64 { 20.0 }
fn default_max_regions() -> usize { 512 }

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            utilization_risk_threshold: default_risk_threshold(),
            hours_per_year: default_hours_per_year(),
            tco_years: default_tco_years(),
            capital_cost: 0.0,
            roi_cost_sensitivity: default_roi_sensitivity(),
            roi_max_adjustment: default_roi_max_adjustment(),
            max_regions: default_max_regions(),
        }
    }
}

/// Policy insight settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_list_len")]
    pub investment_list_len: usize,
    #[serde(default = "default_list_len")]
    pub incentive_list_len: usize,
}

fn default_list_len() -> usize { 5 }

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            investment_list_len: default_list_len(),
            incentive_list_len: default_list_len(),
        }
    }
}

/// Grid impact assessment thresholds (post-build capacity utilization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_moderate_risk")]
    pub moderate_risk_utilization: f64,
    #[serde(default = "default_high_risk")]
    pub high_risk_utilization: f64,
    #[serde(default = "default_upgrade")]
    pub upgrade_utilization: f64,
}

fn default_moderate_risk() -> f64 { 0.80 }
fn default_high_risk() -> f64 { 0.90 }
fn default_upgrade() -> f64 { 0.85 }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            moderate_risk_utilization: default_moderate_risk(),
            high_risk_utilization: default_high_risk(),
            upgrade_utilization: default_upgrade(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pricing]
            rate_per_kwh = 150.0

            [scoring.grade_bands]
            s = 90.0
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.rate_per_kwh, 150.0);
        assert_eq!(config.pricing.currency, "KRW");
        assert_eq!(config.scoring.grade_bands.s, 90.0);
        assert_eq!(config.scoring.grade_bands.a, 70.0);
        assert_eq!(config.ranking.tco_years, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_derating() {
        let mut config = Config::default();
        config.simulation.efficiency_derating = 1.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_unordered_bands() {
        let mut config = Config::default();
        config.scoring.grade_bands.b = 75.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_weights() {
        let mut config = Config::default();
        config.scoring.infrastructure_weight = 0.0;
        config.scoring.cost_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_weight_from_toml() {
        let config: Config = toml::from_str("[scoring]\ninfrastructure_weight = nan").unwrap();
        assert!(config.scoring.infrastructure_weight.is_nan());
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_nan_ranking_parameters() {
        let mut config = Config::default();
        config.ranking.roi_cost_sensitivity = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ranking.capital_cost = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ranking.hours_per_year = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_thermal_and_upgrade_values() {
        let mut config = Config::default();
        config.simulation.ambient_temp_c = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.thermal_rise_c = f64::INFINITY;
        assert!(config.validate().is_err());

        for upgrade in [f64::NAN, 0.0, 1.5] {
            let mut config = Config::default();
            config.grid.upgrade_utilization = upgrade;
            assert!(config.validate().is_err(), "upgrade {} accepted", upgrade);
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir().join(format!("gridsite-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.ranking.capital_cost = 1_000_000.0;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.capital_cost, 1_000_000.0);

        let _ = fs::remove_file(&path);
    }
}
