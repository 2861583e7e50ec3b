//! Pricing engine for electricity cost and emission arithmetic
//!
//! Rates come from configuration (flat reference rate) or from a
//! region's average sale price. No clock or tariff calendar is consulted,
//! so every figure is a pure function of its inputs.

use crate::core::{require_positive, PricingConfig, RegionRecord, Result};

/// Pricing engine that converts energy into cost and carbon figures
#[derive(Debug, Clone)]
pub struct PricingEngine {
    rate_per_kwh: f64,
    emission_factor: f64,
}

impl PricingEngine {
    /// Create a pricing engine at the configured flat reference rate
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            rate_per_kwh: config.rate_per_kwh,
            emission_factor: config.emission_factor_kg_per_kwh,
        }
    }

    /// Same engine priced at a caller-supplied rate
    pub fn with_rate(&self, rate_per_kwh: f64) -> Result<Self> {
        require_positive("rate_per_kwh", rate_per_kwh)?;
        Ok(Self {
            rate_per_kwh,
            ..self.clone()
        })
    }

    /// Same engine priced at a region's average sale price
    pub fn for_region(&self, region: &RegionRecord) -> Result<Self> {
        self.with_rate(region.average_price_per_kwh)
    }

    /// Calculate cost for a given energy consumption in kWh
    pub fn calculate_cost(&self, kwh: f64) -> f64 {
        kwh * self.rate_per_kwh
    }

    /// Carbon mass (kg) for a given energy consumption in kWh
    pub fn calculate_carbon(&self, kwh: f64) -> f64 {
        kwh * self.emission_factor
    }
}

/// Annual energy (kWh) of a constant load given in MW
pub fn annual_energy_kwh(power_mw: f64, hours_per_year: f64) -> f64 {
    power_mw * 1000.0 * hours_per_year
}
