//! GPU workload power simulation
//!
//! Converts (GPU model, quantity, utilization) entries into power, energy,
//! cost and carbon estimates. Per-unit draw is modelled as a fixed share
//! of TDP, the same load-factor approach used for fallback power
//! estimation; figures are estimates, not measurements.

use crate::catalog::GpuSpecCatalog;
use crate::core::{
    require_positive, require_range, Config, EntrySimulation, Error, FacilityProfile, FacilityResult,
    GpuWorkloadEntry, Result, SimulationConfig, SimulationRequest, SimulationResult,
};
use crate::pricing::PricingEngine;

/// TDP-based workload power simulator
pub struct PowerSimulator<'a> {
    catalog: &'a GpuSpecCatalog,
    config: &'a SimulationConfig,
    pricing: PricingEngine,
}

impl<'a> PowerSimulator<'a> {
    /// Simulator priced at the configured flat reference rate
    pub fn new(catalog: &'a GpuSpecCatalog, config: &'a Config) -> Self {
        Self {
            catalog,
            config: &config.simulation,
            pricing: PricingEngine::new(&config.pricing),
        }
    }

    /// Replace the pricing (e.g. a regional rate)
    pub fn with_pricing(mut self, pricing: PricingEngine) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    /// Simulate every entry of a request and aggregate the results
    pub fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult> {
        let duration = require_positive("duration_hours", request.duration_hours)?;

        if request.entries.is_empty() {
            return Err(Error::invalid("entries", 0, "at least one workload entry is required"));
        }
        if request.entries.len() > self.config.max_entries {
            return Err(Error::invalid(
                "entries",
                request.entries.len(),
                format!("at most {} workload entries may be supplied", self.config.max_entries),
            ));
        }

        let entries = request
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.simulate_entry(i, entry, duration))
            .collect::<Result<Vec<_>>>()?;

        let count = entries.len() as f64;
        let result = SimulationResult {
            duration_hours: duration,
            total_power_kw: entries.iter().map(|e| e.hourly_power_kw).sum(),
            total_energy_kwh: entries.iter().map(|e| e.total_energy_kwh).sum(),
            total_cost: entries.iter().map(|e| e.cost_estimate).sum(),
            total_carbon_kg: entries.iter().map(|e| e.carbon_footprint_kg).sum(),
            average_efficiency_score: entries.iter().map(|e| e.efficiency_score).sum::<f64>() / count,
            total_gpu_count: entries.iter().map(|e| u64::from(e.quantity)).sum(),
            entries,
        };

        log::debug!(
            "Simulated {} entries over {}h: {:.3} kW, {:.3} kWh",
            result.entries.len(),
            duration,
            result.total_power_kw,
            result.total_energy_kwh
        );

        Ok(result)
    }

    /// Simulate the IT load, then apply facility overhead (PUE) and renewable share
    pub fn simulate_facility(&self, request: &SimulationRequest, profile: FacilityProfile) -> Result<FacilityResult> {
        if !(profile.pue.is_finite() && profile.pue >= 1.0) {
            return Err(Error::invalid("pue", profile.pue, "must be at least 1.0"));
        }
        require_range("renewable_share", profile.renewable_share, 0.0, 1.0)?;

        let it = self.simulate(request)?;

        let overhead_power_kw = it.total_power_kw * (profile.pue - 1.0);
        let facility_power_kw = it.total_power_kw * profile.pue;
        let facility_energy_kwh = facility_power_kw * it.duration_hours;
        let facility_cost = self.pricing.calculate_cost(facility_energy_kwh);
        let facility_carbon_kg = self.pricing.calculate_carbon(facility_energy_kwh) * (1.0 - profile.renewable_share);

        Ok(FacilityResult {
            it,
            profile,
            overhead_power_kw,
            facility_power_kw,
            facility_energy_kwh,
            facility_cost,
            facility_carbon_kg,
        })
    }

    /// Average draw of one GPU (watts) for an entry
    pub fn unit_power_watts(&self, entry: &GpuWorkloadEntry) -> Result<f64> {
        validate_entry(0, entry)?;
        let (effective_tdp, _) = self.resolve_tdp(entry)?;
        Ok(effective_tdp * entry.utilization)
    }

    /// `round(100 * (1 - utilization * k))`, clamped to [0, 100]
    ///
    /// Sustained saturation is penalized as operationally risky even
    /// though it is efficient per unit of work.
    pub fn efficiency_score(&self, utilization: f64) -> f64 {
        (100.0 * (1.0 - utilization * self.config.efficiency_derating))
            .round()
            .clamp(0.0, 100.0)
    }

    fn simulate_entry(&self, index: usize, entry: &GpuWorkloadEntry, duration: f64) -> Result<EntrySimulation> {
        validate_entry(index, entry)?;
        let (effective_tdp, reference_tdp) = self.resolve_tdp(entry)?;

        let unit_power_watts = effective_tdp * entry.utilization;
        let hourly_power_kw = unit_power_watts * f64::from(entry.quantity) / 1000.0;
        let total_energy_kwh = hourly_power_kw * duration;

        let temperature_estimate_c =
            self.config.ambient_temp_c + (unit_power_watts / reference_tdp) * self.config.thermal_rise_c;

        Ok(EntrySimulation {
            gpu_model: entry.gpu_model.clone(),
            quantity: entry.quantity,
            effective_tdp_watts: effective_tdp,
            unit_power_watts,
            hourly_power_kw,
            total_energy_kwh,
            cost_estimate: self.pricing.calculate_cost(total_energy_kwh),
            carbon_footprint_kg: self.pricing.calculate_carbon(total_energy_kwh),
            efficiency_score: self.efficiency_score(entry.utilization),
            utilization_actual: entry.utilization,
            temperature_estimate_c,
        })
    }

    /// (effective TDP, reference TDP for the thermal estimate)
    fn resolve_tdp(&self, entry: &GpuWorkloadEntry) -> Result<(f64, f64)> {
        let catalog_tdp = self.catalog.get(&entry.gpu_model).map(|spec| spec.tdp_watts);

        match (entry.custom_tdp_watts, catalog_tdp) {
            (Some(custom), Some(reference)) => Ok((custom, reference)),
            (Some(custom), None) => Ok((custom, custom)),
            (None, Some(reference)) => Ok((reference, reference)),
            (None, None) => Err(Error::UnknownGpuModel {
                model: entry.gpu_model.clone(),
            }),
        }
    }
}

fn validate_entry(index: usize, entry: &GpuWorkloadEntry) -> Result<()> {
    if entry.quantity == 0 {
        return Err(Error::invalid(format!("entries[{}].quantity", index), 0, "must be at least 1"));
    }
    if !(entry.utilization.is_finite() && entry.utilization > 0.0 && entry.utilization <= 1.0) {
        return Err(Error::invalid(
            format!("entries[{}].utilization", index),
            entry.utilization,
            "must be within (0, 1]",
        ));
    }
    if let Some(tdp) = entry.custom_tdp_watts {
        require_positive(&format!("entries[{}].custom_tdp_watts", index), tdp)?;
    }
    Ok(())
}
