//! Gridsite - Demo CLI
//!
//! Walks through the engine end to end on the built-in reference data:
//! workload simulation, regional scoring, site ranking and policy summary.

use gridsite_lib::catalog::{find_preset, GpuSpecCatalog, RegionCatalog};
use gridsite_lib::core::{Config, FacilityProfile, GpuWorkloadEntry, RankRequest, SimulationRequest};
use gridsite_lib::Engine;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("==============================================");
    println!("   Gridsite - Demo CLI");
    println!("==============================================\n");

    let config = Config::default();
    let symbol = config.pricing.currency_symbol.clone();
    let engine = match Engine::new(config, GpuSpecCatalog::builtin()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to initialize engine: {}", e);
            std::process::exit(1);
        }
    };
    let regions = RegionCatalog::builtin();

    // 1. Workload simulation
    println!("[1/4] Simulating GPU workloads...");
    let request = SimulationRequest::new(
        vec![
            GpuWorkloadEntry::new("H100", 4, 0.8),
            GpuWorkloadEntry::new("A100", 8, 0.6),
        ],
        24.0,
    );
    match engine.simulate(&request) {
        Ok(result) => {
            for entry in &result.entries {
                println!(
                    "      {:<6} x{:<3} {:>7.2} kW  {:>8.2} kWh  {:>10.1} {}  eff {:>3.0}  {:>5.1} C",
                    entry.gpu_model,
                    entry.quantity,
                    entry.hourly_power_kw,
                    entry.total_energy_kwh,
                    entry.cost_estimate,
                    symbol,
                    entry.efficiency_score,
                    entry.temperature_estimate_c
                );
            }
            println!(
                "      Total: {:.2} kW, {:.2} kWh, {:.1} {}, {:.1} kg CO2\n",
                result.total_power_kw, result.total_energy_kwh, result.total_cost, symbol, result.total_carbon_kg
            );
        }
        Err(e) => println!("      Simulation failed: {}\n", e),
    }

    if let Some(preset) = find_preset("gpt3_175b_training") {
        let profile = FacilityProfile { pue: 1.4, renewable_share: 0.2 };
        match engine.simulate_facility(&preset.request(1024), profile) {
            Ok(facility) => println!(
                "      {} on 1024 GPUs at PUE {:.1}: {:.1} kW facility, {:.0} {}\n",
                preset.name, profile.pue, facility.facility_power_kw, facility.facility_cost, symbol
            ),
            Err(e) => println!("      Facility roll-up failed: {}\n", e),
        }
    }

    // 2. Regional scoring
    println!("[2/4] Scoring {} regions...", regions.len());
    match engine.score_regions(regions.records()) {
        Ok(scores) => {
            println!("----------------------------------------------");
            println!("  Region       | Infra | Cost  | Overall | Grade");
            println!("----------------------------------------------");
            for score in scores.values() {
                println!(
                    "  {:<12} | {:>5.1} | {:>5.1} | {:>7.1} | {}",
                    score.region_id,
                    score.infrastructure_score,
                    score.cost_efficiency_score,
                    score.overall_score,
                    score.grade.as_str()
                );
            }
            println!("----------------------------------------------\n");
        }
        Err(e) => println!("      Scoring failed: {}\n", e),
    }

    // 3. Site ranking
    let target_mw = 100.0;
    println!("[3/4] Ranking sites for a {} MW datacenter...", target_mw);
    let rank_request =
        RankRequest::new(target_mw).with_reference_workload(GpuWorkloadEntry::new("H100", 1, 0.8));
    let ranked = match engine.rank_locations(&rank_request, regions.records()) {
        Ok(ranked) => ranked,
        Err(e) => {
            println!("      Ranking failed: {}", e);
            std::process::exit(1);
        }
    };
    for (i, rec) in ranked.iter().take(5).enumerate() {
        println!(
            "      #{} {:<16} ROI {:>5.1}  {:>6.1} {}/kWh  annual {:>8.1}B {}  {}",
            i + 1,
            rec.region_name,
            rec.roi_score,
            rec.price_per_kwh,
            symbol,
            rec.annual_cost / 1e9,
            symbol,
            if rec.recommended { "recommended" } else { "" }
        );
    }
    if let Some(count) = ranked.first().and_then(|r| r.estimated_gpu_count) {
        println!("      Supports about {} H100 GPUs at 80% load", count);
    }
    println!();

    // 4. Policy summary and grid impact
    println!("[4/4] Policy insights...");
    let insight = engine.summarize_policy(&ranked);
    for line in &insight.recommendations {
        println!("      - {}", line);
    }
    if let Some(best) = ranked.first().and_then(|r| regions.get(&r.region_id)) {
        match engine.assess_grid_impact(best, target_mw) {
            Ok(impact) => println!(
                "\n      Grid impact in {}: {:.1}% utilization, risk {}",
                best.name,
                impact.capacity_utilization * 100.0,
                impact.risk_label
            ),
            Err(e) => println!("\n      Grid impact failed: {}", e),
        }
    }

    println!("\n==============================================");
    println!("   Demo complete");
    println!("==============================================\n");
}
