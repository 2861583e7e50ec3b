//! English translations

use std::collections::HashMap;

pub fn get_translations() -> HashMap<String, String> {
    let mut t = HashMap::new();

    // Datacenter grades
    t.insert("grade.S".into(), "S (optimal)".into());
    t.insert("grade.A".into(), "A (excellent)".into());
    t.insert("grade.B".into(), "B (good)".into());
    t.insert("grade.C".into(), "C (fair)".into());
    t.insert("grade.D".into(), "D (unsuitable)".into());

    // Grid risk
    t.insert("grid.risk.low".into(), "Low".into());
    t.insert("grid.risk.moderate".into(), "Moderate".into());
    t.insert("grid.risk.high".into(), "High".into());

    // Grid actions
    t.insert("grid.action.high.expand".into(), "Urgent expansion of grid infrastructure required".into());
    t.insert("grid.action.high.interconnect".into(), "Strengthen interconnection with neighbouring grids".into());
    t.insert("grid.action.high.downsize".into(), "Consider reducing the datacenter's planned capacity".into());
    t.insert("grid.action.moderate.plan".into(), "Draw up a mid- to long-term grid expansion plan".into());
    t.insert("grid.action.moderate.peak_shift".into(), "Shift load away from peak hours".into());
    t.insert("grid.action.moderate.renewables".into(), "Evaluate on-site or contracted renewable supply".into());
    t.insert("grid.action.low.accept".into(), "Current grid infrastructure can absorb the load".into());
    t.insert("grid.action.low.phased".into(), "Plan phased build-out with future expansion in mind".into());

    // Policy insight templates
    t.insert(
        "policy.price_gap".into(),
        "Electricity price gap: {highest} at {highest_price} vs {lowest} at {lowest_price} per kWh ({gap}, {gap_percent}%)".into(),
    );
    t.insert("policy.top_investment".into(), "Grid investment priority #1: {region} (priority score {score})".into());
    t.insert(
        "policy.top_incentive".into(),
        "Top incentive target: {region} ({grade}, {advantage} per kWh below average)".into(),
    );
    t.insert(
        "policy.recommended_count".into(),
        "{count} of {total} candidate regions meet the recommendation criteria; best candidate: {region}".into(),
    );
    t.insert("policy.no_recommended".into(), "No candidate region currently meets the recommendation criteria".into());
    t.insert("policy.static.modernize".into(), "Close regional efficiency gaps through grid modernization investment".into());
    t.insert("policy.static.tariff".into(), "Review differentiated electricity tariffs to attract datacenters".into());
    t.insert("policy.static.infrastructure".into(), "Support dedicated power infrastructure for AI datacenters".into());
    t.insert("policy.static.incentives".into(), "Tailor siting incentives to each region's characteristics".into());

    t
}
