//! Regional analysis: efficiency scoring, site ranking and grid impact

mod impact;
mod ranker;
mod scorer;

pub use impact::assess_grid_impact;
pub use ranker::OptimalLocationRanker;
pub use scorer::RegionalEfficiencyScorer;
