pub mod building_queries;
pub mod result_queries;
pub mod scenario_queries;

pub use building_queries::all_buildings;
pub use result_queries::results_by_ids;
pub use scenario_queries::{
    all_scenarios, links_for_scenario, links_for_scenario_and_building,
    scenario_links_for_building,
};
