pub mod building;
pub mod demand_scenario;
pub mod simulation_result;

pub use building::Building;
pub use demand_scenario::{DemandScenario, DemandScenarioBuilding};
pub use simulation_result::{BuildingSimulationResult, DecodeError, EndUseSeries};
