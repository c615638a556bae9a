use serde::Serialize;

/// A named simulation configuration applied across a set of buildings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DemandScenario {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Join row linking a scenario to a building. The row id doubles as the id
/// of the `BuildingSimulationResult` produced for that pairing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DemandScenarioBuilding {
    pub id: i64,
    pub demand_scenario_id: i64,
    pub building_id: i64,
}
