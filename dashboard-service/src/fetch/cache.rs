use std::collections::HashMap;
use std::sync::Mutex;

use demand_client::domain::{Building, DemandScenario, DemandScenarioBuilding};

use super::{DemandStore, FetchError, ScenarioResult};

/// Memoizing decorator over any [`DemandStore`]: one keyed map per
/// operation, argument tuple to result, held for the process lifetime.
/// No eviction and no invalidation; a fresh process run is the only way
/// to observe upstream changes. Errors are never cached.
pub struct CachedStore<S> {
    inner: S,
    buildings: Mutex<Option<Vec<Building>>>,
    scenarios: Mutex<Option<Vec<DemandScenario>>>,
    building_links: Mutex<HashMap<i64, Vec<DemandScenarioBuilding>>>,
    scenario_results: Mutex<HashMap<i64, Vec<ScenarioResult>>>,
    building_results: Mutex<HashMap<(i64, i64), ScenarioResult>>,
}

impl<S> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buildings: Mutex::new(None),
            scenarios: Mutex::new(None),
            building_links: Mutex::new(HashMap::new()),
            scenario_results: Mutex::new(HashMap::new()),
            building_results: Mutex::new(HashMap::new()),
        }
    }
}

fn hit() {
    metrics::counter!("fetch_cache_hits_total").increment(1);
}

fn miss() {
    metrics::counter!("fetch_cache_misses_total").increment(1);
}

#[async_trait::async_trait]
impl<S: DemandStore> DemandStore for CachedStore<S> {
    async fn all_buildings(&self) -> Result<Vec<Building>, FetchError> {
        if let Some(cached) = self.buildings.lock().unwrap().clone() {
            hit();
            return Ok(cached);
        }
        miss();
        let fetched = self.inner.all_buildings().await?;
        *self.buildings.lock().unwrap() = Some(fetched.clone());
        Ok(fetched)
    }

    async fn all_scenarios(&self) -> Result<Vec<DemandScenario>, FetchError> {
        if let Some(cached) = self.scenarios.lock().unwrap().clone() {
            hit();
            return Ok(cached);
        }
        miss();
        let fetched = self.inner.all_scenarios().await?;
        *self.scenarios.lock().unwrap() = Some(fetched.clone());
        Ok(fetched)
    }

    async fn scenario_links_for_building(
        &self,
        building_id: i64,
    ) -> Result<Vec<DemandScenarioBuilding>, FetchError> {
        if let Some(cached) = self.building_links.lock().unwrap().get(&building_id) {
            hit();
            return Ok(cached.clone());
        }
        miss();
        let fetched = self.inner.scenario_links_for_building(building_id).await?;
        self.building_links
            .lock()
            .unwrap()
            .insert(building_id, fetched.clone());
        Ok(fetched)
    }

    async fn results_for_scenario(
        &self,
        scenario_id: i64,
    ) -> Result<Vec<ScenarioResult>, FetchError> {
        if let Some(cached) = self.scenario_results.lock().unwrap().get(&scenario_id) {
            hit();
            return Ok(cached.clone());
        }
        miss();
        let fetched = self.inner.results_for_scenario(scenario_id).await?;
        self.scenario_results
            .lock()
            .unwrap()
            .insert(scenario_id, fetched.clone());
        Ok(fetched)
    }

    async fn result_for_scenario_and_building(
        &self,
        scenario_id: i64,
        building_id: i64,
    ) -> Result<ScenarioResult, FetchError> {
        let key = (scenario_id, building_id);
        if let Some(cached) = self.building_results.lock().unwrap().get(&key) {
            hit();
            return Ok(cached.clone());
        }
        miss();
        let fetched = self
            .inner
            .result_for_scenario_and_building(scenario_id, building_id)
            .await?;
        self.building_results
            .lock()
            .unwrap()
            .insert(key, fetched.clone());
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demand_client::domain::EndUseSeries;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts underlying calls per operation; errors for scenario 99.
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    fn series() -> EndUseSeries {
        EndUseSeries {
            heating: vec![1.0],
            cooling: vec![2.0],
            lighting: vec![3.0],
            equipment: vec![4.0],
        }
    }

    #[async_trait::async_trait]
    impl DemandStore for CountingStore {
        async fn all_buildings(&self) -> Result<Vec<Building>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Building {
                id: 1,
                name: "Main Library".to_string(),
                address: None,
                usage_type: None,
                gross_floor_area_m2: None,
                year_built: None,
            }])
        }

        async fn all_scenarios(&self) -> Result<Vec<DemandScenario>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn scenario_links_for_building(
            &self,
            building_id: i64,
        ) -> Result<Vec<DemandScenarioBuilding>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![DemandScenarioBuilding {
                id: 10,
                demand_scenario_id: 5,
                building_id,
            }])
        }

        async fn results_for_scenario(
            &self,
            scenario_id: i64,
        ) -> Result<Vec<ScenarioResult>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if scenario_id == 99 {
                return Err(FetchError::Query("connection reset".to_string()));
            }
            Ok(vec![ScenarioResult {
                result_id: 10,
                series: series(),
            }])
        }

        async fn result_for_scenario_and_building(
            &self,
            _scenario_id: i64,
            _building_id: i64,
        ) -> Result<ScenarioResult, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ScenarioResult {
                result_id: 10,
                series: series(),
            })
        }
    }

    #[tokio::test]
    async fn repeated_fetch_hits_underlying_store_once() {
        let store = CachedStore::new(CountingStore::default());

        let first = store.results_for_scenario(5).await.expect("fetch");
        let second = store.results_for_scenario(5).await.expect("fetch");

        assert_eq!(first, second);
        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_arguments_are_cached_separately() {
        let store = CachedStore::new(CountingStore::default());

        store.results_for_scenario(5).await.expect("fetch");
        store.results_for_scenario(6).await.expect("fetch");
        store.results_for_scenario(5).await.expect("fetch");

        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let store = CachedStore::new(CountingStore::default());

        assert!(store.results_for_scenario(99).await.is_err());
        assert!(store.results_for_scenario(99).await.is_err());

        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unkeyed_fetches_memoize_too() {
        let store = CachedStore::new(CountingStore::default());

        store.all_buildings().await.expect("fetch");
        let buildings = store.all_buildings().await.expect("fetch");

        assert_eq!(buildings[0].name, "Main Library");
        assert_eq!(store.inner.calls.load(Ordering::SeqCst), 1);
    }
}
