/// Hourly simulation output for one (scenario, building) pairing.
///
/// The four end-use sequences arrive as JSON-encoded text columns and are
/// decoded on demand with [`BuildingSimulationResult::decode`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BuildingSimulationResult {
    pub id: i64,
    pub heating: String,
    pub cooling: String,
    pub lighting: String,
    pub equipment: String,
}

/// Decoded end-use sequences. All four vectors have the same length; one
/// entry per hourly timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct EndUseSeries {
    pub heating: Vec<f64>,
    pub cooling: Vec<f64>,
    pub lighting: Vec<f64>,
    pub equipment: Vec<f64>,
}

impl EndUseSeries {
    /// Number of hourly timesteps.
    pub fn len(&self) -> usize {
        self.heating.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heating.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("malformed {column} payload in result {result_id}: {source}")]
    Json {
        result_id: i64,
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "shape mismatch in result {result_id}: heating={heating} cooling={cooling} lighting={lighting} equipment={equipment}"
    )]
    ShapeMismatch {
        result_id: i64,
        heating: usize,
        cooling: usize,
        lighting: usize,
        equipment: usize,
    },
}

impl BuildingSimulationResult {
    /// Decode the four JSON sequences, enforcing equal lengths.
    pub fn decode(&self) -> Result<EndUseSeries, DecodeError> {
        let parse = |column: &'static str, payload: &str| -> Result<Vec<f64>, DecodeError> {
            serde_json::from_str(payload).map_err(|source| DecodeError::Json {
                result_id: self.id,
                column,
                source,
            })
        };

        let heating = parse("heating", &self.heating)?;
        let cooling = parse("cooling", &self.cooling)?;
        let lighting = parse("lighting", &self.lighting)?;
        let equipment = parse("equipment", &self.equipment)?;

        if heating.len() != cooling.len()
            || heating.len() != lighting.len()
            || heating.len() != equipment.len()
        {
            return Err(DecodeError::ShapeMismatch {
                result_id: self.id,
                heating: heating.len(),
                cooling: cooling.len(),
                lighting: lighting.len(),
                equipment: equipment.len(),
            });
        }

        Ok(EndUseSeries {
            heating,
            cooling,
            lighting,
            equipment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(heating: &str, cooling: &str, lighting: &str, equipment: &str) -> BuildingSimulationResult {
        BuildingSimulationResult {
            id: 7,
            heating: heating.to_string(),
            cooling: cooling.to_string(),
            lighting: lighting.to_string(),
            equipment: equipment.to_string(),
        }
    }

    #[test]
    fn decode_parses_equal_length_sequences() {
        let result = result_with("[1.0, 2.0]", "[0.5, 0.25]", "[3, 4]", "[0, 0]");

        let series = result.decode().expect("decode should succeed");
        assert_eq!(series.len(), 2);
        assert_eq!(series.heating, vec![1.0, 2.0]);
        assert_eq!(series.lighting, vec![3.0, 4.0]);
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let result = result_with("[1.0, 2.0]", "not json", "[3, 4]", "[0, 0]");

        let err = result.decode().unwrap_err();
        assert!(matches!(err, DecodeError::Json { column: "cooling", .. }));
    }

    #[test]
    fn decode_rejects_unequal_lengths() {
        let result = result_with("[1.0, 2.0]", "[0.5]", "[3, 4]", "[0, 0]");

        let err = result.decode().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::ShapeMismatch {
                heating: 2,
                cooling: 1,
                ..
            }
        ));
    }
}
