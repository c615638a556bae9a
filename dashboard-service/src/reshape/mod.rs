pub mod export;

use demand_client::domain::EndUseSeries;
use serde::Serialize;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// Synthetic epoch of every simulation's time axis. Sequences carry no
/// timestamps of their own; position i means `EPOCH + i` hours.
pub const EPOCH: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

/// Wide-table column order, as stored.
pub const END_USE_COLUMNS: [&str; 4] = ["heating", "cooling", "lighting", "equipment"];

/// Capitalized labels used for display, aggregation output and melting.
pub const END_USE_LABELS: [&str; 4] = ["Heating", "Cooling", "Lighting", "Equipment"];

pub fn timestamp_at(step: usize) -> OffsetDateTime {
    EPOCH + Duration::hours(step as i64)
}

#[derive(thiserror::Error, Debug)]
pub enum ReshapeError {
    #[error("no simulation results to concatenate")]
    EmptyInput,
    #[error("shape mismatch: result {result_id} has {len} timesteps, expected {expected}")]
    ShapeMismatch {
        result_id: i64,
        len: usize,
        expected: usize,
    },
    #[error("csv serialization failed: {0}")]
    Csv(String),
}

/// One time-indexed wide table per simulation result. Row i holds the four
/// end-use values at `timestamp_at(i)`, in [`END_USE_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFrame {
    pub result_id: i64,
    pub values: Vec<[f64; 4]>,
}

impl ResultFrame {
    pub fn from_series(result_id: i64, series: &EndUseSeries) -> Self {
        let values = (0..series.len())
            .map(|i| {
                [
                    series.heating[i],
                    series.cooling[i],
                    series.lighting[i],
                    series.equipment[i],
                ]
            })
            .collect();
        Self { result_id, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Concatenation of per-result frames, keeping (timestamp, result_id) as
/// the row key. Result-major: all rows of the first frame, then the next.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingsRow {
    pub timestamp: OffsetDateTime,
    pub result_id: i64,
    pub values: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingsFrame {
    pub rows: Vec<BuildingsRow>,
}

/// Stack per-result frames into one long table. All frames must share the
/// time axis; a zero-result scenario surfaces as [`ReshapeError::EmptyInput`].
pub fn concat(frames: &[ResultFrame]) -> Result<BuildingsFrame, ReshapeError> {
    let first = frames.first().ok_or(ReshapeError::EmptyInput)?;
    let expected = first.len();

    for frame in frames {
        if frame.len() != expected {
            return Err(ReshapeError::ShapeMismatch {
                result_id: frame.result_id,
                len: frame.len(),
                expected,
            });
        }
    }

    let mut rows = Vec::with_capacity(frames.len() * expected);
    for frame in frames {
        for (step, values) in frame.values.iter().enumerate() {
            rows.push(BuildingsRow {
                timestamp: timestamp_at(step),
                result_id: frame.result_id,
                values: *values,
            });
        }
    }
    Ok(BuildingsFrame { rows })
}

impl BuildingsFrame {
    /// Sum across all results at each timestamp, producing the single wide
    /// scenario table with capitalized column labels.
    pub fn aggregate(&self) -> ScenarioFrame {
        use std::collections::BTreeMap;

        let mut sums: BTreeMap<OffsetDateTime, [f64; 4]> = BTreeMap::new();
        for row in &self.rows {
            let acc = sums.entry(row.timestamp).or_insert([0.0; 4]);
            for (slot, value) in acc.iter_mut().zip(row.values.iter()) {
                *slot += value;
            }
        }

        ScenarioFrame {
            rows: sums
                .into_iter()
                .map(|(timestamp, values)| ScenarioRow { timestamp, values })
                .collect(),
        }
    }
}

/// Timestamp-indexed wide table with capitalized end-use columns; the form
/// handed to charts and the aggregated CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRow {
    pub timestamp: OffsetDateTime,
    pub values: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioFrame {
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioFrame {
    /// A single result viewed as a scenario table: same values, capitalized
    /// labels. Used by the per-building chart.
    pub fn from_single(frame: &ResultFrame) -> Self {
        Self {
            rows: frame
                .values
                .iter()
                .enumerate()
                .map(|(step, values)| ScenarioRow {
                    timestamp: timestamp_at(step),
                    values: *values,
                })
                .collect(),
        }
    }

    /// Long/tidy variant: one row per timestamp and end-use category,
    /// category-major like a pandas melt. Exactly 4xN rows for N timestamps.
    pub fn melt(&self) -> Vec<MeltedRow> {
        let mut out = Vec::with_capacity(self.rows.len() * END_USE_LABELS.len());
        for (column, label) in END_USE_LABELS.iter().enumerate() {
            for row in &self.rows {
                out.push(MeltedRow {
                    timestamp: row.timestamp,
                    end_use: label,
                    energy_j: row.values[column],
                });
            }
        }
        out
    }
}

/// One row of the melted table. Serializes with the display column names
/// the charting layer expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeltedRow {
    #[serde(rename = "Timestamp", serialize_with = "serialize_timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(rename = "End Use")]
    pub end_use: &'static str,
    #[serde(rename = "Energy [J]")]
    pub energy_j: f64,
}

fn serialize_timestamp<S>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let formatted = export::format_timestamp(*ts).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn series(values: [f64; 4], len: usize) -> EndUseSeries {
        EndUseSeries {
            heating: vec![values[0]; len],
            cooling: vec![values[1]; len],
            lighting: vec![values[2]; len],
            equipment: vec![values[3]; len],
        }
    }

    #[test]
    fn time_axis_starts_at_epoch_with_hourly_cadence() {
        assert_eq!(timestamp_at(0), datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(timestamp_at(25), datetime!(2024-01-02 01:00:00 UTC));
    }

    #[test]
    fn concat_of_nothing_is_an_error() {
        let err = concat(&[]).unwrap_err();
        assert!(matches!(err, ReshapeError::EmptyInput));
    }

    #[test]
    fn concat_rejects_mismatched_time_axes() {
        let a = ResultFrame::from_series(1, &series([1.0, 2.0, 3.0, 4.0], 3));
        let b = ResultFrame::from_series(2, &series([1.0, 2.0, 3.0, 4.0], 2));

        let err = concat(&[a, b]).unwrap_err();
        assert!(matches!(
            err,
            ReshapeError::ShapeMismatch {
                result_id: 2,
                len: 2,
                expected: 3,
            }
        ));
    }

    #[test]
    fn concat_keeps_result_id_as_secondary_key() {
        let a = ResultFrame::from_series(1, &series([1.0, 2.0, 3.0, 4.0], 2));
        let b = ResultFrame::from_series(2, &series([5.0, 6.0, 7.0, 8.0], 2));

        let stacked = concat(&[a, b]).expect("concat");
        assert_eq!(stacked.rows.len(), 4);
        assert_eq!(stacked.rows[0].result_id, 1);
        assert_eq!(stacked.rows[2].result_id, 2);
        assert_eq!(stacked.rows[0].timestamp, stacked.rows[2].timestamp);
    }

    #[test]
    fn aggregate_sums_across_results_per_timestamp() {
        let a = ResultFrame::from_series(1, &series([1.0, 2.0, 3.0, 4.0], 2));
        let b = ResultFrame::from_series(2, &series([1.0, 2.0, 3.0, 4.0], 2));

        let scenario = concat(&[a, b]).expect("concat").aggregate();
        assert_eq!(scenario.rows.len(), 2);
        for row in &scenario.rows {
            assert_eq!(row.values, [2.0, 4.0, 6.0, 8.0]);
        }
    }

    #[test]
    fn melt_yields_four_rows_per_timestamp() {
        let frame = ResultFrame::from_series(1, &series([1.0, 2.0, 3.0, 4.0], 24));
        let melted = ScenarioFrame::from_single(&frame).melt();

        assert_eq!(melted.len(), 4 * 24);
        // Category-major: the first block is all heating.
        assert!(melted[..24].iter().all(|r| r.end_use == "Heating"));
        assert_eq!(melted[24].end_use, "Cooling");
        assert_eq!(melted[24].energy_j, 2.0);
    }

    #[test]
    fn melted_rows_serialize_with_display_column_names() {
        let frame = ResultFrame::from_series(1, &series([1.0, 2.0, 3.0, 4.0], 1));
        let melted = ScenarioFrame::from_single(&frame).melt();

        let value = serde_json::to_value(&melted[0]).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 3);
        for column in ["Timestamp", "End Use", "Energy [J]"] {
            assert!(object.contains_key(column), "missing column {column}");
        }
        assert_eq!(value["Timestamp"], "2024-01-01 00:00:00");
    }
}
