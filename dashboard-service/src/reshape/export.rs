use demand_client::domain::Building;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use super::{BuildingsFrame, ReshapeError, ScenarioFrame, END_USE_COLUMNS, END_USE_LABELS};

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn format_timestamp(ts: OffsetDateTime) -> Result<String, ReshapeError> {
    ts.format(&TIMESTAMP_FORMAT)
        .map_err(|e| ReshapeError::Csv(e.to_string()))
}

fn csv_err(e: impl std::fmt::Display) -> ReshapeError {
    ReshapeError::Csv(e.to_string())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ReshapeError> {
    writer.into_inner().map_err(csv_err)
}

/// Raw per-building-per-result table: `(Timestamp, result_id)` index,
/// lowercase end-use columns as stored.
pub fn buildings_frame_csv(frame: &BuildingsFrame) -> Result<Vec<u8>, ReshapeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Timestamp", "result_id"];
    header.extend(END_USE_COLUMNS);
    writer.write_record(&header).map_err(csv_err)?;

    for row in &frame.rows {
        let mut record = vec![format_timestamp(row.timestamp)?, row.result_id.to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record).map_err(csv_err)?;
    }

    finish(writer)
}

/// Timestamp-aggregated table: `Timestamp` index, capitalized end-use
/// columns.
pub fn scenario_frame_csv(frame: &ScenarioFrame) -> Result<Vec<u8>, ReshapeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Timestamp"];
    header.extend(END_USE_LABELS);
    writer.write_record(&header).map_err(csv_err)?;

    for row in &frame.rows {
        let mut record = vec![format_timestamp(row.timestamp)?];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record).map_err(csv_err)?;
    }

    finish(writer)
}

/// Building metadata export, id as the leading column.
pub fn building_metadata_csv(buildings: &[Building]) -> Result<Vec<u8>, ReshapeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "id",
            "name",
            "address",
            "usage_type",
            "gross_floor_area_m2",
            "year_built",
        ])
        .map_err(csv_err)?;

    for b in buildings {
        writer
            .write_record([
                b.id.to_string(),
                b.name.clone(),
                b.address.clone().unwrap_or_default(),
                b.usage_type.clone().unwrap_or_default(),
                b.gross_floor_area_m2.map(|v| v.to_string()).unwrap_or_default(),
                b.year_built.map(|v| v.to_string()).unwrap_or_default(),
            ])
            .map_err(csv_err)?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::{concat, ResultFrame};
    use demand_client::domain::EndUseSeries;

    fn frame(result_id: i64, len: usize) -> ResultFrame {
        ResultFrame::from_series(
            result_id,
            &EndUseSeries {
                heating: vec![1.5; len],
                cooling: vec![0.0; len],
                lighting: vec![2.0; len],
                equipment: vec![3.25; len],
            },
        )
    }

    fn parse(bytes: &[u8]) -> (Vec<String>, usize) {
        let mut reader = csv::Reader::from_reader(bytes);
        let headers = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader.records().map(|r| r.expect("record")).count();
        (headers, rows)
    }

    #[test]
    fn buildings_csv_round_trips_rows_and_columns() {
        let stacked = concat(&[frame(1, 3), frame(2, 3)]).expect("concat");
        let bytes = buildings_frame_csv(&stacked).expect("csv");

        let (headers, rows) = parse(&bytes);
        assert_eq!(
            headers,
            ["Timestamp", "result_id", "heating", "cooling", "lighting", "equipment"]
        );
        assert_eq!(rows, stacked.rows.len());
    }

    #[test]
    fn scenario_csv_uses_capitalized_columns() {
        let scenario = concat(&[frame(1, 4)]).expect("concat").aggregate();
        let bytes = scenario_frame_csv(&scenario).expect("csv");

        let (headers, rows) = parse(&bytes);
        assert_eq!(
            headers,
            ["Timestamp", "Heating", "Cooling", "Lighting", "Equipment"]
        );
        assert_eq!(rows, 4);

        let text = String::from_utf8(bytes).expect("utf-8");
        assert!(text.contains("2024-01-01 03:00:00"));
    }

    #[test]
    fn metadata_csv_round_trips_buildings() {
        let buildings = vec![
            Building {
                id: 1,
                name: "Main Library".to_string(),
                address: Some("160 Memorial Dr".to_string()),
                usage_type: Some("library".to_string()),
                gross_floor_area_m2: Some(12000.0),
                year_built: Some(1976),
            },
            Building {
                id: 2,
                name: "Dorm A".to_string(),
                address: None,
                usage_type: None,
                gross_floor_area_m2: None,
                year_built: None,
            },
        ];

        let bytes = building_metadata_csv(&buildings).expect("csv");
        let (headers, rows) = parse(&bytes);
        assert_eq!(headers.len(), 6);
        assert_eq!(headers[0], "id");
        assert_eq!(rows, buildings.len());
    }
}
