use anyhow::Result;
use sqlx::PgPool;

use crate::domain::Building;

/// Fetch every building row, ordered by id. Full scan; the table is small
/// and owned by the upstream ingestion process.
pub async fn all_buildings(pool: &PgPool) -> Result<Vec<Building>> {
    let rows = sqlx::query_as::<_, Building>(
        r#"
        SELECT
            id,
            name,
            address,
            usage_type,
            gross_floor_area_m2,
            year_built
        FROM "Building"
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
