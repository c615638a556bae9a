use serde::Serialize;

/// A building row as stored upstream. Read-only from this program's
/// perspective; all metadata columns besides `name` are nullable.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Building {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub usage_type: Option<String>,
    pub gross_floor_area_m2: Option<f64>,
    pub year_built: Option<i32>,
}
