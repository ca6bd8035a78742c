//! Defines the column names of the observation table and the `Observation`
//! row structure.

use chrono::NaiveDate;

pub const COL_CITY: &str = "original_city_name";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_DATE: &str = "date";
pub const COL_TEMP_MAX: &str = "temperature_max"; // Daily maximum (°C)
pub const COL_TEMP_MIN: &str = "temperature_min"; // Daily minimum (°C)

/// One (city, date) weather observation.
///
/// Obtained from [`crate::ObservationFrame::collect_observations`]. Temperatures
/// and coordinates are optional because the source table may contain nulls.
#[derive(Debug, PartialEq, Clone)]
pub struct Observation {
    pub city: String,
    pub date: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}
