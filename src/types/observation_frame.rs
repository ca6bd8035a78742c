// observation_frame.rs

//! Contains the `ObservationFrame` structure for lazy operations on the
//! per-city, per-date observation table.

use crate::observations::error::ObservationError;
use crate::types::observation::{
    Observation, COL_CITY, COL_DATE, COL_LATITUDE, COL_LONGITUDE, COL_TEMP_MAX, COL_TEMP_MIN,
};
use crate::utils::date_from_epoch_days;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

/// A wrapper around a Polars `LazyFrame` holding weather observations.
///
/// The `date` column of a frame built with [`ObservationFrame::from_frame`] (which is
/// what the loader does) is always a Polars `Date`, so equality and range comparisons
/// against a [`NaiveDate`] are well defined.
///
/// All filtering methods return a *new* `ObservationFrame`; the original is never
/// modified.
///
/// # Errors
///
/// Methods that collect the frame (`cities`, `dates`, `collect_observations`, ...)
/// return an [`ObservationError`] if the underlying computation fails.
#[derive(Clone)]
pub struct ObservationFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ObservationFrame {
    /// Wraps a `LazyFrame` as-is, without touching its `date` column.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Wraps a `LazyFrame`, coercing its `date` column into a calendar date.
    ///
    /// Accepted encodings of the `date` column are `Date`, `Datetime` (truncated to the
    /// day) and `String` (parsed as an ISO date). A frame without a `date` column is
    /// wrapped unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::UnsupportedDateType`] for any other column type, or
    /// [`ObservationError::DataFrameProcessing`] if the schema cannot be resolved.
    ///
    /// # Example
    ///
    /// ```
    /// use meteo_explorer::ObservationFrame;
    /// use polars::prelude::*;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let raw = df!(
    ///     "original_city_name" => ["Avignon"],
    ///     "date" => ["2025-12-17"],
    ///     "temperature_max" => [15.0],
    /// )?;
    /// let frame = ObservationFrame::from_frame(raw.lazy())?;
    /// let df = frame.frame.collect()?;
    /// assert_eq!(df.column("date")?.dtype(), &DataType::Date);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_frame(mut frame: LazyFrame) -> Result<Self, ObservationError> {
        let schema = frame.collect_schema()?;
        let normalized = match schema.get(COL_DATE) {
            None | Some(DataType::Date) => frame,
            Some(DataType::Datetime(_, _)) => {
                frame.with_column(col(COL_DATE).cast(DataType::Date))
            }
            Some(DataType::String) => frame.with_column(
                col(COL_DATE)
                    .str()
                    .to_date(StrptimeOptions::default()),
            ),
            Some(other) => {
                return Err(ObservationError::UnsupportedDateType {
                    column: COL_DATE.to_string(),
                    dtype: other.to_string(),
                })
            }
        };
        Ok(Self::new(normalized))
    }

    /// Filters the observations based on a Polars predicate expression.
    pub fn filter(&self, predicate: Expr) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().filter(predicate))
    }

    /// All observations recorded on `date`, across every city.
    ///
    /// This is the slice the temperature map is drawn from.
    pub fn get_at(&self, date: NaiveDate) -> ObservationFrame {
        self.filter(col(COL_DATE).eq(lit(date)))
    }

    /// All observations between `start` and `end` (both inclusive).
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> ObservationFrame {
        self.filter(
            col(COL_DATE)
                .gt_eq(lit(start))
                .and(col(COL_DATE).lt_eq(lit(end))),
        )
    }

    /// All observations of one city, over every date.
    pub fn for_city(&self, city: &str) -> ObservationFrame {
        self.filter(col(COL_CITY).eq(lit(city)))
    }

    /// Distinct city names, sorted alphabetically.
    pub fn cities(&self) -> Result<Vec<String>, ObservationError> {
        let df = self.frame.clone().select([col(COL_CITY)]).collect()?;
        let names: BTreeSet<String> = df
            .column(COL_CITY)?
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_owned)
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Distinct observation dates, in ascending order.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, ObservationError> {
        let df = self
            .frame
            .clone()
            .select([col(COL_DATE).cast(DataType::Int32)])
            .collect()?;
        let days: BTreeSet<i32> = df.column(COL_DATE)?.i32()?.into_iter().flatten().collect();
        Ok(days.into_iter().filter_map(date_from_epoch_days).collect())
    }

    /// Collects the frame into [`Observation`] rows.
    ///
    /// Rows with a null city or date are skipped. Missing coordinate or temperature
    /// columns yield `None` fields rather than an error.
    pub fn collect_observations(&self) -> Result<Vec<Observation>, ObservationError> {
        let df = self.frame.clone().collect()?;

        let cities = df.column(COL_CITY)?.str()?;
        let days = df.column(COL_DATE)?.cast(&DataType::Int32)?;
        let days = days.i32()?;
        let latitude = optional_float_column(&df, COL_LATITUDE)?;
        let longitude = optional_float_column(&df, COL_LONGITUDE)?;
        let temp_max = optional_float_column(&df, COL_TEMP_MAX)?;
        let temp_min = optional_float_column(&df, COL_TEMP_MIN)?;

        let value_at = |column: &Option<Float64Chunked>, idx: usize| {
            column.as_ref().and_then(|ca| ca.get(idx))
        };

        let mut observations = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let (Some(city), Some(date)) = (
                cities.get(idx),
                days.get(idx).and_then(date_from_epoch_days),
            ) else {
                continue;
            };
            observations.push(Observation {
                city: city.to_string(),
                date,
                latitude: value_at(&latitude, idx),
                longitude: value_at(&longitude, idx),
                temperature_max: value_at(&temp_max, idx),
                temperature_min: value_at(&temp_min, idx),
            });
        }
        Ok(observations)
    }
}

/// Headline figures shown above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Distinct cities in the full table.
    pub cities_tracked: usize,
    /// Mean of `temperature_max` over the filtered table.
    pub mean_temperature_max: Option<f64>,
    /// Highest `temperature_max` in the filtered table.
    pub max_temperature_max: Option<f64>,
    /// Number of rows in the filtered table.
    pub record_count: usize,
}

impl DashboardSummary {
    /// Computes the summary. The city count always comes from `all`, the temperature
    /// figures and record count from `filtered`.
    pub fn compute(
        all: &ObservationFrame,
        filtered: &ObservationFrame,
    ) -> Result<Self, ObservationError> {
        let stats = filtered
            .frame
            .clone()
            .select([
                col(COL_TEMP_MAX)
                    .cast(DataType::Float64)
                    .mean()
                    .alias("mean"),
                col(COL_TEMP_MAX)
                    .cast(DataType::Float64)
                    .max()
                    .alias("max"),
                len().cast(DataType::UInt64).alias("count"),
            ])
            .collect()?;

        Ok(Self {
            cities_tracked: all.cities()?.len(),
            mean_temperature_max: stats.column("mean")?.f64()?.get(0),
            max_temperature_max: stats.column("max")?.f64()?.get(0),
            record_count: stats.column("count")?.u64()?.get(0).unwrap_or(0) as usize,
        })
    }
}

fn optional_float_column(
    df: &DataFrame,
    name: &str,
) -> Result<Option<Float64Chunked>, ObservationError> {
    match df.column(name) {
        Ok(column) => {
            let values = column.cast(&DataType::Float64)?;
            Ok(Some(values.f64()?.clone()))
        }
        Err(_) => Ok(None),
    }
}
