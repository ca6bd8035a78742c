use crate::observations::error::ObservationError;
use crate::types::observation_frame::ObservationFrame;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

/// A value a column is filtered against.
///
/// Scalars match by equality, lists by membership.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    TextList(Vec<String>),
    Number(f64),
    NumberList(Vec<f64>),
    Date(NaiveDate),
    DateList(Vec<NaiveDate>),
}

impl FilterValue {
    /// Empty values (empty text, empty lists) are ignored by [`filter_data`].
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(value) => value.is_empty(),
            FilterValue::TextList(values) => values.is_empty(),
            FilterValue::NumberList(values) => values.is_empty(),
            FilterValue::DateList(values) => values.is_empty(),
            FilterValue::Number(_) | FilterValue::Date(_) => false,
        }
    }

    fn predicate(&self, column: &str) -> Expr {
        let values = PlSmallStr::from_static("values");
        match self {
            FilterValue::Text(value) => col(column).eq(lit(value.as_str())),
            FilterValue::Number(value) => col(column).eq(lit(*value)),
            FilterValue::Date(value) => col(column).eq(lit(*value)),
            FilterValue::TextList(list) => {
                col(column).is_in(lit(Series::new(values, list.as_slice())))
            }
            FilterValue::NumberList(list) => {
                col(column).is_in(lit(Series::new(values, list.as_slice())))
            }
            FilterValue::DateList(list) => col(column).is_in(lit(Series::new(
                values,
                list.as_slice(),
            ))),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::TextList(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::TextList(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

impl From<Vec<NaiveDate>> for FilterValue {
    fn from(values: Vec<NaiveDate>) -> Self {
        FilterValue::DateList(values)
    }
}

/// Applies a set of column filters to an observation frame.
///
/// Filters are combined with a logical AND. A filter is skipped when its value is
/// empty or when the frame has no column of that name.
///
/// # Arguments
/// * `frame`: The frame to narrow. It is not modified.
/// * `filters`: `(column, value)` pairs.
///
/// # Returns
/// A new `ObservationFrame`. Fails only if the frame schema cannot be resolved.
pub fn filter_data<I, K>(
    frame: &ObservationFrame,
    filters: I,
) -> Result<ObservationFrame, ObservationError>
where
    I: IntoIterator<Item = (K, FilterValue)>,
    K: AsRef<str>,
{
    let mut lazy = frame.frame.clone();
    let schema = lazy.collect_schema()?;

    for (column, value) in filters {
        let column = column.as_ref();
        if value.is_empty() {
            continue;
        }
        if !schema.contains(column) {
            debug!("Ignoring filter on unknown column '{}'", column);
            continue;
        }
        lazy = lazy.filter(value.predicate(column));
    }

    Ok(ObservationFrame::new(lazy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::{COL_CITY, COL_DATE, COL_TEMP_MAX};

    fn sample_frame() -> Result<ObservationFrame, Box<dyn std::error::Error>> {
        let raw = df!(
            COL_CITY => ["Avignon", "Paris", "Avignon", "Lille"],
            COL_DATE => ["2025-12-17", "2025-12-17", "2025-12-18", "2025-12-18"],
            COL_TEMP_MAX => [15.0, 8.0, 13.5, 6.0],
        )?;
        Ok(ObservationFrame::from_frame(raw.lazy())?)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filter_by_city_list() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let filtered = filter_data(&frame, [(COL_CITY, FilterValue::from(vec!["Paris", "Lille"]))])?;
        assert_eq!(filtered.cities()?, vec!["Lille", "Paris"]);
        Ok(())
    }

    #[test]
    fn test_filter_by_scalar_equality() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let filtered = filter_data(&frame, [(COL_CITY, FilterValue::from("Avignon"))])?;
        let rows = filtered.collect_observations()?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.city == "Avignon"));
        Ok(())
    }

    #[test]
    fn test_filters_are_combined() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let filtered = filter_data(
            &frame,
            vec![
                (COL_CITY, FilterValue::from("Avignon")),
                (COL_DATE, FilterValue::from(ymd(2025, 12, 18))),
            ],
        )?;
        let rows = filtered.collect_observations()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].temperature_max, Some(13.5));
        Ok(())
    }

    #[test]
    fn test_date_list_and_number_filters() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let by_dates = filter_data(&frame, [(COL_DATE, FilterValue::from(vec![ymd(2025, 12, 17)]))])?;
        assert_eq!(by_dates.collect_observations()?.len(), 2);

        let by_number = filter_data(&frame, [(COL_TEMP_MAX, FilterValue::from(8.0))])?;
        assert_eq!(by_number.cities()?, vec!["Paris"]);
        Ok(())
    }

    #[test]
    fn test_empty_values_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let filtered = filter_data(
            &frame,
            vec![
                (COL_CITY, FilterValue::TextList(vec![])),
                (COL_CITY, FilterValue::Text(String::new())),
            ],
        )?;
        assert_eq!(filtered.collect_observations()?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_unknown_columns_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let filtered = filter_data(&frame, [("region", FilterValue::from("Provence"))])?;
        assert_eq!(filtered.collect_observations()?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_original_frame_is_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let frame = sample_frame()?;
        let _ = filter_data(&frame, [(COL_CITY, FilterValue::from("Paris"))])?;
        assert_eq!(frame.collect_observations()?.len(), 4);
        Ok(())
    }
}
