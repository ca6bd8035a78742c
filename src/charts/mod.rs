//! Chart builders for the dashboard, on top of `plotlars`.
//!
//! Each function maps a collected table to a plot object. Render it with the
//! [`plotlars::Plot`] trait (`.plot()` opens a browser, `.write_html(path)` saves it).

use crate::types::observation::{
    COL_CITY, COL_DATE, COL_LATITUDE, COL_LONGITUDE, COL_TEMP_MAX, COL_TEMP_MIN,
};
use plotlars::{Axis, Histogram, Legend, Line, Rgb, ScatterMap, Shape, Text, TimeSeriesPlot};
use polars::prelude::*;

// Geographic centre of metropolitan France.
const MAP_CENTER: [f64; 2] = [46.603354, 1.888334];
const MAP_ZOOM: u8 = 5;

const WARM: Rgb = Rgb(215, 48, 39);
const MILD: Rgb = Rgb(254, 224, 144);
const COLD: Rgb = Rgb(69, 117, 180);

const COL_BAND: &str = "temperature_band";
const BAND_COLD: &str = "froid (< 10 °C)";
const BAND_MILD: &str = "doux (10 à 20 °C)";
const BAND_WARM: &str = "chaud (≥ 20 °C)";

/// Map of the stations of one day, one marker per city, coloured by temperature band.
///
/// `df` should hold a single date, e.g. from [`crate::ObservationFrame::get_at`].
/// Rows without a maximum temperature are left off the map.
pub fn create_meteo_map(df: &DataFrame, date_label: &str) -> PolarsResult<ScatterMap> {
    let max = col(COL_TEMP_MAX);
    let banded = df
        .clone()
        .lazy()
        .filter(max.clone().is_not_null())
        .with_column(
            when(max.clone().lt(lit(10.0)))
                .then(lit(BAND_COLD))
                .when(max.lt(lit(20.0)))
                .then(lit(BAND_MILD))
                .otherwise(lit(BAND_WARM))
                .alias(COL_BAND),
        )
        .collect()?;

    Ok(ScatterMap::builder()
        .data(&banded)
        .latitude(COL_LATITUDE)
        .longitude(COL_LONGITUDE)
        .center(MAP_CENTER)
        .zoom(MAP_ZOOM)
        .group(COL_BAND)
        .size(12)
        .opacity(0.8)
        // Groups are drawn in label order: chaud, doux, froid.
        .colors(vec![WARM, MILD, COLD])
        .shape(Shape::Circle)
        .plot_title(
            Text::from(format!("Températures Max le {date_label}").as_str())
                .font("Arial")
                .size(18),
        )
        .build())
}

/// Maximum and minimum temperature of one city over time.
///
/// Rows are sorted by date first so the lines are continuous.
pub fn create_line_chart(df: &DataFrame, city: &str) -> PolarsResult<TimeSeriesPlot> {
    let sorted = df
        .clone()
        .lazy()
        .sort_by_exprs([col(COL_DATE)], SortMultipleOptions::default())
        .collect()?;

    Ok(TimeSeriesPlot::builder()
        .data(&sorted)
        .x(COL_DATE)
        .y(COL_TEMP_MAX)
        .additional_series(vec![COL_TEMP_MIN])
        .size(8)
        .colors(vec![WARM, COLD])
        .lines(vec![Line::Solid, Line::Solid])
        .with_shape(true)
        .shapes(vec![Shape::Circle, Shape::Square])
        .plot_title(Text::from(format!("Prévisions pour {city}").as_str()).font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("Date")
        .y_title("Température (°C)")
        .y_axis(&Axis::new().show_grid(true))
        .build())
}

/// Maximum temperature of several cities over time, one line per city.
///
/// The table is reshaped to one `temperature_max` column per city, joined on the
/// sorted dates, so a city without a value for some day leaves a gap.
pub fn create_comparison_chart(df: &DataFrame, cities: &[&str]) -> PolarsResult<TimeSeriesPlot> {
    let Some((first, others)) = cities.split_first() else {
        return Err(PolarsError::NoData("no city selected for comparison".into()));
    };

    let dates = df
        .clone()
        .lazy()
        .select([col(COL_DATE).unique()])
        .sort_by_exprs([col(COL_DATE)], SortMultipleOptions::default());
    let wide = cities
        .iter()
        .fold(dates, |wide, city| {
            let series = df
                .clone()
                .lazy()
                .filter(col(COL_CITY).eq(lit(*city)))
                .select([col(COL_DATE), col(COL_TEMP_MAX).alias(*city)]);
            wide.left_join(series, col(COL_DATE), col(COL_DATE))
        })
        .collect()?;

    Ok(TimeSeriesPlot::builder()
        .data(&wide)
        .x(COL_DATE)
        .y(*first)
        .additional_series(others.to_vec())
        .size(8)
        .with_shape(true)
        .plot_title(
            Text::from("Comparaison des Températures Max")
                .font("Arial")
                .size(18),
        )
        .x_title("Date")
        .y_title("Température max (°C)")
        .y_axis(&Axis::new().show_grid(true))
        .build())
}

/// Distribution of column `x`.
pub fn create_histogram(df: &DataFrame, x: &str, title: &str) -> Histogram {
    Histogram::builder()
        .data(df)
        .x(x)
        .opacity(0.8)
        .color(COLD)
        .plot_title(Text::from(title).font("Arial").size(18))
        .x_title(x)
        .y_title("count")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ObservationFrame;
    use plotlars::Plot;

    fn table() -> DataFrame {
        let raw = df!(
            COL_CITY => ["Avignon", "Avignon", "Paris"],
            COL_LATITUDE => [43.95, 43.95, 48.85],
            COL_LONGITUDE => [4.81, 4.81, 2.35],
            COL_DATE => ["2025-12-18", "2025-12-17", "2025-12-17"],
            COL_TEMP_MAX => [13.5, 15.0, 8.0],
            COL_TEMP_MIN => [3.0, 4.0, 1.0],
        )
        .unwrap();
        ObservationFrame::from_frame(raw.lazy())
            .unwrap()
            .frame
            .collect()
            .unwrap()
    }

    #[test]
    fn test_map_title_names_the_date() -> Result<(), PolarsError> {
        let json = create_meteo_map(&table(), "17/12/2025")?.to_json().unwrap();
        assert!(json.contains("Températures Max le 17/12/2025"));
        Ok(())
    }

    #[test]
    fn test_map_groups_cities_by_temperature_band() -> Result<(), PolarsError> {
        let json = create_meteo_map(&table(), "17/12/2025")?.to_json().unwrap();
        assert!(json.contains(BAND_COLD));
        assert!(json.contains(BAND_MILD));
        assert!(!json.contains(BAND_WARM));
        Ok(())
    }

    #[test]
    fn test_line_chart() -> Result<(), PolarsError> {
        let avignon = table()
            .lazy()
            .filter(col(COL_CITY).eq(lit("Avignon")))
            .collect()?;
        let json = create_line_chart(&avignon, "Avignon")?.to_json().unwrap();
        assert!(json.contains("Prévisions pour Avignon"));
        assert!(json.contains(COL_TEMP_MIN));
        Ok(())
    }

    #[test]
    fn test_comparison_chart_has_one_line_per_city() -> Result<(), PolarsError> {
        let plot = create_comparison_chart(&table(), &["Avignon", "Paris"])?;
        let json = plot.to_json().unwrap();
        assert!(json.contains("Comparaison des Températures Max"));
        assert!(json.contains("Avignon"));
        assert!(json.contains("Paris"));
        Ok(())
    }

    #[test]
    fn test_comparison_chart_needs_a_city() {
        assert!(create_comparison_chart(&table(), &[]).is_err());
    }

    #[test]
    fn test_histogram() {
        let json = create_histogram(&table(), COL_TEMP_MAX, "Distribution")
            .to_json()
            .unwrap();
        assert!(json.contains("Distribution"));
    }
}
