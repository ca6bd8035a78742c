//! demos/plot_city.rs
//!
//! Draws the temperature map of the first available date and the forecast chart
//! of one city, then opens them in the browser. With several cities, their
//! maximum temperatures are also compared on one chart.
//!
//! To run this demo:
//! cargo run --example plot_city --features charts -- Avignon Paris

use std::error::Error;

use meteo_explorer::charts::{
    create_comparison_chart, create_histogram, create_line_chart, create_meteo_map,
};
use meteo_explorer::{filter_data, FilterValue, ObservationLoader, COL_CITY, COL_TEMP_MAX};
use plotlars::Plot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut cities: Vec<String> = std::env::args().skip(1).collect();
    if cities.is_empty() {
        cities.push("Avignon".to_string());
    }
    let city = cities[0].clone();

    let observations = ObservationLoader::default().load_latest().await?;

    if let Some(date) = observations.dates()?.first().copied() {
        let day = observations.get_at(date).frame.collect()?;
        create_meteo_map(&day, &date.format("%d/%m/%Y").to_string())?.plot();
    }

    let selection = filter_data(&observations, [(COL_CITY, FilterValue::from(city.as_str()))])?;
    let rows = selection.frame.collect()?;
    create_line_chart(&rows, &city)?.plot();
    if cities.len() > 1 {
        let names: Vec<&str> = cities.iter().map(String::as_str).collect();
        let selection = filter_data(&observations, [(COL_CITY, FilterValue::from(names.clone()))])?;
        create_comparison_chart(&selection.frame.collect()?, &names)?.plot();
    }
    create_histogram(&observations.frame.collect()?, COL_TEMP_MAX, "Températures max").plot();

    Ok(())
}
