//! Builds the system prompt handed to the model: a plain-text dump of the
//! observation table plus today's date.

use crate::utils::date_from_epoch_days;
use chrono::NaiveDate;
use polars::prelude::*;

/// Rows of the table embedded in the prompt at most.
pub const DEFAULT_CONTEXT_ROW_LIMIT: usize = 1000;

const COLUMN_SEPARATOR: &str = "  ";

/// Builds the conversation context for `table` as seen on `today`.
///
/// Only the first `row_limit` rows are rendered; the prompt says whether the data
/// it embeds is complete or partial.
pub fn build_context(table: &DataFrame, today: NaiveDate, row_limit: usize) -> PolarsResult<String> {
    let (data, notice) = if table.height() > row_limit {
        (
            render_table(&table.head(Some(row_limit)))?,
            format!("(Données partielles : {row_limit} premières lignes)"),
        )
    } else {
        (render_table(table)?, "(Données complètes)".to_string())
    };
    let today = today.format("%d/%m/%Y");

    Ok(format!(
        "Tu es un expert météorologue.

CONTEXTE TEMPOREL :
Nous sommes le {today} (date du jour).

DONNÉES DISPONIBLES {notice} :
{data}

TES MISSIONS :
1. Réponds aux questions en utilisant UNIQUEMENT ce tableau.
2. Si on te demande \"demain\", calcule la date par rapport à aujourd'hui ({today}).
3. IMPORTANT : si les dates du tableau sont dans le futur par rapport à aujourd'hui, considère-les comme des prévisions fiables à long terme. Ne refuse pas de répondre.
4. Si les dates sont dans le passé, considère-les comme de l'historique.
"
    ))
}

/// Renders a frame as right-aligned text columns, header first, without row index.
pub fn render_table(df: &DataFrame) -> PolarsResult<String> {
    let columns = df.get_columns();
    let mut cells: Vec<Vec<String>> = Vec::with_capacity(columns.len());
    for column in columns {
        let mut rendered = Vec::with_capacity(df.height() + 1);
        rendered.push(column.name().to_string());
        for idx in 0..df.height() {
            rendered.push(format_cell(&column.get(idx)?));
        }
        cells.push(rendered);
    }

    let widths: Vec<usize> = cells
        .iter()
        .map(|column| column.iter().map(|c| c.chars().count()).max().unwrap_or(0))
        .collect();

    let lines: Vec<String> = (0..=df.height())
        .map(|row| {
            cells
                .iter()
                .zip(&widths)
                .map(|(column, width)| format!("{:>width$}", column[row], width = *width))
                .collect::<Vec<_>>()
                .join(COLUMN_SEPARATOR)
        })
        .collect();
    Ok(lines.join("\n"))
}

fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "null".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Date(days) => date_from_epoch_days(*days)
            .map(|date| date.to_string())
            .unwrap_or_else(|| days.to_string()),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        other => other.to_string(),
    }
}

// Whole numbers keep one decimal so temperatures read as 15.0, not 15.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::{COL_CITY, COL_DATE, COL_TEMP_MAX};
    use crate::ObservationFrame;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 16).unwrap()
    }

    fn two_cities() -> Result<DataFrame, Box<dyn std::error::Error>> {
        let raw = df!(
            COL_CITY => ["Avignon", "Paris"],
            COL_DATE => ["2025-12-17", "2025-12-17"],
            COL_TEMP_MAX => [15.0, 8.0],
        )?;
        Ok(ObservationFrame::from_frame(raw.lazy())?.frame.collect()?)
    }

    #[test]
    fn test_render_table_aligns_columns() -> Result<(), Box<dyn std::error::Error>> {
        let rendered = render_table(&two_cities()?)?;
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "original_city_name        date  temperature_max"
        );
        assert_eq!(
            lines[1],
            "           Avignon  2025-12-17             15.0"
        );
        assert_eq!(
            lines[2],
            "             Paris  2025-12-17              8.0"
        );
        Ok(())
    }

    #[test]
    fn test_context_embeds_every_row_and_today() -> Result<(), Box<dyn std::error::Error>> {
        let context = build_context(&two_cities()?, today(), DEFAULT_CONTEXT_ROW_LIMIT)?;
        assert!(context.contains("Avignon  2025-12-17             15.0"));
        assert!(context.contains("Paris  2025-12-17              8.0"));
        assert!(context.contains("Nous sommes le 16/12/2025"));
        assert!(context.contains("(Données complètes)"));
        Ok(())
    }

    #[test]
    fn test_context_is_truncated_to_row_limit() -> Result<(), Box<dyn std::error::Error>> {
        let cities: Vec<String> = (0..30).map(|i| format!("Ville{i:02}")).collect();
        let df = df!(COL_CITY => cities)?;

        let context = build_context(&df, today(), 10)?;
        assert!(context.contains("(Données partielles : 10 premières lignes)"));
        assert!(context.contains("Ville09"));
        assert!(!context.contains("Ville10"));
        Ok(())
    }

    #[test]
    fn test_nulls_and_fractions() {
        assert_eq!(format_cell(&AnyValue::Null), "null");
        assert_eq!(format_cell(&AnyValue::Float64(12.35)), "12.35");
        assert_eq!(format_cell(&AnyValue::Float64(-2.0)), "-2.0");
        assert_eq!(format_cell(&AnyValue::Int64(7)), "7");
    }
}
