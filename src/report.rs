use std::fmt::Write;

use crate::data::category::category_of;
use crate::data::filter::{FilterOutcome, FilterSpec};
use crate::data::model::AirQualityDataset;
use crate::data::projection::{TableColumn, TABLE_COLUMNS};
use crate::data::stats::summarize;

/// Plain-text rendering of one pipeline pass: filters, summary, table.
pub fn build_report(dataset: &AirQualityDataset, spec: &FilterSpec, outcome: &FilterOutcome) -> String {
    let summary = summarize(&dataset.records, &outcome.indices);
    let mut output = String::new();

    let _ = writeln!(output, "# Air Quality Report");
    let _ = writeln!(
        output,
        "Station: {}  Type: {}  Dates: {} to {}  PM2.5: {:.1} to {:.1}",
        spec.station.as_deref().unwrap_or("All Stations"),
        spec.record_type.as_deref().unwrap_or("All types"),
        spec.date_from.map_or("start".to_string(), |d| d.to_string()),
        spec.date_to.map_or("end".to_string(), |d| d.to_string()),
        spec.pm25_min,
        spec.pm25_max,
    );
    for warning in &outcome.warnings {
        let _ = writeln!(output, "Warning: {warning}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "Showing {} of {} records.", summary.count, dataset.len());
    match (summary.max_aqi, summary.max_aqi_station()) {
        (Some(max), Some(station)) => {
            let (label, color) = category_of(max as i64);
            let _ = writeln!(output, "Highest AQI: {max} at {station} ({label}, {color})");
        }
        _ => {
            let _ = writeln!(output, "Highest AQI: none");
        }
    }
    match summary.mean_pm25 {
        Some(mean) => {
            let _ = writeln!(output, "Mean PM2.5: {mean:.1}");
        }
        None => {
            let _ = writeln!(output, "Mean PM2.5: none");
        }
    }
    if let Some((lo, hi)) = summary.pm25_range {
        let _ = writeln!(output, "PM2.5 in view: {lo:.1} to {hi:.1}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Records");
    if outcome.is_empty() {
        let _ = writeln!(output, "No matching records.");
        return output;
    }

    let rows: Vec<Vec<String>> = outcome
        .indices
        .iter()
        .map(|&i| TABLE_COLUMNS.iter().map(|c| c.cell(&dataset.records[i])).collect())
        .collect();
    let widths: Vec<usize> = TABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(j, c)| {
            rows.iter()
                .map(|r| r[j].chars().count())
                .chain(std::iter::once(c.header().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let headers: Vec<String> = TABLE_COLUMNS.iter().map(|c| c.header().to_string()).collect();
    write_row(&mut output, &headers, &widths);
    for row in &rows {
        write_row(&mut output, row, &widths);
    }
    output
}

fn write_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(cells.iter().zip(widths))
        .map(|(col, (cell, &w))| pad(*col, cell, w))
        .collect();
    let _ = writeln!(output, "{}", line.join("  ").trim_end());
}

fn pad(col: TableColumn, cell: &str, width: usize) -> String {
    if col.is_numeric() {
        format!("{cell:>width$}")
    } else {
        format!("{cell:<width$}")
    }
}
