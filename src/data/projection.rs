//! Renderer-facing views of the filtered set: map markers and table cells.
//!
//! Kept free of egui types so the UI and the headless report share them.

use super::category::AqiCategory;
use super::model::AirQualityRecord;

// ---------------------------------------------------------------------------
// Map markers
// ---------------------------------------------------------------------------

pub const MIN_MARKER_RADIUS: f32 = 3.0;
pub const MAX_MARKER_RADIUS: f32 = 14.0;

/// One plottable station reading.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    /// Index into the dataset's records.
    pub index: usize,
    pub longitude: f64,
    pub latitude: f64,
    pub category: AqiCategory,
    pub radius: f32,
}

/// Markers for the filtered rows that have usable coordinates.
///
/// Marker size scales linearly with PM2.5 relative to the largest reading in
/// the view; missing readings get the smallest marker.
pub fn map_points(records: &[AirQualityRecord], indices: &[usize]) -> Vec<MapPoint> {
    let max_pm25 = indices
        .iter()
        .map(|&i| records[i].pm25)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    indices
        .iter()
        .filter(|&&i| records[i].has_coordinates())
        .map(|&i| {
            let rec = &records[i];
            let share = if max_pm25 > 0.0 && rec.pm25.is_finite() && rec.pm25 > 0.0 {
                (rec.pm25 / max_pm25) as f32
            } else {
                0.0
            };
            MapPoint {
                index: i,
                longitude: rec.longitude,
                latitude: rec.latitude,
                category: rec.category,
                radius: MIN_MARKER_RADIUS + share * (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS),
            }
        })
        .collect()
}

/// Tooltip body for a marker.
pub fn hover_text(rec: &AirQualityRecord) -> String {
    format!(
        "{}\nPM2.5: {} µg/m³\nAQI: {} ({})\nTemp: {} °C",
        rec.station,
        one_decimal(rec.pm25),
        rec.aqi_overall,
        rec.category,
        one_decimal(rec.temp),
    )
}

// ---------------------------------------------------------------------------
// Table projection
// ---------------------------------------------------------------------------

/// How a column's cells should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Text,
    Integer,
    OneDecimal,
    Date,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    RecordType,
    Station,
    RecordDate,
    TimeUtc,
    AqiOverall,
    Category,
    Pm25,
    Pm10,
    O3,
    Temp,
    Humidity,
}

/// Fixed column order of the data table.
pub const TABLE_COLUMNS: [TableColumn; 11] = [
    TableColumn::RecordType,
    TableColumn::Station,
    TableColumn::RecordDate,
    TableColumn::TimeUtc,
    TableColumn::AqiOverall,
    TableColumn::Category,
    TableColumn::Pm25,
    TableColumn::Pm10,
    TableColumn::O3,
    TableColumn::Temp,
    TableColumn::Humidity,
];

/// Placeholder for a timestamp that did not parse.
pub const UNKNOWN_TIME: &str = "unknown time";

impl TableColumn {
    pub fn header(self) -> &'static str {
        match self {
            TableColumn::RecordType => "record_type",
            TableColumn::Station => "station",
            TableColumn::RecordDate => "record_date",
            TableColumn::TimeUtc => "time_utc",
            TableColumn::AqiOverall => "aqi_overall",
            TableColumn::Category => "category",
            TableColumn::Pm25 => "pm25",
            TableColumn::Pm10 => "pm10",
            TableColumn::O3 => "o3",
            TableColumn::Temp => "temp",
            TableColumn::Humidity => "humidity",
        }
    }

    pub fn format(self) -> ColumnFormat {
        match self {
            TableColumn::RecordType | TableColumn::Station | TableColumn::Category => {
                ColumnFormat::Text
            }
            TableColumn::RecordDate => ColumnFormat::Date,
            TableColumn::TimeUtc => ColumnFormat::Timestamp,
            TableColumn::AqiOverall => ColumnFormat::Integer,
            TableColumn::Pm25
            | TableColumn::Pm10
            | TableColumn::O3
            | TableColumn::Temp
            | TableColumn::Humidity => ColumnFormat::OneDecimal,
        }
    }

    /// Whether cells should be right-aligned.
    pub fn is_numeric(self) -> bool {
        matches!(self.format(), ColumnFormat::Integer | ColumnFormat::OneDecimal)
    }

    pub fn cell(self, rec: &AirQualityRecord) -> String {
        match self {
            TableColumn::RecordType => rec.record_type.clone(),
            TableColumn::Station => rec.station.clone(),
            TableColumn::RecordDate => rec
                .record_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            TableColumn::TimeUtc => rec
                .time_utc
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| UNKNOWN_TIME.to_string()),
            TableColumn::AqiOverall => rec.aqi_overall.to_string(),
            TableColumn::Category => rec.category.label().to_string(),
            TableColumn::Pm25 => one_decimal(rec.pm25),
            TableColumn::Pm10 => one_decimal(rec.pm10),
            TableColumn::O3 => one_decimal(rec.o3),
            TableColumn::Temp => one_decimal(rec.temp),
            TableColumn::Humidity => one_decimal(rec.humidity),
        }
    }
}

fn one_decimal(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1}")
    } else {
        String::new()
    }
}
