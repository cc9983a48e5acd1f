use chrono::{NaiveDate, NaiveDateTime};

use super::category::AqiCategory;

// ---------------------------------------------------------------------------
// AirQualityRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One cleaned measurement row.
///
/// Unparseable dates and timestamps are kept as `None`; unreadable float cells
/// are `NaN`. `category` is always `AqiCategory::from_aqi(aqi_overall)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRecord {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub record_type: String,
    pub record_date: Option<NaiveDate>,
    pub time_utc: Option<NaiveDateTime>,
    pub aqi_overall: u32,
    pub pm25: f64,
    pub pm10: f64,
    pub o3: f64,
    pub temp: f64,
    pub humidity: f64,
    pub category: AqiCategory,
}

impl AirQualityRecord {
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

// ---------------------------------------------------------------------------
// LoadReport – per-field parse diagnostics
// ---------------------------------------------------------------------------

/// Counts of non-fatal normalizations applied while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    pub aqi_sentinels: usize,
    pub aqi_unparsed: usize,
    pub invalid_dates: usize,
    pub invalid_timestamps: usize,
    pub missing_coordinates: usize,
}

// ---------------------------------------------------------------------------
// AirQualityDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full cleaned dataset with pre-computed selector indices.
///
/// Immutable once built; filters work on record indices into `records`.
#[derive(Debug, Clone)]
pub struct AirQualityDataset {
    pub records: Vec<AirQualityRecord>,
    /// Distinct stations in first-seen order.
    pub stations: Vec<String>,
    /// Distinct non-empty record types, sorted.
    pub record_types: Vec<String>,
    /// Observed PM2.5 range over finite values, `None` when there are none.
    pub pm25_range: Option<(f64, f64)>,
    /// Observed record-date range, `None` when no date parsed.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub report: LoadReport,
}

impl AirQualityDataset {
    /// Build selector indices from cleaned records.
    pub fn from_records(records: Vec<AirQualityRecord>, report: LoadReport) -> Self {
        let mut stations: Vec<String> = Vec::new();
        let mut record_types: Vec<String> = Vec::new();
        let mut pm25_range: Option<(f64, f64)> = None;
        let mut date_range: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            if !stations.contains(&rec.station) {
                stations.push(rec.station.clone());
            }
            if !rec.record_type.is_empty() && !record_types.contains(&rec.record_type) {
                record_types.push(rec.record_type.clone());
            }
            if rec.pm25.is_finite() {
                pm25_range = Some(match pm25_range {
                    Some((lo, hi)) => (lo.min(rec.pm25), hi.max(rec.pm25)),
                    None => (rec.pm25, rec.pm25),
                });
            }
            if let Some(d) = rec.record_date {
                date_range = Some(match date_range {
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                    None => (d, d),
                });
            }
        }
        record_types.sort();

        AirQualityDataset {
            records,
            stations,
            record_types,
            pm25_range,
            date_range,
            report,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
