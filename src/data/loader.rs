use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::category::AqiCategory;
use super::error::{DataError, Result};
use super::model::{AirQualityDataset, AirQualityRecord, LoadReport};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean an air-quality dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one measurement per line (primary format)
/// * `.json`    – `[{ "station": "...", "pm25": 12.3, ... }, ...]`
/// * `.parquet` – flat columns named like the CSV headers
///
/// A missing or unreadable location is a [`DataError::DataSource`]; bad cells
/// never fail the load.
pub fn load_file(path: &Path) -> Result<AirQualityDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    let dataset = clean_rows(rows);
    let r = &dataset.report;
    log::info!(
        "Loaded {} records from {} ({} AQI sentinels, {} unparsed AQI, {} bad dates, {} bad timestamps, {} without coordinates)",
        r.rows,
        path.display(),
        r.aqi_sentinels,
        r.aqi_unparsed,
        r.invalid_dates,
        r.invalid_timestamps,
        r.missing_coordinates,
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    let meta = std::fs::metadata(path).map_err(|e| DataError::data_source(path, e))?;
    if !meta.is_file() {
        return Err(DataError::data_source(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    File::open(path).map_err(|e| DataError::data_source(path, e))
}

// ---------------------------------------------------------------------------
// Column layout shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Station,
    Latitude,
    Longitude,
    RecordType,
    RecordDate,
    TimeUtc,
    AqiOverall,
    Pm25,
    Pm10,
    O3,
    Temp,
    Humidity,
}

const COLUMN_COUNT: usize = 12;

impl Column {
    const ALL: [Column; COLUMN_COUNT] = [
        Column::Station,
        Column::Latitude,
        Column::Longitude,
        Column::RecordType,
        Column::RecordDate,
        Column::TimeUtc,
        Column::AqiOverall,
        Column::Pm25,
        Column::Pm10,
        Column::O3,
        Column::Temp,
        Column::Humidity,
    ];

    /// Accepted header names, in priority order.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Station => &["station", "city_name"],
            Column::Latitude => &["latitude"],
            Column::Longitude => &["longitude"],
            Column::RecordType => &["record_type"],
            Column::RecordDate => &["record_date"],
            Column::TimeUtc => &["time_utc"],
            Column::AqiOverall => &["aqi_overall"],
            Column::Pm25 => &["pm25"],
            Column::Pm10 => &["pm10"],
            Column::O3 => &["o3"],
            Column::Temp => &["temp"],
            Column::Humidity => &["humidity"],
        }
    }

    fn required(self) -> bool {
        matches!(
            self,
            Column::Station
                | Column::Latitude
                | Column::Longitude
                | Column::AqiOverall
                | Column::Pm25
        )
    }
}

/// Raw text of one source row, indexed by `Column as usize`.
type RawRow = [String; COLUMN_COUNT];

/// Position of each logical column in the source header.
struct ColumnIndex([Option<usize>; COLUMN_COUNT]);

impl ColumnIndex {
    fn resolve(headers: &[&str]) -> Result<Self> {
        let mut positions = [None; COLUMN_COUNT];
        for col in Column::ALL {
            positions[col as usize] = col
                .aliases()
                .iter()
                .find_map(|alias| headers.iter().position(|h| h.trim() == *alias));
            if col.required() && positions[col as usize].is_none() {
                return Err(DataError::MissingColumn(col.aliases()[0]));
            }
        }
        Ok(ColumnIndex(positions))
    }

    /// Source positions that map to a known column.
    fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flatten().copied()
    }

    fn row(&self, mut cell: impl FnMut(usize) -> String) -> RawRow {
        self.0.map(|pos| pos.map(&mut cell).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    // Short or long rows are padded / truncated by `ColumnIndex::row`.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers = reader.headers()?.clone();
    let index = ColumnIndex::resolve(&headers.iter().collect::<Vec<_>>())?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(index.row(|i| record.get(i).unwrap_or("").trim().to_string()));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::io::read_to_string(open(path)?)
        .map_err(|e| DataError::data_source(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::JsonLayout("expected top-level JSON array".into()))?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::JsonLayout(format!("row {i} is not a JSON object")))?;

        let mut row = RawRow::default();
        for col in Column::ALL {
            let value = col.aliases().iter().find_map(|alias| obj.get(*alias));
            match value {
                Some(v) => row[col as usize] = json_to_text(v),
                None if col.required() => {
                    return Err(DataError::MissingColumn(col.aliases()[0]))
                }
                None => {}
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Every known column is cast to UTF-8 and then cleaned like CSV text, so
/// numeric, string and temporal Parquet types are all accepted. Columns that
/// map to nothing are never touched.
fn read_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let schema = builder.schema().clone();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let index = ColumnIndex::resolve(&names)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let mut text_columns: Vec<Option<ArrayRef>> = vec![None; batch.num_columns()];
        for pos in index.positions() {
            text_columns[pos] = Some(cast(batch.column(pos), &DataType::Utf8)?);
        }

        for row in 0..batch.num_rows() {
            rows.push(index.row(|i| match &text_columns[i] {
                Some(col) => {
                    let arr = col.as_string::<i32>();
                    if arr.is_null(row) {
                        String::new()
                    } else {
                        arr.value(row).trim().to_string()
                    }
                }
                None => String::new(),
            }));
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

const AQI_SENTINELS: [&str; 3] = ["n/a", "na", "not applicable"];

#[derive(Debug, PartialEq)]
enum AqiCell {
    Value(u32),
    /// "not applicable" marker or empty cell.
    Sentinel,
    Unparsed,
}

fn parse_aqi(s: &str) -> AqiCell {
    let s = s.trim();
    if s.is_empty() || AQI_SENTINELS.iter().any(|m| s.eq_ignore_ascii_case(m)) {
        return AqiCell::Sentinel;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => AqiCell::Sentinel,
        // `as` truncates toward zero and saturates, so negatives clamp to 0.
        Ok(v) => AqiCell::Value(v.trunc() as u32),
        Err(_) => AqiCell::Unparsed,
    }
}

fn parse_float(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            // Date prefix of a full timestamp: "2025-12-07 14:22:43".
            s.get(..10)
                .filter(|_| s.len() > 10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"];

/// Parse a timestamp as UTC. Offsets are converted, a trailing `Z` is dropped.
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.naive_utc());
    }
    let naive = s.strip_suffix('Z').unwrap_or(s);
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
}

/// Normalize raw rows into records and collect parse diagnostics.
fn clean_rows(rows: Vec<RawRow>) -> AirQualityDataset {
    let mut report = LoadReport {
        rows: rows.len(),
        ..LoadReport::default()
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(row_no, raw)| {
            let text = |c: Column| raw[c as usize].as_str();

            let aqi_overall = match parse_aqi(text(Column::AqiOverall)) {
                AqiCell::Value(v) => v,
                AqiCell::Sentinel => {
                    report.aqi_sentinels += 1;
                    0
                }
                AqiCell::Unparsed => {
                    log::debug!(
                        "Row {row_no}: AQI '{}' is not a number, using 0",
                        text(Column::AqiOverall)
                    );
                    report.aqi_unparsed += 1;
                    0
                }
            };

            let record_date = parse_date(text(Column::RecordDate));
            if record_date.is_none() {
                report.invalid_dates += 1;
            }
            let time_utc = parse_timestamp(text(Column::TimeUtc));
            if time_utc.is_none() {
                report.invalid_timestamps += 1;
            }

            let record = AirQualityRecord {
                station: text(Column::Station).to_string(),
                latitude: parse_float(text(Column::Latitude)),
                longitude: parse_float(text(Column::Longitude)),
                record_type: text(Column::RecordType).to_string(),
                record_date,
                time_utc,
                aqi_overall,
                pm25: parse_float(text(Column::Pm25)),
                pm10: parse_float(text(Column::Pm10)),
                o3: parse_float(text(Column::O3)),
                temp: parse_float(text(Column::Temp)),
                humidity: parse_float(text(Column::Humidity)),
                category: AqiCategory::from_aqi(aqi_overall as i64),
            };
            if !record.has_coordinates() {
                report.missing_coordinates += 1;
            }
            record
        })
        .collect();

    if report.aqi_unparsed > 0 {
        log::warn!(
            "{} AQI cells were neither numeric nor a known sentinel and were set to 0",
            report.aqi_unparsed
        );
    }

    AirQualityDataset::from_records(records, report)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    const HEADER: &str =
        "city_name,latitude,longitude,record_type,record_date,time_utc,aqi_overall,pm25,pm10,o3,temp,humidity";

    fn write_temp(suffix: &str, body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_rows_are_cleaned() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 Bangkok,13.75,100.50,Current,2025-12-07,2025-12-07 14:00:00,57.8,18.2,30.1,12.0,31.5,64\n\
                 Chiang Mai,18.79,98.98,Current,2025-12-07,2025-12-07T14:00:00Z,N/A,4.0,9.0,20.0,27.0,70\n"
            ),
        );
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        let bkk = &ds.records[0];
        assert_eq!(bkk.station, "Bangkok");
        assert_eq!(bkk.aqi_overall, 57);
        assert_eq!(bkk.category, AqiCategory::Moderate);
        assert_eq!(bkk.record_date, NaiveDate::from_ymd_opt(2025, 12, 7));
        assert_eq!(
            bkk.time_utc,
            NaiveDate::from_ymd_opt(2025, 12, 7).and_then(|d| d.and_hms_opt(14, 0, 0))
        );

        let cnx = &ds.records[1];
        assert_eq!(cnx.aqi_overall, 0);
        assert_eq!(cnx.category, AqiCategory::Good);
        assert_eq!(cnx.category.hex(), "#009966");
        assert!(cnx.time_utc.is_some());
        assert_eq!(ds.report.aqi_sentinels, 1);
    }

    #[test]
    fn bad_dates_are_kept_as_null() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 Phuket,7.88,98.39,Forecast,not-a-date,soon,40,8.0,,,,\n"
            ),
        );
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.record_date, None);
        assert_eq!(rec.time_utc, None);
        assert!(rec.pm10.is_nan());
        assert_eq!(ds.report.invalid_dates, 1);
        assert_eq!(ds.report.invalid_timestamps, 1);
        assert_eq!(ds.date_range, None);
    }

    #[test]
    fn short_rows_are_padded_with_missing_cells() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 Bangkok,13.75,100.50,Current,2025-12-07,2025-12-07 14:00:00,57,18.2,30.1,12.0,31.5,64\n\
                 Lampang,18.29,99.49,Current,2025-12-07,2025-12-07 14:00:00,88,31.0\n"
            ),
        );
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        let short = &ds.records[1];
        assert_eq!(short.station, "Lampang");
        assert_eq!(short.aqi_overall, 88);
        assert_eq!(short.pm25, 31.0);
        assert!(short.pm10.is_nan());
        assert!(short.humidity.is_nan());
    }

    #[test]
    fn station_column_alias_and_optional_columns() {
        let file = write_temp(
            ".csv",
            "station,latitude,longitude,aqi_overall,pm25\nRayong,12.68,101.28,151,55.5\n",
        );
        let ds = load_file(file.path()).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.station, "Rayong");
        assert_eq!(rec.record_type, "");
        assert_eq!(rec.category, AqiCategory::Unhealthy);
        assert!(rec.temp.is_nan());
    }

    #[test]
    fn missing_required_column_is_reported() {
        let file = write_temp(".csv", "station,latitude,longitude,pm25\nA,1,2,3\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("aqi_overall")));
    }

    #[test]
    fn missing_file_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.is_data_source());

        let err = load_file(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
    }

    #[test]
    fn directory_with_csv_name_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("looks_like.csv");
        std::fs::create_dir(&sub).unwrap();
        assert!(load_file(&sub).unwrap_err().is_data_source());
    }

    #[test]
    fn json_records_are_accepted() {
        let file = write_temp(
            ".json",
            r#"[
                {"city_name": "Bangkok", "latitude": 13.75, "longitude": 100.5,
                 "record_type": "Current", "record_date": "2025-12-07",
                 "aqi_overall": "N/A", "pm25": 12.5, "temp": null},
                {"city_name": "Hat Yai", "latitude": 7.0, "longitude": 100.47,
                 "aqi_overall": 320, "pm25": 90}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].aqi_overall, 0);
        assert!(ds.records[0].temp.is_nan());
        assert_eq!(ds.records[1].category, AqiCategory::Hazardous);
        assert_eq!(ds.records[1].pm25, 90.0);
    }

    #[test]
    fn parquet_columns_are_cast_and_cleaned() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int32Array, ListArray, StringArray};
        use arrow::datatypes::{Field, Int32Type, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("city_name", DataType::Utf8, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("longitude", DataType::Float64, false),
            Field::new("record_date", DataType::Utf8, true),
            Field::new("aqi_overall", DataType::Utf8, true),
            Field::new("pm25", DataType::Float64, true),
            Field::new("humidity", DataType::Int32, true),
            // Not a known column, and not castable to text.
            Field::new(
                "readings",
                DataType::List(Arc::new(Field::new("item", DataType::Int32, true))),
                true,
            ),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Chiang Rai", "Hat Yai"])),
                Arc::new(Float64Array::from(vec![19.91, 7.0])),
                Arc::new(Float64Array::from(vec![99.84, 100.47])),
                Arc::new(StringArray::from(vec![Some("2025-12-07"), None])),
                Arc::new(StringArray::from(vec![Some("163"), None])),
                Arc::new(Float64Array::from(vec![Some(75.5), None])),
                Arc::new(Int32Array::from(vec![Some(58), None])),
                Arc::new(ListArray::from_iter_primitive::<Int32Type, _, _>(vec![
                    Some(vec![Some(1), Some(2)]),
                    None,
                ])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let sink = file.as_file().try_clone().unwrap();
        let mut writer = ArrowWriter::try_new(sink, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);

        let cri = &ds.records[0];
        assert_eq!(cri.station, "Chiang Rai");
        assert_eq!(cri.latitude, 19.91);
        assert_eq!(cri.aqi_overall, 163);
        assert_eq!(cri.category, AqiCategory::Unhealthy);
        assert_eq!(cri.pm25, 75.5);
        assert_eq!(cri.humidity, 58.0);
        assert_eq!(cri.record_date, NaiveDate::from_ymd_opt(2025, 12, 7));

        let hdy = &ds.records[1];
        assert_eq!(hdy.aqi_overall, 0);
        assert_eq!(hdy.category, AqiCategory::Good);
        assert!(hdy.pm25.is_nan());
        assert!(hdy.humidity.is_nan());
        assert_eq!(hdy.record_date, None);
        assert_eq!(ds.report.aqi_sentinels, 1);
        assert_eq!(ds.report.invalid_dates, 1);
    }

    #[test]
    fn aqi_cells() {
        assert_eq!(parse_aqi("42"), AqiCell::Value(42));
        assert_eq!(parse_aqi(" 99.99 "), AqiCell::Value(99));
        assert_eq!(parse_aqi("-5"), AqiCell::Value(0));
        assert_eq!(parse_aqi("N/A"), AqiCell::Sentinel);
        assert_eq!(parse_aqi("Not Applicable"), AqiCell::Sentinel);
        assert_eq!(parse_aqi(""), AqiCell::Sentinel);
        assert_eq!(parse_aqi("high"), AqiCell::Unparsed);
    }

    #[test]
    fn date_and_timestamp_formats() {
        let d = NaiveDate::from_ymd_opt(2025, 12, 7);
        assert_eq!(parse_date("2025-12-07"), d);
        assert_eq!(parse_date("2025/12/07"), d);
        assert_eq!(parse_date("07/12/2025"), d);
        assert_eq!(parse_date("2025-12-07 08:00:00"), d);
        assert_eq!(parse_date("2025-13-07"), None);
        assert_eq!(parse_date(""), None);

        let noon = d.and_then(|d| d.and_hms_opt(12, 0, 0));
        assert_eq!(parse_timestamp("2025-12-07 12:00:00"), noon);
        assert_eq!(parse_timestamp("2025-12-07T12:00"), noon);
        assert_eq!(parse_timestamp("2025-12-07T19:00:00+07:00"), noon);
        assert_eq!(parse_timestamp("2025-12-07 12:00:00Z"), noon);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
