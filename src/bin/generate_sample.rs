use std::sync::Arc;

use anyhow::Context;
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One output row; field names are the CSV headers.
#[derive(Serialize)]
struct SampleRow {
    city_name: String,
    latitude: f64,
    longitude: f64,
    record_type: String,
    record_date: String,
    time_utc: String,
    aqi_overall: String,
    pm25: f64,
    pm10: f64,
    o3: f64,
    temp: f64,
    humidity: f64,
}

/// Rough PM2.5 → AQI curve, good enough to spread rows over every band.
fn pm25_to_aqi(pm25: f64) -> u32 {
    let aqi = if pm25 <= 12.0 {
        pm25 * 50.0 / 12.0
    } else if pm25 <= 35.4 {
        50.0 + (pm25 - 12.0) * 50.0 / 23.4
    } else if pm25 <= 55.4 {
        100.0 + (pm25 - 35.4) * 50.0 / 20.0
    } else if pm25 <= 150.4 {
        150.0 + (pm25 - 55.4) * 50.0 / 95.0
    } else {
        200.0 + (pm25 - 150.4) * 100.0 / 100.0
    };
    aqi.round() as u32
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    // (name, lat, lon, typical PM2.5)
    let stations = [
        ("Bangkok", 13.7563, 100.5018, 38.0),
        ("Chiang Mai", 18.7883, 98.9853, 85.0),
        ("Chiang Rai", 19.9105, 99.8406, 120.0),
        ("Khon Kaen", 16.4322, 102.8236, 30.0),
        ("Phuket", 7.8804, 98.3923, 9.0),
        ("Hat Yai", 7.0086, 100.4747, 14.0),
        ("Rayong", 12.6814, 101.2816, 26.0),
        ("Nakhon Ratchasima", 14.9799, 102.0978, 33.0),
        ("Lampang", 18.2888, 99.4909, 160.0),
        ("Udon Thani", 17.4138, 102.7872, 45.0),
    ];

    let today = NaiveDate::from_ymd_opt(2025, 12, 7).context("invalid base date")?;
    let mut rows = Vec::new();

    for &(name, lat, lon, typical) in &stations {
        for offset in -6..=3i64 {
            let date = today + Duration::days(offset);
            let record_type = match offset {
                0 => "Current",
                o if o > 0 => "Forecast",
                _ => "Historical",
            };

            let pm25 = round1((typical * rng.uniform(0.5, 1.5)).max(0.5));
            let aqi_overall = if rng.chance(0.05) {
                "N/A".to_string()
            } else {
                pm25_to_aqi(pm25).to_string()
            };
            let record_date = if rng.chance(0.03) {
                "unknown".to_string()
            } else {
                date.format("%Y-%m-%d").to_string()
            };
            let time_utc = if rng.chance(0.03) {
                "--".to_string()
            } else {
                format!("{}T{:02}:00:00Z", date.format("%Y-%m-%d"), 6 + (rng.next_u64() % 12))
            };

            rows.push(SampleRow {
                city_name: name.to_string(),
                latitude: lat,
                longitude: lon,
                record_type: record_type.to_string(),
                record_date,
                time_utc,
                aqi_overall,
                pm25,
                pm10: round1(pm25 * rng.uniform(1.2, 1.9)),
                o3: round1(rng.uniform(10.0, 60.0)),
                temp: round1(rng.uniform(24.0, 35.0)),
                humidity: round1(rng.uniform(45.0, 90.0)),
            });
        }
    }

    // ---- CSV ----
    let csv_path = "sample_air_quality.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    for row in &rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;

    // ---- Parquet ----
    let text = |f: fn(&SampleRow) -> &str| -> StringArray {
        StringArray::from(rows.iter().map(f).collect::<Vec<_>>())
    };
    let num = |f: fn(&SampleRow) -> f64| -> Float64Array {
        Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("city_name", DataType::Utf8, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("longitude", DataType::Float64, false),
        Field::new("record_type", DataType::Utf8, false),
        Field::new("record_date", DataType::Utf8, false),
        Field::new("time_utc", DataType::Utf8, false),
        Field::new("aqi_overall", DataType::Utf8, false),
        Field::new("pm25", DataType::Float64, false),
        Field::new("pm10", DataType::Float64, false),
        Field::new("o3", DataType::Float64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("humidity", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.city_name.as_str())),
            Arc::new(num(|r| r.latitude)),
            Arc::new(num(|r| r.longitude)),
            Arc::new(text(|r| r.record_type.as_str())),
            Arc::new(text(|r| r.record_date.as_str())),
            Arc::new(text(|r| r.time_utc.as_str())),
            Arc::new(text(|r| r.aqi_overall.as_str())),
            Arc::new(num(|r| r.pm25)),
            Arc::new(num(|r| r.pm10)),
            Arc::new(num(|r| r.o3)),
            Arc::new(num(|r| r.temp)),
            Arc::new(num(|r| r.humidity)),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_air_quality.parquet";
    let file = std::fs::File::create(parquet_path).context("creating Parquet output")?;
    let mut pq = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    pq.write(&batch).context("writing Parquet batch")?;
    pq.close().context("closing Parquet writer")?;

    println!(
        "Wrote {} rows for {} stations to {csv_path} and {parquet_path}",
        rows.len(),
        stations.len()
    );
    Ok(())
}
