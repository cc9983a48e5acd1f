use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::FilterSpec;
use crate::data::model::AirQualityDataset;

/// Dataset opened when `--data` is not given.
pub const DEFAULT_DATA_FILE: &str = "AQI_Thailand_FINAL_DATA_20251207_142243.csv";

#[derive(Parser, Debug)]
#[command(name = "aqi-viewer")]
#[command(about = "Interactive air-quality station map with filters")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, default_value = DEFAULT_DATA_FILE, help = "Dataset to open (.csv, .json, .parquet)")]
    pub data: PathBuf,

    #[arg(long, help = "Print a text report to stdout instead of opening the window")]
    pub print: bool,

    #[arg(long, help = "Only show this station")]
    pub station: Option<String>,

    #[arg(long, help = "Only show this record type (e.g. Current)")]
    pub record_type: Option<String>,

    #[arg(long, help = "First record date to include (YYYY-MM-DD)")]
    pub from: Option<NaiveDate>,

    #[arg(long, help = "Last record date to include (YYYY-MM-DD)")]
    pub to: Option<NaiveDate>,

    #[arg(long, help = "Lowest PM2.5 to include [default: dataset minimum]")]
    pub pm25_min: Option<f64>,

    #[arg(long, help = "Highest PM2.5 to include [default: dataset maximum]")]
    pub pm25_max: Option<f64>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,
}

impl Cli {
    /// Filter spec for `dataset` with every flag that was given applied.
    pub fn filter_spec(&self, dataset: &AirQualityDataset) -> FilterSpec {
        let base = FilterSpec::unbounded(dataset);
        FilterSpec {
            record_type: self.record_type.clone(),
            date_from: self.from,
            date_to: self.to,
            station: self.station.clone(),
            pm25_min: self.pm25_min.unwrap_or(base.pm25_min),
            pm25_max: self.pm25_max.unwrap_or(base.pm25_max),
        }
    }
}
