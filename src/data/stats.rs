use super::model::AirQualityRecord;

/// Headline numbers for the current filtered view.
///
/// Recomputed on every render; nothing here is cached because any filter
/// change invalidates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Highest AQI in the view, `None` when the view is empty.
    pub max_aqi: Option<u32>,
    /// Stations reaching `max_aqi`, first occurrence first, no repeats.
    pub max_aqi_stations: Vec<String>,
    /// Mean over finite PM2.5 readings, `None` when there are none.
    pub mean_pm25: Option<f64>,
    pub pm25_range: Option<(f64, f64)>,
}

impl Summary {
    /// The tie-break winner: first station in original order at the max AQI.
    pub fn max_aqi_station(&self) -> Option<&str> {
        self.max_aqi_stations.first().map(String::as_str)
    }
}

/// Summarize the records selected by `indices`.
pub fn summarize(records: &[AirQualityRecord], indices: &[usize]) -> Summary {
    let rows = || indices.iter().map(|&i| &records[i]);

    let max_aqi = rows().map(|r| r.aqi_overall).max();

    let mut max_aqi_stations: Vec<String> = Vec::new();
    if let Some(max) = max_aqi {
        for r in rows().filter(|r| r.aqi_overall == max) {
            if !max_aqi_stations.contains(&r.station) {
                max_aqi_stations.push(r.station.clone());
            }
        }
    }

    let mut sum = 0.0;
    let mut n = 0usize;
    let mut pm25_range: Option<(f64, f64)> = None;
    for v in rows().map(|r| r.pm25).filter(|v| v.is_finite()) {
        sum += v;
        n += 1;
        pm25_range = Some(match pm25_range {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }

    Summary {
        count: indices.len(),
        max_aqi,
        max_aqi_stations,
        mean_pm25: if n == 0 { None } else { Some(sum / n as f64) },
        pm25_range,
    }
}
