use chrono::NaiveDate;

use super::model::{AirQualityDataset, AirQualityRecord};

// ---------------------------------------------------------------------------
// FilterSpec – what the selection surface asks for
// ---------------------------------------------------------------------------

/// User-selected filters. `None` means "no constraint" for that predicate.
///
/// Both PM2.5 bounds are always present; [`FilterSpec::unbounded`] seeds them
/// from the dataset's observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub record_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub station: Option<String>,
    pub pm25_min: f64,
    pub pm25_max: f64,
}

impl FilterSpec {
    /// A spec that lets every record with a finite PM2.5 reading through.
    pub fn unbounded(dataset: &AirQualityDataset) -> Self {
        let (pm25_min, pm25_max) = dataset.pm25_range.unwrap_or((0.0, 0.0));
        FilterSpec {
            record_type: None,
            date_from: None,
            date_to: None,
            station: None,
            pm25_min,
            pm25_max,
        }
    }

    /// Date bounds in ascending order, plus whether they had to be swapped.
    fn date_bounds(&self) -> (Option<NaiveDate>, Option<NaiveDate>, bool) {
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) if from > to => (Some(to), Some(from), true),
            (from, to) => (from, to, false),
        }
    }

    fn pm25_bounds(&self) -> (f64, f64, bool) {
        if self.pm25_min > self.pm25_max {
            (self.pm25_max, self.pm25_min, true)
        } else {
            (self.pm25_min, self.pm25_max, false)
        }
    }
}

// ---------------------------------------------------------------------------
// FilterOutcome – surviving rows plus recoverable warnings
// ---------------------------------------------------------------------------

/// Conditions the pipeline recovered from on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterWarning {
    /// `date_from` was after `date_to`; the bounds were swapped.
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
    /// `pm25_min` was above `pm25_max`; the bounds were swapped.
    InvertedPm25Range,
}

impl std::fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterWarning::InvertedDateRange { from, to } => write!(
                f,
                "Start date {from} is after end date {to}; showing {to} to {from} instead."
            ),
            FilterWarning::InvertedPm25Range => {
                write!(f, "PM2.5 minimum is above the maximum; the bounds were swapped.")
            }
        }
    }
}

/// Result of one pipeline pass. An empty `indices` is a valid outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Indices into the input slice, in original order.
    pub indices: Vec<usize>,
    pub warnings: Vec<FilterWarning>,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run every predicate over `records` and return the indices that pass all.
///
/// Stages run in a fixed order (record type, dates, station, PM2.5); each
/// stage reads the previous stage's survivors and yields a fresh list.
pub fn filtered_indices(records: &[AirQualityRecord], spec: &FilterSpec) -> FilterOutcome {
    let mut warnings = Vec::new();

    let (date_from, date_to, swapped) = spec.date_bounds();
    if swapped {
        if let (Some(from), Some(to)) = (spec.date_from, spec.date_to) {
            log::warn!("Inverted date range {from}..{to}, swapping bounds");
            warnings.push(FilterWarning::InvertedDateRange { from, to });
        }
    }
    let (pm25_min, pm25_max, swapped) = spec.pm25_bounds();
    if swapped {
        log::warn!("Inverted PM2.5 range {}..{}, swapping bounds", spec.pm25_min, spec.pm25_max);
        warnings.push(FilterWarning::InvertedPm25Range);
    }

    let all: Vec<usize> = (0..records.len()).collect();
    let by_type = keep(records, &all, |r| match &spec.record_type {
        Some(t) => &r.record_type == t,
        None => true,
    });
    let by_date = if date_from.is_none() && date_to.is_none() {
        by_type
    } else {
        keep(records, &by_type, |r| match r.record_date {
            Some(d) => date_from.map_or(true, |from| d >= from) && date_to.map_or(true, |to| d <= to),
            None => false,
        })
    };
    let by_station = keep(records, &by_date, |r| match &spec.station {
        Some(s) => &r.station == s,
        None => true,
    });
    // NaN never satisfies either comparison, so unreadable readings drop out.
    let indices = keep(records, &by_station, |r| r.pm25 >= pm25_min && r.pm25 <= pm25_max);

    log::debug!("Filter kept {} of {} records", indices.len(), records.len());
    FilterOutcome { indices, warnings }
}

fn keep(
    records: &[AirQualityRecord],
    candidates: &[usize],
    pred: impl Fn(&AirQualityRecord) -> bool,
) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&i| pred(&records[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::category::AqiCategory;
    use crate::data::model::fixtures::{dated, record};
    use crate::data::model::LoadReport;

    fn filter_records(records: &[AirQualityRecord], spec: &FilterSpec) -> Vec<AirQualityRecord> {
        filtered_indices(records, spec)
            .indices
            .into_iter()
            .map(|i| records[i].clone())
            .collect()
    }

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 12, d)
    }

    fn open_spec() -> FilterSpec {
        FilterSpec {
            record_type: None,
            date_from: None,
            date_to: None,
            station: None,
            pm25_min: f64::NEG_INFINITY,
            pm25_max: f64::INFINITY,
        }
    }

    fn mixed_records() -> Vec<AirQualityRecord> {
        let mut recs = vec![
            dated("Bangkok", date(1)),
            dated("Chiang Mai", date(3)),
            dated("Bangkok", None),
            dated("Phuket", date(5)),
            dated("Bangkok", date(7)),
        ];
        recs[1].record_type = "Forecast".to_string();
        recs[3].pm25 = 80.0;
        recs[4].pm25 = f64::NAN;
        recs
    }

    #[test]
    fn three_station_scenario() {
        let records = vec![
            record("Ayutthaya", 5.0, 30),
            record("Saraburi", 15.0, 120),
            record("Mae Sot", 60.0, 310),
        ];
        let spec = FilterSpec {
            pm25_min: 10.0,
            pm25_max: 60.0,
            ..open_spec()
        };
        let out = filtered_indices(&records, &spec);
        assert_eq!(out.indices, vec![1, 2]);
        assert!(out.warnings.is_empty());

        let cats: Vec<AqiCategory> = out.indices.iter().map(|&i| records[i].category).collect();
        assert_eq!(
            cats,
            vec![AqiCategory::UnhealthyForSensitiveGroups, AqiCategory::Hazardous]
        );
    }

    #[test]
    fn predicates_are_anded() {
        let records = mixed_records();
        let spec = FilterSpec {
            record_type: Some("Current".to_string()),
            date_from: date(1),
            date_to: date(7),
            station: Some("Bangkok".to_string()),
            pm25_min: 0.0,
            pm25_max: 100.0,
        };
        // Bangkok #2 has no date, Bangkok #4 has NaN PM2.5.
        assert_eq!(filtered_indices(&records, &spec).indices, vec![0]);
    }

    #[test]
    fn null_dates_only_pass_without_date_bounds() {
        let records = mixed_records();
        assert!(filtered_indices(&records, &open_spec()).indices.contains(&2));

        let from_only = FilterSpec {
            date_from: date(1),
            ..open_spec()
        };
        assert!(!filtered_indices(&records, &from_only).indices.contains(&2));

        let to_only = FilterSpec {
            date_to: date(31),
            ..open_spec()
        };
        assert!(!filtered_indices(&records, &to_only).indices.contains(&2));
    }

    #[test]
    fn inverted_dates_match_swapped_dates() {
        let records = mixed_records();
        let forward = FilterSpec {
            date_from: date(2),
            date_to: date(6),
            ..open_spec()
        };
        let backward = FilterSpec {
            date_from: date(6),
            date_to: date(2),
            ..open_spec()
        };

        let fwd = filtered_indices(&records, &forward);
        let bwd = filtered_indices(&records, &backward);
        assert_eq!(fwd.indices, vec![1, 3]);
        assert_eq!(bwd.indices, fwd.indices);
        assert!(fwd.warnings.is_empty());
        assert_eq!(
            bwd.warnings,
            vec![FilterWarning::InvertedDateRange {
                from: date(6).unwrap(),
                to: date(2).unwrap()
            }]
        );
    }

    #[test]
    fn inverted_pm25_bounds_are_swapped() {
        let records = vec![record("A", 5.0, 10), record("B", 50.0, 10)];
        let spec = FilterSpec {
            pm25_min: 40.0,
            pm25_max: 1.0,
            ..open_spec()
        };
        let out = filtered_indices(&records, &spec);
        assert_eq!(out.indices, vec![0]);
        assert_eq!(out.warnings, vec![FilterWarning::InvertedPm25Range]);
    }

    #[test]
    fn result_is_an_ordered_subset_and_idempotent() {
        let records = mixed_records();
        let specs = [
            open_spec(),
            FilterSpec {
                station: Some("Bangkok".to_string()),
                ..open_spec()
            },
            FilterSpec {
                date_from: date(7),
                date_to: date(1),
                pm25_min: 5.0,
                pm25_max: 50.0,
                ..open_spec()
            },
            FilterSpec {
                record_type: Some("Nope".to_string()),
                ..open_spec()
            },
        ];

        for spec in &specs {
            let once = filter_records(&records, spec);
            assert!(once.len() <= records.len());
            let idx = filtered_indices(&records, spec).indices;
            assert!(idx.windows(2).all(|w| w[0] < w[1]));

            let twice = filter_records(&once, spec);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let records = mixed_records();
        let spec = FilterSpec {
            station: Some("Nowhere".to_string()),
            ..open_spec()
        };
        let out = filtered_indices(&records, &spec);
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);

        assert!(filtered_indices(&[], &open_spec()).is_empty());
    }

    #[test]
    fn unbounded_spec_uses_observed_pm25_range() {
        let ds = AirQualityDataset::from_records(mixed_records(), LoadReport::default());
        let spec = FilterSpec::unbounded(&ds);
        assert_eq!((spec.pm25_min, spec.pm25_max), (10.0, 80.0));
        // Only the NaN reading drops out.
        assert_eq!(filtered_indices(&ds.records, &spec).indices, vec![0, 1, 2, 3]);
    }
}
