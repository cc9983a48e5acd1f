use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::color::CategoryLegend;
use crate::data::cache::load_cached;
use crate::data::error::DataError;
use crate::data::filter::{filtered_indices, FilterOutcome, FilterSpec};
use crate::data::model::AirQualityDataset;

// ---------------------------------------------------------------------------
// Date selection – computed defaults vs. user overrides
// ---------------------------------------------------------------------------

/// The date pickers' state.
///
/// Defaults come from the loaded dataset; a bound the user has picked is kept
/// as an override and survives a dataset reload, an untouched one follows
/// the new defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateSelection {
    defaults: Option<(NaiveDate, NaiveDate)>,
    user_from: Option<NaiveDate>,
    user_to: Option<NaiveDate>,
}

impl DateSelection {
    pub fn set_defaults(&mut self, defaults: Option<(NaiveDate, NaiveDate)>) {
        self.defaults = defaults;
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.user_from.or(self.defaults.map(|(lo, _)| lo))
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.user_to.or(self.defaults.map(|(_, hi)| hi))
    }

    /// Record a picker change. Picking the computed default clears the override.
    pub fn pick_from(&mut self, date: NaiveDate) {
        let default = self.defaults.map(|(lo, _)| lo);
        self.user_from = (Some(date) != default).then_some(date);
    }

    pub fn pick_to(&mut self, date: NaiveDate) {
        let default = self.defaults.map(|(_, hi)| hi);
        self.user_to = (Some(date) != default).then_some(date);
    }

    pub fn is_overridden(&self) -> bool {
        self.user_from.is_some() || self.user_to.is_some()
    }

    pub fn reset(&mut self) {
        self.user_from = None;
        self.user_to = None;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Half of the sliders' one-decimal display step.
const PM25_SNAP: f64 = 0.05;

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<AirQualityDataset>>,

    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Current selector values, minus the date bounds.
    pub spec: FilterSpec,

    /// Date picker state.
    pub dates: DateSelection,

    /// Result of the last filter pass. `None` means "not filtered yet",
    /// which is different from an empty outcome.
    pub view: Option<FilterOutcome>,

    /// Fixed category colours for map and legend.
    pub legend: CategoryLegend,

    /// Session-fatal load error; nothing else is rendered while set.
    pub fatal_error: Option<String>,

    /// Non-fatal status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source: None,
            spec: FilterSpec {
                record_type: None,
                date_from: None,
                date_to: None,
                station: None,
                pm25_min: 0.0,
                pm25_max: 0.0,
            },
            dates: DateSelection::default(),
            view: None,
            legend: CategoryLegend::default(),
            fatal_error: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load (or fetch from the process cache) and ingest a dataset.
    ///
    /// A [`DataError::DataSource`] on the very first load is fatal to the
    /// session; any later failure keeps the current dataset and only shows a
    /// status message.
    pub fn open(&mut self, path: &Path) -> Result<(), DataError> {
        match load_cached(path) {
            Ok(ds) => {
                log::info!("Showing {} records from {}", ds.len(), path.display());
                let empty = ds.is_empty();
                self.source = Some(path.to_path_buf());
                self.set_dataset(ds);
                if empty {
                    self.status_message = Some("The dataset has no rows.".to_string());
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                if self.dataset.is_none() && e.is_data_source() {
                    self.fatal_error = Some(e.to_string());
                } else {
                    self.status_message = Some(format!("Error: {e}"));
                }
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded dataset, reset selectors and filter once.
    pub fn set_dataset(&mut self, dataset: Arc<AirQualityDataset>) {
        let keep_pm25 = self.dataset.is_some();
        let fresh = FilterSpec::unbounded(&dataset);

        // Station / type choices refer to the old dataset; PM2.5 bounds are
        // only carried over when they still fit the new range.
        self.spec.record_type = None;
        self.spec.station = None;
        if !keep_pm25
            || self.spec.pm25_min < fresh.pm25_min
            || self.spec.pm25_max > fresh.pm25_max
        {
            self.spec.pm25_min = fresh.pm25_min;
            self.spec.pm25_max = fresh.pm25_max;
        }
        self.dates.set_defaults(dataset.date_range);

        self.dataset = Some(dataset);
        self.fatal_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// The spec the pipeline actually runs with.
    ///
    /// Date bounds are only applied once the user has moved a picker, so rows
    /// with unparseable dates stay visible by default.
    pub fn effective_spec(&self) -> FilterSpec {
        let mut spec = self.spec.clone();
        if self.dates.is_overridden() {
            spec.date_from = self.dates.from();
            spec.date_to = self.dates.to();
        } else {
            spec.date_from = None;
            spec.date_to = None;
        }
        spec
    }

    /// Recompute the filtered view after any selector change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let outcome = filtered_indices(&ds.records, &self.effective_spec());
            self.view = Some(outcome);
        }
    }

    /// Number of rows passing the current filters (0 before the first pass).
    pub fn visible_count(&self) -> usize {
        self.view.as_ref().map_or(0, FilterOutcome::len)
    }

    pub fn set_station(&mut self, station: Option<String>) {
        self.spec.station = station;
        self.refilter();
    }

    pub fn set_record_type(&mut self, record_type: Option<String>) {
        self.spec.record_type = record_type;
        self.refilter();
    }

    /// Set the PM2.5 bounds from the sliders.
    ///
    /// A bound within half a display step of the observed minimum or maximum
    /// is moved onto it, so "slider at the end" always includes the extreme
    /// reading.
    pub fn set_pm25_bounds(&mut self, min: f64, max: f64) {
        let observed = self.dataset.as_ref().and_then(|ds| ds.pm25_range);
        let snap = |v: f64| match observed {
            Some((lo, _)) if (v - lo).abs() < PM25_SNAP => lo,
            Some((_, hi)) if (v - hi).abs() < PM25_SNAP => hi,
            _ => v,
        };
        self.spec.pm25_min = snap(min);
        self.spec.pm25_max = snap(max);
        self.refilter();
    }

    pub fn pick_date_from(&mut self, date: NaiveDate) {
        self.dates.pick_from(date);
        self.refilter();
    }

    pub fn pick_date_to(&mut self, date: NaiveDate) {
        self.dates.pick_to(date);
        self.refilter();
    }

    /// Back to "show everything" for the current dataset.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.spec = FilterSpec::unbounded(ds);
        }
        self.dates.reset();
        self.refilter();
    }
}
