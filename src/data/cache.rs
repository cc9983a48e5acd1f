use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use super::error::{DataError, Result};
use super::loader::load_file;
use super::model::AirQualityDataset;

/// Process-wide store of loaded datasets, keyed by canonical path.
///
/// Entries are written once and never replaced or evicted; failed loads are
/// not stored, so a later call retries.
static DATASETS: OnceLock<Mutex<HashMap<PathBuf, Arc<AirQualityDataset>>>> = OnceLock::new();

fn datasets() -> &'static Mutex<HashMap<PathBuf, Arc<AirQualityDataset>>> {
    DATASETS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load `path` at most once per process and hand out the shared result.
pub fn load_cached(path: &Path) -> Result<Arc<AirQualityDataset>> {
    let key = path
        .canonicalize()
        .map_err(|e| DataError::data_source(path, e))?;

    // Inserts only happen after a full load, so a poisoned map is still whole.
    let mut map = datasets().lock().unwrap_or_else(|p| p.into_inner());
    if let Some(ds) = map.get(&key) {
        log::debug!("Dataset cache hit for {}", key.display());
        return Ok(Arc::clone(ds));
    }

    let ds = Arc::new(load_file(&key)?);
    map.insert(key, Arc::clone(&ds));
    Ok(ds)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn second_load_returns_the_same_dataset() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "station,latitude,longitude,aqi_overall,pm25").unwrap();
        writeln!(file, "Lampang,18.29,99.49,88,31.0").unwrap();
        file.flush().unwrap();

        let first = load_cached(file.path()).unwrap();

        // Rewriting the file must not be observed: the source is immutable
        // for the session once loaded.
        writeln!(file, "Nan,18.78,100.77,12,2.0").unwrap();
        file.flush().unwrap();

        let second = load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("later.csv");
        assert!(load_cached(&path).unwrap_err().is_data_source());

        std::fs::write(&path, "station,latitude,longitude,aqi_overall,pm25\nA,1,2,3,4\n").unwrap();
        assert_eq!(load_cached(&path).unwrap().len(), 1);
    }
}
