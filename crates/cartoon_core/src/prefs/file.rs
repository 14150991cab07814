//! JSON file preferences.

use super::{FlagStore, PrefsError, PrefsResult};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Boolean settings persisted as one JSON object.
///
/// Reads go to disk every time, so several handles on one file (or several
/// processes) observe each other's writes.
pub struct FilePreferences {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferences {
    /// Opens settings at `path`; a missing file yields empty settings.
    ///
    /// # Errors
    /// - `PrefsError::Io` when the file exists but cannot be read.
    /// - `PrefsError::Corrupt` when the file is not a JSON object of booleans.
    pub fn open(path: impl Into<PathBuf>) -> PrefsResult<Self> {
        let prefs = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        let values = prefs.load()?;

        debug!(
            "event=prefs_open module=prefs status=ok keys={}",
            values.len()
        );
        Ok(prefs)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> PrefsResult<BTreeMap<String, bool>> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| PrefsError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(PrefsError::Io {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    fn persist(&self, values: &BTreeMap<String, bool>) -> PrefsResult<()> {
        let io_error = |source| PrefsError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let bytes = serde_json::to_vec_pretty(values).map_err(|source| PrefsError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes).map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;
        Ok(())
    }
}

impl FlagStore for FilePreferences {
    fn get_bool(&self, key: &str) -> PrefsResult<bool> {
        Ok(self.load()?.get(key).copied().unwrap_or(false))
    }

    fn set_bool(&self, key: &str, value: bool) -> PrefsResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| PrefsError::Poisoned)?;
        let mut values = self.load()?;
        values.insert(key.to_string(), value);
        self.persist(&values)?;

        info!("event=prefs_set module=prefs status=ok key={key} value={value}");
        Ok(())
    }
}
