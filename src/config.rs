//! Run configuration: defaults, an optional YAML file and command line
//! overrides, in increasing order of precedence.
use chrono::NaiveDate;
use encoding::label::encoding_from_whatwg_label;
use encoding::EncodingRef;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::recent::Window;

pub const DEFAULT_SOURCE: &str = "data/test_transaction_master.csv";
pub const DEFAULT_DESTINATION: &str = "data/originals.csv";
pub const DEFAULT_DAYS_BACK: u32 = 30;
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Partial settings. Every field is optional so a file or the command line
/// only needs to mention what it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source_path: Option<PathBuf>,
    pub destination_path: Option<PathBuf>,
    pub days_back: Option<u32>,
    pub encoding: Option<String>,
    pub reference_date: Option<NaiveDate>,
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Settings> {
        if text.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        Settings::from_yaml(&fs::read_to_string(path)?)
    }

    /// Values set in `overrides` replace the ones in `self`.
    pub fn merge(self, overrides: Settings) -> Settings {
        Settings {
            source_path: overrides.source_path.or(self.source_path),
            destination_path: overrides.destination_path.or(self.destination_path),
            days_back: overrides.days_back.or(self.days_back),
            encoding: overrides.encoding.or(self.encoding),
            reference_date: overrides.reference_date.or(self.reference_date),
        }
    }

    /// Fills the gaps with defaults. `today` is used when no reference date
    /// was given.
    pub fn resolve(self, today: NaiveDate) -> Result<CaptureConfig> {
        let label = self.encoding.unwrap_or_else(|| DEFAULT_ENCODING.to_string());
        let encoding = encoding_from_whatwg_label(&label)
            .ok_or_else(|| Error::Config(format!("unknown encoding {:?}", label)))?;

        Ok(CaptureConfig {
            source_path: self.source_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            destination_path: self
                .destination_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DESTINATION)),
            days_back: self.days_back.unwrap_or(DEFAULT_DAYS_BACK),
            reference_date: self.reference_date.unwrap_or(today),
            encoding,
        })
    }
}

/// Everything a capture run needs.
pub struct CaptureConfig {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub days_back: u32,
    pub reference_date: NaiveDate,
    pub encoding: EncodingRef,
}

impl CaptureConfig {
    pub fn new<S, D>(source_path: S, destination_path: D, reference_date: NaiveDate) -> CaptureConfig
    where
        S: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        CaptureConfig {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            days_back: DEFAULT_DAYS_BACK,
            reference_date,
            encoding: encoding::all::UTF_8,
        }
    }

    pub fn window(&self) -> Window {
        Window::new(self.reference_date, self.days_back)
    }
}

impl std::fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("source_path", &self.source_path)
            .field("destination_path", &self.destination_path)
            .field("days_back", &self.days_back)
            .field("reference_date", &self.reference_date)
            .field("encoding", &self.encoding.name())
            .finish()
    }
}
