use aiwatch_common::constants::{
    DEFAULT_SCAN_INTERVAL_SECS, LOG_DIR_NAME, LOG_SINK_FILE_NAME, WATCHDOG_DIR_NAME,
};
use anyhow::{Context, Result};
use config::Config as RConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub scan_interval_secs: u64,
    pub log_file: PathBuf,
    pub signatures_file: Option<PathBuf>,
    /// Seconds after which an already-reported, still-live match may be
    /// reported again. `None` (the default) never re-alerts while the
    /// process instance stays alive.
    pub realert_window_secs: Option<u64>,
}

/// CLI-supplied values layered on top of defaults and environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub scan_interval_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub signatures_file: Option<PathBuf>,
    pub realert_window_secs: Option<u64>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    fn default_log_file() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(WATCHDOG_DIR_NAME)
            .join(LOG_DIR_NAME)
            .join(LOG_SINK_FILE_NAME)
    }

    /// Defaults, then `AIWATCH_`-prefixed environment variables, then CLI
    /// overrides.
    pub fn load_config(overrides: &ConfigOverrides) -> Result<Config> {
        let mut builder = RConfig::builder();

        builder = builder
            .set_default("scan_interval_secs", DEFAULT_SCAN_INTERVAL_SECS)?
            .set_default(
                "log_file",
                Self::default_log_file().to_string_lossy().into_owned(),
            )?
            .set_default("signatures_file", Some(None::<String>))?
            .set_default("realert_window_secs", Some(None::<u64>))?;

        builder =
            builder.add_source(config::Environment::with_prefix("AIWATCH").try_parsing(true));

        if let Some(interval) = overrides.scan_interval_secs {
            builder = builder.set_override("scan_interval_secs", interval)?;
        }
        if let Some(ref log_file) = overrides.log_file {
            builder = builder.set_override("log_file", log_file.to_string_lossy().into_owned())?;
        }
        if let Some(ref signatures_file) = overrides.signatures_file {
            builder = builder.set_override(
                "signatures_file",
                signatures_file.to_string_lossy().into_owned(),
            )?;
        }
        if let Some(window) = overrides.realert_window_secs {
            builder = builder.set_override("realert_window_secs", window)?;
        }

        builder
            .build()?
            .try_deserialize()
            .context("failed to assemble watchdog configuration")
    }
}
