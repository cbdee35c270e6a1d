use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::User;
use crate::storage::DEFAULT_STORAGE_KEY;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    /// Who is using the app. Absent means anonymous.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct General {
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the state file
    pub dir: PathBuf,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long the case spins before the prize is revealed
    pub spin_secs: f64,
    /// Amount credited by one confirmed deposit
    pub deposit_amount: Decimal,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spin_secs: 3.0,
            deposit_amount: dec!(500),
        }
    }
}

impl SessionConfig {
    pub fn spin_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.spin_secs).unwrap_or_default()
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        match Self::load(path) {
            Err(e)
                if e.downcast_ref::<io::Error>()
                    .is_some_and(|e| e.kind() == io::ErrorKind::NotFound) =>
            {
                Ok(Self::default())
            }
            result => result,
        }
    }
}
