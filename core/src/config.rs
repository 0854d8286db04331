use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_COLUMN: &str = "Exited";
pub const DEFAULT_DATASET: &str = "shantanudhakadd/bank-customer-churn-prediction";
pub const DEFAULT_DATASET_FILE: &str = "Churn_Modelling.csv";

pub const ENV_DATASET_URL: &str = "CHURN_DATASET_URL";
pub const ENV_CACHE_DIR: &str = "CHURN_CACHE_DIR";

// ── Remote dataset ─────────────────────────────────────────────────

/// Where to find the dataset when no local path is given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RemoteDatasetConfig {
    /// Kaggle-style `owner/name` handle, used for the kagglehub cache lookup.
    pub dataset: String,
    /// Preferred CSV file inside the dataset.
    pub file_name: String,
    /// Direct HTTP(S) URL of the CSV. No download is attempted when unset.
    pub url: Option<String>,
    /// Cache root. `None` means the platform cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for RemoteDatasetConfig {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.into(),
            file_name: DEFAULT_DATASET_FILE.into(),
            url: None,
            cache_dir: None,
        }
    }
}

// ── Revenue assumptions ────────────────────────────────────────────

/// Per-customer value assumptions behind the revenue-impact figures.
///
/// The two figures are deliberately independent: the retention insight
/// uses a flat lifetime value, the executive summary derives value from
/// the mean estimated salary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevenueAssumptions {
    pub lifetime_value_per_customer: f64,
    pub salary_value_ratio: f64,
}

impl Default for RevenueAssumptions {
    fn default() -> Self {
        Self {
            lifetime_value_per_customer: 5000.0,
            salary_value_ratio: 0.05,
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InsightsConfig {
    pub target_column: String,
    pub data_path: Option<PathBuf>,
    pub remote: RemoteDatasetConfig,
    pub revenue: RevenueAssumptions,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.into(),
            data_path: None,
            remote: RemoteDatasetConfig::default(),
            revenue: RevenueAssumptions::default(),
        }
    }
}

impl InsightsConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: InsightsConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Config pointing at a local CSV, everything else default.
    pub fn with_data_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Apply `CHURN_DATASET_URL` and `CHURN_CACHE_DIR` if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_DATASET_URL) {
            if !url.trim().is_empty() {
                self.remote.url = Some(url);
            }
        }
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            if !dir.trim().is_empty() {
                self.remote.cache_dir = Some(PathBuf::from(dir));
            }
        }
        self
    }
}
