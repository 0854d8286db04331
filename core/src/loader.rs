//! Table loader: CSV in, validated `CustomerTable` out.
//!
//! Pipeline (fixed order):
//!   1. Read the raw CSV (local path, or the remote fallback chain)
//!   2. Validate: at least one row, every required column present
//!   3. Type each column and impute missing values
//!      (numeric → median, categorical → mode)
//!   4. Check the outcome column holds only 0/1
//!   5. Drop identifier columns from the built table
//!
//! Remote fallback, tried in order when no local path is configured:
//!   a. our own cache copy from a previous download
//!   b. the kagglehub cache of the named dataset
//!   c. a direct download from the configured URL

use crate::{
    config::{InsightsConfig, RemoteDatasetConfig},
    error::{InsightsError, InsightsResult},
    stats,
    table::{Column, CustomerTable},
};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::Read,
    path::{Path, PathBuf},
};

pub const TARGET_COLUMN: &str = "Exited";

pub const NUMERIC_FEATURES: [&str; 6] = [
    "CreditScore",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "EstimatedSalary",
];

pub const CATEGORICAL_FEATURES: [&str; 2] = ["Geography", "Gender"];

pub const FLAG_COLUMNS: [&str; 2] = ["HasCrCard", "IsActiveMember"];

pub const IDENTIFIER_COLUMNS: [&str; 3] = ["RowNumber", "CustomerId", "Surname"];

/// Every column a dataset must carry, outcome included.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "CreditScore",
    "Geography",
    "Gender",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
    "Exited",
];

const MISSING_TOKENS: [&str; 8] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

const CACHE_SUBDIR: &str = "churn-insights";

// ── Public types ─────────────────────────────────────────────────────────────

/// Shape summary of a loaded table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureInfo {
    pub total_records: usize,
    /// All columns except the outcome.
    pub total_features: usize,
    pub numeric_features: Vec<String>,
    pub categorical_features: Vec<String>,
    pub target_column: String,
    /// Unrounded share of churned rows, in percent.
    pub churn_rate: f64,
}

impl FeatureInfo {
    pub fn from_table(table: &CustomerTable, target: &str) -> Self {
        let churn_rate = table
            .numeric(target)
            .map(|v| stats::mean(v) * 100.0)
            .unwrap_or(0.0);

        Self {
            total_records: table.row_count(),
            total_features: table.column_count().saturating_sub(1),
            numeric_features: NUMERIC_FEATURES
                .iter()
                .filter(|c| **c != target && table.has_column(c))
                .map(|c| c.to_string())
                .collect(),
            categorical_features: CATEGORICAL_FEATURES
                .iter()
                .filter(|c| **c != target && table.has_column(c))
                .map(|c| c.to_string())
                .collect(),
            target_column: target.to_string(),
            churn_rate,
        }
    }
}

/// Header plus string cells; `None` marks a missing value.
#[derive(Debug, Clone)]
struct RawTable {
    headers: Vec<String>,
    cells: Vec<Vec<Option<String>>>,
    rows: usize,
}

// ── Loader ───────────────────────────────────────────────────────────────────

pub struct TableLoader {
    config: InsightsConfig,
}

impl TableLoader {
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    /// Load from the configured path, or from the remote fallback chain
    /// when no path is configured.
    pub fn load(&self) -> InsightsResult<CustomerTable> {
        let raw = match &self.config.data_path {
            Some(path) => read_path(path)?,
            None => self.fetch_remote()?,
        };
        self.prepare(raw)
    }

    pub fn load_from_path(&self, path: impl AsRef<Path>) -> InsightsResult<CustomerTable> {
        let raw = read_path(path.as_ref())?;
        self.prepare(raw)
    }

    pub fn load_from_reader<R: Read>(&self, reader: R) -> InsightsResult<CustomerTable> {
        let raw = read_raw(reader)?;
        self.prepare(raw)
    }

    pub fn feature_info(&self, table: &CustomerTable) -> FeatureInfo {
        FeatureInfo::from_table(table, &self.config.target_column)
    }

    fn required_columns(&self) -> Vec<&str> {
        REQUIRED_COLUMNS
            .iter()
            .map(|c| {
                if *c == TARGET_COLUMN {
                    self.config.target_column.as_str()
                } else {
                    *c
                }
            })
            .collect()
    }

    fn prepare(&self, raw: RawTable) -> InsightsResult<CustomerTable> {
        if raw.rows == 0 {
            return Err(InsightsError::EmptyDataset);
        }

        let missing: Vec<String> = self
            .required_columns()
            .into_iter()
            .filter(|c| !raw.headers.iter().any(|h| h == c))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(InsightsError::MissingColumns {
                missing,
                available: raw.headers.clone(),
            });
        }

        let target = self.config.target_column.as_str();
        let mut columns = Vec::with_capacity(raw.headers.len());

        for (header, cells) in raw.headers.iter().zip(raw.cells) {
            let column = if header == target {
                outcome_column(header, &cells)?
            } else if CATEGORICAL_FEATURES.contains(&header.as_str()) {
                categorical_column(header, &cells)?
            } else if NUMERIC_FEATURES.contains(&header.as_str())
                || FLAG_COLUMNS.contains(&header.as_str())
            {
                numeric_column(header, &cells)?
            } else if cells.iter().all(Option::is_none) {
                log::warn!("loader: dropping column {header} (no values)");
                continue;
            } else if cells.iter().flatten().all(|v| parse_number(v).is_some()) {
                numeric_column(header, &cells)?
            } else {
                categorical_column(header, &cells)?
            };
            columns.push(column);
        }

        let mut table = CustomerTable::from_columns(columns)?;
        let dropped = table.drop_columns(&IDENTIFIER_COLUMNS);
        if !dropped.is_empty() {
            log::debug!("loader: dropped identifier columns {}", dropped.join(", "));
        }
        log::info!(
            "loader: {} rows, {} columns ready",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    // ── Remote fallback ──────────────────────────────────────────

    fn fetch_remote(&self) -> InsightsResult<RawTable> {
        let remote = &self.config.remote;
        let mut attempts: Vec<String> = Vec::new();

        match cached_copy_path(remote) {
            Some(path) if path.is_file() => {
                log::info!("loader: using cached dataset {}", path.display());
                return read_path(&path);
            }
            Some(path) => attempts.push(format!("no cached copy at {}", path.display())),
            None => attempts.push("no cache directory available".into()),
        }

        match kagglehub_copy(remote) {
            Some(path) => {
                log::info!("loader: using kagglehub dataset {}", path.display());
                return read_path(&path);
            }
            None => attempts.push(format!("no kagglehub cache entry for {}", remote.dataset)),
        }

        match &remote.url {
            Some(url) => match download(url, remote) {
                Ok(raw) => return Ok(raw),
                Err(e) => attempts.push(format!("download from {url} failed: {e}")),
            },
            None => attempts.push(format!(
                "no download URL configured (set {})",
                crate::config::ENV_DATASET_URL
            )),
        }

        Err(InsightsError::DataUnavailable {
            source_name: remote.dataset.clone(),
            reason: attempts.join("; "),
        })
    }
}

// ── Reading ──────────────────────────────────────────────────────────────────

fn read_path(path: &Path) -> InsightsResult<RawTable> {
    if !path.is_file() {
        return Err(InsightsError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    log::info!("loader: reading {}", path.display());
    let file = fs::File::open(path)?;
    read_raw(file)
}

fn read_raw<R: Read>(reader: R) -> InsightsResult<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    let mut rows = 0usize;

    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        for (i, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(i)
                .filter(|v| !MISSING_TOKENS.contains(v))
                .map(str::to_string);
            column.push(value);
        }
        rows += 1;
    }

    log::debug!("loader: read {rows} rows x {} columns", headers.len());
    Ok(RawTable { headers, cells, rows })
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Column typing and imputation ─────────────────────────────────────────────

fn outcome_column(name: &str, cells: &[Option<String>]) -> InsightsResult<Column> {
    let mut values = Vec::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        let parsed = cell.as_deref().and_then(parse_number);
        match parsed {
            Some(v) if v == 0.0 || v == 1.0 => values.push(v),
            _ => {
                return Err(InsightsError::InvalidOutcome {
                    column: name.to_string(),
                    row: row + 1,
                    value: cell.clone().unwrap_or_default(),
                })
            }
        }
    }
    Ok(Column::numeric(name, values))
}

fn numeric_column(name: &str, cells: &[Option<String>]) -> InsightsResult<Column> {
    let mut parsed: Vec<Option<f64>> = Vec::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match cell {
            Some(raw) => {
                let v = parse_number(raw).ok_or_else(|| InsightsError::InvalidNumeric {
                    column: name.to_string(),
                    row: row + 1,
                    value: raw.clone(),
                })?;
                parsed.push(Some(v));
            }
            None => parsed.push(None),
        }
    }

    let present: Vec<f64> = parsed.iter().flatten().copied().collect();
    if present.is_empty() {
        return Err(InsightsError::EmptyColumn {
            column: name.to_string(),
        });
    }

    let missing = parsed.len() - present.len();
    let fill = stats::median(&present);
    if missing > 0 {
        log::info!("loader: imputed {missing} missing {name} values with median {fill}");
    }
    Ok(Column::numeric(
        name,
        parsed.into_iter().map(|v| v.unwrap_or(fill)).collect(),
    ))
}

fn categorical_column(name: &str, cells: &[Option<String>]) -> InsightsResult<Column> {
    let fill = mode(cells).ok_or_else(|| InsightsError::EmptyColumn {
        column: name.to_string(),
    })?;

    let missing = cells.iter().filter(|c| c.is_none()).count();
    if missing > 0 {
        log::info!("loader: imputed {missing} missing {name} values with mode '{fill}'");
    }
    Ok(Column::categorical(
        name,
        cells.iter().map(|c| c.clone().unwrap_or_else(|| fill.clone())),
    ))
}

/// Most frequent present value; ties go to the lexicographically smallest.
fn mode(cells: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in cells.iter().flatten() {
        *counts.entry(value.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(value, _)| value.to_string())
}

// ── Remote sources ───────────────────────────────────────────────────────────

fn cached_copy_path(remote: &RemoteDatasetConfig) -> Option<PathBuf> {
    remote
        .cache_dir
        .clone()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join(CACHE_SUBDIR).join(&remote.file_name))
}

/// Locate the newest downloaded version of the dataset in the kagglehub cache.
fn kagglehub_copy(remote: &RemoteDatasetConfig) -> Option<PathBuf> {
    let root = std::env::var_os("KAGGLEHUB_CACHE")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache").join("kagglehub")))?;
    let versions = root.join("datasets").join(&remote.dataset).join("versions");

    let latest = fs::read_dir(&versions)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let version: u64 = entry.file_name().to_str()?.parse().ok()?;
            Some((version, entry.path()))
        })
        .max_by_key(|(version, _)| *version)
        .map(|(_, path)| path)?;

    let preferred = latest.join(&remote.file_name);
    if preferred.is_file() {
        return Some(preferred);
    }

    let mut csvs: Vec<PathBuf> = fs::read_dir(&latest)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    csvs.sort();
    csvs.into_iter().next()
}

fn download(url: &str, remote: &RemoteDatasetConfig) -> InsightsResult<RawTable> {
    log::info!("loader: downloading dataset from {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let body = response.bytes()?;

    if let Some(path) = cached_copy_path(remote) {
        let written = path
            .parent()
            .map(fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|_| fs::write(&path, &body));
        match written {
            Ok(()) => log::debug!("loader: cached download at {}", path.display()),
            Err(e) => log::warn!("loader: could not cache download at {}: {e}", path.display()),
        }
    }

    read_raw(&body[..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefers_smallest_value_on_ties() {
        let cells = vec![
            Some("Spain".to_string()),
            Some("France".to_string()),
            None,
            Some("Spain".to_string()),
            Some("France".to_string()),
        ];
        assert_eq!(mode(&cells).as_deref(), Some("France"));
        assert_eq!(mode(&[None, None]), None);
    }

    #[test]
    fn missing_tokens_are_recognised() {
        let csv = "A,B\n1,NA\n,x\nNaN,y\n";
        let raw = read_raw(csv.as_bytes()).unwrap();
        assert_eq!(raw.rows, 3);
        assert_eq!(raw.cells[0], vec![Some("1".into()), None, None]);
        assert_eq!(raw.cells[1], vec![None, Some("x".into()), Some("y".into())]);
    }

    #[test]
    fn parse_number_rejects_non_finite() {
        assert_eq!(parse_number("42.5"), Some(42.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("abc"), None);
    }
}
