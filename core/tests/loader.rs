mod common;

use churn_insights_core::{
    config::InsightsConfig,
    error::InsightsError,
    loader::{TableLoader, CATEGORICAL_FEATURES, NUMERIC_FEATURES},
    synthetic,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

// ── Helpers ──────────────────────────────────────────────────────────────────

const HEADER: &str = "RowNumber,CustomerId,Surname,CreditScore,Geography,Gender,Age,Tenure,\
                      Balance,NumOfProducts,HasCrCard,IsActiveMember,EstimatedSalary,Exited";

const SAMPLE: &str = "\
1,15634602,Hargrave,600,France,Female,42,2,0.00,1,1,1,101348.88,1
2,15647311,Hill,,Spain,Female,41,1,83807.86,1,0,1,112542.58,0
3,15619304,Onio,700,,Female,42,8,159660.80,3,1,0,113931.57,1
4,15701354,Boni,650,France,Female,39,1,NA,2,0,0,93826.63,0
";

fn csv_file(header: &str, body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{header}").unwrap();
    write!(file, "{body}").unwrap();
    file.flush().unwrap();
    file
}

fn load(header: &str, body: &str) -> Result<churn_insights_core::CustomerTable, InsightsError> {
    common::init_logging();
    let file = csv_file(header, body);
    TableLoader::new(InsightsConfig::with_data_path(file.path())).load()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Identifier columns never survive loading.
#[test]
fn identifier_columns_are_dropped() {
    let table = load(HEADER, SAMPLE).unwrap();

    for id in ["RowNumber", "CustomerId", "Surname"] {
        assert!(!table.has_column(id), "{id} should be dropped");
    }
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.column_count(), 11);
    assert_eq!(table.column_names()[0], "CreditScore");
}

/// An explicit path bypasses the configured source, and only the
/// identifier columns actually present are dropped.
#[test]
fn load_from_path_drops_present_identifiers() {
    let header = "CustomerId,CreditScore,Geography,Gender,Age,Tenure,Balance,\
                  NumOfProducts,HasCrCard,IsActiveMember,EstimatedSalary,Exited";
    let body = "15634602,600,France,Female,42,2,0.00,1,1,1,101348.88,1\n\
                15647311,608,Spain,Female,41,1,83807.86,1,0,1,112542.58,0\n";
    let file = csv_file(header, body);

    let loader = TableLoader::new(InsightsConfig::with_data_path("/not/used.csv"));
    let table = loader.load_from_path(file.path()).unwrap();

    assert!(!table.has_column("CustomerId"));
    assert_eq!(table.column_count(), 11);
    assert_eq!(table.row_count(), 2);
}

/// Missing numeric cells take the column median, including "NA" tokens.
#[test]
fn numeric_gaps_take_median() {
    let table = load(HEADER, SAMPLE).unwrap();

    let credit = table.numeric("CreditScore").unwrap();
    assert_eq!(credit, &[600.0, 650.0, 700.0, 650.0]);

    // Median of 0.00, 83807.86 and 159660.80.
    let balance = table.numeric("Balance").unwrap();
    assert_eq!(balance[3], 83_807.86);
}

/// Missing categorical cells take the column mode.
#[test]
fn categorical_gaps_take_mode() {
    let table = load(HEADER, SAMPLE).unwrap();
    let geography = table.categorical("Geography").unwrap();
    assert_eq!(geography, &["France", "Spain", "France", "France"]);
}

/// An absent required column is named in the error.
#[test]
fn missing_required_column_is_reported() {
    let header = HEADER.replace(",Balance", "");
    let body = "1,15634602,Hargrave,600,France,Female,42,2,1,1,1,101348.88,1\n";

    match load(&header, body) {
        Err(InsightsError::MissingColumns { missing, available }) => {
            assert_eq!(missing, vec!["Balance".to_string()]);
            assert!(available.contains(&"CreditScore".to_string()));
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
}

/// A nonexistent path is FileNotFound.
#[test]
fn nonexistent_path_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");
    let err = TableLoader::new(InsightsConfig::with_data_path(&path)).load().unwrap_err();
    assert!(matches!(err, InsightsError::FileNotFound { .. }), "got {err:?}");
}

/// Outcome values outside {0, 1} are rejected with their 1-based row.
#[test]
fn non_binary_outcome_is_rejected() {
    let body = "1,15634602,Hargrave,600,France,Female,42,2,0,1,1,1,101348.88,0\n\
                2,15647311,Hill,610,Spain,Female,41,1,0,1,0,1,112542.58,2\n";

    match load(HEADER, body) {
        Err(InsightsError::InvalidOutcome { column, row, value }) => {
            assert_eq!(column, "Exited");
            assert_eq!(row, 2);
            assert_eq!(value, "2");
        }
        other => panic!("expected InvalidOutcome, got {other:?}"),
    }
}

/// A text value in a numeric feature is an error, not an imputation.
#[test]
fn non_numeric_feature_is_rejected() {
    let body = "1,15634602,Hargrave,600,France,Female,forty,2,0,1,1,1,101348.88,0\n";
    let err = load(HEADER, body).unwrap_err();
    assert!(
        matches!(err, InsightsError::InvalidNumeric { ref column, row: 1, .. } if column == "Age"),
        "got {err:?}"
    );
}

/// A header-only file has no rows to analyse.
#[test]
fn header_only_file_is_empty() {
    let err = load(HEADER, "").unwrap_err();
    assert!(matches!(err, InsightsError::EmptyDataset), "got {err:?}");
}

/// Extra columns are typed by content; an all-missing one is dropped.
#[test]
fn extra_columns_are_inferred() {
    let header = format!("{HEADER},Segment,Score,Blank");
    let body = "1,1,A,600,France,Male,30,2,0,1,1,1,5000,0,retail,1.5,\n\
                2,2,B,610,Spain,Male,31,3,0,1,1,1,6000,1,private,2.5,\n";
    let table = load(&header, body).unwrap();

    assert!(table.categorical("Segment").is_ok());
    assert_eq!(table.numeric("Score").unwrap(), &[1.5, 2.5]);
    assert!(!table.has_column("Blank"));
}

/// Feature info counts every column except the outcome.
#[test]
fn feature_info_excludes_outcome() {
    let file = csv_file(HEADER, SAMPLE);
    let loader = TableLoader::new(InsightsConfig::with_data_path(file.path()));
    let table = loader.load().unwrap();
    let info = loader.feature_info(&table);

    assert_eq!(info.total_records, 4);
    assert_eq!(info.total_features, table.column_count() - 1);
    assert_eq!(info.numeric_features.len(), NUMERIC_FEATURES.len());
    assert_eq!(info.categorical_features.len(), CATEGORICAL_FEATURES.len());
    assert!(!info.numeric_features.contains(&"Exited".to_string()));
    assert_eq!(info.target_column, "Exited");
    assert_eq!(info.churn_rate, 50.0);
}

/// A synthetic table written to CSV loads back unchanged.
#[test]
fn synthetic_table_survives_csv() {
    let table = synthetic::generate(3, 250).unwrap();
    let mut buf = Vec::new();
    table.write_csv(&mut buf).unwrap();

    let loaded = TableLoader::new(InsightsConfig::default())
        .load_from_reader(buf.as_slice())
        .unwrap();
    assert_eq!(loaded, table);
}

/// Without a data path, a copy in the configured cache directory is used.
#[test]
fn cached_copy_is_used_without_data_path() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("churn-insights");
    std::fs::create_dir_all(&cache).unwrap();
    std::fs::write(cache.join("Churn_Modelling.csv"), format!("{HEADER}\n{SAMPLE}")).unwrap();

    let mut config = InsightsConfig::default();
    config.remote.cache_dir = Some(dir.path().to_path_buf());
    let table = TableLoader::new(config).load().unwrap();
    assert_eq!(table.row_count(), 4);
}

/// With no local copy and no URL, loading fails with DataUnavailable.
#[test]
fn no_source_is_data_unavailable() {
    let dir = TempDir::new().unwrap();
    let mut config = InsightsConfig::default();
    config.remote.cache_dir = Some(dir.path().to_path_buf());
    config.remote.dataset = "nobody/no-such-dataset-for-tests".into();
    config.remote.url = None;

    let err = TableLoader::new(config).load().unwrap_err();
    match err {
        InsightsError::DataUnavailable { source_name, reason } => {
            assert_eq!(source_name, "nobody/no-such-dataset-for-tests");
            assert!(reason.contains("no download URL"), "{reason}");
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

/// JSON config files fill missing fields with defaults.
#[test]
fn config_file_uses_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "revenue": {{ "lifetime_value_per_customer": 1200.0 }} }}"#).unwrap();

    let config = InsightsConfig::load(file.path()).unwrap();
    assert_eq!(config.target_column, "Exited");
    assert_eq!(config.revenue.lifetime_value_per_customer, 1200.0);
    assert_eq!(config.revenue.salary_value_ratio, 0.05);
    assert!(config.data_path.is_none());
}
