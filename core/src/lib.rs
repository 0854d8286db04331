//! Customer churn analytics and insight synthesis for retail banking.
//!
//! Pipeline:
//!   1. loader       CSV → validated, imputed CustomerTable
//!   2. analytics    segment churn rates, correlations, group comparisons
//!   3. synthesizer  ordered rules → executive and product insights
//!   4. report       executive summary and full JSON report
//!   5. presenter    console text

pub mod agent;
pub mod analytics;
pub mod config;
pub mod error;
pub mod executive_insights;
pub mod format;
pub mod insight;
pub mod loader;
pub mod presenter;
pub mod product_insights;
pub mod report;
pub mod rng;
pub mod stats;
pub mod synthesizer;
pub mod synthetic;
pub mod table;
pub mod types;

pub use agent::InsightsAgent;
pub use analytics::{ChurnAnalytics, ChurnMetrics, SegmentInsight};
pub use config::InsightsConfig;
pub use error::{InsightsError, InsightsResult};
pub use insight::{ExecutiveInsight, ProductInsight};
pub use table::CustomerTable;
pub use types::{Priority, RiskLevel};
