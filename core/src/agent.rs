//! The insights agent: loads a customer table once and answers report
//! requests for executives and product managers.
//!
//! Lifecycle:
//!   1. `InsightsAgent::new(config)`  no I/O
//!   2. `initialize()`                load, validate, compute overall metrics
//!   3. generators                    every call recomputes from the table
//!
//! Any generator called before a successful `initialize()` returns
//! `InsightsError::NotInitialized`.

use crate::{
    analytics::{ChurnAnalytics, ChurnMetrics},
    config::InsightsConfig,
    error::{InsightsError, InsightsResult},
    insight::{AnalyticsSnapshot, ExecutiveInsight, ProductInsight},
    loader::{FeatureInfo, TableLoader},
    report::{self, DetailedAnalytics, ExecutiveSummary, FullReport, ReportMetadata},
    synthesizer::InsightSynthesizer,
    table::CustomerTable,
};

struct LoadedData {
    table:   CustomerTable,
    metrics: ChurnMetrics,
}

pub struct InsightsAgent {
    config:      InsightsConfig,
    loader:      TableLoader,
    synthesizer: InsightSynthesizer,
    state:       Option<LoadedData>,
}

impl InsightsAgent {
    pub fn new(config: InsightsConfig) -> Self {
        let synthesizer = InsightSynthesizer::build(&config.revenue);
        Self {
            loader: TableLoader::new(config.clone()),
            config,
            synthesizer,
            state: None,
        }
    }

    /// An agent over an already prepared table. Skips the loader.
    pub fn from_table(config: InsightsConfig, table: CustomerTable) -> InsightsResult<Self> {
        let mut agent = Self::new(config);
        agent.install(table)?;
        Ok(agent)
    }

    /// Load the configured dataset and compute overall metrics.
    /// On failure the agent stays uninitialized.
    pub fn initialize(&mut self) -> InsightsResult<()> {
        let table = self.loader.load()?;
        self.install(table)
    }

    fn install(&mut self, table: CustomerTable) -> InsightsResult<()> {
        let metrics = ChurnAnalytics::with_target(&table, &self.config.target_column).churn_metrics()?;
        log::info!(
            "agent: initialized with {} customers, churn rate {}%",
            metrics.total_customers,
            metrics.overall_churn_rate
        );
        self.state = Some(LoadedData { table, metrics });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> &InsightSynthesizer {
        &self.synthesizer
    }

    fn loaded(&self) -> InsightsResult<&LoadedData> {
        self.state.as_ref().ok_or(InsightsError::NotInitialized)
    }

    pub fn table(&self) -> InsightsResult<&CustomerTable> {
        Ok(&self.loaded()?.table)
    }

    pub fn metrics(&self) -> InsightsResult<ChurnMetrics> {
        Ok(self.loaded()?.metrics)
    }

    pub fn analytics(&self) -> InsightsResult<ChurnAnalytics<'_>> {
        let data = self.loaded()?;
        Ok(ChurnAnalytics::with_target(&data.table, &self.config.target_column))
    }

    pub fn feature_info(&self) -> InsightsResult<FeatureInfo> {
        Ok(FeatureInfo::from_table(self.table()?, &self.config.target_column))
    }

    pub fn executive_summary(&self) -> InsightsResult<ExecutiveSummary> {
        let data = self.loaded()?;
        ExecutiveSummary::build(&self.analytics()?, &data.metrics, &self.config.revenue)
    }

    pub fn executive_insights(&self) -> InsightsResult<Vec<ExecutiveInsight>> {
        Ok(self.synthesizer.executive_insights(&self.snapshot()?))
    }

    pub fn product_insights(&self) -> InsightsResult<Vec<ProductInsight>> {
        Ok(self.synthesizer.product_insights(&self.snapshot()?))
    }

    pub fn full_report(&self) -> InsightsResult<FullReport> {
        let data = self.loaded()?;
        let analytics = self.analytics()?;
        let insights = self.synthesizer.synthesize(&analytics, data.metrics)?;

        Ok(FullReport {
            report_metadata:    ReportMetadata {
                generated_at: report::timestamp(),
                dataset_info: self.feature_info()?,
            },
            executive_summary:  ExecutiveSummary::build(&analytics, &data.metrics, &self.config.revenue)?,
            executive_insights: insights.executive,
            product_insights:   insights.product,
            detailed_analytics: DetailedAnalytics::build(&analytics)?,
        })
    }

    fn snapshot(&self) -> InsightsResult<AnalyticsSnapshot> {
        let data = self.loaded()?;
        AnalyticsSnapshot::capture(&self.analytics()?, data.metrics)
    }
}
