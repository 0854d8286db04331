//! Report assembly: the executive summary and the full JSON report.
//!
//! Report shape (top-level keys, in order):
//!   report_metadata, executive_summary, executive_insights,
//!   product_insights, detailed_analytics

use crate::{
    analytics::{ChurnAnalytics, ChurnMetrics, FeatureMap, FeatureSummary, GroupComparison, SegmentInsight},
    config::RevenueAssumptions,
    error::InsightsResult,
    format,
    insight::{ExecutiveInsight, ProductInsight},
    loader::FeatureInfo,
    types::{Dimension, RiskLevel},
};
use serde::Serialize;

pub const KEY_RISK_INDICATOR_LIMIT: usize = 5;
pub const TOP_CORRELATION_LIMIT: usize = 3;

/// Local time, ISO-8601 with microseconds and no offset.
pub fn timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

// ── Executive summary ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_customers:    usize,
    /// Rate with a percent sign, e.g. "20.37%".
    pub churn_rate:         String,
    pub churned_customers:  usize,
    pub retained_customers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialImpact {
    pub estimated_revenue_at_risk: String,
    pub avg_customer_value:        String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskIndicator {
    pub segment:            String,
    pub dimension:          Dimension,
    pub churn_rate:         String,
    pub affected_customers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationEntry {
    pub factor:      String,
    pub correlation: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub report_date:            String,
    pub overview:               Overview,
    pub financial_impact:       FinancialImpact,
    pub key_risk_indicators:    Vec<RiskIndicator>,
    pub top_churn_correlations: Vec<CorrelationEntry>,
}

impl ExecutiveSummary {
    /// Revenue at risk here is churned customers times a salary-derived
    /// customer value, independent of the lifetime value used by the
    /// retention insight.
    pub fn build(
        analytics: &ChurnAnalytics<'_>,
        metrics: &ChurnMetrics,
        revenue: &RevenueAssumptions,
    ) -> InsightsResult<Self> {
        let high_risk = analytics.high_risk_segments()?;
        let correlations = analytics.correlation_analysis()?;

        let avg_customer_value = analytics.mean_of("EstimatedSalary")? * revenue.salary_value_ratio;
        let at_risk = metrics.churned_customers as f64 * avg_customer_value;

        Ok(Self {
            report_date: timestamp(),
            overview: Overview {
                total_customers:    metrics.total_customers,
                churn_rate:         format!("{}%", format::rate(metrics.overall_churn_rate)),
                churned_customers:  metrics.churned_customers,
                retained_customers: metrics.retained_customers,
            },
            financial_impact: FinancialImpact {
                estimated_revenue_at_risk: format::currency(at_risk, 2),
                avg_customer_value:        format::currency(avg_customer_value, 2),
            },
            key_risk_indicators: high_risk
                .iter()
                .take(KEY_RISK_INDICATOR_LIMIT)
                .map(|s| RiskIndicator {
                    segment:            s.segment_value.clone(),
                    dimension:          s.segment_name.clone(),
                    churn_rate:         format!("{}%", format::rate(s.churn_rate)),
                    affected_customers: s.customer_count,
                })
                .collect(),
            top_churn_correlations: correlations
                .iter()
                .take(TOP_CORRELATION_LIMIT)
                .map(|(factor, r)| CorrelationEntry {
                    factor:      factor.to_string(),
                    correlation: *r,
                })
                .collect(),
        })
    }
}

// ── Full report ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub dataset_info: FeatureInfo,
}

/// A segment as listed in detailed analytics.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRow {
    pub segment:        String,
    pub churn_rate:     f64,
    pub customer_count: usize,
    pub risk_level:     RiskLevel,
}

impl From<&SegmentInsight> for SegmentRow {
    fn from(s: &SegmentInsight) -> Self {
        Self {
            segment:        s.segment_value.clone(),
            churn_rate:     s.churn_rate,
            customer_count: s.customer_count,
            risk_level:     s.risk_level,
        }
    }
}

fn rows(segments: Vec<SegmentInsight>) -> Vec<SegmentRow> {
    segments.iter().map(SegmentRow::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailedAnalytics {
    pub geography_analysis:  Vec<SegmentRow>,
    pub age_analysis:        Vec<SegmentRow>,
    pub product_analysis:    Vec<SegmentRow>,
    pub churned_vs_retained: FeatureMap<GroupComparison>,
    pub correlations:        FeatureMap<f64>,
    pub gender_analysis:     Vec<SegmentRow>,
    pub activity_analysis:   Vec<SegmentRow>,
    pub balance_analysis:    Vec<SegmentRow>,
    pub tenure_analysis:     Vec<SegmentRow>,
    pub summary_statistics:  FeatureMap<FeatureSummary>,
}

impl DetailedAnalytics {
    pub fn build(analytics: &ChurnAnalytics<'_>) -> InsightsResult<Self> {
        Ok(Self {
            geography_analysis:  rows(analytics.geography_analysis()?),
            age_analysis:        rows(analytics.age_group_analysis()?),
            product_analysis:    rows(analytics.product_usage_analysis()?),
            churned_vs_retained: analytics.churned_vs_retained_comparison()?,
            correlations:        analytics.correlation_analysis()?,
            gender_analysis:     rows(analytics.gender_analysis()?),
            activity_analysis:   rows(analytics.activity_analysis()?),
            balance_analysis:    rows(analytics.balance_tier_analysis()?),
            tenure_analysis:     rows(analytics.tenure_analysis()?),
            summary_statistics:  analytics.summary_statistics()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FullReport {
    pub report_metadata:    ReportMetadata,
    pub executive_summary:  ExecutiveSummary,
    pub executive_insights: Vec<ExecutiveInsight>,
    pub product_insights:   Vec<ProductInsight>,
    pub detailed_analytics: DetailedAnalytics,
}
