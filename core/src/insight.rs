//! Narrative insight records and the rule contract that produces them.
//!
//! RULE: a rule is a pure function of the analytics snapshot. It never
//! touches the table, never calls another rule, and emits at most one
//! record per evaluation. Emission order is the registration order in
//! synthesizer.rs.

use crate::{
    analytics::{ChurnAnalytics, ChurnMetrics, FeatureMap, GroupComparison, SegmentInsight},
    error::InsightsResult,
    types::Priority,
};
use serde::{Deserialize, Serialize};

// ── Records ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutiveInsight {
    pub title:           String,
    pub summary:         String,
    pub key_metric:      String,
    pub business_impact: String,
    pub priority:        Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductInsight {
    pub title:                 String,
    pub finding:               String,
    pub affected_segment:      String,
    pub recommendation:        String,
    pub expected_impact:       String,
    pub implementation_effort: Priority,
}

// ── Snapshot ─────────────────────────────────────────────────────────────────

/// Every analytics result a rule may read, computed once per synthesis.
#[derive(Debug, Clone)]
pub struct AnalyticsSnapshot {
    pub metrics:       ChurnMetrics,
    pub geography:     Vec<SegmentInsight>,
    pub gender:        Vec<SegmentInsight>,
    pub age_groups:    Vec<SegmentInsight>,
    pub products:      Vec<SegmentInsight>,
    pub activity:      Vec<SegmentInsight>,
    pub balance_tiers: Vec<SegmentInsight>,
    pub tenure:        Vec<SegmentInsight>,
    pub high_risk:     Vec<SegmentInsight>,
    pub comparison:    FeatureMap<GroupComparison>,
}

impl AnalyticsSnapshot {
    pub fn capture(analytics: &ChurnAnalytics<'_>, metrics: ChurnMetrics) -> InsightsResult<Self> {
        Ok(Self {
            metrics,
            geography:     analytics.geography_analysis()?,
            gender:        analytics.gender_analysis()?,
            age_groups:    analytics.age_group_analysis()?,
            products:      analytics.product_usage_analysis()?,
            activity:      analytics.activity_analysis()?,
            balance_tiers: analytics.balance_tier_analysis()?,
            tenure:        analytics.tenure_analysis()?,
            high_risk:     analytics.high_risk_segments()?,
            comparison:    analytics.churned_vs_retained_comparison()?,
        })
    }

    /// The activity segment with the given status, if present.
    pub fn activity_status(&self, status: &str) -> Option<&SegmentInsight> {
        self.activity.iter().find(|s| s.segment_value == status)
    }
}

/// First maximum by churn rate; ties keep the earliest entry.
pub fn highest_churn(segments: &[SegmentInsight]) -> Option<&SegmentInsight> {
    segments.iter().fold(None, |best: Option<&SegmentInsight>, s| match best {
        Some(b) if b.churn_rate >= s.churn_rate => Some(b),
        _ => Some(s),
    })
}

// ── Rule contract ────────────────────────────────────────────────────────────

pub trait InsightRule: Send {
    type Output;

    /// Unique stable name for this rule.
    fn name(&self) -> &'static str;

    /// Returns a record when the rule's condition holds.
    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<Self::Output>;
}

pub type ExecutiveRule = Box<dyn InsightRule<Output = ExecutiveInsight>>;
pub type ProductRule = Box<dyn InsightRule<Output = ProductInsight>>;
