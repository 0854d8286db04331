//! Executive insight rules: strategic findings for leadership.
//!
//! Emission order (see synthesizer.rs):
//!   1. Overall retention status   (always)
//!   2. Geographic risk alert      (any geography segment)
//!   3. Inactive customer risk     (an "Inactive" activity segment exists)
//!   4. High-risk segment summary  (at least one HIGH segment)
//!   5. Age group risk             (any age segment)

use crate::{
    format,
    insight::{highest_churn, AnalyticsSnapshot, ExecutiveInsight, InsightRule},
    types::Priority,
};

/// Overall churn above this rate is reported as HIGH priority.
pub const CONCERNING_CHURN_RATE: f64 = 15.0;

/// The high-risk summary counts customers across at most this many segments.
pub const HIGH_RISK_SUMMARY_LIMIT: usize = 5;

// ── 1. Overall retention ─────────────────────────────────────────────────────

pub struct OverallRetentionRule {
    lifetime_value: f64,
}

impl OverallRetentionRule {
    pub fn new(lifetime_value: f64) -> Self {
        Self { lifetime_value }
    }
}

impl InsightRule for OverallRetentionRule {
    type Output = ExecutiveInsight;

    fn name(&self) -> &'static str {
        "overall_retention"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ExecutiveInsight> {
        let m = &snapshot.metrics;
        let rate = format::rate(m.overall_churn_rate);
        let revenue = m.churned_customers as f64 * self.lifetime_value;

        let priority = if m.overall_churn_rate > CONCERNING_CHURN_RATE {
            Priority::High
        } else {
            Priority::Medium
        };

        Some(ExecutiveInsight {
            title:           "Overall Customer Retention Status".into(),
            summary:         format!(
                "Current churn rate of {rate}% represents {} lost customers.",
                format::thousands(m.churned_customers)
            ),
            key_metric:      format!("{rate}% churn rate"),
            business_impact: format!(
                "Estimated revenue impact of {} based on average customer lifetime value.",
                format::currency(revenue, 0)
            ),
            priority,
        })
    }
}

// ── 2. Geography ─────────────────────────────────────────────────────────────

pub struct GeographicRiskRule;

impl InsightRule for GeographicRiskRule {
    type Output = ExecutiveInsight;

    fn name(&self) -> &'static str {
        "geographic_risk"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ExecutiveInsight> {
        let top = highest_churn(&snapshot.geography)?;
        let rate = format::rate(top.churn_rate);

        Some(ExecutiveInsight {
            title:           format!("Geographic Risk Alert: {}", top.segment_value),
            summary:         format!(
                "{} region shows the highest churn rate at {rate}%, affecting {} customers.",
                top.segment_value,
                format::thousands(top.customer_count)
            ),
            key_metric:      format!("{rate}% regional churn"),
            business_impact: "Regional strategy review recommended. \
                              Consider market-specific retention programs."
                .into(),
            priority:        top.risk_level,
        })
    }
}

// ── 3. Inactive customers ────────────────────────────────────────────────────

pub struct InactiveCustomerRule;

impl InsightRule for InactiveCustomerRule {
    type Output = ExecutiveInsight;

    fn name(&self) -> &'static str {
        "inactive_customer_risk"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ExecutiveInsight> {
        let inactive = snapshot.activity_status("Inactive")?;
        let count = format::thousands(inactive.customer_count);

        Some(ExecutiveInsight {
            title:           "Inactive Customer Risk".into(),
            summary:         format!(
                "Inactive customers have a {}% churn rate, representing {count} customers at elevated risk.",
                format::rate(inactive.churn_rate)
            ),
            key_metric:      format!("{count} at-risk customers"),
            business_impact: "Customer engagement programs could significantly \
                              reduce churn in this segment."
                .into(),
            priority:        inactive.risk_level,
        })
    }
}

// ── 4. High-risk summary ─────────────────────────────────────────────────────

pub struct HighRiskSummaryRule;

impl InsightRule for HighRiskSummaryRule {
    type Output = ExecutiveInsight;

    fn name(&self) -> &'static str {
        "high_risk_summary"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ExecutiveInsight> {
        if snapshot.high_risk.is_empty() {
            return None;
        }
        let segments = snapshot.high_risk.len();
        // Overlapping dimensions can count a customer more than once.
        let affected: usize = snapshot
            .high_risk
            .iter()
            .take(HIGH_RISK_SUMMARY_LIMIT)
            .map(|s| s.customer_count)
            .sum();

        Some(ExecutiveInsight {
            title:           "High-Risk Segment Summary".into(),
            summary:         format!(
                "{segments} customer segments identified as high-risk, affecting approximately \
                 {} customers across multiple dimensions.",
                format::thousands(affected)
            ),
            key_metric:      format!("{segments} high-risk segments"),
            business_impact: "Targeted intervention programs for these segments could \
                              improve overall retention by 5-10%."
                .into(),
            priority:        Priority::High,
        })
    }
}

// ── 5. Age group ─────────────────────────────────────────────────────────────

pub struct AgeGroupRiskRule;

impl InsightRule for AgeGroupRiskRule {
    type Output = ExecutiveInsight;

    fn name(&self) -> &'static str {
        "age_group_risk"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ExecutiveInsight> {
        // Age groups arrive sorted by churn rate, highest first.
        let top = snapshot.age_groups.first()?;
        let rate = format::rate(top.churn_rate);

        Some(ExecutiveInsight {
            title:           format!("Age Group Risk: {}", top.segment_value),
            summary:         format!(
                "Customers aged {} show the highest churn rate at {rate}%.",
                top.segment_value
            ),
            key_metric:      format!("{rate}% age group churn"),
            business_impact: "Product and service offerings may need adjustment \
                              for this demographic segment."
                .into(),
            priority:        top.risk_level,
        })
    }
}
