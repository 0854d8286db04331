//! Product insight rules: actionable findings for product managers.
//!
//! Each rule fires on a strict threshold and stays silent otherwise.
//! Emission order (see synthesizer.rs):
//!   1. Product portfolio    first product group above PRODUCT_CHURN_ALERT
//!   2. Engagement           Inactive segment above PRODUCT_CHURN_ALERT
//!   3. Zero balance         "Zero" balance tier above PRODUCT_CHURN_ALERT
//!   4. Onboarding           "0-2" tenure group above NEW_CUSTOMER_CHURN_ALERT
//!   5. Senior experience    "65" age group above SENIOR_CHURN_ALERT
//!   6. Credit score         churned minus retained credit score below CREDIT_GAP_ALERT
//!   7. Gender strategy      highest-churn gender above PRODUCT_CHURN_ALERT

use crate::{
    format,
    insight::{highest_churn, AnalyticsSnapshot, InsightRule, ProductInsight},
    types::Priority,
};

pub const PRODUCT_CHURN_ALERT: f64 = 20.0;
pub const NEW_CUSTOMER_CHURN_ALERT: f64 = 18.0;
pub const SENIOR_CHURN_ALERT: f64 = 25.0;
/// Points of credit score by which churners trail retained customers.
pub const CREDIT_GAP_ALERT: f64 = -20.0;

// ── 1. Product portfolio ─────────────────────────────────────────────────────

pub struct ProductPortfolioRule;

impl InsightRule for ProductPortfolioRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "product_portfolio"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        // Product groups are sorted by churn rate, so the first match is the worst.
        let worst = snapshot
            .products
            .iter()
            .find(|p| p.churn_rate > PRODUCT_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "Product Portfolio Optimization".into(),
            finding:               format!(
                "Customers with {} products have a {}% churn rate.",
                worst.segment_value,
                format::rate(worst.churn_rate)
            ),
            affected_segment:      format!(
                "{} customers ({}% of total)",
                format::thousands(worst.customer_count),
                format::rate(worst.percentage_of_total)
            ),
            recommendation:        "Review product bundling strategy. Consider creating product \
                                    combinations that increase engagement and reduce churn."
                .into(),
            expected_impact:       "5-8% reduction in churn for affected segment".into(),
            implementation_effort: Priority::Medium,
        })
    }
}

// ── 2. Engagement ────────────────────────────────────────────────────────────

pub struct EngagementRule;

impl InsightRule for EngagementRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "customer_engagement"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let inactive = snapshot
            .activity_status("Inactive")
            .filter(|s| s.churn_rate > PRODUCT_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "Customer Engagement Enhancement".into(),
            finding:               format!(
                "Inactive members churn at {}%, significantly higher than active members.",
                format::rate(inactive.churn_rate)
            ),
            affected_segment:      format!(
                "{} inactive customers ({}% of base)",
                format::thousands(inactive.customer_count),
                format::rate(inactive.percentage_of_total)
            ),
            recommendation:        "Implement a re-engagement program: personalized notifications, \
                                    special offers, and feature highlights to drive activity."
                .into(),
            expected_impact:       "10-15% conversion from inactive to active, reducing churn by \
                                    3-5% in this segment"
                .into(),
            implementation_effort: Priority::Low,
        })
    }
}

// ── 3. Zero balance ──────────────────────────────────────────────────────────

pub struct ZeroBalanceRule;

impl InsightRule for ZeroBalanceRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "zero_balance_retention"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let zero = snapshot
            .balance_tiers
            .iter()
            .find(|s| s.segment_value.contains("Zero"))
            .filter(|s| s.churn_rate > PRODUCT_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "Zero Balance Customer Retention".into(),
            finding:               format!(
                "Customers with zero balance have a {}% churn rate.",
                format::rate(zero.churn_rate)
            ),
            affected_segment:      format!(
                "{} customers ({}% of base)",
                format::thousands(zero.customer_count),
                format::rate(zero.percentage_of_total)
            ),
            recommendation:        "Introduce incentive programs for maintaining minimum balance: \
                                    bonus interest rates, fee waivers, or loyalty points."
                .into(),
            expected_impact:       "15-20% reduction in zero-balance customer churn".into(),
            implementation_effort: Priority::Medium,
        })
    }
}

// ── 4. Onboarding ────────────────────────────────────────────────────────────

pub struct OnboardingRule;

impl InsightRule for OnboardingRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "new_customer_onboarding"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let newest = snapshot
            .tenure
            .iter()
            .find(|s| s.segment_value.contains("0-2"))
            .filter(|s| s.churn_rate > NEW_CUSTOMER_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "New Customer Onboarding Improvement".into(),
            finding:               format!(
                "Customers with 0-2 years tenure have a {}% churn rate.",
                format::rate(newest.churn_rate)
            ),
            affected_segment:      format!(
                "{} new customers",
                format::thousands(newest.customer_count)
            ),
            recommendation:        "Enhance onboarding experience: welcome program, guided product \
                                    tours, early engagement touchpoints, and first-year benefits."
                .into(),
            expected_impact:       "20-25% improvement in first-year retention".into(),
            implementation_effort: Priority::Medium,
        })
    }
}

// ── 5. Senior customers ──────────────────────────────────────────────────────

pub struct SeniorExperienceRule;

impl InsightRule for SeniorExperienceRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "senior_experience"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let senior = snapshot
            .age_groups
            .iter()
            .find(|s| s.segment_value.contains("65"))
            .filter(|s| s.churn_rate > SENIOR_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "Senior Customer Experience".into(),
            finding:               format!(
                "Senior customers (65+) have a {}% churn rate.",
                format::rate(senior.churn_rate)
            ),
            affected_segment:      format!(
                "{} senior customers",
                format::thousands(senior.customer_count)
            ),
            recommendation:        "Develop senior-friendly features: simplified UI, dedicated \
                                    support line, in-branch services, and retirement planning tools."
                .into(),
            expected_impact:       "10-15% churn reduction for seniors".into(),
            implementation_effort: Priority::High,
        })
    }
}

// ── 6. Credit score ──────────────────────────────────────────────────────────

pub struct CreditScoreRule;

impl InsightRule for CreditScoreRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "credit_score_indicator"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let gap = snapshot
            .comparison
            .get("CreditScore")
            .map(|c| c.difference)
            .filter(|d| *d < CREDIT_GAP_ALERT)?;

        Some(ProductInsight {
            title:                 "Credit Score Risk Indicator".into(),
            finding:               format!(
                "Churned customers have lower average credit scores by {:.0} points.",
                gap.abs()
            ),
            affected_segment:      "Customers with below-average credit scores".into(),
            recommendation:        "Implement credit improvement programs: financial education, \
                                    credit monitoring tools, and personalized financial advice."
                .into(),
            expected_impact:       "Improved customer financial health and 5-7% churn reduction"
                .into(),
            implementation_effort: Priority::High,
        })
    }
}

// ── 7. Gender ────────────────────────────────────────────────────────────────

pub struct GenderStrategyRule;

impl InsightRule for GenderStrategyRule {
    type Output = ProductInsight;

    fn name(&self) -> &'static str {
        "gender_retention_strategy"
    }

    fn evaluate(&self, snapshot: &AnalyticsSnapshot) -> Option<ProductInsight> {
        let top = highest_churn(&snapshot.gender).filter(|s| s.churn_rate > PRODUCT_CHURN_ALERT)?;

        Some(ProductInsight {
            title:                 "Gender-Specific Retention Strategy".into(),
            finding:               format!(
                "{} customers have a {}% churn rate.",
                top.segment_value,
                format::rate(top.churn_rate)
            ),
            affected_segment:      format!(
                "{} {} customers",
                format::thousands(top.customer_count),
                top.segment_value.to_lowercase()
            ),
            recommendation:        "Conduct customer research to understand gender-specific needs \
                                    and preferences. Develop targeted marketing and product features."
                .into(),
            expected_impact:       "3-5% churn reduction through personalization".into(),
            implementation_effort: Priority::Medium,
        })
    }
}
