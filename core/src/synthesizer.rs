//! The insight synthesizer: turns analytics into ordered narrative records.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   Executive:
//!     1. Overall retention
//!     2. Geographic risk
//!     3. Inactive customer risk
//!     4. High-risk summary
//!     5. Age group risk
//!   Product:
//!     1. Product portfolio
//!     2. Customer engagement
//!     3. Zero balance retention
//!     4. New customer onboarding
//!     5. Senior experience
//!     6. Credit score indicator
//!     7. Gender retention strategy
//!
//! RULES:
//!   - Rules are evaluated in registration order against one snapshot.
//!   - No rule reads another rule's output.
//!   - Every rule emits at most one record.

use crate::{
    analytics::{ChurnAnalytics, ChurnMetrics},
    config::RevenueAssumptions,
    error::InsightsResult,
    executive_insights::{
        AgeGroupRiskRule, GeographicRiskRule, HighRiskSummaryRule, InactiveCustomerRule,
        OverallRetentionRule,
    },
    insight::{AnalyticsSnapshot, ExecutiveInsight, ExecutiveRule, ProductInsight, ProductRule},
    product_insights::{
        CreditScoreRule, EngagementRule, GenderStrategyRule, OnboardingRule,
        ProductPortfolioRule, SeniorExperienceRule, ZeroBalanceRule,
    },
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedInsights {
    pub executive: Vec<ExecutiveInsight>,
    pub product:   Vec<ProductInsight>,
}

#[derive(Default)]
pub struct InsightSynthesizer {
    executive_rules: Vec<ExecutiveRule>,
    product_rules:   Vec<ProductRule>,
}

impl InsightSynthesizer {
    /// An empty synthesizer. Nothing fires until rules are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a synthesizer with every rule registered in the documented order.
    pub fn build(revenue: &RevenueAssumptions) -> Self {
        let mut synth = Self::new();

        synth.register_executive(Box::new(OverallRetentionRule::new(
            revenue.lifetime_value_per_customer,
        )));
        synth.register_executive(Box::new(GeographicRiskRule));
        synth.register_executive(Box::new(InactiveCustomerRule));
        synth.register_executive(Box::new(HighRiskSummaryRule));
        synth.register_executive(Box::new(AgeGroupRiskRule));

        synth.register_product(Box::new(ProductPortfolioRule));
        synth.register_product(Box::new(EngagementRule));
        synth.register_product(Box::new(ZeroBalanceRule));
        synth.register_product(Box::new(OnboardingRule));
        synth.register_product(Box::new(SeniorExperienceRule));
        synth.register_product(Box::new(CreditScoreRule));
        synth.register_product(Box::new(GenderStrategyRule));

        synth
    }

    /// Register an executive rule. Call in the documented order.
    pub fn register_executive(&mut self, rule: ExecutiveRule) {
        self.executive_rules.push(rule);
    }

    /// Register a product rule. Call in the documented order.
    pub fn register_product(&mut self, rule: ProductRule) {
        self.product_rules.push(rule);
    }

    pub fn executive_rule_names(&self) -> Vec<&'static str> {
        self.executive_rules.iter().map(|r| r.name()).collect()
    }

    pub fn product_rule_names(&self) -> Vec<&'static str> {
        self.product_rules.iter().map(|r| r.name()).collect()
    }

    pub fn executive_insights(&self, snapshot: &AnalyticsSnapshot) -> Vec<ExecutiveInsight> {
        self.executive_rules
            .iter()
            .filter_map(|rule| {
                let fired = rule.evaluate(snapshot);
                if fired.is_some() {
                    log::debug!("executive rule '{}' fired", rule.name());
                }
                fired
            })
            .collect()
    }

    pub fn product_insights(&self, snapshot: &AnalyticsSnapshot) -> Vec<ProductInsight> {
        self.product_rules
            .iter()
            .filter_map(|rule| {
                let fired = rule.evaluate(snapshot);
                if fired.is_some() {
                    log::debug!("product rule '{}' fired", rule.name());
                }
                fired
            })
            .collect()
    }

    /// Capture one snapshot and run every registered rule against it.
    pub fn synthesize(
        &self,
        analytics: &ChurnAnalytics<'_>,
        metrics: ChurnMetrics,
    ) -> InsightsResult<SynthesizedInsights> {
        let snapshot = AnalyticsSnapshot::capture(analytics, metrics)?;
        let executive = self.executive_insights(&snapshot);
        let product = self.product_insights(&snapshot);
        log::debug!(
            "synthesized {} executive and {} product insights",
            executive.len(),
            product.len()
        );
        Ok(SynthesizedInsights { executive, product })
    }
}
