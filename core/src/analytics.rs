//! Segment analytics engine: churn statistics over one customer table.
//!
//! Every method recomputes from the table it borrows; nothing is cached,
//! so calls may be repeated or reordered freely.
//!
//! Rates are computed on unrounded doubles and rounded only when a result
//! value is built. A segment's risk level is classified from its rounded
//! churn rate, so the level always agrees with the printed rate.

use crate::{
    error::InsightsResult,
    stats::{self, round_to},
    table::CustomerTable,
    types::{Dimension, RiskLevel},
};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::collections::HashMap;

pub const HIGH_RISK_THRESHOLD: f64 = 25.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 15.0;

pub const DEFAULT_TARGET: &str = "Exited";

// Half-open (lower, upper] bins.
const AGE_BINS: [(f64, f64, &str); 6] = [
    (0.0, 25.0, "18-25"),
    (25.0, 35.0, "26-35"),
    (35.0, 45.0, "36-45"),
    (45.0, 55.0, "46-55"),
    (55.0, 65.0, "56-65"),
    (65.0, 100.0, "65+"),
];

const TENURE_BINS: [(f64, f64, &str); 5] = [
    (0.0, 2.0, "0-2 years"),
    (2.0, 4.0, "2-4 years"),
    (4.0, 6.0, "4-6 years"),
    (6.0, 8.0, "6-8 years"),
    (8.0, 10.0, "8-10 years"),
];

const BALANCE_TIERS: [&str; 5] = [
    "Zero Balance",
    "Low (<50K)",
    "Medium (50K-100K)",
    "High (100K-150K)",
    "Premium (>150K)",
];

const ACTIVITY_STATUSES: [&str; 2] = ["Active", "Inactive"];

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChurnMetrics {
    pub overall_churn_rate: f64,
    pub churned_customers:  usize,
    pub retained_customers: usize,
    pub total_customers:    usize,
}

/// One group of a segmented churn analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentInsight {
    pub segment_name:        Dimension,
    pub segment_value:       String,
    pub churn_rate:          f64,
    pub customer_count:      usize,
    pub percentage_of_total: f64,
    pub risk_level:          RiskLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureSummary {
    pub mean:   f64,
    pub median: f64,
    pub std:    f64,
    pub min:    f64,
    pub max:    f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GroupComparison {
    pub churned_avg:    f64,
    pub retained_avg:   f64,
    pub difference:     f64,
    /// Relative to the retained average; 0 when that average is 0.
    pub difference_pct: f64,
}

/// Insertion-ordered feature → value mapping. Serializes as a JSON object
/// with keys in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMap<T>(Vec<(String, T)>);

impl<T> FeatureMap<T> {
    pub fn get(&self, feature: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == feature).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<Vec<(String, T)>> for FeatureMap<T> {
    fn from(entries: Vec<(String, T)>) -> Self {
        Self(entries)
    }
}

impl<T: Serialize> Serialize for FeatureMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Classify a churn rate (percent). Boundaries belong to the higher tier.
pub fn risk_level(churn_rate: f64) -> RiskLevel {
    if churn_rate >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if churn_rate >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ── Engine ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count:   usize,
    churned: f64,
}

impl Tally {
    fn add(&mut self, outcome: f64) {
        self.count += 1;
        self.churned += outcome;
    }
}

pub struct ChurnAnalytics<'a> {
    table:  &'a CustomerTable,
    target: String,
}

impl<'a> ChurnAnalytics<'a> {
    pub fn new(table: &'a CustomerTable) -> Self {
        Self::with_target(table, DEFAULT_TARGET)
    }

    pub fn with_target(table: &'a CustomerTable, target: impl Into<String>) -> Self {
        Self {
            table,
            target: target.into(),
        }
    }

    pub fn table(&self) -> &'a CustomerTable {
        self.table
    }

    fn outcome(&self) -> InsightsResult<&'a [f64]> {
        self.table.numeric(&self.target)
    }

    pub fn risk_level(&self, churn_rate: f64) -> RiskLevel {
        risk_level(churn_rate)
    }

    pub fn churn_metrics(&self) -> InsightsResult<ChurnMetrics> {
        let outcome = self.outcome()?;
        let total = outcome.len();
        let churned = outcome.iter().sum::<f64>().round() as usize;
        let rate = if total > 0 {
            churned as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(ChurnMetrics {
            overall_churn_rate: round_to(rate, 2),
            churned_customers:  churned,
            retained_customers: total.saturating_sub(churned),
            total_customers:    total,
        })
    }

    /// Group by every distinct value of `column`, or only `value` when given.
    /// Groups appear in first-seen order before the churn-rate sort.
    pub fn analyze_segment(
        &self,
        column: &str,
        value: Option<&str>,
    ) -> InsightsResult<Vec<SegmentInsight>> {
        let col = self.table.column(column)?;
        let outcome = self.outcome()?;

        let mut order: Vec<(String, Tally)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (row, y) in outcome.iter().enumerate() {
            let Some(key) = col.key_at(row) else { continue };
            if value.is_some_and(|v| v != key) {
                continue;
            }
            let slot = match index.get(&key) {
                Some(&i) => i,
                None => {
                    index.insert(key.clone(), order.len());
                    order.push((key, Tally::default()));
                    order.len() - 1
                }
            };
            order[slot].1.add(*y);
        }

        Ok(self.build_segments(column, order))
    }

    pub fn geography_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        self.analyze_segment("Geography", None)
    }

    pub fn gender_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        self.analyze_segment("Gender", None)
    }

    pub fn age_group_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        let ages = self.table.numeric("Age")?;
        self.binned("AgeGroup", ages, &AGE_BINS)
    }

    /// First matching tier wins, in the order of `BALANCE_TIERS`.
    pub fn balance_tier_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        let balances = self.table.numeric("Balance")?;
        let outcome = self.outcome()?;

        let mut tallies = [Tally::default(); 5];
        for (balance, y) in balances.iter().zip(outcome) {
            if let Some(tier) = balance_tier(*balance) {
                tallies[tier].add(*y);
            }
        }

        let groups = BALANCE_TIERS
            .iter()
            .zip(tallies)
            .map(|(label, t)| (label.to_string(), t))
            .collect();
        Ok(self.build_segments("BalanceTier", groups))
    }

    /// Tenure 0 falls outside every bin and is excluded.
    pub fn tenure_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        let tenure = self.table.numeric("Tenure")?;
        self.binned("TenureGroup", tenure, &TENURE_BINS)
    }

    pub fn product_usage_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        self.analyze_segment("NumOfProducts", None)
    }

    pub fn activity_analysis(&self) -> InsightsResult<Vec<SegmentInsight>> {
        let flags = self.table.numeric("IsActiveMember")?;
        let outcome = self.outcome()?;

        let mut tallies = [Tally::default(); 2];
        for (flag, y) in flags.iter().zip(outcome) {
            if *flag == 1.0 {
                tallies[0].add(*y);
            } else if *flag == 0.0 {
                tallies[1].add(*y);
            }
        }

        let groups = ACTIVITY_STATUSES
            .iter()
            .zip(tallies)
            .map(|(label, t)| (label.to_string(), t))
            .collect();
        Ok(self.build_segments("ActivityStatus", groups))
    }

    /// Pearson correlation of each numeric feature with the outcome,
    /// ordered by descending absolute value.
    pub fn correlation_analysis(&self) -> InsightsResult<FeatureMap<f64>> {
        let outcome = self.outcome()?;

        let mut entries: Vec<(String, f64)> = Vec::new();
        for name in self.feature_columns() {
            let values = self.table.numeric(name)?;
            entries.push((name.to_string(), round_to(stats::pearson(values, outcome), 4)));
        }

        entries.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(entries.into())
    }

    /// HIGH-risk segments across the key dimensions, highest churn first.
    pub fn high_risk_segments(&self) -> InsightsResult<Vec<SegmentInsight>> {
        let mut all = Vec::new();
        all.extend(self.geography_analysis()?);
        all.extend(self.gender_analysis()?);
        all.extend(self.age_group_analysis()?);
        all.extend(self.product_usage_analysis()?);
        all.extend(self.activity_analysis()?);
        all.extend(self.balance_tier_analysis()?);

        let mut high: Vec<SegmentInsight> = all
            .into_iter()
            .filter(|s| s.risk_level == RiskLevel::High)
            .collect();
        sort_by_churn_desc(&mut high);
        Ok(high)
    }

    pub fn summary_statistics(&self) -> InsightsResult<FeatureMap<FeatureSummary>> {
        let mut entries = Vec::new();
        for name in self.feature_columns() {
            let values = self.table.numeric(name)?;
            entries.push((
                name.to_string(),
                FeatureSummary {
                    mean:   round_to(stats::mean(values), 2),
                    median: round_to(stats::median(values), 2),
                    std:    round_to(stats::sample_std(values), 2),
                    min:    round_to(stats::min(values), 2),
                    max:    round_to(stats::max(values), 2),
                },
            ));
        }
        Ok(entries.into())
    }

    pub fn churned_vs_retained_comparison(&self) -> InsightsResult<FeatureMap<GroupComparison>> {
        let outcome = self.outcome()?;

        let mut entries = Vec::new();
        for name in self.feature_columns() {
            let values = self.table.numeric(name)?;
            let (churned, retained): (Vec<(f64, f64)>, Vec<(f64, f64)>) = values
                .iter()
                .zip(outcome)
                .map(|(v, y)| (*v, *y))
                .partition(|(_, y)| *y == 1.0);

            let churned_avg = stats::mean(&churned.iter().map(|(v, _)| *v).collect::<Vec<_>>());
            let retained_avg = stats::mean(&retained.iter().map(|(v, _)| *v).collect::<Vec<_>>());
            let difference = churned_avg - retained_avg;
            let difference_pct = if retained_avg != 0.0 {
                difference / retained_avg * 100.0
            } else {
                0.0
            };

            entries.push((
                name.to_string(),
                GroupComparison {
                    churned_avg:    round_to(churned_avg, 2),
                    retained_avg:   round_to(retained_avg, 2),
                    difference:     round_to(difference, 2),
                    difference_pct: round_to(difference_pct, 2),
                },
            ));
        }
        Ok(entries.into())
    }

    /// Unrounded mean of a numeric column.
    pub fn mean_of(&self, column: &str) -> InsightsResult<f64> {
        Ok(stats::mean(self.table.numeric(column)?))
    }

    // ── Internals ────────────────────────────────────────────────

    /// Numeric columns other than the outcome, in table order.
    fn feature_columns(&self) -> Vec<&'a str> {
        self.table
            .numeric_column_names()
            .into_iter()
            .filter(|name| *name != self.target)
            .collect()
    }

    fn binned(
        &self,
        dimension: &str,
        values: &[f64],
        bins: &[(f64, f64, &str)],
    ) -> InsightsResult<Vec<SegmentInsight>> {
        let outcome = self.outcome()?;

        let mut tallies = vec![Tally::default(); bins.len()];
        for (v, y) in values.iter().zip(outcome) {
            if let Some(i) = bins.iter().position(|(lo, hi, _)| *v > *lo && *v <= *hi) {
                tallies[i].add(*y);
            }
        }

        let groups = bins
            .iter()
            .zip(tallies)
            .map(|((_, _, label), t)| (label.to_string(), t))
            .collect();
        Ok(self.build_segments(dimension, groups))
    }

    fn build_segments(&self, dimension: &str, groups: Vec<(String, Tally)>) -> Vec<SegmentInsight> {
        let total = self.table.row_count();

        let mut segments: Vec<SegmentInsight> = groups
            .into_iter()
            .filter(|(_, t)| t.count > 0)
            .map(|(value, t)| {
                let churn_rate = round_to(t.churned / t.count as f64 * 100.0, 2);
                SegmentInsight {
                    segment_name: dimension.to_string(),
                    segment_value: value,
                    churn_rate,
                    customer_count: t.count,
                    percentage_of_total: round_to(t.count as f64 / total as f64 * 100.0, 2),
                    risk_level: risk_level(churn_rate),
                }
            })
            .collect();

        sort_by_churn_desc(&mut segments);
        segments
    }
}

/// Index into `BALANCE_TIERS`, evaluated as a chained conditional.
fn balance_tier(balance: f64) -> Option<usize> {
    if balance.is_nan() {
        None
    } else if balance == 0.0 {
        Some(0)
    } else if balance < 50_000.0 {
        Some(1)
    } else if balance < 100_000.0 {
        Some(2)
    } else if balance < 150_000.0 {
        Some(3)
    } else {
        Some(4)
    }
}

/// Stable: equal rates keep their traversal order.
fn sort_by_churn_desc(segments: &mut [SegmentInsight]) {
    segments.sort_by(|a, b| {
        b.churn_rate
            .partial_cmp(&a.churn_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
