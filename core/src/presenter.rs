//! Console rendering of summaries and insight listings.

use crate::{
    error::InsightsResult,
    format,
    insight::{ExecutiveInsight, ProductInsight},
    report::{ExecutiveSummary, FullReport},
    types::Level,
};

const WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;
const ITEM_WIDTH: usize = 50;

fn priority_marker(level: Level) -> &'static str {
    match level {
        Level::High   => "🔴",
        Level::Medium => "🟡",
        Level::Low    => "🟢",
    }
}

fn effort_marker(level: Level) -> &'static str {
    match level {
        Level::High   => "⬆️",
        Level::Medium => "➡️",
        Level::Low    => "⬇️",
    }
}

fn rule(c: char, n: usize) -> String {
    c.to_string().repeat(n)
}

pub fn render_executive_summary(summary: &ExecutiveSummary) -> String {
    let heavy = rule('=', WIDTH);
    let light = rule('-', SECTION_WIDTH);
    let date = summary.report_date.get(..10).unwrap_or(&summary.report_date);
    let o = &summary.overview;
    let f = &summary.financial_impact;

    let mut out = vec![
        format!("\n{heavy}"),
        "EXECUTIVE SUMMARY - CUSTOMER CHURN ANALYSIS".to_string(),
        heavy.clone(),
        format!("\nReport Date: {date}"),
        format!("\n📊 OVERVIEW\n{light}"),
        format!("Total Customers: {}", format::thousands(o.total_customers)),
        format!("Churn Rate: {}", o.churn_rate),
        format!("Churned Customers: {}", format::thousands(o.churned_customers)),
        format!("Retained Customers: {}", format::thousands(o.retained_customers)),
        format!("\n💰 FINANCIAL IMPACT\n{light}"),
        format!("Estimated Revenue at Risk: {}", f.estimated_revenue_at_risk),
        format!("Average Customer Value: {}", f.avg_customer_value),
        format!("\n⚠️ KEY RISK INDICATORS\n{light}"),
    ];
    out.extend(summary.key_risk_indicators.iter().map(|risk| {
        format!(
            "  • {}: {} - {} ({} customers)",
            risk.dimension,
            risk.segment,
            risk.churn_rate,
            format::thousands(risk.affected_customers)
        )
    }));

    out.push(format!("\n📈 TOP CHURN FACTORS\n{light}"));
    out.extend(
        summary
            .top_churn_correlations
            .iter()
            .map(|c| format!("  • {}: {:.4}", c.factor, c.correlation)),
    );

    out.push(format!("\n{heavy}"));
    out.join("\n") + "\n"
}

pub fn render_insights(executive: &[ExecutiveInsight], product: &[ProductInsight]) -> String {
    let heavy = rule('=', WIDTH);
    let item = rule('-', ITEM_WIDTH);
    let mut out = vec![format!("\n{heavy}\nEXECUTIVE INSIGHTS\n{heavy}")];

    for (i, insight) in executive.iter().enumerate() {
        out.push(format!("\n{}. {} {}", i + 1, priority_marker(insight.priority), insight.title));
        out.push(item.clone());
        out.push(format!("Summary: {}", insight.summary));
        out.push(format!("Key Metric: {}", insight.key_metric));
        out.push(format!("Business Impact: {}", insight.business_impact));
        out.push(format!("Priority: {}", insight.priority));
    }

    out.push(format!("\n{heavy}\nPRODUCT MANAGER INSIGHTS\n{heavy}"));
    for (i, insight) in product.iter().enumerate() {
        out.push(format!(
            "\n{}. {} {}",
            i + 1,
            effort_marker(insight.implementation_effort),
            insight.title
        ));
        out.push(item.clone());
        out.push(format!("Finding: {}", insight.finding));
        out.push(format!("Affected Segment: {}", insight.affected_segment));
        out.push(format!("Recommendation: {}", insight.recommendation));
        out.push(format!("Expected Impact: {}", insight.expected_impact));
        out.push(format!("Implementation Effort: {}", insight.implementation_effort));
    }

    out.push(format!("\n{heavy}"));
    out.join("\n") + "\n"
}

pub fn render_json(report: &FullReport) -> InsightsResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_follow_level() {
        assert_eq!(priority_marker(Level::High), "🔴");
        assert_eq!(priority_marker(Level::Low), "🟢");
        assert_eq!(effort_marker(Level::Medium), "➡️");
    }

    #[test]
    fn insights_are_numbered_from_one() {
        let exec = vec![ExecutiveInsight {
            title:           "Overall Customer Retention Status".into(),
            summary:         "s".into(),
            key_metric:      "20.0% churn rate".into(),
            business_impact: "b".into(),
            priority:        Level::High,
        }];
        let text = render_insights(&exec, &[]);
        assert!(text.contains("1. 🔴 Overall Customer Retention Status"));
        assert!(text.contains("Priority: HIGH"));
        assert!(text.contains("PRODUCT MANAGER INSIGHTS"));
    }
}
