//! Read-only commands: evaluate, hierarchy, summary, validate

use super::Service;
use crate::output::{self, band_label, derived_number, print_success, print_warning, OutputFormat};
use anyhow::{bail, Result};
use indicator_engine::{
    Derived, IndicatorEvaluation, IndicatorHierarchy, PortfolioSummary, ResultNode, Trend,
};
use indicator_store::PolicyIssue;
use indicator_types::Indicator;
use tabled::Tabled;

/// Evaluation table row
#[derive(Tabled)]
struct EvaluationRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "ACHIEVEMENT")]
    achievement: String,
    #[tabled(rename = "BAND")]
    band: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TREND")]
    trend: String,
    #[tabled(rename = "ALERT")]
    alert: String,
}

impl From<&IndicatorEvaluation> for EvaluationRow {
    fn from(e: &IndicatorEvaluation) -> Self {
        Self {
            code: e.code.clone(),
            kind: e.kind.to_string(),
            value: derived_number(&e.current_value, ""),
            achievement: derived_number(&e.achievement_pct, "%"),
            band: band_label(e.band).to_string(),
            status: match e.coarse_status {
                Derived::Available(status) => status.label().to_string(),
                Derived::Insufficient(_) => "-".to_string(),
            },
            trend: match e.trend {
                Derived::Available(trend) => trend_label(trend).to_string(),
                Derived::Insufficient(_) => "-".to_string(),
            },
            alert: if e.alert_triggered() { "yes" } else { "no" }.to_string(),
        }
    }
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "improving",
        Trend::Stable => "stable",
        Trend::Declining => "declining",
        Trend::Fluctuating => "fluctuating",
    }
}

/// Policy issue table row
#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "PROBLEM")]
    message: String,
}

impl From<&PolicyIssue> for IssueRow {
    fn from(issue: &PolicyIssue) -> Self {
        Self {
            code: issue.code.clone(),
            message: issue.message.clone(),
        }
    }
}

/// Summary table row
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "METRIC")]
    metric: &'static str,
    #[tabled(rename = "COUNT")]
    count: String,
}

fn summary_rows(summary: &PortfolioSummary) -> Vec<SummaryRow> {
    let counts = [
        ("indicators", summary.total),
        ("green", summary.bands.green),
        ("yellow", summary.bands.yellow),
        ("red", summary.bands.red),
        ("band unknown", summary.bands.unknown),
        ("achieved", summary.coarse.achieved),
        ("on target", summary.coarse.on_target),
        ("below target", summary.coarse.below_target),
        ("at risk", summary.coarse.at_risk),
        ("no achievement", summary.coarse.not_available),
        ("alerts", summary.alerts),
        ("without data", summary.without_data),
    ];
    let mut rows: Vec<SummaryRow> = counts
        .into_iter()
        .map(|(metric, count)| SummaryRow {
            metric,
            count: count.to_string(),
        })
        .collect();
    rows.push(SummaryRow {
        metric: "green share",
        count: summary
            .green_share_pct()
            .map(|pct| format!("{:.1}%", pct))
            .unwrap_or_else(|| "-".to_string()),
    });
    rows
}

/// Evaluate one indicator, or all of them when `code` is absent
pub async fn evaluate(service: &Service, code: Option<&str>, format: OutputFormat) -> Result<()> {
    match code {
        Some(code) => {
            let evaluation = service.evaluate(code).await?;
            let rows = vec![EvaluationRow::from(&evaluation)];
            output::print_output(&evaluation, rows, format)
        }
        None => {
            let evaluations = service.evaluate_all().await?;
            let rows: Vec<EvaluationRow> = evaluations.iter().map(EvaluationRow::from).collect();
            output::print_output(&evaluations, rows, format)
        }
    }
}

/// Print the KRI → RI → PI/KPI tree
pub async fn hierarchy(service: &Service, format: OutputFormat) -> Result<()> {
    let tree = service.hierarchy().await?;
    match format {
        OutputFormat::Json => output::print_json(&tree),
        OutputFormat::Table => {
            for line in tree_lines(&tree) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn tree_lines(tree: &IndicatorHierarchy) -> Vec<String> {
    fn label(indicator: &Indicator) -> String {
        format!("{} [{}] {}", indicator.code, indicator.kind, indicator.name)
    }

    fn result_lines(node: &ResultNode, indent: &str, lines: &mut Vec<String>) {
        lines.push(format!("{}{}", indent, label(&node.indicator)));
        for pi in &node.performance {
            lines.push(format!("{}    {}", indent, label(pi)));
        }
    }

    let mut lines = Vec::with_capacity(tree.len());
    for kri in &tree.rooted {
        lines.push(label(&kri.indicator));
        for ri in &kri.results {
            result_lines(ri, "    ", &mut lines);
        }
    }
    for ri in &tree.standalone_ris {
        result_lines(ri, "", &mut lines);
    }
    for pi in &tree.standalone_pis {
        lines.push(label(pi));
    }
    lines
}

/// Print portfolio dashboard counts
pub async fn summary(service: &Service, format: OutputFormat) -> Result<()> {
    let summary = service.portfolio_summary().await?;
    output::print_output(&summary, summary_rows(&summary), format)
}

/// Check every indicator policy; fails when any problem is found
pub async fn validate(service: &Service, format: OutputFormat) -> Result<()> {
    let issues = service.validate().await?;
    let rows: Vec<IssueRow> = issues.iter().map(IssueRow::from).collect();
    output::print_output(&issues, rows, format)?;

    if issues.is_empty() {
        print_success("All indicator policies are valid");
        Ok(())
    } else {
        print_warning(&format!("{} indicator(s) with policy problems", issues.len()));
        bail!("policy validation failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicator_engine::assemble_hierarchy;
    use indicator_types::{IndicatorKind, SuccessFactorId};

    #[test]
    fn test_tree_lines_nest_results_under_key_results() {
        let csf = SuccessFactorId::generate();
        let kri = Indicator::new("K1", "Revenue growth", IndicatorKind::Kri, csf);
        let ri = Indicator::new("R1", "New accounts", IndicatorKind::Ri, csf).with_parent(kri.id);
        let pi = Indicator::new("P1", "Calls made", IndicatorKind::Pi, csf).with_parent(ri.id);

        let tree = assemble_hierarchy(&[kri], &[ri], &[pi]);
        let lines = tree_lines(&tree);

        assert_eq!(
            lines,
            vec![
                "K1 [KRI] Revenue growth".to_string(),
                "    R1 [RI] New accounts".to_string(),
                "        P1 [PI] Calls made".to_string(),
            ]
        );
    }

    #[test]
    fn test_summary_rows_cover_counts_and_share() {
        let mut summary = PortfolioSummary::default();
        summary.total = 4;
        summary.bands.green = 1;
        summary.alerts = 2;

        let rows = summary_rows(&summary);
        let find = |metric: &str| {
            rows.iter()
                .find(|r| r.metric == metric)
                .map(|r| r.count.clone())
                .unwrap()
        };
        assert_eq!(find("indicators"), "4");
        assert_eq!(find("alerts"), "2");
        assert_eq!(find("green share"), "25.0%");

        let empty = summary_rows(&PortfolioSummary::default());
        assert_eq!(empty.last().map(|r| r.count.as_str()), Some("-"));
    }
}
