use std::fmt::Write;

use crate::error::{ReportError, Result};
use crate::models::{ReportRequest, Snapshot};

const RECOMMENDATIONS: [&str; 4] = [
    "Continue monitoring Layer 2 for water stress patterns",
    "Consider adjusting irrigation schedule for optimal CWSI levels",
    "Review ventilation system performance in Layer 3",
    "Implement preventive measures for potential fungal infections",
];

const CLOSING_LINE: &str =
    "This report was generated automatically by the Thermal Monitoring System.";

fn heading(output: &mut String, title: &str) {
    let _ = writeln!(output, "{title}");
    let _ = writeln!(output, "{}", "=".repeat(title.chars().count()));
}

/// Formats a report document from a snapshot. Values are passed through as
/// given; nothing is recomputed.
pub fn assemble(request: &ReportRequest, snapshot: &Snapshot) -> Result<String> {
    let summary = &snapshot.summary;
    let health_score = summary
        .health_score
        .ok_or(ReportError::MissingSnapshotField("healthScore"))?;
    let total_alerts = summary
        .total_alerts
        .ok_or(ReportError::MissingSnapshotField("totalAlerts"))?;
    let water_efficiency = summary
        .water_efficiency
        .ok_or(ReportError::MissingSnapshotField("waterEfficiency"))?;
    let avg_temperature = summary
        .avg_temperature
        .ok_or(ReportError::MissingSnapshotField("avgTemperature"))?;
    let daily_data = snapshot
        .daily_data
        .as_deref()
        .ok_or(ReportError::MissingSnapshotField("dailyData"))?;
    let performance_metrics = snapshot
        .performance_metrics
        .as_deref()
        .ok_or(ReportError::MissingSnapshotField("performanceMetrics"))?;
    let anomaly_insights = snapshot
        .anomaly_insights
        .as_deref()
        .ok_or(ReportError::MissingSnapshotField("anomalyInsights"))?;

    let mut output = String::new();

    let _ = writeln!(output, "THERMAL MONITORING SYSTEM REPORT");
    let _ = writeln!(output, "{} REPORT", request.kind.label().to_uppercase());
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Generated: {}",
        request.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(range) = request.date_range {
        let _ = writeln!(output, "Period: {} to {}", range.start, range.end);
    }

    let _ = writeln!(output);
    heading(&mut output, "EXECUTIVE SUMMARY");
    let _ = writeln!(output, "Health Score: {health_score}%");
    let _ = writeln!(output, "Total Alerts: {total_alerts}");
    let _ = writeln!(output, "Water Efficiency: {water_efficiency}%");
    let _ = writeln!(output, "Average Temperature: {avg_temperature}°C");

    let _ = writeln!(output);
    heading(&mut output, "PERFORMANCE METRICS");
    for metric in performance_metrics {
        let _ = writeln!(
            output,
            "• {}: {} ({})",
            metric.name, metric.value, metric.trend_delta
        );
    }

    let _ = writeln!(output);
    heading(&mut output, "ANOMALY DETECTION");
    for (index, insight) in anomaly_insights.iter().enumerate() {
        if index > 0 {
            let _ = writeln!(output);
        }
        let _ = writeln!(
            output,
            "• {} ({}): {}",
            insight.category, insight.severity, insight.description
        );
        let _ = writeln!(output, "  Recommendation: {}", insight.recommendation);
    }

    let _ = writeln!(output);
    heading(&mut output, "DAILY TRENDS");
    for day in daily_data {
        let _ = writeln!(
            output,
            "Date: {} | Health: {}% | Alerts: {} | Temp: {}°C",
            day.date, day.health_score, day.alert_count, day.avg_temp
        );
    }

    let _ = writeln!(output);
    heading(&mut output, "RECOMMENDATIONS");
    for (index, line) in RECOMMENDATIONS.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", index + 1, line);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{CLOSING_LINE}");

    Ok(output)
}

/// `thermal-monitoring-<kind>-report-<YYYY-MM-DD>.txt`, dated in UTC.
pub fn file_name(request: &ReportRequest) -> String {
    format!(
        "thermal-monitoring-{}-report-{}.txt",
        request.kind.slug(),
        request.utc_date().format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, ReportKind};
    use crate::sample;
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

    fn generated_at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 16, 14, 5, 9)
            .unwrap()
    }

    fn request(kind: ReportKind) -> ReportRequest {
        ReportRequest::new(kind, generated_at(), None)
    }

    fn section<'a>(document: &'a str, title: &str) -> Vec<&'a str> {
        document
            .lines()
            .skip_while(|line| *line != title)
            .skip(2)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn header_names_each_kind() {
        let snapshot = sample::snapshot().unwrap();
        for kind in ReportKind::ALL {
            let document = assemble(&request(kind), &snapshot).unwrap();
            let expected = format!("{} REPORT", kind.label().to_uppercase());
            assert_eq!(document.lines().nth(1), Some(expected.as_str()));
            assert!(document.starts_with("THERMAL MONITORING SYSTEM REPORT\n"));
            assert!(document.contains("Generated: 2026-10-16 14:05:09\n"));
        }
    }

    #[test]
    fn assembling_twice_is_byte_identical() {
        let snapshot = sample::snapshot().unwrap();
        let before = snapshot.clone();
        let first = assemble(&request(ReportKind::Monthly), &snapshot).unwrap();
        let second = assemble(&request(ReportKind::Monthly), &snapshot).unwrap();
        assert_eq!(first, second);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn weekly_report_matches_dashboard_figures() {
        let snapshot = sample::snapshot().unwrap();
        let document = assemble(&request(ReportKind::Weekly), &snapshot).unwrap();

        assert!(document.lines().any(|line| line == "Health Score: 89.7%"));
        assert!(document.lines().any(|line| line == "Total Alerts: 9"));
        assert!(document.lines().any(|line| line == "Water Efficiency: 85%"));
        assert!(document.lines().any(|line| line == "Average Temperature: 28.9°C"));

        let daily = section(&document, "DAILY TRENDS");
        assert_eq!(daily.len(), 7);
        assert_eq!(
            daily[0],
            "Date: 2024-01-01 | Health: 92% | Alerts: 2 | Temp: 28.5°C"
        );
        assert_eq!(
            daily[6],
            "Date: 2024-01-07 | Health: 94% | Alerts: 0 | Temp: 28.2°C"
        );

        let performance = section(&document, "PERFORMANCE METRICS");
        assert_eq!(performance.len(), 4);
        assert_eq!(performance[1], "• Growth Rate: 2.3 cm/day (+0.2 cm/day)");

        let anomaly_blocks = document
            .lines()
            .filter(|line| line.starts_with("  Recommendation: "))
            .count();
        assert_eq!(anomaly_blocks, 3);

        assert_eq!(
            file_name(&request(ReportKind::Weekly)),
            "thermal-monitoring-weekly-report-2026-10-16.txt"
        );
    }

    #[test]
    fn daily_lines_follow_input_order() {
        let mut snapshot = sample::snapshot().unwrap();
        let mut records = sample::daily_records().unwrap();
        records.reverse();
        records.truncate(3);
        snapshot.daily_data = Some(records.clone());

        let document = assemble(&request(ReportKind::Daily), &snapshot).unwrap();
        let daily = section(&document, "DAILY TRENDS");
        assert_eq!(daily.len(), records.len());
        for (line, record) in daily.iter().zip(&records) {
            assert!(line.starts_with(&format!("Date: {} |", record.date)));
        }
    }

    #[test]
    fn each_insight_appears_once_verbatim() {
        let snapshot = sample::snapshot().unwrap();
        let document = assemble(&request(ReportKind::AlertSummary), &snapshot).unwrap();

        for insight in sample::anomaly_insights() {
            let header = format!(
                "• {} ({}): {}",
                insight.category, insight.severity, insight.description
            );
            let recommendation = format!("  Recommendation: {}", insight.recommendation);
            assert_eq!(document.lines().filter(|l| *l == header).count(), 1);
            assert_eq!(document.lines().filter(|l| *l == recommendation).count(), 1);
        }
        assert!(document.contains("• Disease Risk (high): "));
    }

    #[test]
    fn empty_performance_list_keeps_header() {
        let mut snapshot = sample::snapshot().unwrap();
        snapshot.performance_metrics = Some(Vec::new());

        let document = assemble(&request(ReportKind::Performance), &snapshot).unwrap();
        assert!(document.contains("PERFORMANCE METRICS\n===================\n\n"));
        assert!(section(&document, "PERFORMANCE METRICS").is_empty());
    }

    #[test]
    fn missing_fields_are_named() {
        let mut snapshot = sample::snapshot().unwrap();
        snapshot.anomaly_insights = None;
        let err = assemble(&request(ReportKind::Daily), &snapshot).unwrap_err();
        assert!(matches!(err, ReportError::MissingSnapshotField("anomalyInsights")));

        let mut snapshot = sample::snapshot().unwrap();
        snapshot.summary.water_efficiency = None;
        let err = assemble(&request(ReportKind::Daily), &snapshot).unwrap_err();
        assert!(matches!(err, ReportError::MissingSnapshotField("waterEfficiency")));

        let err = assemble(&request(ReportKind::Daily), &Snapshot::default()).unwrap_err();
        assert!(matches!(err, ReportError::MissingSnapshotField("healthScore")));
    }

    #[test]
    fn footer_is_shared_by_all_kinds() {
        let snapshot = sample::snapshot().unwrap();
        let footers: Vec<Vec<String>> = ReportKind::ALL
            .iter()
            .map(|kind| {
                let document = assemble(&request(*kind), &snapshot).unwrap();
                document
                    .lines()
                    .skip_while(|line| *line != "RECOMMENDATIONS")
                    .map(str::to_string)
                    .collect()
            })
            .collect();

        assert_eq!(footers[0].len(), 8);
        assert!(footers.iter().all(|footer| footer == &footers[0]));
        assert_eq!(footers[0].last().map(String::as_str), Some(CLOSING_LINE));
    }

    #[test]
    fn custom_report_states_its_period() {
        let snapshot = sample::snapshot().unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let custom = ReportRequest::new(ReportKind::Custom, generated_at(), Some(range));
        let document = assemble(&custom, &snapshot).unwrap();
        assert!(document.contains("Period: 2024-01-01 to 2024-01-07\n"));

        let weekly = assemble(&request(ReportKind::Weekly), &snapshot).unwrap();
        assert!(!weekly.contains("Period:"));
    }

    #[test]
    fn alert_summary_file_name_has_no_spaces() {
        assert_eq!(
            file_name(&request(ReportKind::AlertSummary)),
            "thermal-monitoring-alert-summary-report-2026-10-16.txt"
        );
    }

    #[test]
    fn file_name_uses_utc_date_while_header_shows_local_time() {
        let kiritimati = FixedOffset::east_opt(14 * 3600).unwrap();
        let at = kiritimati.with_ymd_and_hms(2026, 10, 17, 1, 8, 0).unwrap();
        let request = ReportRequest::new(ReportKind::Weekly, at, None);

        assert_eq!(
            file_name(&request),
            "thermal-monitoring-weekly-report-2026-10-16.txt"
        );
        let document = assemble(&request, &sample::snapshot().unwrap()).unwrap();
        assert!(document.contains("Generated: 2026-10-17 01:08:00\n"));
    }
}
