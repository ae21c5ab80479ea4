use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, info};

use crate::models::{
    AnomalyInsight, DailyMetricRecord, MetricStatus, PerformanceMetric, ReportSummary, Severity,
    Snapshot,
};

pub fn daily_records() -> anyhow::Result<Vec<DailyMetricRecord>> {
    let rows = [
        (1, 28.5, 0.35, 2, 92.0),
        (2, 29.1, 0.42, 1, 88.0),
        (3, 27.8, 0.38, 0, 95.0),
        (4, 30.2, 0.55, 3, 82.0),
        (5, 28.9, 0.41, 1, 90.0),
        (6, 29.5, 0.48, 2, 87.0),
        (7, 28.2, 0.33, 0, 94.0),
    ];

    rows.into_iter()
        .map(|(d, avg_temp, cwsi, alert_count, health_score)| {
            Ok(DailyMetricRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, d).context("invalid date")?,
                avg_temp,
                cwsi,
                alert_count,
                health_score,
            })
        })
        .collect()
}

pub fn performance_metrics() -> Vec<PerformanceMetric> {
    let rows = [
        ("Water Use Efficiency", "85%", "+5%"),
        ("Growth Rate", "2.3 cm/day", "+0.2 cm/day"),
        ("Yield Projection", "95%", "+8%"),
        ("Resource Optimization", "78%", "+3%"),
    ];

    rows.into_iter()
        .map(|(name, value, trend_delta)| PerformanceMetric {
            name: name.to_string(),
            value: value.to_string(),
            trend_delta: trend_delta.to_string(),
            status: MetricStatus::Improving,
        })
        .collect()
}

pub fn anomaly_insights() -> Vec<AnomalyInsight> {
    vec![
        AnomalyInsight {
            id: 1,
            category: "Temperature Anomaly".to_string(),
            description: "Unusual temperature spike detected in Layer 2 at 14:30".to_string(),
            severity: Severity::Medium,
            recommendation: "Check ventilation system and consider increasing airflow"
                .to_string(),
            relative_timestamp: "2 hours ago".to_string(),
        },
        AnomalyInsight {
            id: 2,
            category: "CWSI Pattern".to_string(),
            description: "Consistent water stress pattern in Turmeric plants".to_string(),
            severity: Severity::Low,
            recommendation: "Adjust irrigation schedule for Turmeric layer".to_string(),
            relative_timestamp: "1 day ago".to_string(),
        },
        AnomalyInsight {
            id: 3,
            category: "Disease Risk".to_string(),
            description:
                "Thermal signature suggests potential fungal infection in Leafy Vegetables"
                    .to_string(),
            severity: Severity::High,
            recommendation: "Immediate inspection and preventive treatment recommended"
                .to_string(),
            relative_timestamp: "3 hours ago".to_string(),
        },
    ]
}

pub fn summary() -> ReportSummary {
    ReportSummary {
        health_score: Some(89.7),
        total_alerts: Some(9),
        water_efficiency: Some(85.0),
        avg_temperature: Some(28.9),
    }
}

/// The built-in weekly snapshot shown on the reports page.
pub fn snapshot() -> anyhow::Result<Snapshot> {
    Ok(Snapshot {
        summary: summary(),
        daily_data: Some(daily_records()?),
        performance_metrics: Some(performance_metrics()),
        anomaly_insights: Some(anomaly_insights()),
    })
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    validate(&snapshot).with_context(|| format!("invalid snapshot {}", path.display()))?;
    info!("Loaded snapshot from {}", path.display());
    Ok(snapshot)
}

/// Checks the invariants every externally supplied snapshot must hold:
/// CWSI within [0, 1] and unique anomaly insight ids.
pub fn validate(snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(records) = &snapshot.daily_data {
        validate_daily(records)?;
    }
    if let Some(insights) = &snapshot.anomaly_insights {
        let mut seen = HashSet::new();
        for insight in insights {
            if !seen.insert(insight.id) {
                anyhow::bail!("duplicate anomaly insight id {}", insight.id);
            }
        }
    }
    Ok(())
}

fn validate_daily(records: &[DailyMetricRecord]) -> anyhow::Result<()> {
    for (index, record) in records.iter().enumerate() {
        if !(0.0..=1.0).contains(&record.cwsi) {
            anyhow::bail!(
                "CWSI {} out of range [0, 1] at row {}",
                record.cwsi,
                index + 1
            );
        }
    }
    Ok(())
}

/// Reads daily records from a CSV with the header
/// `date,avg_temp,cwsi,alerts,health_score`, keeping file order.
pub fn import_daily_csv(csv_path: &Path) -> anyhow::Result<Vec<DailyMetricRecord>> {
    let reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    read_daily_csv(reader)
}

fn read_daily_csv<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> anyhow::Result<Vec<DailyMetricRecord>> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        date: NaiveDate,
        avg_temp: f64,
        cwsi: f64,
        alerts: u32,
        health_score: f64,
    }

    let mut records = Vec::new();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid daily record at row {}", line + 1))?;
        records.push(DailyMetricRecord {
            date: row.date,
            avg_temp: row.avg_temp,
            cwsi: row.cwsi,
            alert_count: row.alerts,
            health_score: row.health_score,
        });
    }

    validate_daily(&records)?;
    debug!("Imported {} daily records", records.len());
    Ok(records)
}
