use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetricRecord {
    pub date: NaiveDate,
    pub avg_temp: f64,
    pub cwsi: f64,
    #[serde(rename = "alerts")]
    pub alert_count: u32,
    pub health_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetricStatus::Improving => "improving",
            MetricStatus::Declining => "declining",
            MetricStatus::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    #[serde(rename = "metric")]
    pub name: String,
    pub value: String,
    #[serde(rename = "trend")]
    pub trend_delta: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyInsight {
    pub id: u32,
    #[serde(rename = "type")]
    pub category: String,
    pub description: String,
    pub severity: Severity,
    pub recommendation: String,
    #[serde(rename = "timestamp")]
    pub relative_timestamp: String,
}

/// The four headline figures shown in the executive summary.
///
/// Every figure is optional so that partially populated snapshots can be
/// loaded and rejected with a named field instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSummary {
    pub health_score: Option<f64>,
    pub total_alerts: Option<u32>,
    pub water_efficiency: Option<f64>,
    pub avg_temperature: Option<f64>,
}

/// Everything a report is assembled from. Snapshots are never mutated by
/// report generation; each request borrows its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub summary: ReportSummary,
    pub daily_data: Option<Vec<DailyMetricRecord>>,
    pub performance_metrics: Option<Vec<PerformanceMetric>>,
    pub anomaly_insights: Option<Vec<AnomalyInsight>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Daily,
    Weekly,
    Monthly,
    Custom,
    AlertSummary,
    Performance,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Daily,
        ReportKind::Weekly,
        ReportKind::Monthly,
        ReportKind::Custom,
        ReportKind::AlertSummary,
        ReportKind::Performance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Daily => "Daily",
            ReportKind::Weekly => "Weekly",
            ReportKind::Monthly => "Monthly",
            ReportKind::Custom => "Custom",
            ReportKind::AlertSummary => "Alert Summary",
            ReportKind::Performance => "Performance",
        }
    }

    /// Lowercase, space-free form used in filenames.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
            ReportKind::Custom => "custom",
            ReportKind::AlertSummary => "alert-summary",
            ReportKind::Performance => "performance",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "daily" => Ok(ReportKind::Daily),
            "weekly" => Ok(ReportKind::Weekly),
            "monthly" => Ok(ReportKind::Monthly),
            "custom" => Ok(ReportKind::Custom),
            "alertsummary" => Ok(ReportKind::AlertSummary),
            "performance" => Ok(ReportKind::Performance),
            _ => Err(ReportError::InvalidReportKind(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The week ending on `today`, the default window for custom reports.
    pub fn week_ending(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(7),
            end: today,
        }
    }
}

/// `generated_at` keeps the caller's offset: the document shows local
/// time, while dates used in file names and default ranges are UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub generated_at: DateTime<FixedOffset>,
    pub date_range: Option<DateRange>,
}

impl ReportRequest {
    /// A date range is only carried by custom reports; it is dropped for
    /// every other kind.
    pub fn new(
        kind: ReportKind,
        generated_at: DateTime<FixedOffset>,
        date_range: Option<DateRange>,
    ) -> Self {
        let utc_date = generated_at.with_timezone(&Utc).date_naive();
        let date_range = match kind {
            ReportKind::Custom => {
                date_range.or_else(|| Some(DateRange::week_ending(utc_date)))
            }
            _ => None,
        };
        Self {
            kind,
            generated_at,
            date_range,
        }
    }

    pub fn utc_date(&self) -> NaiveDate {
        self.generated_at.with_timezone(&Utc).date_naive()
    }
}
