use std::fmt::Write;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use log::debug;
use tokio::task::JoinHandle;

use crate::models::{AnomalyInsight, MetricStatus, PerformanceMetric, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Healthy,
    Warning,
    Critical,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Healthy => "healthy",
            Status::Warning => "warning",
            Status::Critical => "critical",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Status::Healthy => "[ OK ]",
            Status::Warning => "[WARN]",
            Status::Critical => "[CRIT]",
        }
    }
}

impl From<Severity> for Status {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Status::Healthy,
            Severity::Medium => Status::Warning,
            Severity::High => Status::Critical,
        }
    }
}

/// Only a declining metric needs attention.
impl From<MetricStatus> for Status {
    fn from(status: MetricStatus) -> Self {
        match status {
            MetricStatus::Improving | MetricStatus::Stable => Status::Healthy,
            MetricStatus::Declining => Status::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
}

impl AlertLevel {
    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Success => "success",
            AlertLevel::Warning => "warning",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            AlertLevel::Info => "[INFO]",
            AlertLevel::Success => Status::Healthy.badge(),
            AlertLevel::Warning => Status::Warning.badge(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveAlert {
    pub message: String,
    pub level: AlertLevel,
    pub time: String,
}

pub fn active_alerts() -> Vec<ActiveAlert> {
    [
        ("Water stress detected in Layer 2", AlertLevel::Warning, "10 min ago"),
        ("Temperature spike in Layer 3", AlertLevel::Info, "25 min ago"),
        ("Optimal conditions in Layer 1", AlertLevel::Success, "1 hour ago"),
    ]
    .into_iter()
    .map(|(message, level, time)| ActiveAlert {
        message: message.to_string(),
        level,
        time: time.to_string(),
    })
    .collect()
}

pub fn render_alerts(alerts: &[ActiveAlert]) -> String {
    let mut output = String::new();
    for alert in alerts {
        let _ = writeln!(
            output,
            "{} {} ({}, {})",
            alert.level.badge(),
            alert.message,
            alert.level.label(),
            alert.time
        );
    }
    output
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerReading {
    pub layer: u8,
    pub temperature: f64,
    pub cwsi: f64,
    pub status: Status,
}

pub fn layer_readings() -> Vec<LayerReading> {
    [
        (1, 27.8, 0.35, Status::Healthy),
        (2, 31.2, 0.68, Status::Warning),
        (3, 29.4, 0.42, Status::Healthy),
        (4, 26.9, 0.28, Status::Healthy),
    ]
    .into_iter()
    .map(|(layer, temperature, cwsi, status)| LayerReading {
        layer,
        temperature,
        cwsi,
        status,
    })
    .collect()
}

pub fn render_layers(readings: &[LayerReading]) -> String {
    let mut output = String::new();
    for reading in readings {
        let _ = writeln!(
            output,
            "{} Layer {}  {:.1}°C  CWSI {:.2}  {}",
            reading.status.badge(),
            reading.layer,
            reading.temperature,
            reading.cwsi,
            reading.status.label()
        );
    }
    output
}

pub fn render_performance(metrics: &[PerformanceMetric]) -> String {
    let mut output = String::new();
    for metric in metrics {
        let _ = writeln!(
            output,
            "{} {}: {} ({}, {})",
            Status::from(metric.status).badge(),
            metric.name,
            metric.value,
            metric.trend_delta,
            metric.status
        );
    }
    output
}

pub fn render_insights(insights: &[AnomalyInsight]) -> String {
    let mut output = String::new();
    for insight in insights {
        let status = Status::from(insight.severity);
        let _ = writeln!(
            output,
            "{} {} ({}, {})",
            status.badge(),
            insight.category,
            insight.severity,
            insight.relative_timestamp
        );
        let _ = writeln!(output, "       {}", insight.description);
        let _ = writeln!(output, "       Recommendation: {}", insight.recommendation);
    }
    output
}

/// Periodic clock callback. The timer task is aborted when the clock is
/// dropped.
pub struct Clock {
    handle: JoinHandle<()>,
}

impl Clock {
    /// Must be called from within a tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(NaiveDateTime) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                on_tick(Local::now().naive_local());
            }
        });
        debug!("Clock started with period {:?}", period);
        Self { handle }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Clock stopped");
    }
}
