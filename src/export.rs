use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ReportError, Result};
use crate::models::{ReportKind, ReportRequest};
use crate::report;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { path: PathBuf },
    Failure { reason: String },
}

/// Completion event handed to the UI layer once an export finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: ReportKind,
    pub outcome: Outcome,
}

impl Notification {
    pub fn title(&self) -> String {
        match self.outcome {
            Outcome::Success { .. } => format!("{} Report Generated", self.kind),
            Outcome::Failure { .. } => format!("{} Report Failed", self.kind),
        }
    }

    pub fn description(&self) -> String {
        match &self.outcome {
            Outcome::Success { .. } => format!(
                "Your {} report has been downloaded successfully.",
                self.kind.label().to_lowercase()
            ),
            Outcome::Failure { reason } => format!(
                "Your {} report could not be saved: {}",
                self.kind.label().to_lowercase(),
                reason
            ),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Prints notifications to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        match &notification.outcome {
            Outcome::Success { path } => {
                println!("{}: {}", notification.title(), notification.description());
                println!("Report written to {}.", path.display());
            }
            Outcome::Failure { .. } => {
                eprintln!("{}: {}", notification.title(), notification.description());
            }
        }
    }
}

/// A partially written report next to its destination. Removed on drop
/// unless it has already been renamed into place.
struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    fn create(dir: &Path, file_name: &str) -> std::io::Result<(Self, File)> {
        let path = dir.join(format!(".{}.{}.part", file_name, Uuid::new_v4()));
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        debug!("Staging report at {}", path.display());
        Ok((Self { path }, file))
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.path.exists() {
            match fs::remove_file(&self.path) {
                Ok(()) => debug!("Released staging file {}", self.path.display()),
                Err(err) => warn!(
                    "Failed to release staging file {}: {}",
                    self.path.display(),
                    err
                ),
            }
        }
    }
}

fn unavailable(action: &str, path: &Path, err: std::io::Error) -> ReportError {
    ReportError::ExportUnavailable(format!("{} {}: {}", action, path.display(), err))
}

fn save(text: &str, out_dir: &Path, file_name: &str) -> Result<PathBuf> {
    if !out_dir.is_dir() {
        return Err(ReportError::ExportUnavailable(format!(
            "{} is not a directory",
            out_dir.display()
        )));
    }

    let target = out_dir.join(file_name);
    let (staged, mut file) = StagedFile::create(out_dir, file_name)
        .map_err(|err| unavailable("cannot stage", out_dir, err))?;

    file.write_all(text.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|err| unavailable("cannot write", &staged.path, err))?;
    drop(file);

    fs::rename(&staged.path, &target).map_err(|err| unavailable("cannot save", &target, err))?;
    Ok(target)
}

/// Writes `text` to `out_dir` under the report's file name and reports the
/// outcome to `notifier`. Failures are both notified and returned.
pub fn export_as_file(
    text: &str,
    request: &ReportRequest,
    out_dir: &Path,
    notifier: &dyn Notifier,
) -> Result<PathBuf> {
    let file_name = report::file_name(request);
    let result = save(text, out_dir, &file_name);

    let outcome = match &result {
        Ok(path) => {
            info!("Exported {} report to {}", request.kind, path.display());
            Outcome::Success { path: path.clone() }
        }
        Err(err) => {
            warn!("Export of {} report failed: {}", request.kind, err);
            Outcome::Failure {
                reason: err.to_string(),
            }
        }
    };
    notifier.notify(&Notification {
        kind: request.kind,
        outcome,
    });

    result
}
