//! Printable outputs built from a point-in-time copy of the schedule.
//!
//! Exports run against an [`ExportSnapshot`] taken when the export starts.
//! Nothing locks the live session meanwhile, so an edit racing an export may or
//! may not be reflected in the written document.

mod table;
mod template;

pub use table::{ScheduleRow, ScheduleTable, REPORTING_NOTE, UNASSIGNED_LABEL};
pub use template::{
    render_template, TemplateData, TemplateDate, TemplateSlot, TEMPLATE_SLOTS,
};

use crate::calendar::YearMonth;
use crate::roster::RosterCatalog;
use crate::schedule::{derive_month, CreditPolicy, MonthDuty, ScheduleState};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to load template {path}: {source}")]
    TemplateLoadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template syntax error: {0}")]
    TemplateSyntax(String),
    #[error("export io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv encoding failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("json encoding failure: {0}")]
    Json(#[from] serde_json::Error),
}

/// Owned copy of everything an export reads.
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub catalog: RosterCatalog,
    pub state: ScheduleState,
    pub period: YearMonth,
    pub policy: CreditPolicy,
}

impl ExportSnapshot {
    pub fn table(&self) -> ScheduleTable {
        ScheduleTable::build(&self.state, &self.catalog, self.period)
    }

    pub fn month(&self) -> MonthDuty {
        derive_month(&self.state, &self.catalog, self.period, self.policy)
    }

    pub fn template_data(&self) -> TemplateData {
        TemplateData::from_month(&self.month())
    }
}

pub async fn load_template(path: &Path) -> Result<String, ExportError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| {
            warn!(path = %path.display(), error = %source, "report template unavailable");
            ExportError::TemplateLoadFailure {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// Writes the table as CSV into `directory` and returns the file path.
pub async fn write_table(
    snapshot: &ExportSnapshot,
    directory: &Path,
) -> Result<PathBuf, ExportError> {
    let table = snapshot.table();
    let target = directory.join(ScheduleTable::file_name(snapshot.period));
    tokio::fs::create_dir_all(directory).await?;
    tokio::fs::write(&target, table.to_csv()?).await?;
    info!(path = %target.display(), rows = table.rows.len(), "schedule table exported");
    Ok(target)
}

/// Renders the duty report template into `directory`. The template is read
/// before anything is written, so a missing template leaves no partial output.
pub async fn write_report(
    snapshot: &ExportSnapshot,
    template_path: &Path,
    directory: &Path,
) -> Result<PathBuf, ExportError> {
    let source = load_template(template_path).await?;
    let placeholders = snapshot.template_data().placeholders()?;
    let rendered = render_template(&source, &placeholders)?;

    let target = directory.join(TemplateData::file_name(snapshot.period));
    tokio::fs::create_dir_all(directory).await?;
    tokio::fs::write(&target, rendered).await?;
    info!(path = %target.display(), "duty report exported");
    Ok(target)
}

/// Writes the raw placeholder map as JSON, for external document generators.
pub async fn write_report_data(
    snapshot: &ExportSnapshot,
    directory: &Path,
) -> Result<PathBuf, ExportError> {
    let placeholders = snapshot.template_data().placeholders()?;
    let target = directory.join(
        TemplateData::file_name(snapshot.period).replace(".txt", ".json"),
    );
    tokio::fs::create_dir_all(directory).await?;
    tokio::fs::write(&target, serde_json::to_vec_pretty(&placeholders)?).await?;
    info!(path = %target.display(), "duty report data exported");
    Ok(target)
}
