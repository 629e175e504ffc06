use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::snapshot::TimelineSnapshot;

/// Output formats for `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Markdown,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            "markdown" | "md" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Render the snapshot in the given format
pub fn render(snapshot: &TimelineSnapshot, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot to JSON")
        }
        ExportFormat::Yaml => {
            serde_yaml::to_string(snapshot).context("Failed to serialize snapshot to YAML")
        }
        ExportFormat::Markdown => Ok(markdown_report(snapshot)),
    }
}

/// Write the snapshot to `output_path` and return the path written
///
/// A path without an extension gets the format's extension appended.
pub fn export(
    snapshot: &TimelineSnapshot,
    format: ExportFormat,
    output_path: &Path,
) -> Result<PathBuf> {
    let output_path = if output_path.extension().is_none() {
        output_path.with_extension(format.extension())
    } else {
        output_path.to_path_buf()
    };

    let content = render(snapshot, format)?;
    fs::write(&output_path, content)
        .with_context(|| format!("Failed to write export to {:?}", output_path))?;
    log::info!("Exported {} to {}", format, output_path.display());
    Ok(output_path)
}

/// Milestone report: one section per project with a gate table
pub fn markdown_report(snapshot: &TimelineSnapshot) -> String {
    let mut output = String::new();
    let global = snapshot.global();

    output.push_str("# TR Milestone Timeline\n\n");
    output.push_str(&format!(
        "**Range:** {} to {} | **Projects:** {} | **Built on:** {}\n\n",
        global.min_date,
        global.max_date,
        snapshot.projects().len(),
        snapshot.built_on()
    ));

    for project in snapshot.projects() {
        output.push_str(&format!("## {}\n\n", project.name));
        output.push_str(&format!(
            "**Span:** {} to {}\n\n",
            project.start_date, project.end_date
        ));

        if project.observations.is_empty() {
            output.push_str("_No milestone dates._\n\n");
            continue;
        }

        output.push_str("| Gate | Date | Rescheduled | Delay (days) |\n");
        output.push_str("|------|------|-------------|--------------|\n");
        for (milestone, obs) in &project.observations {
            let rescheduled = obs
                .rescheduled_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                milestone, obs.date, rescheduled, obs.delay_days
            ));
        }
        output.push_str(&format!(
            "\n**Total delay:** {} days\n\n",
            project.total_delay_days()
        ));
    }

    output
}
