//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;
use vsixget_errors::UserFacingError;
use vsixget_ops::{OperationResult, ResolutionReport};
use vsixget_types::{BatchReport, ColorChoice};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Whether styled output should be produced
    pub fn colors_enabled(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match result {
            OperationResult::BatchReport(report) => self.render_batch_report(report),
            OperationResult::Resolution(report) => self.render_resolution(report),
        }
    }

    fn render_batch_report(&self, report: &BatchReport) -> io::Result<()> {
        if report.outcomes.is_empty() {
            println!("No extensions to download.");
            return Ok(());
        }

        let mut table = self.table(&["Extension", "Status", "Location"]);
        for outcome in &report.outcomes {
            let (status, location) = if outcome.success {
                let status = if outcome.from_cache {
                    self.status_cell("cached", Color::Cyan)
                } else {
                    self.status_cell("downloaded", Color::Green)
                };
                let path = outcome
                    .output_path
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string());
                (status, path)
            } else {
                let message = outcome
                    .error
                    .as_ref()
                    .map_or_else(|| "unknown error".to_string(), |e| e.user_message().into_owned());
                (self.status_cell("failed", Color::Red), message)
            };
            table.add_row(vec![Cell::new(&outcome.artifact_label), status, Cell::new(location)]);
        }
        println!("{table}");

        #[allow(clippy::cast_precision_loss)]
        let seconds = report.duration_ms as f64 / 1000.0;
        let failed = report.failed_labels();
        println!(
            "{} succeeded ({} cached), {} failed in {seconds:.1}s",
            report.succeeded_count(),
            report.cached_count(),
            failed.len(),
        );
        self.render_failed_labels(&failed);
        Ok(())
    }

    fn render_resolution(&self, report: &ResolutionReport) -> io::Result<()> {
        if report.entries.is_empty() {
            println!("No extensions to resolve.");
            return Ok(());
        }

        let mut table = self.table(&["Reference", "Artifact", "Download URL"]);
        for entry in &report.entries {
            let (artifact, url) = match (&entry.label, &entry.error) {
                (Some(label), None) => (
                    Cell::new(label),
                    Cell::new(entry.download_url.as_deref().unwrap_or("-")),
                ),
                (_, Some(error)) => (
                    self.status_cell("unresolved", Color::Red),
                    Cell::new(error.user_message()),
                ),
                (None, None) => (Cell::new("-"), Cell::new("-")),
            };
            table.add_row(vec![Cell::new(&entry.reference), artifact, url]);
        }
        println!("{table}");

        self.render_failed_labels(&report.failed_references());
        Ok(())
    }

    fn render_failed_labels(&self, failed: &[&str]) {
        if failed.is_empty() {
            return;
        }
        println!();
        println!("{}", self.style(Style::new().red().bold(), "Failed:"));
        for label in failed {
            println!("  {label}");
        }
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
        if !self.colors_enabled() {
            table.force_no_tty();
        }
        table
    }

    fn status_cell(&self, text: &str, color: Color) -> Cell {
        if self.colors_enabled() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn style(&self, style: Style, text: &str) -> String {
        if self.colors_enabled() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}
