//! Output formatting utilities.

use colored::Colorize;
use kc_import::{ImportResult, ImportResultItem};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::config::OutputFormat;
use crate::error::CliResult;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// One line of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Tabled, Serialize)]
pub struct ReportRow {
    /// Entity or relation type; relation rows are indented.
    #[tabled(rename = "Type")]
    pub name: String,
    /// Rows before the pass.
    #[tabled(rename = "Before")]
    pub before: u64,
    /// Rows added.
    #[tabled(rename = "Adds")]
    pub adds: u64,
    /// Rows updated.
    #[tabled(rename = "Updates")]
    pub updates: u64,
    /// Rows deleted.
    #[tabled(rename = "Deletes")]
    pub deletes: u64,
    /// Rows after commit.
    #[tabled(rename = "After")]
    pub after: u64,
}

impl ReportRow {
    fn new(name: String, item: &ImportResultItem) -> Self {
        Self {
            name,
            before: item.before,
            adds: item.adds,
            updates: item.updates,
            deletes: item.deletes,
            after: item.after,
        }
    }
}

/// Flattens a report into table rows.
///
/// Relation rows follow their entity and are only listed when they had
/// rows before or after the pass, or changed.
#[must_use]
pub fn report_rows(result: &ImportResult) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for (name, item) in &result.items {
        rows.push(ReportRow::new(name.clone(), item));
        for (relation, child) in &item.children {
            if child.before > 0 || child.after > 0 || child.has_changes() {
                rows.push(ReportRow::new(format!("  └ {relation}"), child));
            }
        }
    }
    rows
}

/// Prints an import report.
///
/// ## Errors
///
/// Returns an error if JSON serialization fails.
pub fn report(result: &ImportResult, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            let rows = report_rows(result);
            if rows.is_empty() {
                info("Nothing to import.");
            } else {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            for message in &result.errors {
                warning(message);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
    }
    Ok(())
}
