//! Catalog audits for translation tooling. Nothing here runs in the GUI.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Entry, TranslationStatus};

/// Translation progress of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    pub locale: Option<String>,
    pub total: usize,
    /// Entries whose lookup yields translated text.
    pub translated: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Active entries with an empty translation.
    pub empty: usize,
    pub obsolete: usize,
    pub vanished: usize,
    pub contexts: Vec<ContextCoverage>,
}

/// Per-context row of a [`CoverageReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextCoverage {
    pub name: String,
    pub total: usize,
    pub translated: usize,
}

impl CoverageReport {
    /// Entries that still appear in the GUI.
    pub fn active(&self) -> usize {
        self.total - self.obsolete - self.vanished
    }

    /// Share of active entries that are translated, 0-100.
    pub fn percent_complete(&self) -> f64 {
        match self.active() {
            0 => 100.0,
            active => self.translated as f64 * 100.0 / active as f64,
        }
    }
}

/// Count entries by status, overall and per context.
pub fn coverage(catalog: &Catalog) -> CoverageReport {
    let mut report = CoverageReport {
        locale: catalog.locale().map(ToString::to_string),
        ..CoverageReport::default()
    };

    for entry in catalog.entries() {
        report.total += 1;
        match entry.status {
            TranslationStatus::Finished => report.finished += 1,
            TranslationStatus::Unfinished => report.unfinished += 1,
            TranslationStatus::Obsolete => report.obsolete += 1,
            TranslationStatus::Vanished => report.vanished += 1,
        }
        if entry.status.is_active() && entry.translation.is_empty() {
            report.empty += 1;
        }
        if entry.is_translated() {
            report.translated += 1;
        }

        let idx = match report.contexts.iter().position(|c| c.name == entry.context) {
            Some(idx) => idx,
            None => {
                report.contexts.push(ContextCoverage {
                    name: entry.context.clone(),
                    total: 0,
                    translated: 0,
                });
                report.contexts.len() - 1
            }
        };
        let row = &mut report.contexts[idx];
        row.total += 1;
        if entry.is_translated() {
            row.translated += 1;
        }
    }

    report
}

/// Active entries a translator still has to look at: unfinished or empty.
pub fn pending(catalog: &Catalog) -> Vec<&Entry> {
    catalog
        .entries()
        .filter(|e| e.status.is_active())
        .filter(|e| e.status == TranslationStatus::Unfinished || e.translation.is_empty())
        .collect()
}

/// A `<location>` that does not point into the GUI source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationIssue {
    MissingFile {
        context: String,
        source: String,
        filename: String,
        resolved: PathBuf,
    },
    LineOutOfRange {
        context: String,
        source: String,
        filename: String,
        line: u32,
        lines_in_file: usize,
    },
}

/// Check the locations of active entries against the GUI source.
///
/// `base` is the directory the `filename` attributes are relative to,
/// i.e. the directory holding the `.ts` file. Obsolete entries are
/// skipped since their locations are stale by definition.
pub fn check_locations(catalog: &Catalog, base: &Path) -> Vec<LocationIssue> {
    let mut line_counts: HashMap<PathBuf, Option<usize>> = HashMap::new();
    let mut issues = Vec::new();

    for entry in catalog.entries().filter(|e| e.status.is_active()) {
        for location in &entry.locations {
            let resolved = base.join(&location.filename);
            let count = *line_counts.entry(resolved.clone()).or_insert_with(|| {
                match std::fs::read_to_string(&resolved) {
                    Ok(text) => Some(text.lines().count()),
                    Err(e) => {
                        debug!("cannot read {}: {e}", resolved.display());
                        None
                    }
                }
            });

            match count {
                None => issues.push(LocationIssue::MissingFile {
                    context: entry.context.clone(),
                    source: entry.source.clone(),
                    filename: location.filename.clone(),
                    resolved,
                }),
                Some(lines) if location.line == 0 || location.line as usize > lines => {
                    issues.push(LocationIssue::LineOutOfRange {
                        context: entry.context.clone(),
                        source: entry.source.clone(),
                        filename: location.filename.clone(),
                        line: location.line,
                        lines_in_file: lines,
                    })
                }
                Some(_) => {}
            }
        }
    }

    issues
}
