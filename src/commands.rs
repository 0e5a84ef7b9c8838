//! Subcommand handlers. Each returns the text to print.

use std::path::Path;

use reloj_core::config::I18nConfig;
use reloj_core::error::RelojError;
use reloj_i18n::audit::{self, CoverageReport, LocationIssue};
use reloj_i18n::{
    load, resolve_locale, BundledSource, Catalog, CatalogSource, ChainSource, DirSource, Entry,
    LocaleId, TranslationStatus,
};
use serde::Serialize;

#[cfg(test)]
mod tests;

/// Translations directory first, bundled catalogs second.
pub fn build_source(cfg: &I18nConfig) -> ChainSource {
    let mut source =
        ChainSource::new().with(DirSource::new(cfg.translations_path(), cfg.basename.clone()));
    if cfg.use_bundled {
        source = source.with(BundledSource);
    }
    source
}

/// Decide which locale to load.
///
/// An explicit `--locale` is taken as is so that a missing catalog is
/// reported. Otherwise the configured language and then the OS locale are
/// matched against what the source provides.
pub fn select_locale(
    source: &dyn CatalogSource,
    cli: Option<&str>,
    cfg: &I18nConfig,
) -> Result<LocaleId, RelojError> {
    if let Some(requested) = cli {
        return LocaleId::parse(requested).map_err(|e| RelojError::Catalog(e.to_string()));
    }
    let available = source.available();
    resolve_locale(None, cfg.language.as_deref(), &available).ok_or_else(|| {
        RelojError::Catalog(format!(
            "no catalog matches the configured or system locale (available: {})",
            join_locales(&available)
        ))
    })
}

/// Select and load the catalog a command works on.
pub fn open_catalog(
    source: &dyn CatalogSource,
    cli: Option<&str>,
    cfg: &I18nConfig,
) -> Result<Catalog, RelojError> {
    let locale = select_locale(source, cli, cfg)?;
    load(source, &locale).map_err(|e| RelojError::Catalog(e.to_string()))
}

pub fn lookup(catalog: &Catalog, context: &str, comment: Option<&str>, text: &str) -> String {
    catalog
        .lookup_disambiguated(context, text, comment)
        .to_string()
}

pub fn entries(catalog: &Catalog, json: bool) -> Result<String, RelojError> {
    if json {
        let all: Vec<&Entry> = catalog.entries().collect();
        return to_json(&all);
    }

    let mut out = String::new();
    for entry in catalog.entries() {
        out.push_str(&format!(
            "{}\t{:?}\t{:?}",
            entry.context, entry.source, entry.translation
        ));
        if let Some(ref comment) = entry.disambiguation {
            out.push_str(&format!("\t({comment})"));
        }
        if entry.status != TranslationStatus::Finished {
            out.push_str(&format!("\t[{}]", entry.status.as_str()));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Result of the `audit` command.
pub struct AuditOutcome {
    pub text: String,
    /// Number of location problems; non-zero fails the command.
    pub issues: usize,
}

#[derive(Serialize)]
struct AuditJson<'a> {
    coverage: CoverageReport,
    pending: Vec<&'a Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_issues: Option<Vec<LocationIssue>>,
}

pub fn audit(
    catalog: &Catalog,
    source_root: Option<&Path>,
    json: bool,
) -> Result<AuditOutcome, RelojError> {
    let report = audit::coverage(catalog);
    let pending = audit::pending(catalog);
    let issues = source_root.map(|root| audit::check_locations(catalog, root));
    let count = issues.as_ref().map_or(0, Vec::len);

    if json {
        let text = to_json(&AuditJson {
            coverage: report,
            pending,
            location_issues: issues,
        })?;
        return Ok(AuditOutcome {
            text,
            issues: count,
        });
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Locale: {}\n",
        report.locale.as_deref().unwrap_or("untranslated")
    ));
    out.push_str(&format!(
        "Entries: {} ({} translated, {} unfinished, {} empty, {} obsolete, {} vanished)\n",
        report.total,
        report.translated,
        report.unfinished,
        report.empty,
        report.obsolete,
        report.vanished
    ));
    out.push_str(&format!("Complete: {:.1}%\n", report.percent_complete()));
    for row in &report.contexts {
        out.push_str(&format!("  {}: {}/{}\n", row.name, row.translated, row.total));
    }

    if !pending.is_empty() {
        out.push_str("\nPending:\n");
        for entry in &pending {
            out.push_str(&format!(
                "  {}  {:?}  ({})\n",
                entry.context,
                entry.source,
                entry.status.as_str()
            ));
        }
    }

    if let Some(issues) = issues {
        if issues.is_empty() {
            out.push_str("\nLocations: all resolve\n");
        } else {
            out.push_str("\nLocation issues:\n");
            for issue in &issues {
                out.push_str(&format!("  {}\n", describe_issue(issue)));
            }
        }
    }

    Ok(AuditOutcome {
        text: out,
        issues: count,
    })
}

fn describe_issue(issue: &LocationIssue) -> String {
    match issue {
        LocationIssue::MissingFile {
            source,
            filename,
            resolved,
            ..
        } => format!(
            "{source:?}: file {filename} not found ({})",
            resolved.display()
        ),
        LocationIssue::LineOutOfRange {
            source,
            filename,
            line,
            lines_in_file,
            ..
        } => format!("{source:?}: {filename}:{line} is past the end ({lines_in_file} lines)"),
    }
}

/// One locale per line; the active one is marked with `*`.
pub fn locales(source: &dyn CatalogSource, current: Option<&LocaleId>) -> String {
    let available = source.available();
    if available.is_empty() {
        return "No catalogs available.\n".to_string();
    }
    let mut out = String::new();
    for locale in &available {
        let marker = if Some(locale) == current { "*" } else { " " };
        out.push_str(&format!("{marker} {locale}\n"));
    }
    out
}

fn join_locales(locales: &[LocaleId]) -> String {
    if locales.is_empty() {
        return "none".to_string();
    }
    locales
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_json<T: Serialize>(value: &T) -> Result<String, RelojError> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| RelojError::Catalog(format!("failed to serialize: {e}")))
}
