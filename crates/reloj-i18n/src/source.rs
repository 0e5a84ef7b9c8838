//! Where catalog documents come from, and the `load` entry point.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::CatalogLoadError;
use crate::locale::LocaleId;

/// Catalogs compiled into the binary, keyed by the locale in their file name.
const BUNDLED: &[(&str, &str)] = &[(
    "es",
    include_str!("../../../resources/translations/reloj_es.ts"),
)];

/// A provider of `.ts` documents.
///
/// Implementations only fetch text; parsing and validation happen in
/// [`load`].
pub trait CatalogSource: Send + Sync {
    /// Human-readable source name, used in logs.
    fn name(&self) -> &str;

    /// The document for exactly `locale`, or `None` if this source has none.
    fn read(&self, locale: &LocaleId) -> Result<Option<String>, CatalogLoadError>;

    /// Locales this source can provide, sorted.
    fn available(&self) -> Vec<LocaleId>;
}

/// Catalog files in a directory, named `<basename>_<locale>.ts`.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
    basename: String,
    label: String,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>, basename: impl Into<String>) -> Self {
        let dir = dir.into();
        let label = dir.display().to_string();
        Self {
            dir,
            basename: basename.into(),
            label,
        }
    }

    /// Path of the file that would hold `locale`.
    pub fn path_for(&self, locale: &LocaleId) -> PathBuf {
        self.dir.join(format!("{}_{}.ts", self.basename, locale))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CatalogSource for DirSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn read(&self, locale: &LocaleId) -> Result<Option<String>, CatalogLoadError> {
        let path = self.path_for(locale);
        match std::fs::read_to_string(&path) {
            Ok(document) => {
                debug!("read {}", path.display());
                Ok(Some(document))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CatalogLoadError::Io { path, source }),
        }
    }

    fn available(&self) -> Vec<LocaleId> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot list {}: {e}", self.dir.display());
                return Vec::new();
            }
        };

        let prefix = format!("{}_", self.basename);
        let mut locales: Vec<LocaleId> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stem = name.strip_prefix(&prefix)?.strip_suffix(".ts")?;
                LocaleId::parse(stem).ok()
            })
            .collect();
        locales.sort();
        locales
    }
}

/// The catalogs shipped inside the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSource;

impl CatalogSource for BundledSource {
    fn name(&self) -> &str {
        "bundled"
    }

    fn read(&self, locale: &LocaleId) -> Result<Option<String>, CatalogLoadError> {
        Ok(BUNDLED
            .iter()
            .find(|(id, _)| LocaleId::parse(id).is_ok_and(|id| &id == locale))
            .map(|(_, document)| (*document).to_string()))
    }

    fn available(&self) -> Vec<LocaleId> {
        let mut locales: Vec<LocaleId> = BUNDLED
            .iter()
            .filter_map(|(id, _)| LocaleId::parse(id).ok())
            .collect();
        locales.sort();
        locales
    }
}

/// Several sources consulted in order; the first that has a document wins.
#[derive(Default)]
pub struct ChainSource {
    sources: Vec<Box<dyn CatalogSource>>,
}

impl ChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower priority than those already present.
    pub fn with(mut self, source: impl CatalogSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CatalogSource for ChainSource {
    fn name(&self) -> &str {
        "chain"
    }

    fn read(&self, locale: &LocaleId) -> Result<Option<String>, CatalogLoadError> {
        for source in &self.sources {
            if let Some(document) = source.read(locale)? {
                debug!("{locale} provided by {}", source.name());
                return Ok(Some(document));
            }
        }
        Ok(None)
    }

    fn available(&self) -> Vec<LocaleId> {
        let mut locales: Vec<LocaleId> = self
            .sources
            .iter()
            .flat_map(|s| s.available())
            .collect();
        locales.sort();
        locales.dedup();
        locales
    }
}

/// Load the catalog for `locale` from `source`.
///
/// Walks the locale's fallback chain (`es_ES`, then `es`) and parses the
/// first document found. The document must declare the same primary
/// language as `locale`.
pub fn load(source: &dyn CatalogSource, locale: &LocaleId) -> Result<Catalog, CatalogLoadError> {
    for candidate in locale.fallback_chain() {
        let Some(document) = source.read(&candidate)? else {
            debug!("{} has no catalog for {candidate}", source.name());
            continue;
        };

        let catalog = Catalog::parse(&document).inspect_err(|e| {
            warn!("{candidate} catalog from {} is invalid: {e}", source.name());
        })?;

        if let Some(found) = catalog.locale().filter(|found| !found.same_language(locale)) {
            return Err(CatalogLoadError::LocaleMismatch {
                requested: locale.to_string(),
                found: found.to_string(),
            });
        }

        info!(
            "loaded {} catalog from {} ({} entries)",
            catalog.locale_name(),
            source.name(),
            catalog.len()
        );
        return Ok(catalog);
    }

    Err(CatalogLoadError::NotFound(locale.to_string()))
}
