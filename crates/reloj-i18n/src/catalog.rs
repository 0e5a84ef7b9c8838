//! The in-memory translation catalog for one locale.
//!
//! A catalog is built once (from a `.ts` document or a list of entries) and
//! is read-only afterwards. Changing language means building a new catalog;
//! see [`crate::Translator`].

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::error::CatalogLoadError;
use crate::locale::LocaleId;

/// Where a source string appears in the GUI code. Never used for lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub filename: String,
    pub line: u32,
}

/// The `type` attribute of a `<translation>` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStatus {
    /// No `type` attribute: reviewed and done.
    #[default]
    Finished,
    /// Translated text may be a draft or empty.
    Unfinished,
    /// The source string no longer exists in the GUI code.
    Obsolete,
    /// Like `Obsolete`, written by newer extraction tools.
    Vanished,
}

impl TranslationStatus {
    /// Map the attribute value; `None` for values the format does not define.
    pub fn from_attr(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(Self::Finished),
            Some("unfinished") => Some(Self::Unfinished),
            Some("obsolete") => Some(Self::Obsolete),
            Some("vanished") => Some(Self::Vanished),
            Some(_) => None,
        }
    }

    /// Whether entries with this status take part in lookup.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }

    /// Completeness order used when merging duplicates.
    fn rank(&self) -> u8 {
        match self {
            Self::Finished => 2,
            Self::Unfinished => 1,
            Self::Obsolete | Self::Vanished => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Obsolete => "obsolete",
            Self::Vanished => "vanished",
        }
    }
}

/// One source string and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Name of the enclosing `<context>`, usually the widget class.
    pub context: String,
    /// Authoring-language text; the lookup key.
    pub source: String,
    /// `<comment>`: tells apart identical sources within one context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<String>,
    pub translation: String,
    pub status: TranslationStatus,
    pub locations: Vec<Location>,
    /// `<extracomment>`: note for translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
}

impl Entry {
    /// Whether lookup returns `translation` rather than `source`.
    pub fn is_translated(&self) -> bool {
        self.status.is_active() && !self.translation.is_empty()
    }
}

/// source text -> indices into `entries`, one per disambiguation.
type ContextIndex = HashMap<String, Vec<usize>>;

/// All translations for one locale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: Option<LocaleId>,
    version: Option<String>,
    source_language: Option<LocaleId>,
    entries: Vec<Entry>,
    index: HashMap<String, ContextIndex>,
}

impl Catalog {
    /// A catalog with no entries: every lookup returns its source text.
    pub fn untranslated() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        locale: LocaleId,
        version: Option<String>,
        source_language: Option<LocaleId>,
    ) -> Self {
        Self {
            locale: Some(locale),
            version,
            source_language,
            ..Self::default()
        }
    }

    /// Build a catalog from entries, applying the same duplicate rules as
    /// the document parser.
    pub fn from_entries(
        locale: LocaleId,
        entries: impl IntoIterator<Item = Entry>,
    ) -> Result<Self, CatalogLoadError> {
        let mut catalog = Self::new(locale, None, None);
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Parse a `.ts` document held in memory.
    pub fn parse(document: &str) -> Result<Self, CatalogLoadError> {
        crate::parse::parse_document(document)
    }

    /// Read and parse a `.ts` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&document)?;
        tracing::debug!(
            "parsed {} ({} entries, locale {})",
            path.display(),
            catalog.len(),
            catalog.locale_name()
        );
        Ok(catalog)
    }

    /// Add an entry, merging or rejecting duplicates of its key.
    ///
    /// Locations of a duplicate are appended to the entry already present.
    /// Two active copies must agree on the translation text; the merged
    /// entry takes the more complete status. An active copy replaces the
    /// text and status of an obsolete one. Obsolete copies never conflict.
    pub(crate) fn insert(&mut self, entry: Entry) -> Result<(), CatalogLoadError> {
        if let Some(existing) = self.position(
            &entry.context,
            &entry.source,
            entry.disambiguation.as_deref(),
        ) {
            let current = &mut self.entries[existing];
            let both_active = current.status.is_active() && entry.status.is_active();
            if both_active && current.translation != entry.translation {
                return Err(CatalogLoadError::ConflictingTranslation {
                    context: entry.context,
                    source_text: entry.source,
                    first: current.translation.clone(),
                    second: entry.translation,
                });
            }
            tracing::debug!(
                "merging duplicate {:?} in context {:?}",
                entry.source,
                entry.context
            );
            if entry.status.rank() > current.status.rank() {
                current.status = entry.status;
                current.translation = entry.translation;
            }
            current.locations.extend(entry.locations);
            return Ok(());
        }

        let idx = self.entries.len();
        self.index
            .entry(entry.context.clone())
            .or_default()
            .entry(entry.source.clone())
            .or_default()
            .push(idx);
        self.entries.push(entry);
        Ok(())
    }

    fn position(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<usize> {
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .copied()
            .find(|&i| self.entries[i].disambiguation.as_deref() == disambiguation)
    }

    /// Translate `source` within `context`.
    ///
    /// Returns `source` itself when there is no entry, the entry is
    /// obsolete, or its translation is empty.
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.lookup_disambiguated(context, source, None)
    }

    /// Like [`lookup`](Self::lookup), for entries carrying a `<comment>`.
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        match self.get(context, source, disambiguation) {
            Some(entry) if entry.is_translated() => &entry.translation,
            _ => source,
        }
    }

    /// Raw access to the entry for a key, whatever its status.
    pub fn get(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&Entry> {
        self.position(context, source, disambiguation)
            .map(|i| &self.entries[i])
    }

    /// Entries in document order. Each call starts a fresh pass.
    pub fn entries(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Context names in first-seen order.
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.context.as_str()) {
                seen.push(&entry.context);
            }
        }
        seen
    }

    /// Locale of the catalog; `None` for the untranslated catalog.
    pub fn locale(&self) -> Option<&LocaleId> {
        self.locale.as_ref()
    }

    pub(crate) fn locale_name(&self) -> String {
        self.locale
            .as_ref()
            .map_or_else(|| "untranslated".to_string(), LocaleId::to_string)
    }

    /// Format version of the source document (`version` attribute).
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Authoring language (`sourcelanguage` attribute).
    pub fn source_language(&self) -> Option<&LocaleId> {
        self.source_language.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
