//! Locale identifiers and locale resolution.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogLoadError;

/// A language with an optional region, e.g. `es` or `es_ES`.
///
/// Parsing accepts `_` or `-` as separator and normalizes case: the
/// language is lowercased, the region uppercased. `Display` always uses
/// `_`, which is the form catalog file names carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocaleId {
    language: String,
    region: Option<String>,
}

impl LocaleId {
    /// Parse a locale identifier.
    pub fn parse(s: &str) -> Result<Self, CatalogLoadError> {
        let invalid = || CatalogLoadError::InvalidLocale(s.to_string());

        // POSIX locales may carry an encoding or modifier: "es_ES.UTF-8@euro".
        let base = s.trim().split(['.', '@']).next().unwrap_or_default();
        let mut parts = base.split(['_', '-']);

        let language = parts.next().filter(|l| is_language(l)).ok_or_else(invalid)?;
        let region = match parts.next() {
            Some(r) if is_region(r) => Some(r.to_ascii_uppercase()),
            Some(_) => return Err(invalid()),
            None => None,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    /// Primary language subtag (`es`).
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Region subtag (`ES`), if any.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// The same locale without its region.
    pub fn without_region(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    /// Locales to try, most specific first: `[es_ES, es]` or `[es]`.
    pub fn fallback_chain(&self) -> Vec<LocaleId> {
        let mut chain = vec![self.clone()];
        if self.region.is_some() {
            chain.push(self.without_region());
        }
        chain
    }

    /// Whether both identifiers name the same primary language.
    pub fn same_language(&self, other: &LocaleId) -> bool {
        self.language == other.language
    }
}

fn is_language(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_region(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for LocaleId {
    type Err = CatalogLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<LocaleId> for String {
    fn from(locale: LocaleId) -> Self {
        locale.to_string()
    }
}

/// Pick the locale to load.
///
/// Candidates are tried in order: command-line argument, configured
/// language, OS locale. A candidate matches an available locale exactly,
/// or by primary language when the exact region is not provided.
/// Unparseable candidates are skipped.
pub fn resolve_locale(
    cli: Option<&str>,
    configured: Option<&str>,
    available: &[LocaleId],
) -> Option<LocaleId> {
    let os = sys_locale::get_locale();
    resolve_from(
        [cli, configured, os.as_deref()].into_iter().flatten(),
        available,
    )
}

fn resolve_from<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    available: &[LocaleId],
) -> Option<LocaleId> {
    for candidate in candidates {
        let Ok(wanted) = LocaleId::parse(candidate) else {
            tracing::debug!("ignoring unparseable locale candidate {candidate:?}");
            continue;
        };
        if available.contains(&wanted) {
            return Some(wanted);
        }
        if let Some(found) = available.iter().find(|a| a.same_language(&wanted)) {
            return Some(found.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<LocaleId> {
        list.iter().map(|s| LocaleId::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_parse_underscore_and_dash() {
        let a = LocaleId::parse("es_ES").unwrap();
        let b = LocaleId::parse("es-es").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "es_ES");
        assert_eq!(a.language(), "es");
        assert_eq!(a.region(), Some("ES"));
    }

    #[test]
    fn test_parse_language_only() {
        let l = LocaleId::parse("ES").unwrap();
        assert_eq!(l.to_string(), "es");
        assert_eq!(l.region(), None);
    }

    #[test]
    fn test_parse_posix_suffixes() {
        assert_eq!(LocaleId::parse("es_ES.UTF-8").unwrap().to_string(), "es_ES");
        assert_eq!(LocaleId::parse("ca_ES@valencia").unwrap().to_string(), "ca_ES");
    }

    #[test]
    fn test_parse_numeric_region() {
        assert_eq!(LocaleId::parse("es-419").unwrap().to_string(), "es_419");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "e", "spanish", "es_", "es_ES_x", "e$"] {
            assert!(
                matches!(LocaleId::parse(bad), Err(CatalogLoadError::InvalidLocale(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_fallback_chain() {
        let chain = LocaleId::parse("es_ES").unwrap().fallback_chain();
        assert_eq!(chain, ids(&["es_ES", "es"]));
        assert_eq!(LocaleId::parse("es").unwrap().fallback_chain(), ids(&["es"]));
    }

    #[test]
    fn test_resolve_prefers_first_candidate() {
        let available = ids(&["es_ES", "fr"]);
        let got = resolve_from(["fr", "es_ES"], &available);
        assert_eq!(got, Some(ids(&["fr"]).remove(0)));
    }

    #[test]
    fn test_resolve_matches_by_language() {
        let available = ids(&["es_ES"]);
        let got = resolve_from(["es_MX"], &available);
        assert_eq!(got, Some(ids(&["es_ES"]).remove(0)));
    }

    #[test]
    fn test_resolve_skips_invalid_and_unavailable() {
        let available = ids(&["es_ES"]);
        assert_eq!(resolve_from(["???", "de_DE"], &available), None);
        assert_eq!(
            resolve_from(["???", "es"], &available),
            Some(ids(&["es_ES"]).remove(0))
        );
    }

    #[test]
    fn test_resolve_locale_cli_wins() {
        let available = ids(&["es_ES", "en"]);
        let got = resolve_locale(Some("en"), Some("es_ES"), &available);
        assert_eq!(got, Some(ids(&["en"]).remove(0)));
    }
}
