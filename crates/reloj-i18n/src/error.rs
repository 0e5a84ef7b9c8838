use std::path::PathBuf;
use thiserror::Error;

/// Why a translation catalog could not be loaded.
///
/// Every variant is a hard failure for the requested locale. Callers are
/// expected to fall back to the untranslated catalog rather than abort.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The catalog file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML.
    #[error("xml error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// The root element carries no `language` attribute.
    #[error("document has no language attribute")]
    MissingLanguage,

    /// A locale identifier could not be parsed.
    #[error("invalid locale identifier: {0:?}")]
    InvalidLocale(String),

    /// No source provides a catalog for the locale or any of its fallbacks.
    #[error("no catalog found for locale {0}")]
    NotFound(String),

    /// The document declares a different language than the one requested.
    #[error("requested locale {requested} but document declares {found}")]
    LocaleMismatch { requested: String, found: String },

    /// A required child element is absent.
    #[error("<{parent}> in context {context:?} is missing <{element}>")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
        context: String,
    },

    /// A child element that may occur once occurs again.
    #[error("<{parent}> in context {context:?} has more than one <{element}>")]
    DuplicateElement {
        parent: &'static str,
        element: &'static str,
        context: String,
    },

    /// A required attribute is absent.
    #[error("<{element}> is missing attribute {attribute:?}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute value could not be interpreted.
    #[error("<{element}> has invalid {attribute:?} value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// An element appears where the format does not allow it.
    #[error("unexpected <{element}> inside <{parent}>")]
    UnexpectedElement { parent: String, element: String },

    /// The same source text maps to two different translations.
    #[error("conflicting translations for {source_text:?} in context {context:?}: {first:?} vs {second:?}")]
    ConflictingTranslation {
        context: String,
        source_text: String,
        first: String,
        second: String,
    },

    /// A valid construct this catalog does not handle.
    #[error("unsupported: {0}")]
    Unsupported(String),
}
