//! # reloj-i18n
//!
//! Translation catalogs for the Reloj Digital clock. Catalogs are read from
//! Qt Linguist `.ts` documents, held immutably, and queried by
//! `(context, source text)`. Missing entries fall back to the source text.
//!
//! ```
//! use reloj_i18n::{load, BundledSource, LocaleId};
//!
//! let es = LocaleId::parse("es_ES")?;
//! let catalog = load(&BundledSource, &es)?;
//! assert_eq!(catalog.lookup("RelojDigital", "Timer"), "Temporizador");
//! assert_eq!(catalog.lookup("RelojDigital", "Snooze"), "Snooze");
//! # Ok::<(), reloj_i18n::CatalogLoadError>(())
//! ```

pub mod audit;
mod catalog;
mod error;
mod locale;
mod parse;
mod source;
mod translator;


// Re-export public API; consumers use `reloj_i18n::*` paths.
pub use catalog::{Catalog, Entry, Location, TranslationStatus};
pub use error::CatalogLoadError;
pub use locale::{resolve_locale, LocaleId};
pub use source::{load, BundledSource, CatalogSource, ChainSource, DirSource};
pub use translator::Translator;
