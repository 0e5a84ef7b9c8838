//! The application's handle on the active catalog.
//!
//! The GUI shell owns one `Translator` and passes it (or clones of the
//! current `Arc<Catalog>`) to whatever renders text. Switching language
//! loads a complete new catalog and swaps it in; nothing is patched.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::CatalogLoadError;
use crate::locale::LocaleId;
use crate::source::{load, CatalogSource};

pub struct Translator {
    current: RwLock<Arc<Catalog>>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::untranslated()
    }
}

impl Translator {
    /// Show every string in the authoring language.
    pub fn untranslated() -> Self {
        Self::new(Catalog::untranslated())
    }

    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The active catalog. Holders keep using it even after a switch.
    pub fn catalog(&self) -> Arc<Catalog> {
        // A poisoned lock still holds a complete catalog; keep serving it.
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Locale of the active catalog; `None` when untranslated.
    pub fn locale(&self) -> Option<LocaleId> {
        self.catalog().locale().cloned()
    }

    /// Translate `source` within `context` using the active catalog.
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.catalog().lookup(context, source).to_string()
    }

    /// Replace the active catalog.
    pub fn install(&self, catalog: Catalog) {
        let catalog = Arc::new(catalog);
        match self.current.write() {
            Ok(mut guard) => *guard = catalog,
            Err(poisoned) => *poisoned.into_inner() = catalog,
        }
    }

    /// Load `locale` and make it active. On error the active catalog is
    /// left as it was.
    pub fn switch_locale(
        &self,
        source: &dyn CatalogSource,
        locale: &LocaleId,
    ) -> Result<(), CatalogLoadError> {
        let catalog = load(source, locale)?;
        info!("switching language to {locale}");
        self.install(catalog);
        Ok(())
    }

    /// Load `locale`, or fall back to the untranslated catalog if it
    /// cannot be loaded. Returns whether `locale` is now active.
    pub fn switch_or_fallback(&self, source: &dyn CatalogSource, locale: &LocaleId) -> bool {
        match self.switch_locale(source, locale) {
            Ok(()) => true,
            Err(e) => {
                warn!("cannot use {locale} translations, showing untranslated text: {e}");
                self.install(Catalog::untranslated());
                false
            }
        }
    }
}
