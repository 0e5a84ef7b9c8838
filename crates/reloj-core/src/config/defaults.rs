//! Default value functions used by serde for config deserialization.

pub fn default_translations_dir() -> String {
    "resources/translations".to_string()
}

pub fn default_basename() -> String {
    "reloj".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
