use super::*;

const SPANISH: &str = include_str!("../../resources/translations/reloj_es.ts");

fn cfg_for(dir: &Path, use_bundled: bool) -> I18nConfig {
    I18nConfig {
        language: None,
        translations_dir: dir.to_string_lossy().into_owned(),
        basename: "reloj".to_string(),
        use_bundled,
    }
}

fn spanish() -> Catalog {
    Catalog::parse(SPANISH).unwrap()
}

#[test]
fn test_lookup_command() {
    let catalog = spanish();
    assert_eq!(lookup(&catalog, "RelojDigital", None, "Timer"), "Temporizador");
    assert_eq!(
        lookup(&catalog, "RelojDigital", None, "Unknown String"),
        "Unknown String"
    );
    assert_eq!(lookup(&catalog, "RelojDigital", Some("tab"), "Timer"), "Timer");
}

#[test]
fn test_entries_text_lists_every_entry() {
    let out = entries(&spanish(), false).unwrap();
    assert_eq!(out.lines().count(), 16);
    assert!(out.contains("RelojDigital\t\"Duration:\"\t\"Duración:\""));
    assert!(!out.contains("[unfinished]"));
}

#[test]
fn test_entries_text_marks_status() {
    let draft = SPANISH.replace(
        "<translation>seg</translation>",
        "<translation type=\"unfinished\">seg</translation>",
    );
    let out = entries(&Catalog::parse(&draft).unwrap(), false).unwrap();
    assert!(out.contains("\"sec\"\t\"seg\"\t[unfinished]"));
}

#[test]
fn test_entries_json() {
    let out = entries(&spanish(), true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let list = value.as_array().unwrap();
    assert_eq!(list.len(), 16);
    assert_eq!(list[2]["source"], "Timer");
    assert_eq!(list[2]["translation"], "Temporizador");
    assert_eq!(list[2]["status"], "finished");
    assert_eq!(list[2]["locations"][1]["line"], 332);
    assert!(list[2].get("disambiguation").is_none());
}

#[test]
fn test_audit_text_without_locations() {
    let outcome = audit(&spanish(), None, false).unwrap();
    assert_eq!(outcome.issues, 0);
    assert!(outcome.text.contains("Locale: es_ES"));
    assert!(outcome.text.contains("Complete: 100.0%"));
    assert!(outcome.text.contains("RelojDigital: 16/16"));
    assert!(!outcome.text.contains("Pending"));
}

#[test]
fn test_audit_reports_missing_source_file() {
    let tmp = tempfile::tempdir().unwrap();
    let outcome = audit(&spanish(), Some(tmp.path()), false).unwrap();
    // One issue per location: 16 entries, 5 of them with two locations.
    assert_eq!(outcome.issues, 21);
    assert!(outcome.text.contains("Location issues:"));
    assert!(outcome.text.contains("file ../../reloj_digital.py not found"));
}

#[test]
fn test_audit_locations_resolve() {
    let tmp = tempfile::tempdir().unwrap();
    let gui = tmp.path().join("app");
    let translations = gui.join("Resources/translations");
    std::fs::create_dir_all(&translations).unwrap();
    let source: String = (1..=400).map(|n| format!("line {n}\n")).collect();
    std::fs::write(gui.join("reloj_digital.py"), source).unwrap();

    let outcome = audit(&spanish(), Some(&translations), false).unwrap();
    assert_eq!(outcome.issues, 0);
    assert!(outcome.text.contains("Locations: all resolve"));
}

#[test]
fn test_audit_json() {
    let draft = SPANISH.replace(
        "<translation>Idioma</translation>",
        "<translation type=\"unfinished\"></translation>",
    );
    let catalog = Catalog::parse(&draft).unwrap();
    let outcome = audit(&catalog, None, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&outcome.text).unwrap();
    assert_eq!(value["coverage"]["total"], 16);
    assert_eq!(value["coverage"]["translated"], 15);
    assert_eq!(value["coverage"]["empty"], 1);
    assert_eq!(value["pending"][0]["source"], "Language");
    assert!(value.get("location_issues").is_none());
    assert_eq!(
        catalog.get("RelojDigital", "Language", None).unwrap().status,
        TranslationStatus::Unfinished
    );
}

#[test]
fn test_build_source_with_and_without_bundled() {
    let tmp = tempfile::tempdir().unwrap();
    let with = build_source(&cfg_for(tmp.path(), true));
    assert_eq!(with.available(), vec![LocaleId::parse("es").unwrap()]);
    let without = build_source(&cfg_for(tmp.path(), false));
    assert!(without.available().is_empty());
}

#[test]
fn test_open_catalog_explicit_locale() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = cfg_for(tmp.path(), true);
    let source = build_source(&cfg);
    let catalog = open_catalog(&source, Some("es_ES"), &cfg).unwrap();
    assert_eq!(catalog.lookup("RelojDigital", "Reset"), "Reiniciar");

    let err = open_catalog(&source, Some("de_DE"), &cfg).unwrap_err();
    assert!(err.to_string().contains("no catalog found for locale de_DE"));

    let err = open_catalog(&source, Some("??"), &cfg).unwrap_err();
    assert!(matches!(err, RelojError::Catalog(_)));
}

#[test]
fn test_open_catalog_configured_language() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cfg = cfg_for(tmp.path(), true);
    cfg.language = Some("es_MX".to_string());
    let source = build_source(&cfg);
    let catalog = open_catalog(&source, None, &cfg).unwrap();
    assert_eq!(catalog.lookup("RelojDigital", "Pause"), "Pausar");
}

#[test]
fn test_locales_marks_current() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("reloj_fr.ts"), "").unwrap();
    let source = build_source(&cfg_for(tmp.path(), true));
    let es = LocaleId::parse("es").unwrap();
    assert_eq!(locales(&source, Some(&es)), "* es\n  fr\n");
    assert_eq!(locales(&source, None), "  es\n  fr\n");
}

#[test]
fn test_locales_none_available() {
    let tmp = tempfile::tempdir().unwrap();
    let source = build_source(&cfg_for(tmp.path(), false));
    assert_eq!(locales(&source, None), "No catalogs available.\n");
}
