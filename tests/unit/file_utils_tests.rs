/*!
 * Tests for file and directory utilities
 */

use std::path::PathBuf;

use vorleser::file_utils::FileManager;

use crate::common;

#[test]
fn test_file_exists_withRealAndMissingFiles_shouldDistinguish() {
    let temp = common::create_temp_dir().unwrap();
    let file = common::create_test_file(temp.path(), "doc.md", "# Hallo\n").unwrap();

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp.path().join("missing.md")));
    // A directory is not a file
    assert!(!FileManager::file_exists(temp.path()));
    assert!(FileManager::dir_exists(temp.path()));
}

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAllLevels() {
    let temp = common::create_temp_dir().unwrap();
    let nested = temp.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));

    // Idempotent on an existing directory
    FileManager::ensure_dir(&nested).unwrap();
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() {
    let temp = common::create_temp_dir().unwrap();
    let path = temp.path().join("deep").join("note.txt");

    FileManager::write_to_file(&path, "Inhalt").unwrap();
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "Inhalt");
}

#[test]
fn test_artifact_path_withBaseAndExtension_shouldJoinThem() {
    let path = FileManager::artifact_path("out", "Die_Studie_20260831_120000", "srt");
    assert_eq!(
        path,
        PathBuf::from("out/Die_Studie_20260831_120000.srt")
    );
}

#[test]
fn test_find_documents_withMixedExtensions_shouldKeepOnlyNarratable() {
    let temp = common::create_temp_dir().unwrap();
    common::create_test_file(temp.path(), "b.md", "# B\n").unwrap();
    common::create_test_file(temp.path(), "a.txt", "A\n").unwrap();
    common::create_test_file(temp.path(), "c.markdown", "# C\n").unwrap();
    common::create_test_file(temp.path(), "ignore.wav", "").unwrap();
    common::create_test_file(temp.path(), "ignore.json", "{}").unwrap();

    let docs = FileManager::find_documents(temp.path()).unwrap();
    let names: Vec<String> = docs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    // Sorted, extensions filtered
    assert_eq!(names, vec!["a.txt", "b.md", "c.markdown"]);
}

#[test]
fn test_first_heading_withNestedHeading_shouldReturnFirstMatch() {
    let doc = "Einleitung ohne Titel\n\n## Zweite Ebene\n# Erste Ebene\n";
    assert_eq!(
        FileManager::first_heading(doc),
        Some("Zweite Ebene".to_string())
    );
    assert_eq!(FileManager::first_heading("Keine Überschrift."), None);
}

#[test]
fn test_sanitize_filename_withSpecialCharacters_shouldReplaceThem() {
    assert_eq!(
        FileManager::sanitize_filename("Die Studie: 2002 (Teil 1)"),
        "Die_Studie__2002__Teil_1_"
    );
    assert_eq!(FileManager::sanitize_filename("  schon-sicher_7  "), "schon-sicher_7");
}

/// A custom label is used verbatim; only derived names get a timestamp
#[test]
fn test_output_base_name_withLabelSources_shouldPickByPriority() {
    let doc = "# Die Studie\n\nInhalt.\n";
    let ts_suffix = regex::Regex::new(r"_\d{8}_\d{6}$").unwrap();

    // Caller-supplied labels stay stable across runs so a later run can
    // detect and skip (or overwrite) existing artifacts
    let from_label = FileManager::output_base_name(doc, Some("Mein Lauf"));
    assert_eq!(from_label, "Mein_Lauf");

    let from_heading = FileManager::output_base_name(doc, None);
    assert!(from_heading.starts_with("Die_Studie_"));
    assert!(ts_suffix.is_match(&from_heading));

    let fallback = FileManager::output_base_name("Nur Prosa ohne Titel.", None);
    assert!(fallback.starts_with("output_"));
    assert!(ts_suffix.is_match(&fallback));

    // A blank custom label falls through to the heading
    let blank_label = FileManager::output_base_name(doc, Some("   "));
    assert!(blank_label.starts_with("Die_Studie_"));
}
