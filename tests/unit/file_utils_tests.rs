/*!
 * Tests for file utilities
 */

use std::fs;
use std::path::Path;

use scriptsmith::file_utils::{FileManager, InputSource};

use crate::common;

#[test]
fn test_findFiles_withNestedDirectories_shouldMatchExtensionCaseInsensitively() {
    let dir = common::create_temp_dir().unwrap();
    let nested = dir.path().join("season1").join("drafts");
    fs::create_dir_all(&nested).unwrap();

    common::create_test_file(dir.path(), "intro.TXT", "a").unwrap();
    common::create_test_file(&nested, "episode.txt", "b").unwrap();
    common::create_test_file(&nested, "notes.json", "{}").unwrap();

    let mut found = FileManager::find_files(dir.path(), ".txt").unwrap();
    found.sort();

    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|p| p.ends_with("intro.TXT")));
    assert!(found.iter().any(|p| p.ends_with("season1/drafts/episode.txt")));
}

#[test]
fn test_findScriptFiles_shouldIncludeMarkdownAndSortPaths() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "b.md", "b").unwrap();
    common::create_test_file(dir.path(), "a.txt", "a").unwrap();
    common::create_test_file(dir.path(), "a.narration.txt", "cleaned").unwrap();

    let found = FileManager::find_script_files(dir.path()).unwrap();

    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "b.md"]);
}

#[test]
fn test_narrationOutputPath_withOutputDir_shouldPlaceFileThere() {
    let path = FileManager::narration_output_path("scripts/ep1.md", Some(Path::new("out")));
    assert_eq!(path, Path::new("out/ep1.narration.txt"));
}

#[test]
fn test_inputSourceResolve_withFile_shouldReadContent() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(dir.path(), "script.txt", "Hello there.").unwrap();

    let source = InputSource::resolve(file.to_str().unwrap()).unwrap();
    let InputSource::File(path) = source else { panic!("expected a file source") };
    assert_eq!(FileManager::read_to_string(path).unwrap(), "Hello there.");
}

#[test]
fn test_inputSourceResolve_withDirectory_shouldReturnDirectory() {
    let dir = common::create_temp_dir().unwrap();
    let source = InputSource::resolve(dir.path().to_str().unwrap()).unwrap();
    assert!(matches!(source, InputSource::Directory(_)));
}

#[test]
fn test_inputSourceResolve_withMissingPath_shouldFail() {
    assert!(InputSource::resolve("/definitely/not/here.txt").is_err());
    assert_eq!(InputSource::resolve("-").unwrap(), InputSource::Stdin);
}

#[test]
fn test_writeOutput_withPath_shouldWriteFile() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("out").join("result.txt");

    FileManager::write_output(Some(&target), "narration").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "narration");
}

#[test]
fn test_ensureDir_calledTwice_shouldSucceed() {
    let dir = common::create_temp_dir().unwrap();
    let target = dir.path().join("a").join("b");

    FileManager::ensure_dir(&target).unwrap();
    FileManager::ensure_dir(&target).unwrap();

    assert!(FileManager::dir_exists(&target));
    assert!(!FileManager::file_exists(&target));
}
