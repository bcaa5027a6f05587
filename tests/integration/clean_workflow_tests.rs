/*!
 * Integration tests for the script cleaning workflow
 */

use std::fs;
use anyhow::Result;

use scriptsmith::app_controller::Controller;
use scriptsmith::file_utils::FileManager;
use scriptsmith::providers::MockProvider;
use crate::common;

/// Clean a realistic annotated script from disk into a separate output directory
#[test]
fn test_cleanFile_withSampleScript_shouldWriteNarration() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "morning.md", common::SAMPLE_SCRIPT)?;
    let output_dir = temp_dir.path().join("narration");

    let controller = common::mock_controller(MockProvider::working())?;
    let (output_path, report) = controller.clean_file(&input, Some(&output_dir), None)?;

    assert_eq!(output_path, output_dir.join("morning.narration.txt"));
    assert_eq!(fs::read_to_string(&output_path)?, common::SAMPLE_NARRATION);
    assert!(report.scene_markers >= 1);
    assert!(report.directions >= 1);
    assert!(report.dropped_lines >= 1);

    Ok(())
}

#[test]
fn test_cleanDirectory_withForce_shouldOverwriteStaleNarration() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "episode.txt", "(0:00-0:03) Fresh narration.")?;
    let stale = common::create_test_file(temp_dir.path(), "episode.narration.txt", "stale")?;

    let controller = Controller::new_for_test()?;

    let skipped = controller.clean_directory(temp_dir.path(), None, None, false)?;
    assert_eq!(skipped.skipped, 1);
    assert!(skipped.written.is_empty());
    assert_eq!(fs::read_to_string(&stale)?, "stale");

    let forced = controller.clean_directory(temp_dir.path(), None, None, true)?;
    assert_eq!(forced.written, vec![stale.clone()]);
    assert_eq!(fs::read_to_string(&stale)?, "Fresh narration.");

    Ok(())
}

#[test]
fn test_cleanDirectory_withNestedScripts_shouldSumReports() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season2");
    fs::create_dir_all(&nested)?;
    common::create_test_file(temp_dir.path(), "a.txt", "[SCENE: office] Welcome back.")?;
    common::create_test_file(&nested, "b.txt", "**[SCENE: park]** See you soon.")?;
    common::create_test_file(&nested, "notes.json", "{}")?;

    let output_dir = temp_dir.path().join("out");
    let controller = Controller::new_for_test()?;
    let summary = controller.clean_directory(temp_dir.path(), Some(&output_dir), None, false)?;

    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.report.scene_markers, 2);
    assert_eq!(fs::read_to_string(output_dir.join("b.narration.txt"))?, "See you soon.");

    // Outputs written into the scanned tree are not cleaned again
    let scripts = FileManager::find_script_files(temp_dir.path())?;
    assert_eq!(scripts.len(), 2);

    Ok(())
}

#[test]
fn test_cleanDirectory_withoutScripts_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "data.csv", "a,b")?;

    let controller = Controller::new_for_test()?;
    assert!(controller.clean_directory(temp_dir.path(), None, None, false).is_err());
    assert!(controller.clean_directory(&temp_dir.path().join("missing"), None, None, false).is_err());

    Ok(())
}

#[test]
fn test_cleanIntoChunks_withSmallLimit_shouldKeepEveryWord() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let chunks = controller.clean_into_chunks(common::SAMPLE_SCRIPT, 60);

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 60));

    let chunk_words: Vec<&str> = chunks.iter().flat_map(|c| c.split_whitespace()).collect();
    let narration_words: Vec<&str> = common::SAMPLE_NARRATION.split_whitespace().collect();
    assert_eq!(chunk_words, narration_words);

    Ok(())
}
