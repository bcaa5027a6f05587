/*!
 * Tests for narration cleaning and TTS chunking
 */

use once_cell::sync::Lazy;
use regex::Regex;
use scriptsmith::script::{chunk_for_tts, clean_script, CleanerOptions, ScriptCleaner};

use crate::common::{SAMPLE_NARRATION, SAMPLE_SCRIPT};

static WRAPPED_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d+:\d{2}\s*[-–]?\s*(\d+:\d{2})?\)").unwrap());

#[test]
fn test_clean_withFullSampleScript_shouldReturnNarrationOnly() {
    assert_eq!(clean_script(SAMPLE_SCRIPT), SAMPLE_NARRATION);
}

#[test]
fn test_clean_withWrappedTimestamps_shouldLeaveNoneBehind() {
    let inputs = [
        "(0:00-0:05) Intro line.",
        "Middle (1:30 - 2:00) of a sentence.",
        "(12:00–12:30)",
        "(0:05) Short one. (0:10)Another.",
        "Nested ((0:00-0:05)) stamp.",
    ];

    for input in inputs {
        let output = clean_script(input);
        assert!(
            !WRAPPED_TIMESTAMP.is_match(&output),
            "timestamp left in {:?} -> {:?}",
            input,
            output
        );
    }
}

#[test]
fn test_clean_withSpeakerTagBeforeNarration_shouldKeepNarrationVerbatim() {
    let narration = "Coffee beans are actually seeds, not beans at all.";
    for tag in ["(Narrator)", "(Expert)", "(Narrator – warm, curious)", "(HOST 2)"] {
        assert_eq!(clean_script(&format!("{} {}", tag, narration)), narration);
    }
}

#[test]
fn test_clean_shouldBeIdempotent() {
    let cleaner = ScriptCleaner::new();
    let inputs = [
        SAMPLE_SCRIPT,
        "(0:00-0:05) Welcome to our show. (Narrator) This is amazing.",
        "**[SCENE: office]** Hello there.",
        "Wait (for it",
        "**bold** and **unclosed",
        "[a (b] c)",
        "10:30 am is not 10:305",
        "",
    ];

    for input in inputs {
        let once = cleaner.clean(input);
        assert_eq!(cleaner.clean(&once), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_clean_withDocumentedExamples_shouldMatchExactly() {
    assert_eq!(
        clean_script("(0:00-0:05) Welcome to our show. (Narrator) This is amazing."),
        "Welcome to our show. This is amazing."
    );
    assert_eq!(clean_script("**[SCENE: office]** Hello there."), "Hello there.");
}

#[test]
fn test_clean_withOnlyAnnotationLines_shouldReturnEmpty() {
    let input = "(0:00-0:05)\n[SCENE: kitchen]\n**[B-ROLL: steam]**\n**(VISUAL CUE: logo)**\n**Key Considerations**\n---\n";
    assert_eq!(clean_script(input), "");
}

#[test]
fn test_clean_withEmptyInput_shouldReturnEmpty() {
    assert_eq!(clean_script(""), "");
    assert_eq!(clean_script("   \n\t\n"), "");
}

#[test]
fn test_clean_withPlainNarration_shouldReturnTrimmedInput() {
    assert_eq!(
        clean_script("   Plain narration without any annotations.   "),
        "Plain narration without any annotations."
    );
}

#[test]
fn test_clean_shouldKeepSentenceOrder() {
    let output = clean_script("(0:00) One. [SCENE: x] Two. (Host) Three.\n**Four.**\nFive (beat).");
    assert_eq!(output, "One. Two. Three.\nFour.\nFive.");
}

#[test]
fn test_cleanWithReport_withListMarkersDisabled_shouldKeepBullets() {
    let cleaner = ScriptCleaner::with_options(CleanerOptions {
        strip_list_markers: false,
        ..CleanerOptions::default()
    });

    let (output, report) = cleaner.clean_with_report("- (0:00) First tip.");
    assert_eq!(output, "- First tip.");
    assert_eq!(report.annotations_removed(), 1);
}

#[test]
fn test_chunkForTts_shouldKeepOrderAndRespectLimit() {
    let narration = clean_script(SAMPLE_SCRIPT).replace('\n', " ");
    let chunks = chunk_for_tts(&narration, 60);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 60, "chunk too long: {:?}", chunk);
    }

    let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split_whitespace()).collect();
    let original: Vec<&str> = narration.split_whitespace().collect();
    assert_eq!(rejoined, original);
}

#[test]
fn test_chunkForTts_withZeroLimit_shouldReturnWholeText() {
    assert_eq!(chunk_for_tts("  One. Two.  ", 0), vec!["One. Two.".to_string()]);
    assert!(chunk_for_tts("", 10).is_empty());
}
