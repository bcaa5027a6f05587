/*!
 * Narration extraction for text-to-speech.
 *
 * `ScriptCleaner` turns an AI-written video script into plain narration:
 * timestamps, stage directions, scene markers, speaker labels and metadata
 * headers are removed, leaving only the sentences meant to be read aloud.
 *
 * Each line goes through three steps:
 * 1. whole-line checks (metadata headers, speaker labels),
 * 2. the span lexer, which drops annotations and unwraps bold emphasis,
 * 3. whitespace normalization and removal of marker-only lines.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::lexer::{AnnotationKind, Lexer, Span};

/// Characters that may prefix a list item
const LIST_MARKERS: [char; 8] = ['-', '*', '•', '+', '–', '—', '>', '·'];

/// Punctuation that attaches to the previous word when a removed span sat between them
const TRAILING_PUNCTUATION: [char; 5] = ['.', ',', '!', '?', ';'];

/// Labels that introduce production metadata rather than narration
const METADATA_KEYS: &[&str] = &[
    "title",
    "video title",
    "duration",
    "target duration",
    "total duration",
    "length",
    "runtime",
    "audience",
    "target audience",
    "key considerations",
    "considerations",
    "notes",
    "production notes",
    "visual",
    "visuals",
    "visual cue",
    "b-roll",
    "broll",
    "camera",
    "shot",
    "scene",
    "setting",
    "music",
    "background music",
    "sfx",
    "sound",
    "sound effects",
    "on-screen text",
    "text overlay",
    "overlay",
    "graphics",
    "transition",
    "tone",
    "style",
    "format",
    "platform",
    "word count",
];

/// Labels that are treated as speakers
const SPEAKER_KEYS: &[&str] = &[
    "narrator",
    "host",
    "co-host",
    "speaker",
    "voiceover",
    "voice over",
    "voice-over",
    "vo",
    "presenter",
    "interviewer",
    "guest",
    "expert",
    "announcer",
];

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#{1,6}(?:\s|$)").expect("Invalid heading regex")
});

static BOLD_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*([^*]+)\*\*\s*:?$").expect("Invalid bold line regex")
});

static BOLD_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*\*\s*([^*]{1,40}?)\s*(?::\s*\*\*|\*\*\s*:)\s*").expect("Invalid bold label regex")
});

static CAPS_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Z0-9'.&-]+(?:\s+[A-Z0-9][A-Z0-9'.&-]*){0,3})\s*(\([^)]*\))?\s*:(?:\s+|$)")
        .expect("Invalid caps label regex")
});

static PLAIN_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 -]{0,24}?)\s*(?:\([^)]*\))?\s*:(?:\s+|$)").expect("Invalid plain label regex")
});

static MARKER_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•+–—_=#>|:.~…·\s]+|\d{1,3}[.)])$").expect("Invalid marker regex")
});

/// Switches for the optional cleaning steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanerOptions {
    /// Remove `NARRATOR:` / `**Host:**` style labels at line start
    #[serde(default = "default_true")]
    pub strip_speaker_labels: bool,

    /// Remove timestamps that are not wrapped in parentheses or brackets
    #[serde(default = "default_true")]
    pub strip_bare_timestamps: bool,

    /// Remove `-`, `*`, `•` list markers in front of narration
    #[serde(default = "default_true")]
    pub strip_list_markers: bool,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        Self {
            strip_speaker_labels: true,
            strip_bare_timestamps: true,
            strip_list_markers: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// What a cleaning call removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Bare timestamps
    pub timestamps: usize,
    /// Parenthesized directions and speaker tags
    pub directions: usize,
    /// Square-bracket scene markers
    pub scene_markers: usize,
    /// Bold spans that held nothing but annotations
    pub empty_emphasis: usize,
    /// Speaker labels at line start
    pub speaker_labels: usize,
    /// Metadata header lines
    pub metadata_lines: usize,
    /// Lines left empty or marker-only after cleaning
    pub dropped_lines: usize,
    /// Passes the slowest line needed before it stopped changing
    pub passes: usize,
}

impl CleanReport {
    /// Total number of inline annotations removed
    pub fn annotations_removed(&self) -> usize {
        self.timestamps + self.directions + self.scene_markers + self.empty_emphasis + self.speaker_labels
    }

    fn record(&mut self, kind: AnnotationKind) {
        match kind {
            AnnotationKind::Timestamp => self.timestamps += 1,
            AnnotationKind::Direction => self.directions += 1,
            AnnotationKind::SceneMarker => self.scene_markers += 1,
        }
    }
}

impl fmt::Display for CleanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timestamps: {}, directions: {}, scene markers: {}, empty emphasis: {}, speaker labels: {}, metadata lines: {}, dropped lines: {}, passes: {}",
            self.timestamps,
            self.directions,
            self.scene_markers,
            self.empty_emphasis,
            self.speaker_labels,
            self.metadata_lines,
            self.dropped_lines,
            self.passes
        )
    }
}

/// Extracts speakable narration from annotated scripts
#[derive(Debug, Clone, Default)]
pub struct ScriptCleaner {
    options: CleanerOptions,
}

impl ScriptCleaner {
    /// Create a cleaner with every step enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleaner with custom options
    pub fn with_options(options: CleanerOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    /// Clean a script, returning only narration
    pub fn clean(&self, script: &str) -> String {
        self.clean_with_report(script).0
    }

    /// Clean a script and report what was removed
    pub fn clean_with_report(&self, script: &str) -> (String, CleanReport) {
        let mut report = CleanReport::default();
        let mut lines = Vec::new();

        for raw in script.lines() {
            let (line, passes) = self.clean_line_fully(raw, &mut report);
            report.passes = report.passes.max(passes);
            lines.extend(line);
        }

        let cleaned = lines.join("\n");
        debug!("Cleaned script ({} -> {} chars): {}", script.len(), cleaned.len(), report);
        (cleaned, report)
    }

    /// Clean one line until it stops changing, returning it with the number of passes run
    fn clean_line_fully(&self, raw: &str, report: &mut CleanReport) -> (Option<String>, usize) {
        let mut passes = 1;
        let Some(mut current) = self.clean_line(raw, report) else {
            return (None, passes);
        };

        // A pass that changes the line makes it shorter or only normalizes
        // whitespace, so this reaches a fixed point.
        loop {
            passes += 1;
            match self.clean_line(&current, report) {
                Some(next) if next == current => return (Some(current), passes),
                Some(next) => current = next,
                None => return (None, passes),
            }
        }
    }

    fn clean_line(&self, raw: &str, report: &mut CleanReport) -> Option<String> {
        let mut line = raw.trim();
        if line.is_empty() {
            return None;
        }

        if is_metadata_line(line) {
            report.metadata_lines += 1;
            return None;
        }

        if self.options.strip_list_markers {
            line = strip_leading_markers(line);
        }

        if self.options.strip_speaker_labels {
            while let Some(end) = speaker_label_end(line) {
                report.speaker_labels += 1;
                line = line[end..].trim_start();
            }
        }

        let mut rendered = RenderedLine::default();
        self.render_spans(line, &mut rendered, report);

        let mut text = rendered.normalize();
        if self.options.strip_list_markers {
            text = strip_leading_markers(&text).to_string();
        }

        if text.is_empty() || MARKER_ONLY_REGEX.is_match(&text) {
            report.dropped_lines += 1;
            return None;
        }

        Some(text)
    }

    fn render_spans(&self, line: &str, out: &mut RenderedLine, report: &mut CleanReport) {
        for span in Lexer::new(line) {
            match span {
                Span::Text(text) => out.text.push_str(text),
                Span::Annotation { kind: AnnotationKind::Timestamp, raw } if !self.options.strip_bare_timestamps => {
                    out.text.push_str(raw);
                }
                Span::Annotation { kind, .. } => {
                    report.record(kind);
                    out.mark_gap();
                }
                Span::Emphasis { inner } => {
                    let mut inner_out = RenderedLine::default();
                    self.render_spans(inner, &mut inner_out, report);
                    if inner_out.text.trim().is_empty() {
                        report.empty_emphasis += 1;
                        out.mark_gap();
                    } else {
                        out.append(inner_out);
                    }
                }
            }
        }
    }
}

/// Clean a script with default options
pub fn clean_script(script: &str) -> String {
    ScriptCleaner::new().clean(script)
}

/// Whether a trimmed line is a production-metadata header
fn is_metadata_line(line: &str) -> bool {
    let body = strip_leading_markers(line);

    if HEADING_REGEX.is_match(body) {
        return true;
    }

    if let Some(caps) = BOLD_ONLY_REGEX.captures(body) {
        // A fully bold sentence is emphasis, a fully bold phrase is a section title
        let inner = caps[1].trim_end();
        if !inner.ends_with(['.', '!', '?', '"', '\'', '…']) {
            return true;
        }
    }

    if let Some(caps) = BOLD_LABEL_REGEX.captures(body) {
        if is_metadata_key(&caps[1]) {
            return true;
        }
    }

    CAPS_LABEL_REGEX
        .captures(body)
        .is_some_and(|caps| is_metadata_key(&caps[1]))
}

/// Byte offset where narration starts after a leading speaker label
fn speaker_label_end(line: &str) -> Option<usize> {
    if let Some(caps) = BOLD_LABEL_REGEX.captures(line) {
        let (name, qualifier) = split_qualifier(&caps[1]);
        return is_speaker_name(name, qualifier.is_some()).then(|| caps[0].len());
    }

    if let Some(caps) = CAPS_LABEL_REGEX.captures(line) {
        if is_speaker_name(&caps[1], caps.get(2).is_some()) {
            return Some(caps[0].len());
        }
    }

    PLAIN_LABEL_REGEX
        .captures(line)
        .filter(|caps| is_speaker_name(&caps[1], false))
        .map(|caps| caps[0].len())
}

/// A known speaker key, or an all-caps cue carrying a qualifier such as `(V.O.)`
fn is_speaker_name(name: &str, qualified: bool) -> bool {
    if SPEAKER_KEYS.contains(&normalize_label(name).as_str()) {
        return true;
    }

    qualified && name.chars().any(char::is_alphabetic) && !name.chars().any(char::is_lowercase)
}

/// Split `NAME (qualifier)` into its parts
fn split_qualifier(label: &str) -> (&str, Option<&str>) {
    let label = label.trim();
    label
        .strip_suffix(')')
        .and_then(|rest| rest.rfind('(').map(|open| (rest[..open].trim(), Some(rest[open + 1..].trim()))))
        .unwrap_or((label, None))
}

fn is_metadata_key(label: &str) -> bool {
    METADATA_KEYS.contains(&normalize_label(label).as_str())
}

/// Lowercase a label and drop numbering, so `Scene 2` matches `scene`
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace() || c == '#')
        .to_lowercase()
}

/// Remove any number of `- `, `* `, `• ` prefixes
fn strip_leading_markers(mut text: &str) -> &str {
    loop {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(marker), Some(next)) if LIST_MARKERS.contains(&marker) && next.is_whitespace() => {
                text = text[marker.len_utf8()..].trim_start();
            }
            _ => return text,
        }
    }
}

/// Text of a rendered line plus the byte offsets where annotations were removed
#[derive(Debug, Default)]
struct RenderedLine {
    text: String,
    gaps: Vec<usize>,
}

impl RenderedLine {
    fn mark_gap(&mut self) {
        self.gaps.push(self.text.len());
    }

    fn append(&mut self, other: RenderedLine) {
        let offset = self.text.len();
        self.gaps.extend(other.gaps.into_iter().map(|gap| gap + offset));
        self.text.push_str(&other.text);
    }

    /// Collapse whitespace and resolve the gaps left by removed annotations
    fn normalize(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut gaps = self.gaps.iter().peekable();
        let mut pending_space = false;
        let mut pending_gap = false;

        for (offset, c) in self.text.char_indices() {
            while gaps.next_if(|gap| **gap <= offset).is_some() {
                pending_gap = true;
            }
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }

            if pending_space || pending_gap {
                let attach = pending_gap && TRAILING_PUNCTUATION.contains(&c);
                if !out.is_empty() && !attach {
                    out.push(' ');
                }
                pending_space = false;
                pending_gap = false;
            }

            out.push(c);
        }

        out
    }
}
