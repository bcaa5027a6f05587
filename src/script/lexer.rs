/*!
 * Single-pass lexer for annotated scripts.
 *
 * The lexer walks one line of script text and splits it into spans:
 * - plain text runs
 * - annotations (timestamps, parenthesized directions, square-bracket scene markers)
 * - bold emphasis (`**...**`), whose inner text is lexed again by the caller
 *
 * Spans never cross the end of the input slice, so callers feed it one line
 * at a time. Unbalanced delimiters are emitted as plain text.
 */

/// Dashes accepted between the two halves of a timestamp range
const RANGE_DASHES: [char; 3] = ['-', '–', '—'];

/// Kind of annotation recognised by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
    /// `0:05`, `0:00-0:05`, `1:02:30`
    Timestamp,
    /// Anything in balanced parentheses: `(Narrator)`, `(0:00-0:05)`
    Direction,
    /// Anything in balanced square brackets: `[SCENE: office]`
    SceneMarker,
}

/// A classified slice of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    /// Narration text, emitted verbatim
    Text(&'a str),
    /// Non-narration text
    Annotation {
        kind: AnnotationKind,
        raw: &'a str,
    },
    /// Bold emphasis; `inner` excludes the `**` markers
    Emphasis { inner: &'a str },
}

/// Iterator over the spans of one script line
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over `src`
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn prev_char(&self) -> Option<char> {
        self.src[..self.pos].chars().next_back()
    }

    /// Try to read a span starting at the current position
    fn special_span(&mut self) -> Option<Span<'a>> {
        let start = self.pos;
        let rest = self.rest();
        let first = rest.chars().next()?;

        let (len, span) = match first {
            '(' => {
                let len = balanced_len(rest, '(', ')')?;
                (len, Span::Annotation { kind: AnnotationKind::Direction, raw: &rest[..len] })
            }
            '[' => {
                let len = balanced_len(rest, '[', ']')?;
                (len, Span::Annotation { kind: AnnotationKind::SceneMarker, raw: &rest[..len] })
            }
            '*' if rest.starts_with("**") => {
                let close = rest[2..].find("**")?;
                let inner = &rest[2..2 + close];
                (close + 4, Span::Emphasis { inner })
            }
            c if c.is_ascii_digit() && !is_clock_neighbor(self.prev_char()) => {
                let len = timestamp_len(rest)?;
                (len, Span::Annotation { kind: AnnotationKind::Timestamp, raw: &rest[..len] })
            }
            _ => return None,
        };

        self.pos = start + len;
        Some(span)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Span<'a>> {
        if self.pos >= self.src.len() {
            return None;
        }

        if let Some(span) = self.special_span() {
            return Some(span);
        }

        // Plain text: always consume at least one char so unmatched delimiters make progress
        let start = self.pos;
        let mut prev = self.rest().chars().next()?;
        self.pos += prev.len_utf8();

        while let Some(c) = self.rest().chars().next() {
            if starts_span(c, prev) {
                break;
            }
            self.pos += c.len_utf8();
            prev = c;
        }

        Some(Span::Text(&self.src[start..self.pos]))
    }
}

/// Whether `c` (preceded by `prev`) may open a special span
fn starts_span(c: char, prev: char) -> bool {
    match c {
        '(' | '[' | '*' => true,
        c if c.is_ascii_digit() => !is_clock_neighbor(Some(prev)),
        _ => false,
    }
}

/// A digit or colon right before a number means it is not the start of a clock
fn is_clock_neighbor(prev: Option<char>) -> bool {
    prev.is_some_and(|p| p.is_ascii_digit() || p == ':')
}

/// Length in bytes of the balanced span opening at the start of `s`
///
/// Only delimiters of the same kind are counted. Returns `None` when the
/// opening delimiter is never closed.
fn balanced_len(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx + c.len_utf8());
            }
        }
    }
    None
}

/// Length of an `H:MM` or `H:MM:SS` clock at the start of `s`
pub(crate) fn clock_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let hours = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if hours == 0 || hours > 2 {
        return None;
    }

    let mut len = hours;
    let mut groups = 0;
    while groups < 2
        && bytes.get(len) == Some(&b':')
        && bytes.get(len + 1).is_some_and(u8::is_ascii_digit)
        && bytes.get(len + 2).is_some_and(u8::is_ascii_digit)
    {
        len += 3;
        groups += 1;
    }

    if groups == 0 || bytes.get(len).is_some_and(u8::is_ascii_digit) {
        return None;
    }

    Some(len)
}

/// Length of a timestamp or timestamp range at the start of `s`
///
/// Mirrors `\d+:\d{2}\s*[-–]?\s*(\d+:\d{2})?`: whitespace and a single dash
/// after the first clock are consumed even without a second clock.
pub(crate) fn timestamp_len(s: &str) -> Option<usize> {
    let skip_blanks = |from: usize| {
        let tail = &s[from..];
        from + tail.len() - tail.trim_start_matches([' ', '\t']).len()
    };

    let mut len = skip_blanks(clock_len(s)?);

    if let Some(dash) = s[len..].chars().next().filter(|c| RANGE_DASHES.contains(c)) {
        len = skip_blanks(len + dash.len_utf8());
    }

    if let Some(second) = clock_len(&s[len..]) {
        len += second;
    }

    Some(len)
}
