/*!
 * Splitting narration into TTS-sized chunks.
 *
 * Speech engines cap the amount of text accepted per request, so narration
 * is cut at sentence boundaries into chunks below a character limit.
 */

/// Separator written between TTS chunks
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Narration as written out: whole, or split into chunks joined by [`CHUNK_SEPARATOR`]
pub fn render_chunks(narration: &str, max_chars: Option<usize>) -> String {
    match max_chars {
        Some(max_chars) => chunk_for_tts(narration, max_chars).join(CHUNK_SEPARATOR),
        None => narration.to_string(),
    }
}

/// Split narration into chunks of at most `max_chars` characters
///
/// Sentences are kept whole where they fit. A sentence longer than the limit
/// is split between words, and a single word longer than the limit becomes
/// its own chunk. `max_chars == 0` disables splitting.
pub fn chunk_for_tts(text: &str, max_chars: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let fits = if current.is_empty() {
            char_len(&sentence) <= max_chars
        } else {
            char_len(&current) + 1 + char_len(&sentence) <= max_chars
        };

        if fits {
            push_joined(&mut current, &sentence);
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if char_len(&sentence) <= max_chars {
            current = sentence;
            continue;
        }

        for word in sentence.split_whitespace() {
            if !current.is_empty() && char_len(&current) + 1 + char_len(word) > max_chars {
                chunks.push(std::mem::take(&mut current));
            }
            push_joined(&mut current, word);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split text after `.`, `!` or `?` followed by whitespace, collapsing inner whitespace
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        push_joined(&mut current, word);
        let ends_sentence = word
            .trim_end_matches(['"', '\'', ')', '”', '’'])
            .ends_with(['.', '!', '?', '…']);
        if ends_sentence {
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

fn push_joined(buf: &mut String, piece: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(piece);
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
