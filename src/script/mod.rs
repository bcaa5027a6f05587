/*!
 * Script processing for text-to-speech hand-off.
 *
 * - `lexer`: single-pass span lexer for annotated script lines
 * - `cleaner`: narration extraction built on the lexer
 * - `chunker`: sentence-aligned splitting of narration for TTS requests
 */

pub mod chunker;
pub mod cleaner;
pub mod lexer;

// Re-export main types
pub use chunker::{chunk_for_tts, render_chunks, CHUNK_SEPARATOR};
pub use cleaner::{clean_script, CleanReport, CleanerOptions, ScriptCleaner};
pub use lexer::{AnnotationKind, Lexer, Span};
