/*!
 * # scriptsmith - AI content preparation for speech and print
 *
 * A Rust library for turning AI-generated text into material that downstream
 * renderers can consume.
 *
 * ## Features
 *
 * - Clean annotated video scripts into plain narration for text-to-speech
 * - Split narration into sentence-aligned TTS chunks
 * - Enhance short prompts into several richer variations
 * - Generate video scripts through an LLM provider:
 *   - Google Gemini
 *   - Groq (OpenAI-compatible API)
 *   - OpenRouter (OpenAI-compatible API)
 * - Assemble contracts from party and term data, optionally with an AI-drafted body
 * - Convert contract markdown into ReportLab or HTML markup
 * - Keep a local SQLite history of generated results
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `script`: The narration cleaner and TTS chunker:
 *   - `script::lexer`: Single-pass span lexer for annotations
 *   - `script::cleaner`: Line rules and the fixed-point cleaning loop
 *   - `script::chunker`: Sentence-aligned chunking
 * - `enhancer`: Prompt enhancement and lenient variation parsing
 * - `generator`: Script generation with narration extraction
 * - `contract`: Templates, assembly, markup conversion and AI drafting
 * - `providers`: Client implementations behind the `LlmClient` trait:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::openai_compat`: Groq and OpenRouter client
 *   - `providers::mock`: Scripted client for tests and offline runs
 *   - `providers::retry`: Shared retry and backoff policy
 * - `prompts`: Prompt templates
 * - `database`: SQLite persistence of generated results
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod contract;
pub mod database;
pub mod enhancer;
pub mod errors;
pub mod file_utils;
pub mod generator;
pub mod language_utils;
pub mod prompts;
pub mod providers;
pub mod script;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use contract::{Contract, ContractAssembler, ContractKind, ContractRequest, MarkupStyle, Party};
pub use enhancer::{EnhanceRequest, PromptEnhancer, PromptVariation};
pub use generator::{GeneratedScript, ScriptGenerator, ScriptRequest};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use script::{chunk_for_tts, clean_script, CleanReport, ScriptCleaner};
pub use errors::{AppError, ContractError, EnhanceError, GenerationError, ProviderError};
