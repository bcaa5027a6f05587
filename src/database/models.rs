/*!
 * Database entity models.
 *
 * These structures map directly to the `generations` table and provide
 * type-safe access to persisted results.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// What produced a stored generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    /// Narration script from the script generator
    Script,
    /// Prompt variations from the enhancer
    Enhancement,
    /// Assembled or drafted contract
    Contract,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 3] = [
        GenerationKind::Script,
        GenerationKind::Enhancement,
        GenerationKind::Contract,
    ];
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Script => write!(f, "script"),
            GenerationKind::Enhancement => write!(f, "enhancement"),
            GenerationKind::Contract => write!(f, "contract"),
        }
    }
}

impl std::str::FromStr for GenerationKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "script" => Ok(GenerationKind::Script),
            "enhancement" | "enhance" => Ok(GenerationKind::Enhancement),
            "contract" => Ok(GenerationKind::Contract),
            _ => Err(anyhow::anyhow!("Invalid generation kind: {}", s)),
        }
    }
}

/// One stored result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// UUID v4
    pub id: String,
    pub kind: GenerationKind,
    /// Topic, prompt or contract request the result was generated from
    pub prompt: String,
    /// Raw provider output or assembled document
    pub content: String,
    /// Cleaned narration, scripts only
    pub narration: Option<String>,
    pub provider: String,
    pub model: String,
    /// SHA-256 of `content`, lowercase hex
    pub content_hash: String,
    /// RFC 3339
    pub created_at: String,
}

impl GenerationRecord {
    /// Create a record with a fresh id, hash and timestamp
    pub fn new(
        kind: GenerationKind,
        prompt: String,
        content: String,
        provider: String,
        model: String,
    ) -> Self {
        let content_hash = super::repository::Repository::hash_text(&content);

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            prompt,
            content,
            narration: None,
            provider,
            model,
            content_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }

    /// First line of the prompt, cut to `max_chars`
    pub fn summary(&self, max_chars: usize) -> String {
        let first_line = self.prompt.lines().next().unwrap_or("").trim();
        if first_line.chars().count() <= max_chars {
            return first_line.to_string();
        }

        let cut: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Aggregate counts over the history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub total: i64,
    pub scripts: i64,
    pub enhancements: i64,
    pub contracts: i64,
    /// Number of distinct content hashes
    pub unique_contents: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generations: {} (scripts: {}, enhancements: {}, contracts: {}), Unique: {}, Size: {} KB",
            self.total,
            self.scripts,
            self.enhancements,
            self.contracts,
            self.unique_contents,
            self.file_size_bytes / 1024
        )
    }
}
