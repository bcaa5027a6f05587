/*!
 * Prompt enhancement.
 *
 * A short user idea is rewritten by the LLM into several richer prompt
 * variations. Models do not always honor the requested JSON shape, so the
 * answer is read leniently: code fences are stripped, several JSON shapes are
 * accepted, and a numbered or bulleted list is the last resort.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::errors::EnhanceError;
use crate::language_utils;
use crate::prompts::{strip_code_fences, PromptTemplate};
use crate::providers::{CompletionRequest, LlmClient};

/// Largest number of variations a single request may ask for
pub const MAX_VARIATIONS: usize = 10;

/// Keys accepted as the prompt text of a variation object
const PROMPT_KEYS: [&str; 5] = ["prompt", "enhanced_prompt", "text", "content", "description"];

static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:\d{1,2}[.)]|[-*•])\s+(.+?)\s*$").expect("Invalid list item regex")
});

/// Optional context that steers the variations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhanceContext {
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    /// Output language code; English when unset
    #[serde(default)]
    pub language: Option<String>,
}

/// A prompt enhancement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceRequest {
    pub prompt: String,
    pub count: usize,
    #[serde(default)]
    pub context: EnhanceContext,
}

impl EnhanceRequest {
    pub fn new(prompt: impl Into<String>, count: usize) -> Self {
        Self {
            prompt: prompt.into(),
            count,
            context: EnhanceContext::default(),
        }
    }

    pub fn with_context(mut self, context: EnhanceContext) -> Self {
        self.context = context;
        self
    }

    /// Check the prompt and count before anything is sent
    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.prompt.trim().is_empty() {
            return Err(EnhanceError::EmptyPrompt);
        }
        if self.count == 0 || self.count > MAX_VARIATIONS {
            return Err(EnhanceError::InvalidCount(self.count));
        }
        Ok(())
    }
}

/// One enhanced prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptVariation {
    pub title: String,
    pub prompt: String,
}

/// Turns short ideas into enhanced prompt variations
#[derive(Debug, Clone)]
pub struct PromptEnhancer {
    client: Arc<dyn LlmClient>,
    temperature: f32,
    max_tokens: u32,
}

impl PromptEnhancer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            temperature: 0.9,
            max_tokens: 2048,
        }
    }

    /// Override sampling settings
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build the completion request for `request`
    pub fn build_request(&self, request: &EnhanceRequest) -> CompletionRequest {
        let context = &request.context;
        let language_code = context.language.as_deref().unwrap_or("en");
        let language = language_utils::get_language_name(language_code).unwrap_or_else(|_| language_code.to_string());
        let count = request.count.to_string();
        let duration = context
            .duration_secs
            .map(|secs| format!("{} seconds", secs))
            .unwrap_or_else(|| "flexible".to_string());

        let vars = [
            ("count", count.as_str()),
            ("language", language.as_str()),
            ("tone", context.tone.as_deref().unwrap_or("engaging")),
            ("audience", context.audience.as_deref().unwrap_or("general")),
            ("platform", context.platform.as_deref().unwrap_or("any")),
            ("duration", duration.as_str()),
            ("prompt", request.prompt.trim()),
        ];

        CompletionRequest::new(PromptTemplate::new(PromptTemplate::ENHANCER_USER).render(&vars))
            .system(PromptTemplate::new(PromptTemplate::ENHANCER_SYSTEM).render(&vars))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .json_output()
    }

    /// Produce up to `request.count` enhanced variations
    pub async fn enhance(&self, request: &EnhanceRequest) -> Result<Vec<PromptVariation>, EnhanceError> {
        request.validate()?;

        let completion = self.client.complete(self.build_request(request)).await?;
        let variations = parse_variations(&completion.text, request.count)?;

        if variations.len() < request.count {
            warn!(
                "Requested {} variations but the model returned {}",
                request.count,
                variations.len()
            );
        }
        debug!("Enhanced prompt into {} variation(s)", variations.len());

        Ok(variations)
    }
}

/// Read variations from a model answer, keeping at most `count`
pub fn parse_variations(text: &str, count: usize) -> Result<Vec<PromptVariation>, EnhanceError> {
    let body = strip_code_fences(text);

    let mut variations = serde_json::from_str::<Value>(&body)
        .ok()
        .map(|value| variations_from_value(&value))
        .filter(|found| !found.is_empty())
        .or_else(|| extract_json_regions(&body).into_iter().map(|v| variations_from_value(&v)).find(|found| !found.is_empty()))
        .unwrap_or_else(|| variations_from_list(&body));

    if variations.is_empty() {
        let preview: String = text.trim().chars().take(200).collect();
        return Err(EnhanceError::Unparseable(preview));
    }

    variations.truncate(count);
    Ok(variations)
}

/// Variations held by a JSON value of any accepted shape
fn variations_from_value(value: &Value) -> Vec<PromptVariation> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("variations").or_else(|| map.get("prompts")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => std::slice::from_ref(value),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| variation_from_item(idx, item))
        .collect()
}

fn variation_from_item(idx: usize, item: &Value) -> Option<PromptVariation> {
    let (title, prompt) = match item {
        Value::String(prompt) => (None, prompt.trim().to_string()),
        Value::Object(map) => {
            let prompt = PROMPT_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))?
                .trim()
                .to_string();
            let title = map
                .get("title")
                .and_then(Value::as_str)
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty());
            (title, prompt)
        }
        _ => return None,
    };

    if prompt.is_empty() {
        return None;
    }

    Some(PromptVariation {
        title: title.unwrap_or_else(|| default_title(idx)),
        prompt,
    })
}

/// JSON values found between the outermost `{`/`}` and `[`/`]` pairs, earliest first
fn extract_json_regions(text: &str) -> Vec<Value> {
    let mut regions: Vec<(usize, Value)> = [('{', '}'), ('[', ']')]
        .iter()
        .filter_map(|(open, close)| {
            let start = text.find(*open)?;
            let end = text.rfind(*close)?;
            if end <= start {
                return None;
            }
            let value = serde_json::from_str::<Value>(&text[start..=end]).ok()?;
            Some((start, value))
        })
        .collect();

    regions.sort_by_key(|(start, _)| *start);
    regions.into_iter().map(|(_, value)| value).collect()
}

/// Variations read from a numbered or bulleted list
fn variations_from_list(text: &str) -> Vec<PromptVariation> {
    text.lines()
        .filter_map(|line| LIST_ITEM_REGEX.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().replace("**", "")))
        .enumerate()
        .filter_map(|(idx, item)| {
            let item = item.trim();
            if item.is_empty() {
                return None;
            }
            let (title, prompt) = match item.split_once(": ") {
                Some((title, prompt)) if title.split_whitespace().count() <= 8 && !prompt.trim().is_empty() => {
                    (title.trim().to_string(), prompt.trim().to_string())
                }
                _ => (default_title(idx), item.to_string()),
            };
            Some(PromptVariation { title, prompt })
        })
        .collect()
}

fn default_title(idx: usize) -> String {
    format!("Variation {}", idx + 1)
}
