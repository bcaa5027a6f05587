/*!
 * Prompt templates for the generation features.
 *
 * Templates use `{name}` placeholders. Unknown placeholders are left in the
 * rendered text untouched.
 */

/// A prompt with `{name}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// System prompt for prompt enhancement
    pub const ENHANCER_SYSTEM: &'static str = r#"You are a creative director who rewrites short content ideas into detailed generation prompts.

## Output Requirements
- Return ONLY valid JSON of the form {"variations": [{"title": "...", "prompt": "..."}]}
- Produce exactly {count} variations
- Each title is at most eight words
- Each prompt is self-contained and written in {language}
- Do not include any text outside the JSON structure"#;

    /// User prompt for prompt enhancement
    pub const ENHANCER_USER: &'static str = r#"Enhance the following idea into {count} distinct, richer prompts.
Tone: {tone}
Audience: {audience}
Platform: {platform}
Target duration: {duration}

Idea:
{prompt}"#;

    /// System prompt for video script writing
    pub const SCRIPT_SYSTEM: &'static str = r#"You are a professional video scriptwriter.

## Your Role
- Write narration that sounds natural when read aloud
- Mark timing as (M:SS-M:SS) and scene changes as [SCENE: description]
- Keep sentences short enough for a single breath
- Write in {language}"#;

    /// User prompt for video script writing
    pub const SCRIPT_USER: &'static str = r#"Write a {tone} video script of about {duration_secs} seconds (roughly {word_target} spoken words) about:
{topic}"#;

    /// System prompt for contract drafting
    pub const CONTRACT_SYSTEM: &'static str = r#"You are a careful contracts drafter.

## Output Requirements
- Return only the numbered body clauses of the agreement in markdown
- Use **bold** for clause headings
- Do not include a title, the parties block, a governing law clause or signature lines
- Refer to the parties as {{party_a}} and {{party_b}}"#;

    /// User prompt for contract drafting
    pub const CONTRACT_USER: &'static str = r#"Draft the body of a {kind} between {parties}.
Jurisdiction: {jurisdiction}

Agreed terms:
{terms}"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Render the template with the given variables.
    ///
    /// Placeholders are resolved in one scan, so a value containing `{name}`
    /// is inserted verbatim. Unknown placeholders stay as written.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substitution = after.find('}').and_then(|close| {
                vars.iter()
                    .find(|(name, _)| *name == &after[..close])
                    .map(|(_, value)| (close, *value))
            });

            match substitution {
                Some((close, value)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Remove a surrounding markdown code fence from a model answer
///
/// Models often wrap JSON or markdown in ```` ```json ... ``` ````. Text
/// without a leading fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    // Drop the info string (`json`, `markdown`, ...) on the opening line
    let body = match after_open.split_once('\n') {
        Some((_, rest)) => rest,
        None => after_open,
    };

    body.trim_end().trim_end_matches("```").trim().to_string()
}
