/*!
 * AI-drafted contracts.
 *
 * The LLM writes only the body clauses. Title, parties, governing law and
 * signatures always come from the assembler, so a drafted contract has the
 * same frame as a template one.
 */

use log::{debug, warn};
use std::sync::Arc;

use super::assembler::ContractAssembler;
use super::templates::ContractTemplate;
use super::{Contract, ContractRequest};
use crate::errors::ContractError;
use crate::prompts::{strip_code_fences, PromptTemplate};
use crate::providers::{CompletionRequest, LlmClient};

/// Drafts contract bodies through an LLM
#[derive(Debug, Clone)]
pub struct ContractDrafter {
    client: Arc<dyn LlmClient>,
    assembler: ContractAssembler,
    temperature: f32,
    max_tokens: u32,
}

impl ContractDrafter {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            assembler: ContractAssembler::new(),
            temperature: 0.3,
            max_tokens: 4096,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Build the completion request for `request`
    pub fn build_request(&self, request: &ContractRequest) -> CompletionRequest {
        let template = ContractTemplate::for_kind(request.kind);

        let parties = request
            .parties
            .iter()
            .enumerate()
            .map(|(index, party)| {
                let role = party.role.as_deref().unwrap_or_else(|| template.default_role(index));
                format!("{} ({})", party.name.trim(), role)
            })
            .collect::<Vec<_>>()
            .join(" and ");

        let terms = request
            .terms
            .iter()
            .map(|(key, value)| format!("- {}: {}", key.replace('_', " "), value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        let vars = [
            ("kind", request.kind.display_name()),
            ("parties", parties.as_str()),
            ("jurisdiction", request.jurisdiction.as_deref().unwrap_or("unspecified")),
            ("terms", terms.as_str()),
        ];

        CompletionRequest::new(PromptTemplate::new(PromptTemplate::CONTRACT_USER).render(&vars))
            .system(PromptTemplate::CONTRACT_SYSTEM)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
    }

    /// Draft a body and assemble the contract around it
    pub async fn draft(&self, request: &ContractRequest) -> Result<Contract, ContractError> {
        // Reject bad input before paying for a completion
        self.assembler.validate(request)?;

        let completion = self.client.complete(self.build_request(request)).await?;
        let body = strip_code_fences(&completion.text);

        if body.is_empty() {
            warn!("Drafted contract body is empty, using the template body");
        } else {
            debug!("Drafted contract body of {} characters", body.chars().count());
        }

        self.assembler.assemble(request, Some(&body))
    }
}
