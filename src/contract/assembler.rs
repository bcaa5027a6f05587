/*!
 * Contract assembly from party and term data.
 */

use chrono::{Local, NaiveDate};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

use super::templates::ContractTemplate;
use super::{Contract, ContractRequest};
use crate::errors::ContractError;

/// Date format used in contract text, e.g. `March 5, 2025`
pub const DATE_FORMAT: &str = "%B %-d, %Y";

const SIGNATURE_LINE: &str = "______________________________";

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("Invalid placeholder regex")
});

/// Fills contract templates
#[derive(Debug, Clone, Default)]
pub struct ContractAssembler;

impl ContractAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Check that `request` has enough parties and every required term
    pub fn validate(&self, request: &ContractRequest) -> Result<(), ContractError> {
        if request.parties.len() < 2 {
            return Err(ContractError::NotEnoughParties(request.parties.len()));
        }

        let template = ContractTemplate::for_kind(request.kind);
        let missing: Vec<String> = template
            .required_terms
            .iter()
            .filter(|key| request.terms.get(**key).is_none_or(|value| value.trim().is_empty()))
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ContractError::MissingTerms(missing));
        }

        Ok(())
    }

    /// Assemble a contract, using `ai_body` instead of the template body when it is not blank
    pub fn assemble(&self, request: &ContractRequest, ai_body: Option<&str>) -> Result<Contract, ContractError> {
        self.validate(request)?;

        let template = ContractTemplate::for_kind(request.kind);
        let effective_date = request.effective_date.unwrap_or_else(|| Local::now().date_naive());
        let body = ai_body
            .map(str::trim)
            .filter(|body| !body.is_empty())
            .unwrap_or(template.body);

        let mut markdown = String::new();
        markdown.push_str(&format!("# {}\n\n", template.title));
        markdown.push_str(&format!("**Effective Date:** {}\n\n", format_date(effective_date)));

        markdown.push_str("**Between:**\n\n");
        for (index, party) in request.parties.iter().enumerate() {
            let role = party.role.as_deref().unwrap_or_else(|| template.default_role(index));
            markdown.push_str(&format!("**{}** ({})", party.name.trim(), role));
            if let Some(address) = party.address.as_deref().filter(|a| !a.trim().is_empty()) {
                markdown.push_str(&format!(", {}", address.trim()));
            }
            markdown.push_str("\n\n");
        }

        markdown.push_str("## Terms\n\n");
        markdown.push_str(body);
        markdown.push_str("\n\n");

        let clauses: Vec<&str> = request
            .additional_clauses
            .iter()
            .map(|clause| clause.trim())
            .filter(|clause| !clause.is_empty())
            .collect();
        if !clauses.is_empty() {
            markdown.push_str("## Additional Clauses\n\n");
            for (index, clause) in clauses.iter().enumerate() {
                markdown.push_str(&format!("{}. {}\n\n", index + 1, clause));
            }
        }

        markdown.push_str("## Governing Law\n\n");
        markdown.push_str("This Agreement shall be governed by and construed in accordance with the laws of {{jurisdiction}}.\n\n");

        markdown.push_str("## Signatures\n\n");
        for party in &request.parties {
            markdown.push_str(&format!(
                "**{}**\n\nSignature: {}\n\nDate: {}\n\n",
                party.name.trim(),
                SIGNATURE_LINE,
                SIGNATURE_LINE
            ));
        }

        let values = placeholder_values(request, effective_date);
        let markdown = fill_placeholders(markdown.trim_end(), &values);

        debug!("Assembled {} contract for {} parties", request.kind, request.parties.len());

        Ok(Contract {
            kind: request.kind,
            title: template.title.to_string(),
            markdown,
        })
    }
}

/// Format a date for contract text
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Values for every placeholder: the terms plus the built-ins
fn placeholder_values(request: &ContractRequest, effective_date: NaiveDate) -> BTreeMap<String, String> {
    let mut values: BTreeMap<String, String> = request
        .terms
        .iter()
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    values.insert("party_a".to_string(), request.parties[0].name.trim().to_string());
    values.insert("party_b".to_string(), request.parties[1].name.trim().to_string());
    values.insert("effective_date".to_string(), format_date(effective_date));
    values.insert(
        "jurisdiction".to_string(),
        request
            .jurisdiction
            .as_deref()
            .map(str::trim)
            .filter(|j| !j.is_empty())
            .unwrap_or("the jurisdiction in which the first party has its principal place of business")
            .to_string(),
    );

    values
}

/// Substitute `{{key}}` placeholders, leaving unknown ones in place
pub fn fill_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut unresolved = Vec::new();

    let filled = PLACEHOLDER_REGEX.replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            unresolved.push(caps[1].to_string());
            caps[0].to_string()
        }
    });

    if !unresolved.is_empty() {
        unresolved.sort();
        unresolved.dedup();
        warn!("Unresolved contract placeholders: {}", unresolved.join(", "));
    }

    filled.into_owned()
}
