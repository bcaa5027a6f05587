/*!
 * Contract assembly.
 *
 * - `templates`: built-in contract kinds with their required terms and default bodies
 * - `assembler`: fills a template (or an AI-drafted body) with party and term data
 * - `markup`: converts the assembled markdown for the PDF renderer
 * - `drafter`: asks the LLM for a contract body and assembles the result
 */

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod assembler;
pub mod drafter;
pub mod markup;
pub mod templates;

// Re-export main types
pub use assembler::ContractAssembler;
pub use drafter::ContractDrafter;
pub use markup::MarkupStyle;
pub use templates::ContractTemplate;

/// Kind of contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    #[default]
    NonDisclosure,
    ServiceAgreement,
    Employment,
    Freelance,
}

impl ContractKind {
    /// All built-in kinds
    pub const ALL: [ContractKind; 4] = [
        ContractKind::NonDisclosure,
        ContractKind::ServiceAgreement,
        ContractKind::Employment,
        ContractKind::Freelance,
    ];

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonDisclosure => "non_disclosure",
            Self::ServiceAgreement => "service_agreement",
            Self::Employment => "employment",
            Self::Freelance => "freelance",
        }
    }

    /// Human readable name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NonDisclosure => "non-disclosure agreement",
            Self::ServiceAgreement => "service agreement",
            Self::Employment => "employment agreement",
            Self::Freelance => "freelance contract",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContractKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "non_disclosure" | "nda" => Ok(Self::NonDisclosure),
            "service_agreement" | "service" => Ok(Self::ServiceAgreement),
            "employment" => Ok(Self::Employment),
            "freelance" => Ok(Self::Freelance),
            _ => Err(anyhow!("Invalid contract kind: {}", s)),
        }
    }
}

/// A party to a contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// Role such as "Client"; a default for the contract kind is used when unset
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
            address: None,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Data a contract is assembled from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRequest {
    #[serde(default)]
    pub kind: ContractKind,
    pub parties: Vec<Party>,
    /// Values for `{{key}}` placeholders
    #[serde(default)]
    pub terms: BTreeMap<String, String>,
    /// Today when unset
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub additional_clauses: Vec<String>,
}

impl ContractRequest {
    pub fn new(kind: ContractKind, parties: Vec<Party>) -> Self {
        Self {
            kind,
            parties,
            terms: BTreeMap::new(),
            effective_date: None,
            jurisdiction: None,
            additional_clauses: Vec::new(),
        }
    }

    pub fn term(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.insert(key.into(), value.into());
        self
    }

    pub fn effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    pub fn jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdiction = Some(jurisdiction.into());
        self
    }

    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.additional_clauses.push(clause.into());
        self
    }
}

/// An assembled contract in markdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub kind: ContractKind,
    pub title: String,
    pub markdown: String,
}

impl Contract {
    /// Convert the markdown for a renderer
    pub fn to_markup(&self, style: MarkupStyle) -> String {
        markup::to_markup(&self.markdown, style)
    }
}
