/*!
 * Built-in contract templates.
 *
 * Bodies are markdown with `{{key}}` placeholders. Besides the required terms
 * of each kind, the built-in placeholders `party_a`, `party_b`,
 * `effective_date` and `jurisdiction` are always available.
 */

use super::ContractKind;

/// Static description of one contract kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractTemplate {
    pub kind: ContractKind,
    pub title: &'static str,
    /// Term keys the caller must supply
    pub required_terms: &'static [&'static str],
    /// Default roles for the first two parties
    pub roles: [&'static str; 2],
    pub body: &'static str,
}

const NON_DISCLOSURE_BODY: &str = r#"**1. Purpose.** {{party_a}} intends to share confidential information with {{party_b}} for the following purpose: {{purpose}}.

**2. Confidential Information.** Confidential Information means any non-public business, technical or financial information disclosed by {{party_a}}, whether oral, written or electronic.

**3. Obligations.** {{party_b}} shall hold the Confidential Information in strict confidence, use it only for the purpose stated above and not disclose it to any third party without prior written consent.

**4. Term.** The obligations of this Agreement remain in force for {{confidentiality_period}} from {{effective_date}}.

**5. Return of Materials.** On request, {{party_b}} shall promptly return or destroy all materials containing Confidential Information."#;

const SERVICE_AGREEMENT_BODY: &str = r#"**1. Services.** {{party_a}} shall provide the following services to {{party_b}}: {{services}}.

**2. Fees.** {{party_b}} shall pay {{party_a}} {{fees}} for the services.

**3. Payment Terms.** {{payment_terms}}.

**4. Independent Contractor.** {{party_a}} performs the services as an independent contractor and not as an employee of {{party_b}}.

**5. Termination.** Either party may terminate this Agreement with thirty (30) days written notice."#;

const EMPLOYMENT_BODY: &str = r#"**1. Position.** {{party_a}} employs {{party_b}} as {{position}}, starting on {{start_date}}.

**2. Compensation.** {{party_b}} shall receive a salary of {{salary}}, payable according to the regular payroll schedule of {{party_a}}.

**3. Duties.** {{party_b}} shall perform the duties customarily associated with the position and any other duties reasonably assigned.

**4. Confidentiality.** {{party_b}} shall not disclose confidential information of {{party_a}} during or after employment.

**5. Termination.** Employment may be terminated by either party in accordance with applicable law."#;

const FREELANCE_BODY: &str = r#"**1. Deliverables.** {{party_b}} shall deliver the following to {{party_a}}: {{deliverables}}.

**2. Deadline.** The deliverables are due by {{deadline}}.

**3. Rate.** {{party_a}} shall pay {{party_b}} at a rate of {{rate}}.

**4. Intellectual Property.** On full payment, all rights in the deliverables transfer to {{party_a}}.

**5. Revisions.** Reasonable revisions requested before final acceptance are included in the rate."#;

const TEMPLATES: [ContractTemplate; 4] = [
    ContractTemplate {
        kind: ContractKind::NonDisclosure,
        title: "NON-DISCLOSURE AGREEMENT",
        required_terms: &["purpose", "confidentiality_period"],
        roles: ["Disclosing Party", "Receiving Party"],
        body: NON_DISCLOSURE_BODY,
    },
    ContractTemplate {
        kind: ContractKind::ServiceAgreement,
        title: "SERVICE AGREEMENT",
        required_terms: &["services", "fees", "payment_terms"],
        roles: ["Service Provider", "Client"],
        body: SERVICE_AGREEMENT_BODY,
    },
    ContractTemplate {
        kind: ContractKind::Employment,
        title: "EMPLOYMENT AGREEMENT",
        required_terms: &["position", "salary", "start_date"],
        roles: ["Employer", "Employee"],
        body: EMPLOYMENT_BODY,
    },
    ContractTemplate {
        kind: ContractKind::Freelance,
        title: "FREELANCE CONTRACT",
        required_terms: &["deliverables", "rate", "deadline"],
        roles: ["Client", "Freelancer"],
        body: FREELANCE_BODY,
    },
];

impl ContractTemplate {
    /// Template for `kind`
    pub fn for_kind(kind: ContractKind) -> &'static ContractTemplate {
        TEMPLATES
            .iter()
            .find(|template| template.kind == kind)
            .unwrap_or(&TEMPLATES[0])
    }

    /// Default role of the party at `index`
    pub fn default_role(&self, index: usize) -> &'static str {
        self.roles.get(index).copied().unwrap_or("Party")
    }
}
