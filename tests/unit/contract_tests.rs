/*!
 * Tests for contract assembly and markup conversion
 */

use std::sync::Arc;

use chrono::NaiveDate;
use scriptsmith::contract::{
    ContractAssembler, ContractDrafter, ContractKind, ContractRequest, ContractTemplate, MarkupStyle, Party,
};
use scriptsmith::errors::ContractError;
use scriptsmith::providers::MockProvider;

fn request_with_all_terms(kind: ContractKind) -> ContractRequest {
    let template = ContractTemplate::for_kind(kind);
    let mut request = ContractRequest::new(kind, vec![Party::new("Northwind Ltd"), Party::new("Ada Lovelace")])
        .effective_date(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap())
        .jurisdiction("England and Wales");

    for key in template.required_terms {
        request = request.term(*key, format!("value of {}", key));
    }
    request
}

#[test]
fn test_assemble_everyKind_shouldResolveAllPlaceholders() {
    for kind in ContractKind::ALL {
        let contract = ContractAssembler::new()
            .assemble(&request_with_all_terms(kind), None)
            .unwrap();

        assert!(!contract.markdown.contains("{{"), "{} left placeholders", kind);
        assert!(contract.markdown.starts_with(&format!("# {}", contract.title)));
        assert!(contract.markdown.contains("**Effective Date:** January 9, 2025"));
        assert!(contract.markdown.contains("the laws of England and Wales."));
        for key in ContractTemplate::for_kind(kind).required_terms {
            assert!(contract.markdown.contains(&format!("value of {}", key)));
        }
    }
}

#[test]
fn test_assemble_shouldUseDefaultRolesUnlessGiven() {
    let mut request = request_with_all_terms(ContractKind::ServiceAgreement);
    request.parties[1].role = Some("Customer".to_string());

    let contract = ContractAssembler::new().assemble(&request, None).unwrap();

    assert!(contract.markdown.contains("**Northwind Ltd** (Service Provider)"));
    assert!(contract.markdown.contains("**Ada Lovelace** (Customer)"));
}

#[test]
fn test_assemble_withoutJurisdiction_shouldUseDefaultPhrase() {
    let mut request = request_with_all_terms(ContractKind::Employment);
    request.jurisdiction = None;

    let contract = ContractAssembler::new().assemble(&request, None).unwrap();

    assert!(contract
        .markdown
        .contains("the laws of the jurisdiction in which the first party has its principal place of business."));
}

#[test]
fn test_assemble_withUnknownPlaceholderInAiBody_shouldKeepIt() {
    let request = request_with_all_terms(ContractKind::Freelance);
    let body = "**1. Scope.** {{party_b}} works for {{party_a}} under {{unknown_term}}.";

    let contract = ContractAssembler::new().assemble(&request, Some(body)).unwrap();

    assert!(contract.markdown.contains("Ada Lovelace works for Northwind Ltd under {{unknown_term}}."));
}

#[test]
fn test_assemble_withNoParties_shouldFail() {
    let request = ContractRequest::new(ContractKind::NonDisclosure, Vec::new());
    assert!(matches!(
        ContractAssembler::new().assemble(&request, None),
        Err(ContractError::NotEnoughParties(0))
    ));
}

#[test]
fn test_assemble_withThreeParties_shouldSignForEach() {
    let mut request = request_with_all_terms(ContractKind::NonDisclosure);
    request.parties.push(Party::new("Witness Co"));

    let contract = ContractAssembler::new().assemble(&request, None).unwrap();

    assert!(contract.markdown.contains("**Witness Co** (Party)"));
    assert_eq!(contract.markdown.matches("Signature: ").count(), 3);
}

#[test]
fn test_toMarkup_reportLab_shouldProduceRendererTags() {
    let contract = ContractAssembler::new()
        .assemble(&request_with_all_terms(ContractKind::NonDisclosure), None)
        .unwrap();

    let markup = contract.to_markup(MarkupStyle::ReportLab);

    assert!(markup.starts_with("<b>NON-DISCLOSURE AGREEMENT</b>"));
    assert!(markup.contains("<b>1. Purpose.</b>"));
    assert!(!markup.contains("**"));
    assert!(!markup.contains('#'));
}

#[test]
fn test_toMarkup_html_shouldEscapeTermValues() {
    let request = request_with_all_terms(ContractKind::ServiceAgreement).term("fees", "<$5,000 & expenses>");
    let contract = ContractAssembler::new().assemble(&request, None).unwrap();

    let html = contract.to_markup(MarkupStyle::Html);

    assert!(html.contains("&lt;$5,000 &amp; expenses&gt;"));
    assert!(html.contains("<h2>Terms</h2>"));
    assert!(html.contains("<strong>2. Fees.</strong>"));
}

#[test]
fn test_markupStyle_fromStr_shouldAcceptKnownNames() {
    assert_eq!("ReportLab".parse::<MarkupStyle>().unwrap(), MarkupStyle::ReportLab);
    assert_eq!("text".parse::<MarkupStyle>().unwrap(), MarkupStyle::Plain);
    assert!("pdf".parse::<MarkupStyle>().is_err());
}

#[test]
fn test_draft_withEmptyAiBody_shouldUseTemplateBody() {
    let provider = MockProvider::scripted(["```\n```"]);
    let drafter = ContractDrafter::new(Arc::new(provider.clone()));
    let request = request_with_all_terms(ContractKind::Employment);

    let contract = tokio_test::block_on(drafter.draft(&request)).unwrap();

    assert!(contract.markdown.contains("employs Ada Lovelace as value of position"));
    assert_eq!(provider.request_count(), 1);
    assert!(provider.requests()[0].prompt.contains("Northwind Ltd (Employer) and Ada Lovelace (Employee)"));
}
