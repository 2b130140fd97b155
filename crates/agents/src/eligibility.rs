//! Eligibility step: resident lookup plus zone check, with the final
//! wording delegated to the reasoning service.
//!
//! The step has two states, pending and resolved, and resolves exactly
//! once per resident: a directory miss resolves to "cannot verify"
//! without touching the reasoner; a hit evaluates the rule grid
//! locally, then asks the reasoner for the decision text.

use std::sync::Arc;

use relief_common::{EligibilityDecision, ResidentRecord, Result};
use relief_reasoning::ReasoningClient;
use relief_store::{ResidentDirectory, ZoneRegistry};
use tracing::{debug, info};

/// Local evaluation of the eligibility rules for one resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Rule 1: the address names an active disaster zone
    pub in_active_zone: bool,
    /// Rule 2: rebate requires the rebate flag (and rule 1)
    pub rebate_eligible: bool,
    /// Rule 3: relief funds require the affected flag (and rule 1)
    pub relief_eligible: bool,
}

/// Apply the eligibility rules. Zone membership is a case-insensitive
/// substring match of a zone name against the address; a resident
/// outside every active zone is ineligible for both rebate and relief
/// regardless of their flags.
pub fn evaluate_rules(record: &ResidentRecord, zones: &[String]) -> RuleOutcome {
    let address = record.address.to_lowercase();
    let in_active_zone = zones
        .iter()
        .any(|zone| !zone.is_empty() && address.contains(&zone.to_lowercase()));

    RuleOutcome {
        in_active_zone,
        rebate_eligible: in_active_zone && record.tax_rebate_eligible,
        relief_eligible: in_active_zone && record.disaster_affected,
    }
}

/// Classify a free-text decision into a boolean-ish verdict. The
/// negative forms are checked first since they contain "eligible".
fn classify_verdict(reply: &str) -> &'static str {
    let lower = reply.to_lowercase();
    if lower.contains("not eligible") || lower.contains("ineligible") {
        "ineligible"
    } else if lower.contains("eligible") {
        "eligible"
    } else {
        "undetermined"
    }
}

pub struct EligibilityAgent {
    reasoning: Arc<dyn ReasoningClient>,
    directory: Arc<dyn ResidentDirectory>,
    zones: Arc<dyn ZoneRegistry>,
}

impl EligibilityAgent {
    pub fn new(
        reasoning: Arc<dyn ReasoningClient>,
        directory: Arc<dyn ResidentDirectory>,
        zones: Arc<dyn ZoneRegistry>,
    ) -> Self {
        Self {
            reasoning,
            directory,
            zones,
        }
    }

    /// Resolve one resident's eligibility.
    pub async fn verify(&self, resident: &str) -> Result<EligibilityDecision> {
        let Some(record) = self.directory.lookup(resident) else {
            info!(resident = %resident, "No directory record, resolving as cannot verify");
            return Ok(EligibilityDecision::cannot_verify(resident));
        };

        let zones = self.zones.active_zones();
        let rules = evaluate_rules(&record, &zones);
        debug!(
            resident = %resident,
            in_active_zone = rules.in_active_zone,
            rebate_eligible = rules.rebate_eligible,
            relief_eligible = rules.relief_eligible,
            "Evaluated eligibility rules"
        );

        let prompt = build_prompt(resident, &record, &zones, &rules);
        let reply = self.reasoning.generate(&prompt, None).await?;
        let verdict = classify_verdict(&reply.text);

        info!(resident = %resident, verdict = verdict, "Eligibility resolved");
        Ok(EligibilityDecision::new(
            resident,
            verdict,
            reply.text.trim(),
        ))
    }
}

fn build_prompt(
    resident: &str,
    record: &ResidentRecord,
    zones: &[String],
    rules: &RuleOutcome,
) -> String {
    format!(
        r#"You are an investigation assistant specializing in disaster relief eligibility.
Your task is to determine if a resident is eligible for a tax rebate or disaster relief based on their record and the current disaster zones.

Resident: {resident}
Address: {address}
Tax rebate flag: {rebate_flag}
Disaster affected flag: {affected_flag}

Disaster Zones: {zones}

Rules for Eligibility:
1. Must be in a designated disaster zone.
2. Must have 'tax_rebate_eligible' as True in their record.
3. Must be 'disaster_affected' if checking for relief funds.

Rule evaluation already performed:
- In a designated disaster zone: {in_zone}
- Tax rebate eligible: {rebate}
- Relief fund eligible: {relief}

Provide a clear decision and justification.
Concise Response (2-3 sentences):
"#,
        resident = resident,
        address = record.address,
        rebate_flag = record.tax_rebate_eligible,
        affected_flag = record.disaster_affected,
        zones = zones.join(", "),
        in_zone = rules.in_active_zone,
        rebate = rules.rebate_eligible,
        relief = rules.relief_eligible,
    )
}
