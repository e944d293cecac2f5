//! Static lookup tables for remediation, cause, consequence and per-state
//! pollution reason text.
//!
//! These tables are compile time data, independent of the dataset. Every
//! accessor returns a documented default for an absent key rather than
//! failing, so handlers can attach text unconditionally. Not every parameter
//! has curated text in every table.

use crate::models::Parameter;

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Returned by [solution_for] when no remediation text exists for a
/// parameter.
pub const DEFAULT_SOLUTION: &str = "No solution available for the selected parameter.";

/// Returned by [cause_for] when no cause text exists for a parameter.
pub const DEFAULT_CAUSE: &str = "No cause information available for the selected parameter.";

/// Returned by [consequence_for] when no consequence text exists for a
/// parameter.
pub const DEFAULT_CONSEQUENCE: &str =
    "No consequence information available for the selected parameter.";

/// Returned by [reasons_for_state] for states absent from the catalog.
pub const DEFAULT_REASONS: &[&str] = &["Unknown"];

lazy_static! {
    static ref SOLUTIONS: HashMap<Parameter, &'static str> = HashMap::from([
        (
            Parameter::TotalColiform,
            "Improve sanitation facilities, ensure proper waste treatment, and prevent sewage \
             discharge into water bodies.",
        ),
        (
            Parameter::DissolvedOxygen,
            "Increase aeration, control nutrient loading to reduce algal blooms, and manage \
             organic waste discharge.",
        ),
        (
            Parameter::Ph,
            "Monitor industrial discharges, control acid rain, and manage agricultural runoff.",
        ),
        (
            Parameter::Temperature,
            "Implement riparian buffers, control thermal pollution from industrial sources, and \
             increase shading along waterways.",
        ),
        (
            Parameter::Conductivity,
            "Manage agricultural runoff, reduce road salt usage, and monitor industrial \
             discharges.",
        ),
        (
            Parameter::BiochemicalOxygenDemand,
            "Improve waste treatment processes, reduce organic matter discharge, and control \
             agricultural runoff.",
        ),
        (
            Parameter::NitrateNitrite,
            "Manage agricultural practices, reduce fertilizer usage, and improve waste treatment.",
        ),
        (
            Parameter::FecalColiform,
            "Enhance sanitation infrastructure, prevent sewage discharge, and promote good \
             hygiene practices.",
        ),
    ]);

    // No curated cause text for conductivity; lookups fall back to the
    // default.
    static ref CAUSES: HashMap<Parameter, &'static str> = HashMap::from([
        (
            Parameter::Temperature,
            "Thermal discharges from power stations and industry, and loss of riparian shading.",
        ),
        (
            Parameter::DissolvedOxygen,
            "Organic waste loading and algal blooms consuming oxygen during decomposition.",
        ),
        (
            Parameter::Ph,
            "Acidic industrial effluents, acid rain and mine drainage altering water chemistry.",
        ),
        (
            Parameter::BiochemicalOxygenDemand,
            "High organic matter loads from sewage and food processing effluents.",
        ),
        (
            Parameter::NitrateNitrite,
            "Fertilizer runoff and untreated sewage rich in nitrogen compounds.",
        ),
        (
            Parameter::FecalColiform,
            "Human and animal faecal contamination from untreated sewage.",
        ),
        (
            Parameter::TotalColiform,
            "Sewage discharge and open defecation near water bodies.",
        ),
    ]);

    static ref CONSEQUENCES: HashMap<Parameter, &'static str> = HashMap::from([
        (
            Parameter::Temperature,
            "Lower dissolved oxygen solubility and heat stress on aquatic life.",
        ),
        (
            Parameter::DissolvedOxygen,
            "Hypoxic conditions leading to fish kills and loss of aquatic biodiversity.",
        ),
        (
            Parameter::Ph,
            "Corrosion, metal leaching and disruption of aquatic ecosystems.",
        ),
        (
            Parameter::BiochemicalOxygenDemand,
            "Oxygen depletion downstream of discharge points and septic conditions.",
        ),
        (
            Parameter::NitrateNitrite,
            "Eutrophication, algal blooms and drinking water risks to infant health.",
        ),
        (
            Parameter::FecalColiform,
            "Waterborne disease transmission including cholera and dysentery.",
        ),
        (
            Parameter::TotalColiform,
            "Indicates pathogen presence making water unsafe for drinking and bathing.",
        ),
    ]);

    // Keyed by upper case state name as it appears in the dataset.
    static ref STATE_REASONS: HashMap<&'static str, &'static [&'static str]> = {
        let mut reasons: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        reasons.insert("MAHARASHTRA", &[
            "Industrial discharge", "Agricultural runoff", "Urban waste",
            "Improper sewage treatment",
        ] as &[&str]);
        reasons.insert("ANDHRA PRADESH", &[
            "Industrial waste", "Agricultural chemicals", "Sewage discharge", "Sand mining",
        ]);
        reasons.insert("UTTAR PRADESH", &[
            "Industrial effluents", "Domestic sewage", "Agricultural runoff",
            "Religious rituals and festivals",
        ]);
        reasons.insert("BIHAR", &[
            "Sewage discharge", "Industrial pollution", "Agricultural runoff",
            "Inadequate waste management",
        ]);
        reasons.insert("WEST BENGAL", &[
            "Industrial waste", "Agricultural chemicals", "Urban runoff", "Deforestation",
        ]);
        reasons.insert("ASSAM", &[
            "Oil spills", "Tea industry effluents", "Deforestation", "Urban waste",
        ]);
        reasons.insert("KARNATAKA", &[
            "Industrial waste", "Urban runoff", "Agricultural chemicals", "Sewage discharge",
        ]);
        reasons.insert("HIMACHAL PRADESH", &[
            "Hydropower projects", "Deforestation", "Urban runoff", "Industrial waste",
        ]);
        reasons.insert("KERALA", &[
            "Agricultural runoff", "Industrial waste", "Sewage discharge", "Urban runoff",
        ]);
        reasons.insert("TAMILNADU", &[
            "Industrial effluents", "Agricultural chemicals", "Urban waste", "Sewage discharge",
        ]);
        reasons.insert("MADHYA PRADESH", &[
            "Agricultural runoff", "Industrial waste", "Urban waste", "Sewage discharge",
        ]);
        reasons.insert("RAJASTHAN", &[
            "Industrial effluents", "Agricultural runoff", "Urban waste", "Desertification",
        ]);
        reasons.insert("PUNJAB", &[
            "Agricultural chemicals", "Industrial waste", "Sewage discharge", "Urban runoff",
        ]);
        reasons.insert("GOA", &[
            "Mining waste", "Tourism-related waste", "Industrial discharge", "Urban runoff",
        ]);
        reasons.insert("GUJARAT", &[
            "Industrial effluents", "Agricultural chemicals", "Urban runoff", "Sewage discharge",
        ]);
        reasons
    };
}

/// Returns remediation text for a parameter, or [DEFAULT_SOLUTION].
pub fn solution_for(parameter: Parameter) -> &'static str {
    SOLUTIONS.get(&parameter).copied().unwrap_or(DEFAULT_SOLUTION)
}

/// Returns cause text for a parameter, or [DEFAULT_CAUSE].
pub fn cause_for(parameter: Parameter) -> &'static str {
    CAUSES.get(&parameter).copied().unwrap_or(DEFAULT_CAUSE)
}

/// Returns consequence text for a parameter, or [DEFAULT_CONSEQUENCE].
pub fn consequence_for(parameter: Parameter) -> &'static str {
    CONSEQUENCES.get(&parameter).copied().unwrap_or(DEFAULT_CONSEQUENCE)
}

/// Returns the ordered pollution reasons for a state, or [DEFAULT_REASONS].
///
/// Lookup is case insensitive since state names arrive both from the dataset
/// and from API clients.
pub fn reasons_for_state(state: &str) -> &'static [&'static str] {
    STATE_REASONS
        .get(state.trim().to_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_REASONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_text_exists_for_all_parameters() {
        for parameter in Parameter::ALL {
            assert!(!solution_for(parameter).is_empty());
            assert_ne!(solution_for(parameter), DEFAULT_SOLUTION);
        }
    }

    #[test]
    fn absent_cause_resolves_to_default() {
        assert_eq!(cause_for(Parameter::Conductivity), DEFAULT_CAUSE);
        assert_ne!(cause_for(Parameter::Ph), DEFAULT_CAUSE);
    }

    #[test]
    fn absent_consequence_resolves_to_default() {
        assert_eq!(consequence_for(Parameter::Conductivity), DEFAULT_CONSEQUENCE);
    }

    #[test]
    fn state_reasons_known_state() {
        let reasons = reasons_for_state("MAHARASHTRA");
        assert_eq!(reasons.len(), 4);
        assert_eq!(reasons[0], "Industrial discharge");
    }

    #[test]
    fn state_reasons_case_insensitive() {
        assert_eq!(reasons_for_state("goa"), reasons_for_state("GOA"));
    }

    #[test]
    fn state_reasons_unknown_state_resolves_to_default() {
        assert_eq!(reasons_for_state("ATLANTIS"), DEFAULT_REASONS);
    }
}
