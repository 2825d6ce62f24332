use serde::{Deserialize, Serialize};

/// A financial institution identified by BIC, optionally with a name and
/// address (SWIFT field 52A/57A/A-option parties, ISO 20022
/// `FinInstnId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FinancialInstitutionIdentification {
    pub bic: Option<String>,
    pub name: Option<String>,
    pub clearing_system_member_id: Option<String>,
}

impl FinancialInstitutionIdentification {
    pub fn from_bic(bic: impl Into<String>) -> Self {
        FinancialInstitutionIdentification {
            bic: Some(bic.into()),
            name: None,
            clearing_system_member_id: None,
        }
    }

    /// A BIC is either 8 characters (no branch) or 11 (with branch code).
    pub fn is_well_formed_bic(bic: &str) -> bool {
        (bic.len() == 8 || bic.len() == 11)
            && bic[0..6].chars().all(|c| c.is_ascii_alphabetic())
            && bic[6..8].chars().all(|c| c.is_ascii_alphanumeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_bic_shape() {
        assert!(FinancialInstitutionIdentification::is_well_formed_bic("DEUTDEFF"));
        assert!(FinancialInstitutionIdentification::is_well_formed_bic("DEUTDEFF500"));
        assert!(!FinancialInstitutionIdentification::is_well_formed_bic("TOO_SHORT"));
    }
}
