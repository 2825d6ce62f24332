use serde::{Deserialize, Serialize};

/// Which external code list a `ReasonCode` was drawn from — pain.002 status
/// reasons (`StsRsnInf/Rsn`) and payment return reasons share the same
/// four-letter shape but distinct vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ReasonCodeSet {
    Status,
    Return,
}

/// A status/return reason code (`AC01`, `AC04`, `AM04`, `MS03`, `MD07`,
/// `NARR`, ...), with an `Other` fallback for the long tail of the
/// respective ISO 20022 external code lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ReasonCode {
    IncorrectAccountNumber,
    ClosedAccountNumber,
    InsufficientFunds,
    NotSpecifiedReasonCustomerGenerated,
    EndCustomerDeceased,
    Narrative,
    Other(String),
}

impl ReasonCode {
    pub fn code(&self) -> &str {
        match self {
            ReasonCode::IncorrectAccountNumber => "AC01",
            ReasonCode::ClosedAccountNumber => "AC04",
            ReasonCode::InsufficientFunds => "AM04",
            ReasonCode::NotSpecifiedReasonCustomerGenerated => "MS03",
            ReasonCode::EndCustomerDeceased => "MD07",
            ReasonCode::Narrative => "NARR",
            ReasonCode::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "AC01" => ReasonCode::IncorrectAccountNumber,
            "AC04" => ReasonCode::ClosedAccountNumber,
            "AM04" => ReasonCode::InsufficientFunds,
            "MS03" => ReasonCode::NotSpecifiedReasonCustomerGenerated,
            "MD07" => ReasonCode::EndCustomerDeceased,
            "NARR" => ReasonCode::Narrative,
            other => ReasonCode::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_reason() {
        assert_eq!(ReasonCode::from_code("AC04").code(), "AC04");
    }
}
