use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Field 71A / pain `ChrgBr`: who bears transfer charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ChargeBearer {
    /// `BEN` — beneficiary bears all charges.
    Beneficiary,
    /// `OUR` — ordering customer bears all charges.
    Ours,
    /// `SHA` — shared between both parties.
    Shared,
}

impl ChargeBearer {
    pub fn code(&self) -> &'static str {
        match self {
            ChargeBearer::Beneficiary => "BEN",
            ChargeBearer::Ours => "OUR",
            ChargeBearer::Shared => "SHA",
        }
    }

    pub fn parse(code: &str) -> Result<Self, ParseError> {
        match code {
            "BEN" => Ok(ChargeBearer::Beneficiary),
            "OUR" => Ok(ChargeBearer::Ours),
            "SHA" => Ok(ChargeBearer::Shared),
            other => Err(ParseError::invalid_value(
                "71A/ChrgBr",
                format!("'{other}' is not one of BEN, OUR, SHA"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_codes() {
        for code in ["BEN", "OUR", "SHA"] {
            assert_eq!(ChargeBearer::parse(code).unwrap().code(), code);
        }
    }

    #[test]
    fn rejects_unknown_code() {
        assert!(ChargeBearer::parse("XXX").is_err());
    }
}
