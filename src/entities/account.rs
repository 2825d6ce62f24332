use serde::{Deserialize, Serialize};

/// An account identifier, either IBAN-shaped or a plain "other" identifier
/// (domestic account number, SWIFT field 25 free-form identifier, etc.).
///
/// Distinguishing the two matters for XML generation: ISO 20022 represents
/// an IBAN-shaped identifier as `<IBAN>...</IBAN>` and anything else as
/// `<Othr><Id>...</Id></Othr>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum AccountIdentification {
    Iban(String),
    Other(String),
}

impl AccountIdentification {
    /// Heuristic IBAN shape: two letters, two digits, then 11-30 further
    /// alphanumerics, matching the structure used by every SEPA member
    /// state IBAN in circulation.
    pub fn looks_like_iban(candidate: &str) -> bool {
        let bytes = candidate.as_bytes();
        bytes.len() >= 15
            && bytes.len() <= 34
            && bytes[0].is_ascii_alphabetic()
            && bytes[1].is_ascii_alphabetic()
            && bytes[2].is_ascii_digit()
            && bytes[3].is_ascii_digit()
            && bytes[4..].iter().all(|b| b.is_ascii_alphanumeric())
    }

    pub fn from_raw(candidate: &str) -> Self {
        if Self::looks_like_iban(candidate) {
            AccountIdentification::Iban(candidate.to_string())
        } else {
            AccountIdentification::Other(candidate.to_string())
        }
    }

    pub fn value(&self) -> &str {
        match self {
            AccountIdentification::Iban(v) => v,
            AccountIdentification::Other(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_iban_shape() {
        assert!(AccountIdentification::looks_like_iban("DE89370400440532013000"));
        assert!(matches!(
            AccountIdentification::from_raw("DE89370400440532013000"),
            AccountIdentification::Iban(_)
        ));
    }

    #[test]
    fn treats_domestic_account_number_as_other() {
        assert!(matches!(
            AccountIdentification::from_raw("12345678"),
            AccountIdentification::Other(_)
        ));
    }
}
