use serde::{Deserialize, Serialize};

/// camt `BkTxCd/Domn` — the three-level bank transaction code used to
/// classify camt.053/camt.054 entries. Each level falls back to `Other`
/// rather than rejecting codes outside the common SEPA set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BankTransactionCode {
    pub domain: Domain,
    pub family: Family,
    pub sub_family: SubFamily,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Domain {
    Payments,
    CashManagement,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Family {
    IssuedCreditTransfers,
    ReceivedCreditTransfers,
    IssuedDirectDebits,
    ReceivedDirectDebits,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum SubFamily {
    SepaCreditTransfer,
    SepaDirectDebitCore,
    SepaDirectDebitB2b,
    DomesticCreditTransfer,
    Other(String),
}

impl BankTransactionCode {
    pub fn from_codes(domain: &str, family: &str, sub_family: &str) -> Self {
        BankTransactionCode {
            domain: match domain {
                "PMNT" => Domain::Payments,
                "CAMT" => Domain::CashManagement,
                other => Domain::Other(other.to_string()),
            },
            family: match family {
                "ICDT" => Family::IssuedCreditTransfers,
                "RCDT" => Family::ReceivedCreditTransfers,
                "IDDT" => Family::IssuedDirectDebits,
                "RDDT" => Family::ReceivedDirectDebits,
                other => Family::Other(other.to_string()),
            },
            sub_family: match sub_family {
                "ESCT" => SubFamily::SepaCreditTransfer,
                "CORE" => SubFamily::SepaDirectDebitCore,
                "B2B" => SubFamily::SepaDirectDebitB2b,
                "DMCT" => SubFamily::DomesticCreditTransfer,
                other => SubFamily::Other(other.to_string()),
            },
        }
    }

    pub fn domain_code(&self) -> &str {
        match &self.domain {
            Domain::Payments => "PMNT",
            Domain::CashManagement => "CAMT",
            Domain::Other(s) => s,
        }
    }

    pub fn family_code(&self) -> &str {
        match &self.family {
            Family::IssuedCreditTransfers => "ICDT",
            Family::ReceivedCreditTransfers => "RCDT",
            Family::IssuedDirectDebits => "IDDT",
            Family::ReceivedDirectDebits => "RDDT",
            Family::Other(s) => s,
        }
    }

    pub fn sub_family_code(&self) -> &str {
        match &self.sub_family {
            SubFamily::SepaCreditTransfer => "ESCT",
            SubFamily::SepaDirectDebitCore => "CORE",
            SubFamily::SepaDirectDebitB2b => "B2B",
            SubFamily::DomesticCreditTransfer => "DMCT",
            SubFamily::Other(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sepa_credit_transfer() {
        let code = BankTransactionCode::from_codes("PMNT", "RCDT", "ESCT");
        assert_eq!(code.domain, Domain::Payments);
        assert_eq!(code.family, Family::ReceivedCreditTransfers);
        assert_eq!(code.sub_family, SubFamily::SepaCreditTransfer);
        assert_eq!(code.domain_code(), "PMNT");
    }

    #[test]
    fn falls_back_for_unknown_codes() {
        let code = BankTransactionCode::from_codes("SECU", "FEE1", "COMM");
        assert_eq!(code.domain, Domain::Other("SECU".into()));
    }
}
