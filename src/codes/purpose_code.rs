use serde::{Deserialize, Serialize};

/// ISO 20022 external purpose code list (`Purp/Cd`), closed over the codes
/// commonly seen in SEPA credit transfers with an `Other` fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PurposeCode {
    Salary,
    SupplierPayment,
    TaxPayment,
    Trade,
    Pension,
    Other(String),
}

impl PurposeCode {
    pub fn code(&self) -> &str {
        match self {
            PurposeCode::Salary => "SALA",
            PurposeCode::SupplierPayment => "SUPP",
            PurposeCode::TaxPayment => "TAXS",
            PurposeCode::Trade => "TRAD",
            PurposeCode::Pension => "PENS",
            PurposeCode::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "SALA" => PurposeCode::Salary,
            "SUPP" => PurposeCode::SupplierPayment,
            "TAXS" => PurposeCode::TaxPayment,
            "TRAD" => PurposeCode::Trade,
            "PENS" => PurposeCode::Pension,
            other => PurposeCode::Other(other.to_string()),
        }
    }
}
