use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Credit/debit direction. SWIFT statement lines additionally distinguish
/// reversals (`RC`/`RD`), modeled here as a separate `is_reversal` flag
/// rather than four enum variants, since reversal is an orthogonal concern
/// from direction everywhere else in the data model (camt `CdtDbtInd`,
/// pain `CdtDbtInd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CreditDebit {
    Credit,
    Debit,
}

impl CreditDebit {
    pub fn as_iso_str(&self) -> &'static str {
        match self {
            CreditDebit::Credit => "CRDT",
            CreditDebit::Debit => "DBIT",
        }
    }

    pub fn as_mt_mark(&self) -> char {
        match self {
            CreditDebit::Credit => 'C',
            CreditDebit::Debit => 'D',
        }
    }

    /// Parses a `:61:`/balance-field debit/credit mark, returning the
    /// direction and whether the mark denotes a reversal (`RC`/`RD`).
    pub fn parse_mt_mark(mark: &str) -> Result<(Self, bool), ParseError> {
        match mark {
            "C" => Ok((CreditDebit::Credit, false)),
            "D" => Ok((CreditDebit::Debit, false)),
            "RC" => Ok((CreditDebit::Credit, true)),
            "RD" => Ok((CreditDebit::Debit, true)),
            other => Err(ParseError::invalid_value(
                "debit_credit_mark",
                format!("'{other}' is not one of C, D, RC, RD"),
            )),
        }
    }

    pub fn parse_iso_str(value: &str) -> Result<Self, ParseError> {
        match value {
            "CRDT" => Ok(CreditDebit::Credit),
            "DBIT" => Ok(CreditDebit::Debit),
            other => Err(ParseError::invalid_value(
                "CdtDbtInd",
                format!("'{other}' is not CRDT or DBIT"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_marks() {
        assert_eq!(
            CreditDebit::parse_mt_mark("D").unwrap(),
            (CreditDebit::Debit, false)
        );
        assert_eq!(
            CreditDebit::parse_mt_mark("C").unwrap(),
            (CreditDebit::Credit, false)
        );
    }

    #[test]
    fn parses_reversal_marks() {
        assert_eq!(
            CreditDebit::parse_mt_mark("RD").unwrap(),
            (CreditDebit::Debit, true)
        );
        assert_eq!(
            CreditDebit::parse_mt_mark("RC").unwrap(),
            (CreditDebit::Credit, true)
        );
    }

    #[test]
    fn rejects_unknown_mark() {
        assert!(CreditDebit::parse_mt_mark("X").is_err());
    }
}
