use serde::{Deserialize, Serialize};

/// German Geschäftsvorfallcode (business transaction code), the leading
/// 3-digit code on a `:86:` GVC-formatted information line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum GvcCode {
    Salary,
    WireTransfer,
    SepaCreditTransfer,
    DirectDebit,
    Other(u16),
}

impl GvcCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            51 => GvcCode::Salary,
            53 => GvcCode::WireTransfer,
            166 => GvcCode::SepaCreditTransfer,
            808 => GvcCode::DirectDebit,
            other => GvcCode::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            GvcCode::Salary => 51,
            GvcCode::WireTransfer => 53,
            GvcCode::SepaCreditTransfer => 166,
            GvcCode::DirectDebit => 808,
            GvcCode::Other(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_codes() {
        assert_eq!(GvcCode::from_code(166), GvcCode::SepaCreditTransfer);
    }

    #[test]
    fn falls_back_for_unknown_code() {
        assert_eq!(GvcCode::from_code(999), GvcCode::Other(999));
    }
}
