use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The SWIFT MT message types this engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum MtType {
    Mt101,
    Mt103,
    Mt104,
    Mt200,
    Mt202,
    Mt202Cov,
    Mt900,
    Mt910,
    Mt920,
    Mt940,
    Mt941,
    Mt942,
    Mt950,
}

impl MtType {
    /// Numeric message type as it appears in block 2 (`I103...`).
    pub fn numeric(&self) -> &'static str {
        match self {
            MtType::Mt101 => "101",
            MtType::Mt103 => "103",
            MtType::Mt104 => "104",
            MtType::Mt200 => "200",
            MtType::Mt202 | MtType::Mt202Cov => "202",
            MtType::Mt900 => "900",
            MtType::Mt910 => "910",
            MtType::Mt920 => "920",
            MtType::Mt940 => "940",
            MtType::Mt941 => "941",
            MtType::Mt942 => "942",
            MtType::Mt950 => "950",
        }
    }

    /// Resolves a message type from the numeric code alone. `202COV` cannot
    /// be distinguished from a plain `202` this way — use
    /// `from_numeric_and_validation_flag` when a block-3 validation flag is
    /// available, which is the common case.
    pub fn from_numeric(code: &str) -> Result<Self, ParseError> {
        Ok(match code {
            "101" => MtType::Mt101,
            "103" => MtType::Mt103,
            "104" => MtType::Mt104,
            "200" => MtType::Mt200,
            "202" => MtType::Mt202,
            "900" => MtType::Mt900,
            "910" => MtType::Mt910,
            "920" => MtType::Mt920,
            "940" => MtType::Mt940,
            "941" => MtType::Mt941,
            "942" => MtType::Mt942,
            "950" => MtType::Mt950,
            other => return Err(ParseError::UnknownType(format!("MT{other}"))),
        })
    }

    /// MT202 carries a cover payment (MT202COV) when block 3 names the
    /// `COV` validation flag (tag 119).
    pub fn from_numeric_and_validation_flag(
        code: &str,
        validation_flag: Option<&str>,
    ) -> Result<Self, ParseError> {
        let base = Self::from_numeric(code)?;
        if base == MtType::Mt202 && validation_flag == Some("COV") {
            return Ok(MtType::Mt202Cov);
        }
        Ok(base)
    }

    /// Detects the message type straight from raw message text: first by
    /// scanning for an application header (`{2:I<nnn>...}`/`{2:O<nnn>...}`),
    /// then — for naked block-4 content carrying no header at all — by a
    /// best-effort content-shape heuristic (`:60M:` ⇒ MT942; `:60F:` +
    /// `:61:` ⇒ MT940; `:12:` + `:25:` ⇒ MT920).
    pub fn from_swift_message(text: &str) -> Result<Self, ParseError> {
        if let Some(header_start) = text.find("{2:") {
            let rest = &text[header_start + 3..];
            if rest.len() < 4 {
                return Err(ParseError::Lex(format!(
                    "block 2 too short to contain a message type: {rest}"
                )));
            }
            let numeric = &rest[1..4];
            let validation_flag = extract_validation_flag(text);
            return Self::from_numeric_and_validation_flag(numeric, validation_flag.as_deref());
        }
        if text.contains(":60M:") {
            return Ok(MtType::Mt942);
        }
        if text.contains(":60F:") && text.contains(":61:") {
            return Ok(MtType::Mt940);
        }
        if text.contains(":12:") && text.contains(":25:") {
            return Ok(MtType::Mt920);
        }
        Err(ParseError::UnknownType(
            "no application header and no recognisable statement-family content shape".into(),
        ))
    }

    pub fn is_statement_family(&self) -> bool {
        matches!(
            self,
            MtType::Mt940 | MtType::Mt941 | MtType::Mt942 | MtType::Mt950
        )
    }
}

/// Pulls the block-3 `119` validation flag (`{119:COV}`) out of raw message
/// text, if a user header is present.
fn extract_validation_flag(text: &str) -> Option<String> {
    let after = text.find("{119:")?;
    let rest = &text[after + 5..];
    let end = rest.find('}')?;
    Some(rest[..end].to_string())
}

impl fmt::Display for MtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MtType::Mt202Cov => write!(f, "202COV"),
            other => write!(f, "{}", other.numeric()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_mt202() {
        assert_eq!(
            MtType::from_numeric_and_validation_flag("202", None).unwrap(),
            MtType::Mt202
        );
    }

    #[test]
    fn resolves_mt202_cov_from_validation_flag() {
        assert_eq!(
            MtType::from_numeric_and_validation_flag("202", Some("COV")).unwrap(),
            MtType::Mt202Cov
        );
    }

    #[test]
    fn rejects_unknown_numeric_type() {
        assert!(MtType::from_numeric("999").is_err());
    }

    #[test]
    fn statement_family_membership() {
        assert!(MtType::Mt940.is_statement_family());
        assert!(!MtType::Mt103.is_statement_family());
    }

    #[test]
    fn detects_type_from_application_header() {
        let text = "{1:F01DEUTDEFFAXXX0000123456}{2:I103CHASUS33AXXXN}{4:\r\n:20:REF1\r\n-}";
        assert_eq!(MtType::from_swift_message(text).unwrap(), MtType::Mt103);
    }

    #[test]
    fn detects_mt202cov_from_header_and_block3_flag() {
        let text = "{1:F01DEUTDEFFAXXX0000123456}{2:I202CHASUS33AXXXN}{3:{119:COV}}{4:\r\n:20:REF1\r\n-}";
        assert_eq!(MtType::from_swift_message(text).unwrap(), MtType::Mt202Cov);
    }

    #[test]
    fn detects_mt942_from_naked_block4_shape() {
        let text = ":20:STARTUMS\r\n:25:12345678\r\n:28C:1/1\r\n:34F:EUR0,00\r\n:60M:C250108EUR1000,00\r\n:90D:1EUR39,42\r\n:62M:C250108EUR1039,42\r\n";
        assert_eq!(MtType::from_swift_message(text).unwrap(), MtType::Mt942);
    }

    #[test]
    fn detects_mt940_from_naked_block4_shape() {
        let text = ":20:STARTUMS\r\n:25:12345678\r\n:28C:1/1\r\n:60F:C250108EUR1000,00\r\n:61:2501080108CR39,42NTRFNONREF\r\n:62F:C250108EUR1039,42\r\n";
        assert_eq!(MtType::from_swift_message(text).unwrap(), MtType::Mt940);
    }

    #[test]
    fn detects_mt920_from_naked_block4_shape() {
        let text = ":20:REQUEST\r\n:12:940\r\n:25:12345678\r\n";
        assert_eq!(MtType::from_swift_message(text).unwrap(), MtType::Mt920);
    }

    #[test]
    fn rejects_unrecognisable_content() {
        let text = ":20:REF1\r\n:23B:CRED\r\n";
        assert!(MtType::from_swift_message(text).is_err());
    }

    #[test]
    fn type_detection_is_deterministic() {
        let text = "{1:F01DEUTDEFFAXXX0000123456}{2:I940CHASUS33AXXXN}{4:\r\n:20:REF1\r\n-}";
        assert_eq!(
            MtType::from_swift_message(text).unwrap(),
            MtType::from_swift_message(text).unwrap()
        );
    }
}
